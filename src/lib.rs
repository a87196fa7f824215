pub mod config;
pub mod converters;
pub mod errors;
pub mod mapping;
pub mod models;
pub mod parsers;
pub mod server;
pub mod services;
