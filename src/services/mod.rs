//! Report generation services.

pub mod file_ops;
pub mod fingerprint;
pub mod offline;
pub mod report_lifecycle;
pub mod reports;
pub mod sarif;
pub mod sonar_giif;
