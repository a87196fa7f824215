//! Internal models: scan settings, policies, report requests and scan results.

pub mod policy;
pub mod reports;
pub mod scan_result;
pub mod settings;
