//! Parsers turning server payloads into the crate's internal models.
//!
//! Parsers are tolerant: a bad record becomes a [`ParseWarning`] and the
//! rest of the payload is still returned.

pub mod scan_result;

use crate::errors::AppError;
use crate::models::scan_result::ScanResult;

/// Problem found in one part of a payload that did not stop parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    /// Index of the offending issue, when the warning is about one.
    pub record_index: Option<usize>,
    pub field: String,
    pub message: String,
}

impl ParseWarning {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            record_index: None,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn for_record(index: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            record_index: Some(index),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of normalizing a scan-result payload.
#[derive(Debug, Clone)]
pub struct NormalizedScanResult {
    pub scan_result: ScanResult,
    pub warnings: Vec<ParseWarning>,
}

/// Pluggable scan-result payload parser.
pub trait Parser: Send + Sync {
    fn parse(&self, data: &[u8]) -> Result<NormalizedScanResult, AppError>;

    /// Name of the payload source, for logs.
    fn source(&self) -> &str;
}
