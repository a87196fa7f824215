//! Unified error type for conversion, normalization and report generation.

use std::error::Error as StdError;

use crate::server::ServerVersion;

/// Boxed cause carried by [`AppError::Generic`].
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Application error type shared by every component of the crate.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conversion error: {field} value {variant} is not supported by server {version}")]
    Conversion {
        field: &'static str,
        variant: String,
        version: ServerVersion,
    },

    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: BoxedCause,
    },
}

impl AppError {
    /// Wrap any failure into a generic error that keeps the original cause.
    pub fn generic(message: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        Self::Generic {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error represents a failed validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The wrapped application error of a generic failure, if it has one.
    pub fn original(&self) -> Option<&AppError> {
        match self {
            Self::Generic { source, .. } => source.downcast_ref::<AppError>(),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        Self::Validation(format!("invalid field(s) {}: {errors}", fields.join(", ")))
    }
}
