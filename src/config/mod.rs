use std::env;
use std::path::PathBuf;

use crate::errors::AppError;
use crate::models::reports::Locale;
use crate::server::ServerVersion;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_version: ServerVersion,
    pub default_locale: Locale,
    pub output_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from any variable source; unset variables
    /// take their defaults, set but invalid ones are rejected.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let server_version = match lookup("SCANBRIDGE_SERVER_VERSION") {
            Some(value) => value.parse()?,
            None => ServerVersion::V470,
        };
        let default_locale = match lookup("SCANBRIDGE_DEFAULT_LOCALE") {
            Some(value) => Locale::from_code(&value).ok_or_else(|| {
                AppError::Validation(format!("SCANBRIDGE_DEFAULT_LOCALE: unsupported locale {value}"))
            })?,
            None => Locale::default(),
        };
        let output_dir = lookup("SCANBRIDGE_OUTPUT_DIR")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| ".scanbridge".to_string())
            .into();

        Ok(Self {
            server_version,
            default_locale,
            output_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.server_version, ServerVersion::V470);
        assert_eq!(config.default_locale, Locale::En);
        assert_eq!(config.output_dir, PathBuf::from(".scanbridge"));
    }

    #[test]
    fn values_read_from_vars() {
        let config = load(&[
            ("SCANBRIDGE_SERVER_VERSION", "v411"),
            ("SCANBRIDGE_DEFAULT_LOCALE", "ru"),
            ("SCANBRIDGE_OUTPUT_DIR", "/tmp/reports"),
        ])
        .unwrap();
        assert_eq!(config.server_version, ServerVersion::V411);
        assert_eq!(config.default_locale, Locale::Ru);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(load(&[("SCANBRIDGE_SERVER_VERSION", "v5")]).unwrap_err().is_validation());
        assert!(load(&[("SCANBRIDGE_DEFAULT_LOCALE", "de")]).unwrap_err().is_validation());
    }
}
