//! Wire schemas of the supported server API versions.
//!
//! Each version gets its own module with its enums and request models.
//! Black-box models have the same shape in every version and are generic
//! over [`WireSchema`], which supplies the version's enums and tables.

pub mod blackbox;
pub mod v411;
pub mod v470;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::mapping::BlackBoxTables;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerVersion {
    V411,
    V470,
}

impl ServerVersion {
    pub const ALL: [ServerVersion; 2] = [Self::V411, Self::V470];
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V411 => write!(f, "v411"),
            Self::V470 => write!(f, "v470"),
        }
    }
}

impl FromStr for ServerVersion {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "v411" | "4.1.1" => Ok(Self::V411),
            "v470" | "4.7" | "4.7.0" => Ok(Self::V470),
            other => Err(AppError::Validation(format!(
                "Unsupported server version: {other}"
            ))),
        }
    }
}

/// Bounds every wire enum must satisfy.
pub trait WireEnum:
    Serialize + DeserializeOwned + fmt::Debug + Clone + Copy + PartialEq + Send + Sync + 'static
{
}

impl<T> WireEnum for T where
    T: Serialize + DeserializeOwned + fmt::Debug + Clone + Copy + PartialEq + Send + Sync + 'static
{
}

/// A server API version's black-box vocabulary.
pub trait WireSchema:
    fmt::Debug + Clone + Copy + PartialEq + Default + Send + Sync + 'static
{
    const VERSION: ServerVersion;

    type ScanLevel: WireEnum;
    type ScanScope: WireEnum;
    type AuthType: WireEnum;
    type ProxyType: WireEnum;
    type FormDetection: WireEnum;
    type AddressFormat: WireEnum;

    fn black_box_tables() -> &'static BlackBoxTables<Self>;
}

/// White-box analysis switches, identical across supported versions.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteBoxSettingsModel {
    pub static_code_analysis_enabled: Option<bool>,
    pub pattern_matching_enabled: Option<bool>,
    pub search_for_configuration_flaws_enabled: Option<bool>,
    pub search_for_vulnerable_components_enabled: Option<bool>,
}
