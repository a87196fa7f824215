//! Conversion of version-independent settings into server requests.
//!
//! Converters are pure: they copy the server-provided defaults, overlay the
//! settings and return the request. Nothing is cached between calls.

pub mod blackbox;
pub mod v411;
pub mod v470;

use serde::Serialize;

use crate::errors::AppError;
use crate::models::settings::{ScanModule, ScanSettings};
use crate::server::{self, ServerVersion, WhiteBoxSettingsModel};

/// Derive the white-box analysis switches from the selected scan modules.
pub fn apply_white_box(settings: &ScanSettings, mut model: WhiteBoxSettingsModel) -> WhiteBoxSettingsModel {
    model.static_code_analysis_enabled = Some(
        settings.has_module(ScanModule::VulnerableSourceCode)
            || settings.has_module(ScanModule::DataFlowAnalysis)
            || settings.has_module(ScanModule::StaticCodeAnalysis),
    );
    model.pattern_matching_enabled = Some(settings.has_module(ScanModule::PatternMatching));
    model.search_for_configuration_flaws_enabled =
        Some(settings.has_module(ScanModule::Configuration));
    model.search_for_vulnerable_components_enabled =
        Some(settings.has_module(ScanModule::Components));
    model
}

/// Default project settings as returned by a particular server version.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultProjectSettings {
    V411(server::v411::DefaultProjectSettingsModel),
    V470(server::v470::DefaultProjectSettingsModel),
}

impl DefaultProjectSettings {
    pub fn from_json(version: ServerVersion, data: &[u8]) -> Result<Self, AppError> {
        Ok(match version {
            ServerVersion::V411 => Self::V411(serde_json::from_slice(data)?),
            ServerVersion::V470 => Self::V470(serde_json::from_slice(data)?),
        })
    }

    pub fn version(&self) -> ServerVersion {
        match self {
            Self::V411(_) => ServerVersion::V411,
            Self::V470(_) => ServerVersion::V470,
        }
    }
}

/// Project creation request in the wire schema of the target server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CreateProjectRequest {
    V411(server::v411::CreateProjectModel),
    V470(server::v470::CreateProjectSettingsModel),
}

impl CreateProjectRequest {
    pub fn version(&self) -> ServerVersion {
        match self {
            Self::V411(_) => ServerVersion::V411,
            Self::V470(_) => ServerVersion::V470,
        }
    }
}

/// Convert settings for whichever server version produced `defaults`.
pub fn convert(
    settings: &ScanSettings,
    defaults: &DefaultProjectSettings,
) -> Result<CreateProjectRequest, AppError> {
    tracing::info!(
        project = %settings.project_name,
        version = %defaults.version(),
        "Converting project settings"
    );
    match defaults {
        DefaultProjectSettings::V411(defaults) => {
            v411::convert(settings, defaults).map(CreateProjectRequest::V411)
        }
        DefaultProjectSettings::V470(defaults) => {
            v470::convert(settings, defaults).map(CreateProjectRequest::V470)
        }
    }
}
