//! Legacy server API v4.1.1 wire schema.
//!
//! Projects carry a single programming language and the black-box
//! authentication model has no raw cookie variant.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mapping::{self, BlackBoxTables};
use crate::server::{blackbox, ServerVersion, WhiteBoxSettingsModel, WireSchema};

/// Marker for the v4.1.1 schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V411;

impl WireSchema for V411 {
    const VERSION: ServerVersion = ServerVersion::V411;

    type ScanLevel = BlackBoxScanLevel;
    type ScanScope = ScanScope;
    type AuthType = AuthType;
    type ProxyType = ProxyType;
    type FormDetection = BlackBoxFormDetection;
    type AddressFormat = BlackBoxFormat;

    fn black_box_tables() -> &'static BlackBoxTables<Self> {
        &mapping::v411::BLACK_BOX
    }
}

pub type BlackBoxSettingsBaseModel = blackbox::BlackBoxSettingsBaseModel<V411>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlackBoxScanLevel {
    None,
    Fast,
    Normal,
    Full,
}

impl BlackBoxScanLevel {
    pub const ALL: [BlackBoxScanLevel; 4] = [Self::None, Self::Fast, Self::Normal, Self::Full];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanScope {
    Domain,
    Folder,
    Path,
}

impl ScanScope {
    pub const ALL: [ScanScope; 3] = [Self::Domain, Self::Folder, Self::Path];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthType {
    None,
    Form,
    Http,
}

impl AuthType {
    pub const ALL: [AuthType; 3] = [Self::None, Self::Form, Self::Http];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyType {
    Http,
    HttpNoConnect,
    Socks5,
}

impl ProxyType {
    pub const ALL: [ProxyType; 3] = [Self::Http, Self::HttpNoConnect, Self::Socks5];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlackBoxFormDetection {
    Auto,
    Manual,
}

impl BlackBoxFormDetection {
    pub const ALL: [BlackBoxFormDetection; 2] = [Self::Auto, Self::Manual];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlackBoxFormat {
    Wildcard,
    ExactMatch,
    Regexp,
}

impl BlackBoxFormat {
    pub const ALL: [BlackBoxFormat; 3] = [Self::Wildcard, Self::ExactMatch, Self::Regexp];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgrammingLanguage {
    None,
    DotNet,
    Php,
    Java,
    JavaScript,
    CPlusPlus,
    Sql,
    ObjectiveC,
    Swift,
    Kotlin,
    Go,
    Python,
}

impl ProgrammingLanguage {
    pub const ALL: [ProgrammingLanguage; 12] = [
        Self::None,
        Self::DotNet,
        Self::Php,
        Self::Java,
        Self::JavaScript,
        Self::CPlusPlus,
        Self::Sql,
        Self::ObjectiveC,
        Self::Swift,
        Self::Kotlin,
        Self::Go,
        Self::Python,
    ];
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultProjectSettingsModel {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub programming_language: Option<ProgrammingLanguage>,
    pub project_url: Option<String>,
    pub black_box: Option<BlackBoxSettingsBaseModel>,
    pub black_box_enabled: Option<bool>,
    pub white_box: Option<WhiteBoxSettingsModel>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectModel {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub programming_language: Option<ProgrammingLanguage>,
    pub project_url: Option<String>,
    pub black_box: Option<BlackBoxSettingsBaseModel>,
    pub black_box_enabled: Option<bool>,
    pub white_box: Option<WhiteBoxSettingsModel>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl From<&DefaultProjectSettingsModel> for CreateProjectModel {
    fn from(defaults: &DefaultProjectSettingsModel) -> Self {
        Self {
            id: defaults.id,
            name: defaults.name.clone(),
            programming_language: defaults.programming_language,
            project_url: defaults.project_url.clone(),
            black_box: defaults.black_box.clone(),
            black_box_enabled: defaults.black_box_enabled,
            white_box: defaults.white_box.clone(),
            extra: defaults.extra.clone(),
        }
    }
}
