//! Server API v4.7 wire schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mapping::{self, BlackBoxTables};
use crate::server::{blackbox, ServerVersion, WhiteBoxSettingsModel, WireSchema};

/// Marker for the v4.7 schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V470;

impl WireSchema for V470 {
    const VERSION: ServerVersion = ServerVersion::V470;

    type ScanLevel = BlackBoxScanLevel;
    type ScanScope = ScanScope;
    type AuthType = AuthType;
    type ProxyType = ProxyType;
    type FormDetection = BlackBoxFormDetection;
    type AddressFormat = BlackBoxFormat;

    fn black_box_tables() -> &'static BlackBoxTables<Self> {
        &mapping::v470::BLACK_BOX
    }
}

pub type BlackBoxSettingsBaseModel = blackbox::BlackBoxSettingsBaseModel<V470>;
pub type BlackBoxSettingsModel = blackbox::BlackBoxSettingsModel<V470>;
pub type BlackBoxAuthenticationFullModel = blackbox::BlackBoxAuthenticationFullModel<V470>;
pub type BlackBoxProxySettingsModel = blackbox::BlackBoxProxySettingsModel<V470>;
pub type BlackBoxAddressModel = blackbox::BlackBoxAddressModel<V470>;

// -- Enums --

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
    RawCookie,
}

impl AuthType {
    pub const ALL: [AuthType; 4] = [Self::None, Self::Form, Self::Http, Self::RawCookie];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyType {
    Http,
    HttpNoConnect,
    Socks4,
    Socks5,
}

impl ProxyType {
    pub const ALL: [ProxyType; 4] = [Self::Http, Self::HttpNoConnect, Self::Socks4, Self::Socks5];
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
pub enum ProgrammingLanguageGroup {
    None,
    CAndCPlusPlus,
    Go,
    JavaScript,
    CSharpWinOnly,
    CSharp,
    Java,
    Kotlin,
    Sql,
    Python,
    Swift,
    Vb,
    Php,
    ObjectiveC,
    Ruby,
}

impl ProgrammingLanguageGroup {
    pub const ALL: [ProgrammingLanguageGroup; 15] = [
        Self::None,
        Self::CAndCPlusPlus,
        Self::Go,
        Self::JavaScript,
        Self::CSharpWinOnly,
        Self::CSharp,
        Self::Java,
        Self::Kotlin,
        Self::Sql,
        Self::Python,
        Self::Swift,
        Self::Vb,
        Self::Php,
        Self::ObjectiveC,
        Self::Ruby,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DotNetProjectType {
    None,
    Solution,
    WebSite,
}

impl DotNetProjectType {
    pub const ALL: [DotNetProjectType; 3] = [Self::None, Self::Solution, Self::WebSite];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JavaVersions {
    #[serde(rename = "v1_8")]
    V8,
    #[serde(rename = "v1_11")]
    V11,
    #[serde(rename = "v1_17")]
    V17,
}

impl JavaVersions {
    pub const ALL: [JavaVersions; 3] = [Self::V8, Self::V11, Self::V17];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    Empty,
    Git,
}

// -- Project creation --

/// Project template returned by the server before creation.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultProjectSettingsModel {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub languages: Option<Vec<ProgrammingLanguageGroup>>,
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
pub struct CreateProjectSettingsModel {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub languages: Option<Vec<ProgrammingLanguageGroup>>,
    pub project_url: Option<String>,
    pub black_box: Option<BlackBoxSettingsBaseModel>,
    pub black_box_enabled: Option<bool>,
    pub white_box: Option<WhiteBoxSettingsModel>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl From<&DefaultProjectSettingsModel> for CreateProjectSettingsModel {
    fn from(defaults: &DefaultProjectSettingsModel) -> Self {
        Self {
            id: defaults.id,
            name: defaults.name.clone(),
            languages: defaults.languages.clone(),
            project_url: defaults.project_url.clone(),
            black_box: defaults.black_box.clone(),
            black_box_enabled: defaults.black_box_enabled,
            white_box: defaults.white_box.clone(),
            extra: defaults.extra.clone(),
        }
    }
}

// -- Project settings update --

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaSettingsModel {
    pub unpack_user_packages: Option<bool>,
    pub download_dependencies: Option<bool>,
    pub use_available_public_and_protected_methods: Option<bool>,
    pub version: Option<JavaVersions>,
    pub user_package_prefixes: Option<String>,
    pub parameters: Option<String>,
    pub launch_parameters: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DotNetSettingsModel {
    pub project_type: Option<DotNetProjectType>,
    pub solution_file: Option<String>,
    pub launch_parameters: Option<String>,
    pub download_dependencies: Option<bool>,
    pub use_available_public_and_protected_methods: Option<bool>,
}

/// .NET settings of the cross-platform analyzer; same shape as Windows .NET.
pub type JsaDotNetSettingsModel = DotNetSettingsModel;

/// Launch options shared by the interpreted-language analyzers.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSettingsModel {
    pub use_available_public_and_protected_methods: Option<bool>,
    pub launch_parameters: Option<String>,
    pub download_dependencies: Option<bool>,
}

pub type GoSettingsModel = LaunchSettingsModel;
pub type JavaScriptSettingsModel = LaunchSettingsModel;
pub type PhpSettingsModel = LaunchSettingsModel;
pub type PythonSettingsModel = LaunchSettingsModel;
pub type RubySettingsModel = LaunchSettingsModel;
pub type PmTaintBaseSettingsModel = LaunchSettingsModel;

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettingsModel {
    pub project_name: Option<String>,
    pub source_type: Option<SourceType>,
    pub white_box_settings: Option<WhiteBoxSettingsModel>,
    pub dot_net_settings: Option<DotNetSettingsModel>,
    pub jsa_dot_net_settings: Option<JsaDotNetSettingsModel>,
    pub java_settings: Option<JavaSettingsModel>,
    pub go_settings: Option<GoSettingsModel>,
    pub java_script_settings: Option<JavaScriptSettingsModel>,
    pub php_settings: Option<PhpSettingsModel>,
    pub python_settings: Option<PythonSettingsModel>,
    pub ruby_settings: Option<RubySettingsModel>,
    pub pm_taint_settings: Option<PmTaintBaseSettingsModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmRulesBaseModel {
    pub use_rules: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SastRulesBaseModel {
    pub use_rules: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRulesBaseModel {
    pub pm_rules: PmRulesBaseModel,
    pub sast_rules: SastRulesBaseModel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPoliciesModel {
    pub check_security_policies_accordance: bool,
    pub security_policies: String,
}

/// Everything a settings update of an existing project sends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub project_settings: ProjectSettingsModel,
    pub black_box_settings: BlackBoxSettingsModel,
    pub analysis_rules: AnalysisRulesBaseModel,
    pub security_policies: SecurityPoliciesModel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_parse_and_keep_extra_fields() {
        let json = serde_json::json!({
            "id": "4a4dbd0b-39a2-4b8f-9d1f-6e2f2f9d4c11",
            "name": "default",
            "languages": ["Java", "CAndCPlusPlus"],
            "blackBoxEnabled": false,
            "reportTemplates": ["a", "b"]
        });
        let defaults: DefaultProjectSettingsModel = serde_json::from_value(json).unwrap();
        assert_eq!(
            defaults.languages,
            Some(vec![ProgrammingLanguageGroup::Java, ProgrammingLanguageGroup::CAndCPlusPlus])
        );
        assert!(defaults.extra.contains_key("reportTemplates"));

        let create = CreateProjectSettingsModel::from(&defaults);
        assert_eq!(create.name.as_deref(), Some("default"));
        assert_eq!(create.extra, defaults.extra);
    }

    #[test]
    fn java_version_wire_names() {
        assert_eq!(serde_json::to_string(&JavaVersions::V17).unwrap(), "\"v1_17\"");
    }
}
