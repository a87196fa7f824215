//! Version-independent project and scan settings.
//!
//! This is the model pipeline authors write once; converters translate it
//! into whatever wire schema the target server version expects.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::AppError;

// -- Enums --

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanModule {
    Configuration,
    Components,
    BlackBox,
    DataFlowAnalysis,
    PatternMatching,
    VulnerableSourceCode,
    StaticCodeAnalysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    Cpp,
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

impl Language {
    pub const ALL: [Language; 14] = [
        Self::Cpp,
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

/// Black-box scan depth, ordered from shallowest to deepest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanLevel {
    None,
    Fast,
    #[default]
    Normal,
    Full,
}

impl ScanLevel {
    pub const ALL: [ScanLevel; 4] = [Self::None, Self::Fast, Self::Normal, Self::Full];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanScope {
    #[default]
    Domain,
    Folder,
    Path,
}

impl ScanScope {
    pub const ALL: [ScanScope; 3] = [Self::Domain, Self::Folder, Self::Path];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AddressFormat {
    #[default]
    Wildcard,
    ExactMatch,
    Regexp,
}

impl AddressFormat {
    pub const ALL: [AddressFormat; 3] = [Self::Wildcard, Self::ExactMatch, Self::Regexp];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProxyType {
    #[default]
    Http,
    HttpNoConnect,
    Socks4,
    Socks5,
}

impl ProxyType {
    pub const ALL: [ProxyType; 4] = [Self::Http, Self::HttpNoConnect, Self::Socks4, Self::Socks5];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DetectionType {
    #[default]
    Auto,
    Manual,
}

impl DetectionType {
    pub const ALL: [DetectionType; 2] = [Self::Auto, Self::Manual];
}

/// Discriminant of [`Authentication`], used as the mapping-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthenticationType {
    None,
    Form,
    Http,
    Cookie,
}

impl AuthenticationType {
    pub const ALL: [AuthenticationType; 4] = [Self::None, Self::Form, Self::Http, Self::Cookie];
}

impl fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Form => write!(f, "FORM"),
            Self::Http => write!(f, "HTTP"),
            Self::Cookie => write!(f, "COOKIE"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DotNetProjectType {
    #[default]
    None,
    Solution,
    Website,
}

impl DotNetProjectType {
    pub const ALL: [DotNetProjectType; 3] = [Self::None, Self::Solution, Self::Website];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JavaVersion {
    #[serde(rename = "v1_8")]
    V1_8,
    #[default]
    #[serde(rename = "v1_11")]
    V1_11,
    #[serde(rename = "v1_17")]
    V1_17,
}

impl JavaVersion {
    pub const ALL: [JavaVersion; 3] = [Self::V1_8, Self::V1_11, Self::V1_17];
}

// -- Technology settings --

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaSettings {
    pub parameters: Option<String>,
    pub custom_parameters: Option<String>,
    #[serde(default)]
    pub unpack_user_packages: bool,
    #[serde(default)]
    pub download_dependencies: bool,
    pub user_package_prefixes: Option<String>,
    #[serde(default)]
    pub java_version: JavaVersion,
    #[serde(default)]
    pub use_public_analysis_method: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DotNetSettings {
    #[serde(default)]
    pub project_type: DotNetProjectType,
    pub solution_file: Option<String>,
    pub custom_parameters: Option<String>,
    #[serde(default)]
    pub download_dependencies: bool,
    #[serde(default)]
    pub use_public_analysis_method: bool,
}

/// Settings shared by Go, JavaScript, PHP, Python, Ruby and taint analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSettings {
    #[serde(default)]
    pub use_public_analysis_method: bool,
    pub custom_parameters: Option<String>,
    #[serde(default)]
    pub download_dependencies: bool,
}

// -- Black-box settings --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpHeader {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressListItem {
    #[serde(default)]
    pub format: AddressFormat,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxySettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "type", default)]
    pub proxy_type: ProxyType,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub login: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormAuthentication {
    #[serde(default)]
    pub detection: DetectionType,
    pub form_address: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub validation_template: Option<String>,
    /// Manual detection only.
    pub login_key: Option<String>,
    /// Manual detection only.
    pub password_key: Option<String>,
    /// Manual detection only.
    #[serde(rename = "xPath")]
    pub xpath: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpAuthentication {
    pub login: Option<String>,
    pub password: Option<String>,
    pub validation_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieAuthentication {
    pub cookie: Option<String>,
    pub validation_address: Option<String>,
    pub validation_template: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Authentication {
    None,
    Form(FormAuthentication),
    Http(HttpAuthentication),
    Cookie(CookieAuthentication),
}

impl Authentication {
    pub fn kind(&self) -> AuthenticationType {
        match self {
            Self::None => AuthenticationType::None,
            Self::Form(_) => AuthenticationType::Form,
            Self::Http(_) => AuthenticationType::Http,
            Self::Cookie(_) => AuthenticationType::Cookie,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlackBoxSettings {
    #[validate(url)]
    pub site: String,
    #[serde(default)]
    pub scan_level: ScanLevel,
    #[serde(default)]
    pub scan_scope: ScanScope,
    #[serde(default)]
    pub ssl_check: bool,
    #[serde(default)]
    pub run_autocheck_after_scan: bool,
    #[serde(default)]
    pub http_headers: Vec<HttpHeader>,
    #[serde(default)]
    pub white_listed_addresses: Vec<AddressListItem>,
    #[serde(default)]
    pub black_listed_addresses: Vec<AddressListItem>,
    pub proxy_settings: Option<ProxySettings>,
    pub authentication: Option<Authentication>,
}

// -- Top-level settings --

/// Version-independent project and scan configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScanSettings {
    #[validate(length(min = 1, message = "project name is required"))]
    pub project_name: String,
    /// Ordered; the first entry is the primary language.
    #[validate(length(min = 1, message = "at least one programming language is required"))]
    pub programming_languages: Vec<Language>,
    #[serde(default)]
    pub scan_modules: BTreeSet<ScanModule>,
    pub java_settings: Option<JavaSettings>,
    pub dot_net_settings: Option<DotNetSettings>,
    pub windows_dot_net_settings: Option<DotNetSettings>,
    pub go_settings: Option<LanguageSettings>,
    pub java_script_settings: Option<LanguageSettings>,
    pub php_settings: Option<LanguageSettings>,
    pub python_settings: Option<LanguageSettings>,
    pub ruby_settings: Option<LanguageSettings>,
    pub pm_taint_settings: Option<LanguageSettings>,
    #[validate(nested)]
    pub black_box_settings: Option<BlackBoxSettings>,
    #[serde(default)]
    pub use_sast_rules: bool,
    #[serde(default)]
    pub use_custom_pm_rules: bool,
    /// Policies passed to a settings update are checked only when set.
    #[serde(default)]
    pub use_security_policies: bool,
}

impl ScanSettings {
    /// Parse and validate a settings JSON document. Repeated languages are
    /// dropped, the first occurrence keeps its position.
    pub fn load(data: &str) -> Result<Self, AppError> {
        let mut settings: ScanSettings = serde_json::from_str(data)?;
        settings.validate()?;
        let mut seen = BTreeSet::new();
        settings
            .programming_languages
            .retain(|language| seen.insert(*language));
        if settings.project_name.trim().is_empty() {
            return Err(AppError::Validation("project name is blank".to_string()));
        }
        tracing::debug!(project = %settings.project_name, "Loaded scan settings");
        Ok(settings)
    }

    pub fn programming_language(&self) -> Option<Language> {
        self.programming_languages.first().copied()
    }

    pub fn has_module(&self, module: ScanModule) -> bool {
        self.scan_modules.contains(&module)
    }

    /// Black-box settings, but only when the BLACKBOX module is enabled.
    pub fn active_black_box(&self) -> Option<&BlackBoxSettings> {
        self.black_box_settings
            .as_ref()
            .filter(|_| self.has_module(ScanModule::BlackBox))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &str = r#"{
        "projectName": "bricks",
        "programmingLanguages": ["PHP", "JAVASCRIPT"],
        "scanModules": ["VULNERABLESOURCECODE", "BLACKBOX"],
        "blackBoxSettings": {
            "site": "http://bricks.example.com",
            "scanLevel": "FULL",
            "authentication": {
                "type": "FORM",
                "detection": "MANUAL",
                "login": "admin",
                "loginKey": "user",
                "xPath": "//form[@id='login']"
            }
        }
    }"#;

    #[test]
    fn load_parses_settings() {
        let settings = ScanSettings::load(SETTINGS).unwrap();
        assert_eq!(settings.project_name, "bricks");
        assert_eq!(settings.programming_language(), Some(Language::Php));
        assert!(settings.has_module(ScanModule::BlackBox));
        let black_box = settings.active_black_box().unwrap();
        assert_eq!(black_box.scan_level, ScanLevel::Full);
        assert_eq!(black_box.scan_scope, ScanScope::Domain);
        match black_box.authentication.as_ref().unwrap() {
            Authentication::Form(form) => {
                assert_eq!(form.detection, DetectionType::Manual);
                assert_eq!(form.xpath.as_deref(), Some("//form[@id='login']"));
            }
            other => panic!("Expected form authentication, got {other:?}"),
        }
    }

    #[test]
    fn load_rejects_missing_languages() {
        let err = ScanSettings::load(r#"{"projectName": "p", "programmingLanguages": []}"#)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("programming_languages"));
    }

    #[test]
    fn load_drops_repeated_languages() {
        let settings = ScanSettings::load(
            r#"{"projectName": "p", "programmingLanguages": ["PHP", "JAVASCRIPT", "PHP", "JAVASCRIPT"]}"#,
        )
        .unwrap();
        assert_eq!(
            settings.programming_languages,
            vec![Language::Php, Language::JavaScript]
        );
        assert_eq!(settings.programming_language(), Some(Language::Php));
    }

    #[test]
    fn load_rejects_blank_project_name() {
        let err = ScanSettings::load(r#"{"projectName": "  ", "programmingLanguages": ["GO"]}"#)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn load_rejects_invalid_site() {
        let err = ScanSettings::load(
            r#"{"projectName": "p", "programmingLanguages": ["GO"],
                "blackBoxSettings": {"site": "not a url"}}"#,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn load_rejects_unknown_authentication_type() {
        let err = ScanSettings::load(
            r#"{"projectName": "p", "programmingLanguages": ["GO"],
                "blackBoxSettings": {"site": "http://a.b", "authentication": {"type": "KERBEROS"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }

    #[test]
    fn black_box_inactive_without_module() {
        let settings = ScanSettings {
            project_name: "p".to_string(),
            programming_languages: vec![Language::Java],
            black_box_settings: Some(BlackBoxSettings::default()),
            ..Default::default()
        };
        assert!(settings.active_black_box().is_none());
    }

    #[test]
    fn scan_level_ordered_by_depth() {
        assert!(ScanLevel::None < ScanLevel::Fast);
        assert!(ScanLevel::Fast < ScanLevel::Normal);
        assert!(ScanLevel::Normal < ScanLevel::Full);
    }

    #[test]
    fn enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&ScanModule::VulnerableSourceCode).unwrap(),
            "\"VULNERABLESOURCECODE\""
        );
        assert_eq!(
            serde_json::to_string(&ProxyType::HttpNoConnect).unwrap(),
            "\"HTTPNOCONNECT\""
        );
        assert_eq!(serde_json::to_string(&JavaVersion::V1_17).unwrap(), "\"v1_17\"");
        assert_eq!(AuthenticationType::Cookie.to_string(), "COOKIE");
    }
}
