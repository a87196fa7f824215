//! Version-independent scan result model.
//!
//! Issues are polymorphic. Servers tag the subtype with a `clazz` key; this
//! crate writes it as `class` and reads either.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::models::reports::{IssuesFilter, Locale};

/// Discriminator key used by this crate.
pub const CLASS_KEY: &str = "class";
/// Discriminator key used by the server.
pub const SERVER_CLASS_KEY: &str = "clazz";

// -- Enums --

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueLevel {
    #[serde(alias = "Low", alias = "low")]
    Low,
    #[serde(alias = "Medium", alias = "medium")]
    Medium,
    #[serde(alias = "High", alias = "high")]
    High,
    #[serde(alias = "Potential", alias = "potential")]
    Potential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueClass {
    Vulnerability,
    Weakness,
    Configuration,
    Sca,
    BlackBox,
}

impl IssueClass {
    pub const ALL: [IssueClass; 5] = [
        Self::Vulnerability,
        Self::Weakness,
        Self::Configuration,
        Self::Sca,
        Self::BlackBox,
    ];

    /// Case-insensitive lookup of a discriminator value.
    pub fn from_discriminator(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "VULNERABILITY" => Some(Self::Vulnerability),
            "WEAKNESS" => Some(Self::Weakness),
            "CONFIGURATION" => Some(Self::Configuration),
            "SCA" => Some(Self::Sca),
            "BLACKBOX" => Some(Self::BlackBox),
            _ => None,
        }
    }
}

// -- Issues --

/// Attributes every issue subtype carries.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseIssue {
    pub id: String,
    pub type_id: String,
    pub level: IssueLevel,
    pub group_id: Option<String>,
    pub file: Option<String>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_suppressed: bool,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityIssue {
    #[serde(flatten)]
    pub base: BaseIssue,
    pub line: Option<u32>,
    pub vulnerable_expression: Option<String>,
    pub entry_point: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaknessIssue {
    #[serde(flatten)]
    pub base: BaseIssue,
    pub line: Option<u32>,
    pub code: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationIssue {
    #[serde(flatten)]
    pub base: BaseIssue,
    pub line: Option<u32>,
    pub vulnerable_value: Option<String>,
    pub recommended_value: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaIssue {
    #[serde(flatten)]
    pub base: BaseIssue,
    pub component_name: Option<String>,
    pub component_version: Option<String>,
    #[serde(default)]
    pub cve_id: Vec<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackBoxIssue {
    #[serde(flatten)]
    pub base: BaseIssue,
    pub url: Option<String>,
    pub parameter: Option<String>,
    pub method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "class", rename_all = "UPPERCASE")]
pub enum Issue {
    Vulnerability(VulnerabilityIssue),
    Weakness(WeaknessIssue),
    Configuration(ConfigurationIssue),
    Sca(ScaIssue),
    BlackBox(BlackBoxIssue),
}

/// Why a single issue record could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum IssueDecodeError {
    #[error("issue is not a JSON object")]
    NotAnObject,
    #[error("issue has no class discriminator")]
    MissingClass,
    #[error("unknown issue class: {0}")]
    UnknownClass(String),
    #[error("malformed {class:?} issue: {source}")]
    Malformed {
        class: IssueClass,
        #[source]
        source: serde_json::Error,
    },
}

impl Issue {
    /// Decode an issue tagged with either `class` or `clazz`.
    pub fn from_json(value: serde_json::Value) -> Result<Self, IssueDecodeError> {
        let serde_json::Value::Object(mut fields) = value else {
            return Err(IssueDecodeError::NotAnObject);
        };
        let tag = fields
            .remove(CLASS_KEY)
            .or_else(|| fields.remove(SERVER_CLASS_KEY))
            .ok_or(IssueDecodeError::MissingClass)?;
        fields.remove(SERVER_CLASS_KEY);
        let tag = match tag {
            serde_json::Value::String(tag) => tag,
            other => return Err(IssueDecodeError::UnknownClass(other.to_string())),
        };
        let class = IssueClass::from_discriminator(&tag)
            .ok_or_else(|| IssueDecodeError::UnknownClass(tag.clone()))?;

        let body = serde_json::Value::Object(fields);
        let decoded = match class {
            IssueClass::Vulnerability => serde_json::from_value(body).map(Self::Vulnerability),
            IssueClass::Weakness => serde_json::from_value(body).map(Self::Weakness),
            IssueClass::Configuration => serde_json::from_value(body).map(Self::Configuration),
            IssueClass::Sca => serde_json::from_value(body).map(Self::Sca),
            IssueClass::BlackBox => serde_json::from_value(body).map(Self::BlackBox),
        };
        decoded.map_err(|source| IssueDecodeError::Malformed { class, source })
    }

    pub fn class(&self) -> IssueClass {
        match self {
            Self::Vulnerability(_) => IssueClass::Vulnerability,
            Self::Weakness(_) => IssueClass::Weakness,
            Self::Configuration(_) => IssueClass::Configuration,
            Self::Sca(_) => IssueClass::Sca,
            Self::BlackBox(_) => IssueClass::BlackBox,
        }
    }

    pub fn base(&self) -> &BaseIssue {
        match self {
            Self::Vulnerability(i) => &i.base,
            Self::Weakness(i) => &i.base,
            Self::Configuration(i) => &i.base,
            Self::Sca(i) => &i.base,
            Self::BlackBox(i) => &i.base,
        }
    }

    /// Source line for issues tied to code.
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Vulnerability(i) => i.line,
            Self::Weakness(i) => i.line,
            Self::Configuration(i) => i.line,
            Self::Sca(_) | Self::BlackBox(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for Issue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Issue::from_json(value).map_err(serde::de::Error::custom)
    }
}

// -- Scan result --

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub scanned_file_count: u64,
    #[serde(default)]
    pub scanned_url_count: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedIssue {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub project_name: Option<String>,
    pub ai_version: Option<String>,
    pub statistics: Option<Statistics>,
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Issue type id to localized title and description.
    #[serde(default)]
    pub i18n: BTreeMap<String, BTreeMap<Locale, LocalizedIssue>>,
}

impl ScanResult {
    pub fn localized(&self, type_id: &str, locale: Locale) -> Option<&LocalizedIssue> {
        self.i18n.get(type_id).and_then(|entries| entries.get(&locale))
    }

    /// Title of an issue type, falling back to the type id itself.
    pub fn title<'a>(&'a self, type_id: &'a str, locale: Locale) -> &'a str {
        self.localized(type_id, locale)
            .map(|entry| entry.title.as_str())
            .unwrap_or(type_id)
    }

    /// Copy holding only matching issues and the catalog entries they use.
    pub fn filtered(&self, filter: Option<&IssuesFilter>) -> ScanResult {
        let Some(filter) = filter else {
            return self.clone();
        };
        let issues: Vec<Issue> = self
            .issues
            .iter()
            .filter(|issue| filter.matches(issue))
            .cloned()
            .collect();
        let i18n = self
            .i18n
            .iter()
            .filter(|(type_id, _)| issues.iter().any(|issue| &issue.base().type_id == *type_id))
            .map(|(type_id, entries)| (type_id.clone(), entries.clone()))
            .collect();
        ScanResult {
            issues,
            i18n,
            ..self.clone()
        }
    }
}
