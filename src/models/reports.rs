//! Report requests: what to generate after a scan and where to put it.

use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::AppError;
use crate::models::scan_result::{Issue, IssueClass, IssueLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "EN", alias = "en")]
    En,
    #[serde(rename = "RU", alias = "ru")]
    Ru,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Self::En, Self::Ru];

    /// Case-insensitive lookup of a locale code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "EN" => Some(Self::En),
            "RU" => Some(Self::Ru),
            _ => None,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::En
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => write!(f, "EN"),
            Self::Ru => write!(f, "RU"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportFormat {
    Html,
    Pdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataFormat {
    Json,
    Xml,
}

/// Narrows the issues that go into an artifact. Empty lists match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuesFilter {
    #[serde(default)]
    pub issue_levels: Vec<IssueLevel>,
    #[serde(default)]
    pub classes: Vec<IssueClass>,
    #[serde(default)]
    pub hide_suppressed: bool,
    #[serde(default)]
    pub new_only: bool,
}

impl IssuesFilter {
    pub fn matches(&self, issue: &Issue) -> bool {
        let base = issue.base();
        if !self.issue_levels.is_empty() && !self.issue_levels.contains(&base.level) {
            return false;
        }
        if !self.classes.is_empty() && !self.classes.contains(&issue.class()) {
            return false;
        }
        if self.hide_suppressed && base.is_suppressed {
            return false;
        }
        !(self.new_only && !base.is_new)
    }
}

const FILE_NAME_PATTERN: &str = r"^[^/\\\x00]+$";

fn validate_file_name(file_name: &str) -> Result<(), ValidationError> {
    let pattern = Regex::new(FILE_NAME_PATTERN).map_err(|_| ValidationError::new("file_name"))?;
    if file_name == "." || file_name == ".." || !pattern.is_match(file_name) {
        let mut err = ValidationError::new("file_name");
        err.message = Some("must be a plain file name without path separators".into());
        return Err(err);
    }
    Ok(())
}

/// Server-rendered report built from a named template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[validate(
        length(min = 1, message = "file name is required"),
        custom(function = "validate_file_name")
    )]
    pub file_name: String,
    #[serde(default)]
    pub locale: Locale,
    pub format: ReportFormat,
    /// Falls back to the built-in scan results template when absent.
    pub template: Option<String>,
    pub filters: Option<IssuesFilter>,
}

/// Server-rendered machine-readable export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    #[validate(
        length(min = 1, message = "file name is required"),
        custom(function = "validate_file_name")
    )]
    pub file_name: String,
    #[serde(default)]
    pub locale: Locale,
    pub format: DataFormat,
    pub filters: Option<IssuesFilter>,
}

/// Locally rendered artifact: raw JSON, SARIF or Sonar GIIF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocalExport {
    #[validate(
        length(min = 1, message = "file name is required"),
        custom(function = "validate_file_name")
    )]
    pub file_name: String,
    pub filters: Option<IssuesFilter>,
}

pub type RawData = LocalExport;
pub type Sarif = LocalExport;
pub type SonarGiif = LocalExport;

#[derive(Debug, Clone, PartialEq)]
pub enum ReportRequest {
    Report(Report),
    Data(Data),
    RawData(RawData),
    Sarif(Sarif),
    SonarGiif(SonarGiif),
}

impl ReportRequest {
    pub fn file_name(&self) -> &str {
        match self {
            Self::Report(r) => &r.file_name,
            Self::Data(d) => &d.file_name,
            Self::RawData(e) | Self::Sarif(e) | Self::SonarGiif(e) => &e.file_name,
        }
    }

    pub fn filters(&self) -> Option<&IssuesFilter> {
        match self {
            Self::Report(r) => r.filters.as_ref(),
            Self::Data(d) => d.filters.as_ref(),
            Self::RawData(e) | Self::Sarif(e) | Self::SonarGiif(e) => e.filters.as_ref(),
        }
    }

    /// Short name used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Report(_) => "report",
            Self::Data(_) => "data",
            Self::RawData(_) => "raw",
            Self::Sarif(_) => "sarif",
            Self::SonarGiif(_) => "sonarGiif",
        }
    }

    /// Field-level validation shared by every request kind.
    pub fn validate_fields(&self) -> Result<(), AppError> {
        match self {
            Self::Report(r) => r.validate()?,
            Self::Data(d) => d.validate()?,
            Self::RawData(e) | Self::Sarif(e) | Self::SonarGiif(e) => e.validate()?,
        }
        Ok(())
    }
}

/// Every artifact requested for one scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reports {
    #[serde(default)]
    pub report: Vec<Report>,
    #[serde(default)]
    pub data: Vec<Data>,
    #[serde(default)]
    pub raw: Vec<RawData>,
    #[serde(default)]
    pub sarif: Vec<Sarif>,
    #[serde(default)]
    pub sonar_giif: Vec<SonarGiif>,
}

impl Reports {
    pub fn load(data: &str) -> Result<Self, AppError> {
        let reports: Reports = serde_json::from_str(data)?;
        tracing::debug!(count = reports.len(), "Loaded report requests");
        Ok(reports)
    }

    pub fn len(&self) -> usize {
        self.report.len() + self.data.len() + self.raw.len() + self.sarif.len() + self.sonar_giif.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn requests(&self) -> Vec<ReportRequest> {
        let mut requests = Vec::with_capacity(self.len());
        requests.extend(self.report.iter().cloned().map(ReportRequest::Report));
        requests.extend(self.data.iter().cloned().map(ReportRequest::Data));
        requests.extend(self.raw.iter().cloned().map(ReportRequest::RawData));
        requests.extend(self.sarif.iter().cloned().map(ReportRequest::Sarif));
        requests.extend(self.sonar_giif.iter().cloned().map(ReportRequest::SonarGiif));
        requests
    }

    /// Fails on the first file name requested twice.
    pub fn check_unique_file_names(&self) -> Result<(), AppError> {
        let mut seen = BTreeSet::new();
        for request in self.requests() {
            let name = request.file_name().to_string();
            if !seen.insert(name.clone()) {
                return Err(AppError::Validation(format!("duplicate file name: {name}")));
            }
        }
        Ok(())
    }
}

/// Report template known to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTemplate {
    pub id: uuid::Uuid,
    pub name: String,
    pub locale: Locale,
}
