//! SonarQube Generic Issue Import Format export.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::reports::Locale;
use crate::models::scan_result::{Issue, IssueLevel, ScanResult};

const ENGINE_ID: &str = "scanbridge";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SonarSeverity {
    Critical,
    Major,
    Minor,
    Info,
}

impl From<IssueLevel> for SonarSeverity {
    fn from(level: IssueLevel) -> Self {
        match level {
            IssueLevel::High => Self::Critical,
            IssueLevel::Medium => Self::Major,
            IssueLevel::Low => Self::Minor,
            IssueLevel::Potential => Self::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SonarIssueType {
    Vulnerability,
    CodeSmell,
}

#[derive(Debug, Clone, Serialize)]
pub struct SonarReport {
    pub issues: Vec<SonarIssue>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarIssue {
    pub engine_id: String,
    pub rule_id: String,
    pub severity: SonarSeverity,
    #[serde(rename = "type")]
    pub issue_type: SonarIssueType,
    pub primary_location: SonarLocation,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarLocation {
    pub message: String,
    pub file_path: String,
    pub text_range: Option<SonarTextRange>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarTextRange {
    pub start_line: u32,
}

/// Sonar only imports issues tied to a file; others are skipped.
pub fn export(scan_result: &ScanResult, locale: Locale) -> SonarReport {
    let issues: Vec<SonarIssue> = scan_result
        .issues
        .iter()
        .filter_map(|issue| {
            let base = issue.base();
            let file_path = base.file.clone()?;
            Some(SonarIssue {
                engine_id: ENGINE_ID.to_string(),
                rule_id: base.type_id.clone(),
                severity: base.level.into(),
                issue_type: match issue {
                    Issue::Weakness(_) => SonarIssueType::CodeSmell,
                    _ => SonarIssueType::Vulnerability,
                },
                primary_location: SonarLocation {
                    message: scan_result.title(&base.type_id, locale).to_string(),
                    file_path,
                    text_range: issue.line().map(|start_line| SonarTextRange { start_line }),
                },
            })
        })
        .collect();

    let skipped = scan_result.issues.len() - issues.len();
    if skipped > 0 {
        tracing::debug!(skipped, "Issues without a file left out of Sonar report");
    }
    SonarReport { issues }
}

pub fn export_bytes(scan_result: &ScanResult, locale: Locale) -> Result<Vec<u8>, AppError> {
    Ok(serde_json::to_vec_pretty(&export(scan_result, locale))?)
}
