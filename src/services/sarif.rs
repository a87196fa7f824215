//! SARIF 2.1.0 export of a normalized scan result.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::AppError;
use crate::models::reports::Locale;
use crate::models::scan_result::{Issue, IssueLevel, ScanResult};
use crate::services::fingerprint;

const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const SARIF_VERSION: &str = "2.1.0";
const FINGERPRINT_KEY: &str = "scanbridge/v1";

#[derive(Debug, Clone, Serialize)]
pub struct SarifLog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifDriver {
    pub name: String,
    pub version: Option<String>,
    pub rules: Vec<SarifRule>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    pub short_description: SarifMessage,
    pub full_description: Option<SarifMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SarifLevel {
    Error,
    Warning,
    Note,
}

impl From<IssueLevel> for SarifLevel {
    fn from(level: IssueLevel) -> Self {
        match level {
            IssueLevel::High => Self::Error,
            IssueLevel::Medium => Self::Warning,
            IssueLevel::Low | IssueLevel::Potential => Self::Note,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub rule_index: usize,
    pub level: SarifLevel,
    pub message: SarifMessage,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<SarifLocation>,
    pub partial_fingerprints: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    pub physical_location: SarifPhysicalLocation,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifArtifactLocation,
    pub region: Option<SarifRegion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifArtifactLocation {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    pub start_line: u32,
}

fn location(issue: &Issue) -> Option<SarifLocation> {
    let uri = match issue {
        Issue::BlackBox(black_box) => black_box.url.clone(),
        _ => issue.base().file.clone(),
    }?;
    Some(SarifLocation {
        physical_location: SarifPhysicalLocation {
            artifact_location: SarifArtifactLocation { uri },
            region: issue.line().map(|start_line| SarifRegion { start_line }),
        },
    })
}

/// Build a SARIF log with one rule per issue type, titled in `locale`.
pub fn export(scan_result: &ScanResult, locale: Locale) -> SarifLog {
    let project = scan_result.project_name.as_deref().unwrap_or_default();
    let mut rules: Vec<SarifRule> = Vec::new();
    let mut rule_indexes: BTreeMap<&str, usize> = BTreeMap::new();
    let mut results = Vec::with_capacity(scan_result.issues.len());

    for issue in &scan_result.issues {
        let type_id = issue.base().type_id.as_str();
        let rule_index = *rule_indexes.entry(type_id).or_insert_with(|| {
            let localized = scan_result.localized(type_id, locale);
            rules.push(SarifRule {
                id: type_id.to_string(),
                name: scan_result.title(type_id, locale).to_string(),
                short_description: SarifMessage {
                    text: scan_result.title(type_id, locale).to_string(),
                },
                full_description: localized
                    .filter(|entry| !entry.description.is_empty())
                    .map(|entry| SarifMessage {
                        text: entry.description.clone(),
                    }),
            });
            rules.len() - 1
        });

        results.push(SarifResult {
            rule_id: type_id.to_string(),
            rule_index,
            level: issue.base().level.into(),
            message: SarifMessage {
                text: scan_result.title(type_id, locale).to_string(),
            },
            locations: location(issue).into_iter().collect(),
            partial_fingerprints: BTreeMap::from([(
                FINGERPRINT_KEY.to_string(),
                fingerprint::compute(project, issue),
            )]),
        });
    }

    SarifLog {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: env!("CARGO_PKG_NAME").to_string(),
                    version: scan_result.ai_version.clone(),
                    rules,
                },
            },
            results,
        }],
    }
}

pub fn export_bytes(scan_result: &ScanResult, locale: Locale) -> Result<Vec<u8>, AppError> {
    Ok(serde_json::to_vec_pretty(&export(scan_result, locale))?)
}
