//! Scan-result payload normalizer.
//!
//! Accepts the payloads of every supported server generation: issue
//! subtypes tagged with `clazz` or `class`, locale keys in either case.
//! Only a payload that is not a JSON object is rejected; everything else
//! that cannot be read becomes a warning.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::reports::Locale;
use crate::models::scan_result::{Issue, LocalizedIssue, ScanResult, Statistics};
use crate::parsers::{NormalizedScanResult, ParseWarning, Parser};

/// Scan-result normalizer. Locale gaps in the i18n catalog are filled from
/// `default_locale` when it has an entry.
#[derive(Debug, Clone, Default)]
pub struct ScanResultNormalizer {
    default_locale: Locale,
}

impl ScanResultNormalizer {
    pub fn new(default_locale: Locale) -> Self {
        Self { default_locale }
    }

    pub fn normalize(&self, data: &[u8]) -> Result<NormalizedScanResult, AppError> {
        let value: Value = serde_json::from_slice(data)?;
        let Value::Object(mut root) = value else {
            return Err(AppError::Validation(
                "scan result payload is not a JSON object".to_string(),
            ));
        };

        let mut warnings = Vec::new();
        let mut scan_result = ScanResult {
            id: uuid_field(&root, "id", &mut warnings),
            project_id: uuid_field(&root, "projectId", &mut warnings),
            project_name: string_field(&root, "projectName"),
            ai_version: string_field(&root, "aiVersion"),
            statistics: statistics(root.remove("statistics"), &mut warnings),
            issues: issues(root.remove("issues"), &mut warnings),
            i18n: catalog(root.remove("i18n"), &mut warnings),
        };
        self.fill_catalog(&mut scan_result, &mut warnings);

        for warning in &warnings {
            tracing::warn!(
                record = ?warning.record_index,
                field = %warning.field,
                "{}",
                warning.message
            );
        }
        tracing::info!(
            issues = scan_result.issues.len(),
            warnings = warnings.len(),
            "Normalized scan result"
        );

        Ok(NormalizedScanResult {
            scan_result,
            warnings,
        })
    }

    /// Make every issue type resolve in the catalog for every locale.
    fn fill_catalog(&self, scan_result: &mut ScanResult, warnings: &mut Vec<ParseWarning>) {
        let mut type_ids: BTreeSet<String> = scan_result.i18n.keys().cloned().collect();
        type_ids.extend(
            scan_result
                .issues
                .iter()
                .map(|issue| issue.base().type_id.clone()),
        );

        for type_id in type_ids {
            let entries = scan_result.i18n.entry(type_id.clone()).or_default();
            let source = entries
                .get(&self.default_locale)
                .or_else(|| entries.values().next())
                .cloned();

            let Some(source) = source else {
                warnings.push(ParseWarning::new(
                    "i18n",
                    format!("issue type {type_id} has no localization, using its id as title"),
                ));
                for locale in Locale::ALL {
                    entries.insert(
                        locale,
                        LocalizedIssue {
                            title: type_id.clone(),
                            description: String::new(),
                        },
                    );
                }
                continue;
            };

            for locale in Locale::ALL {
                if entries.contains_key(&locale) {
                    continue;
                }
                warnings.push(ParseWarning::new(
                    "i18n",
                    format!("issue type {type_id} has no {locale} localization, using fallback"),
                ));
                entries.insert(locale, source.clone());
            }
        }
    }
}

impl Parser for ScanResultNormalizer {
    fn parse(&self, data: &[u8]) -> Result<NormalizedScanResult, AppError> {
        self.normalize(data)
    }

    fn source(&self) -> &str {
        "scan-result"
    }
}

fn string_field(root: &Map<String, Value>, key: &str) -> Option<String> {
    root.get(key).and_then(Value::as_str).map(str::to_string)
}

fn uuid_field(root: &Map<String, Value>, key: &str, warnings: &mut Vec<ParseWarning>) -> Option<Uuid> {
    let raw = match root.get(key) {
        None | Some(Value::Null) => return None,
        Some(Value::String(raw)) => raw,
        Some(other) => {
            warnings.push(ParseWarning::new(key, format!("{key} is not a string: {other}")));
            return None;
        }
    };
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(e) => {
            warnings.push(ParseWarning::new(key, format!("invalid UUID {raw}: {e}")));
            None
        }
    }
}

fn statistics(value: Option<Value>, warnings: &mut Vec<ParseWarning>) -> Option<Statistics> {
    match value {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value) {
            Ok(statistics) => Some(statistics),
            Err(e) => {
                warnings.push(ParseWarning::new(
                    "statistics",
                    format!("malformed statistics ignored: {e}"),
                ));
                None
            }
        },
    }
}

fn issues(value: Option<Value>, warnings: &mut Vec<ParseWarning>) -> Vec<Issue> {
    let records = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(records)) => records,
        Some(_) => {
            warnings.push(ParseWarning::new("issues", "issues is not an array"));
            return Vec::new();
        }
    };

    let mut issues = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match Issue::from_json(record) {
            Ok(issue) => issues.push(issue),
            Err(e) => warnings.push(ParseWarning::for_record(
                index,
                "issues",
                format!("issue skipped: {e}"),
            )),
        }
    }
    issues
}

fn catalog(
    value: Option<Value>,
    warnings: &mut Vec<ParseWarning>,
) -> BTreeMap<String, BTreeMap<Locale, LocalizedIssue>> {
    let mut catalog = BTreeMap::new();
    let types = match value {
        None | Some(Value::Null) => return catalog,
        Some(Value::Object(types)) => types,
        Some(_) => {
            warnings.push(ParseWarning::new("i18n", "i18n is not an object"));
            return catalog;
        }
    };

    for (type_id, locales) in types {
        let Value::Object(locales) = locales else {
            warnings.push(ParseWarning::new(
                "i18n",
                format!("localizations of issue type {type_id} are not an object"),
            ));
            continue;
        };
        let mut entries = BTreeMap::new();
        for (code, entry) in locales {
            let Some(locale) = Locale::from_code(&code) else {
                warnings.push(ParseWarning::new(
                    "i18n",
                    format!("unknown locale {code} for issue type {type_id} skipped"),
                ));
                continue;
            };
            match serde_json::from_value::<LocalizedIssue>(entry) {
                Ok(localized) => {
                    entries.insert(locale, localized);
                }
                Err(e) => warnings.push(ParseWarning::new(
                    "i18n",
                    format!("malformed {locale} localization of issue type {type_id}: {e}"),
                )),
            }
        }
        catalog.insert(type_id, entries);
    }
    catalog
}
