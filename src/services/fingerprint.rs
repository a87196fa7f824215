//! Stable issue fingerprints for SARIF partial fingerprints and Sonar import.
//!
//! A fingerprint hashes the fields that identify an issue across re-scans.
//! Line numbers and issue ids are excluded because they change between scans
//! of the same code.

use sha2::{Digest, Sha256};

use crate::models::scan_result::Issue;

/// Fingerprint of an issue found in source code. `detail` is the flagged
/// code itself (expression, snippet or value) and tells apart issues of one
/// type in the same file.
pub fn compute_sast(project: &str, type_id: &str, file: &str, detail: &str) -> String {
    hash(&format!("SAST:{project}:{type_id}:{file}:{detail}"))
}

/// Fingerprint of a vulnerable component. Includes the CVE list because one
/// component version may be affected by several of them.
pub fn compute_sca(project: &str, component: &str, version: &str, cve_ids: &[String]) -> String {
    hash(&format!(
        "SCA:{project}:{component}:{version}:{}",
        cve_ids.join(",")
    ))
}

/// Fingerprint of a black-box finding.
pub fn compute_dast(project: &str, type_id: &str, url: &str, method: &str, parameter: &str) -> String {
    hash(&format!("DAST:{project}:{type_id}:{url}:{method}:{parameter}"))
}

pub fn compute(project: &str, issue: &Issue) -> String {
    let base = issue.base();
    let file = base.file.as_deref().unwrap_or_default();
    match issue {
        Issue::Vulnerability(vulnerability) => {
            let detail = format!(
                "{}|{}",
                vulnerability.vulnerable_expression.as_deref().unwrap_or_default(),
                vulnerability.entry_point.as_deref().unwrap_or_default()
            );
            compute_sast(project, &base.type_id, file, &detail)
        }
        Issue::Weakness(weakness) => compute_sast(
            project,
            &base.type_id,
            file,
            weakness.code.as_deref().unwrap_or_default(),
        ),
        Issue::Configuration(configuration) => compute_sast(
            project,
            &base.type_id,
            file,
            configuration.vulnerable_value.as_deref().unwrap_or_default(),
        ),
        Issue::Sca(sca) => compute_sca(
            project,
            sca.component_name.as_deref().unwrap_or(file),
            sca.component_version.as_deref().unwrap_or_default(),
            &sca.cve_id,
        ),
        Issue::BlackBox(black_box) => compute_dast(
            project,
            &base.type_id,
            black_box.url.as_deref().unwrap_or_default(),
            black_box.method.as_deref().unwrap_or_default(),
            black_box.parameter.as_deref().unwrap_or_default(),
        ),
    }
}

/// SHA-256 hash a string and return hex-encoded digest.
fn hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
