//! Report server backed by a scan-result file on disk.
//!
//! Used by the `export` command when no server is reachable: only the
//! locally rendered artifacts (raw, SARIF, Sonar GIIF) can be produced.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::models::reports::{Locale, ReportTemplate};
use crate::server::ServerVersion;
use crate::services::reports::{ReportJob, ReportServer};

#[derive(Debug, Clone)]
pub struct OfflineReportServer {
    version: ServerVersion,
    scan_result_path: PathBuf,
}

impl OfflineReportServer {
    pub fn new(version: ServerVersion, scan_result_path: impl Into<PathBuf>) -> Self {
        Self {
            version,
            scan_result_path: scan_result_path.into(),
        }
    }

    pub fn scan_result_path(&self) -> &Path {
        &self.scan_result_path
    }
}

impl ReportServer for OfflineReportServer {
    fn version(&self) -> ServerVersion {
        self.version
    }

    fn report_templates(&self, _locale: Locale) -> anyhow::Result<Vec<ReportTemplate>> {
        Ok(Vec::new())
    }

    /// Any project and scan id resolve to the file; a missing file is no result.
    fn scan_result(&self, _project_id: Uuid, _scan_result_id: Uuid) -> anyhow::Result<Option<Vec<u8>>> {
        match std::fs::read(&self.scan_result_path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context(format!(
                "reading {}",
                self.scan_result_path.display()
            ))),
        }
    }

    fn generate_report(&self, job: &ReportJob) -> anyhow::Result<Vec<u8>> {
        anyhow::bail!(
            "offline mode cannot render {:?} with template {}",
            job.format,
            job.template_id
        )
    }
}
