//! Report task contract: check, generate, list templates.
//!
//! Server-rendered reports and data exports go through [`ReportServer`];
//! raw JSON, SARIF and Sonar GIIF are rendered locally from the normalized
//! scan result. Every artifact is delivered through [`FileOperations`].

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::reports::{
    DataFormat, IssuesFilter, Locale, ReportFormat, ReportRequest, ReportTemplate, Reports,
};
use crate::models::scan_result::ScanResult;
use crate::parsers::scan_result::ScanResultNormalizer;
use crate::server::ServerVersion;
use crate::services::file_ops::FileOperations;
use crate::services::report_lifecycle::{ReportState, ReportTask};
use crate::services::{sarif, sonar_giif};

/// Name of the built-in template used when a report names none.
pub fn dummy_template_name(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Scan results report",
        Locale::Ru => "Отчет по результатам сканирования",
    }
}

pub fn supports_report_format(version: ServerVersion, format: ReportFormat) -> bool {
    match version {
        ServerVersion::V411 => format == ReportFormat::Html,
        ServerVersion::V470 => true,
    }
}

pub fn supports_data_format(version: ServerVersion, format: DataFormat) -> bool {
    match version {
        ServerVersion::V411 => format == DataFormat::Xml,
        ServerVersion::V470 => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobFormat {
    Report(ReportFormat),
    Data(DataFormat),
}

/// A server-side rendering job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportJob {
    pub project_id: Uuid,
    pub scan_result_id: Uuid,
    pub template_id: Uuid,
    pub locale: Locale,
    pub format: JobFormat,
    pub filters: Option<IssuesFilter>,
}

/// Server operations the report tasks depend on. Transport errors are
/// returned as is and wrapped by the caller.
pub trait ReportServer: Send + Sync {
    fn version(&self) -> ServerVersion;

    /// Templates available for `locale`, in server order.
    fn report_templates(&self, locale: Locale) -> anyhow::Result<Vec<ReportTemplate>>;

    /// Raw scan-result payload, `None` when the server has no such result.
    fn scan_result(&self, project_id: Uuid, scan_result_id: Uuid) -> anyhow::Result<Option<Vec<u8>>>;

    fn has_scan_result(&self, project_id: Uuid, scan_result_id: Uuid) -> anyhow::Result<bool> {
        Ok(self.scan_result(project_id, scan_result_id)?.is_some())
    }

    fn generate_report(&self, job: &ReportJob) -> anyhow::Result<Vec<u8>>;
}

pub trait ReportsTasks {
    /// Validate a request without side effects.
    fn check(&self, request: &ReportRequest) -> Result<(), AppError>;

    /// Validate every request of a batch, including file name uniqueness.
    fn check_all(&self, reports: &Reports) -> Result<(), AppError>;

    fn generate(
        &self,
        project_id: Uuid,
        scan_result_id: Uuid,
        request: &ReportRequest,
        file_ops: &dyn FileOperations,
    ) -> Result<(), AppError>;

    /// Check the whole batch first, then generate each artifact in order.
    fn generate_all(
        &self,
        project_id: Uuid,
        scan_result_id: Uuid,
        reports: &Reports,
        file_ops: &dyn FileOperations,
    ) -> Result<(), AppError>;

    fn list_report_templates(&self, locale: Locale) -> Result<Vec<String>, AppError>;

    fn get_dummy_report_template_id(&self, locale: Locale) -> Result<Uuid, AppError>;
}

/// Report tasks backed by a [`ReportServer`].
#[derive(Debug)]
pub struct ServerReportsTasks<S> {
    server: S,
    normalizer: ScanResultNormalizer,
    locale: Locale,
}

impl<S: ReportServer> ServerReportsTasks<S> {
    /// `locale` is used for locally rendered artifacts, which carry no locale
    /// of their own.
    pub fn new(server: S, locale: Locale) -> Self {
        Self {
            server,
            normalizer: ScanResultNormalizer::new(locale),
            locale,
        }
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    fn templates(&self, locale: Locale) -> Result<Vec<ReportTemplate>, AppError> {
        self.server
            .report_templates(locale)
            .map_err(|e| AppError::generic(format!("Failed to list {locale} report templates"), e))
    }

    fn template_id(&self, name: Option<&str>, locale: Locale) -> Result<Uuid, AppError> {
        let Some(name) = name else {
            return self.get_dummy_report_template_id(locale);
        };
        self.templates(locale)?
            .into_iter()
            .find(|template| template.name == name)
            .map(|template| template.id)
            .ok_or_else(|| {
                AppError::Validation(format!("report template {name} not found for locale {locale}"))
            })
    }

    fn require_scan_result(&self, project_id: Uuid, scan_result_id: Uuid) -> Result<(), AppError> {
        let exists = self
            .server
            .has_scan_result(project_id, scan_result_id)
            .map_err(|e| AppError::generic("Failed to look up scan result", e))?;
        if !exists {
            return Err(AppError::NotFound(format!("scan result {scan_result_id}")));
        }
        Ok(())
    }

    fn load_scan_result(&self, project_id: Uuid, scan_result_id: Uuid) -> Result<ScanResult, AppError> {
        let data = self
            .server
            .scan_result(project_id, scan_result_id)
            .map_err(|e| AppError::generic("Failed to fetch scan result", e))?
            .ok_or_else(|| AppError::NotFound(format!("scan result {scan_result_id}")))?;
        Ok(self.normalizer.normalize(&data)?.scan_result)
    }

    fn render(
        &self,
        project_id: Uuid,
        scan_result_id: Uuid,
        request: &ReportRequest,
    ) -> Result<Vec<u8>, AppError> {
        let (template_id, locale, format, filters) = match request {
            ReportRequest::Report(report) => (
                self.template_id(report.template.as_deref(), report.locale)?,
                report.locale,
                JobFormat::Report(report.format),
                report.filters.clone(),
            ),
            ReportRequest::Data(data) => (
                self.get_dummy_report_template_id(data.locale)?,
                data.locale,
                JobFormat::Data(data.format),
                data.filters.clone(),
            ),
            ReportRequest::RawData(export) => {
                let result = self.load_scan_result(project_id, scan_result_id)?;
                return Ok(serde_json::to_vec_pretty(&result.filtered(export.filters.as_ref()))?);
            }
            ReportRequest::Sarif(export) => {
                let result = self.load_scan_result(project_id, scan_result_id)?;
                return sarif::export_bytes(&result.filtered(export.filters.as_ref()), self.locale);
            }
            ReportRequest::SonarGiif(export) => {
                let result = self.load_scan_result(project_id, scan_result_id)?;
                return sonar_giif::export_bytes(&result.filtered(export.filters.as_ref()), self.locale);
            }
        };

        self.require_scan_result(project_id, scan_result_id)?;
        let job = ReportJob {
            project_id,
            scan_result_id,
            template_id,
            locale,
            format,
            filters,
        };
        self.server
            .generate_report(&job)
            .map_err(|e| AppError::generic("Server failed to render report", e))
    }

    fn run(
        &self,
        task: &mut ReportTask,
        project_id: Uuid,
        scan_result_id: Uuid,
        request: &ReportRequest,
        file_ops: &dyn FileOperations,
    ) -> Result<(), AppError> {
        self.check(request)?;
        task.advance(ReportState::Validated)?;
        let data = self.render(project_id, scan_result_id, request)?;
        task.advance(ReportState::Generated)?;
        file_ops.save_artifact(request.file_name(), &data)?;
        task.advance(ReportState::Delivered)
    }
}

impl<S: ReportServer> ReportsTasks for ServerReportsTasks<S> {
    fn check(&self, request: &ReportRequest) -> Result<(), AppError> {
        request.validate_fields()?;
        let version = self.server.version();
        match request {
            ReportRequest::Report(report) => {
                if !supports_report_format(version, report.format) {
                    return Err(AppError::Validation(format!(
                        "report format {:?} is not supported by server {version}",
                        report.format
                    )));
                }
                self.template_id(report.template.as_deref(), report.locale)?;
            }
            ReportRequest::Data(data) => {
                if !supports_data_format(version, data.format) {
                    return Err(AppError::Validation(format!(
                        "data format {:?} is not supported by server {version}",
                        data.format
                    )));
                }
                self.get_dummy_report_template_id(data.locale)?;
            }
            ReportRequest::RawData(_) | ReportRequest::Sarif(_) | ReportRequest::SonarGiif(_) => {}
        }
        Ok(())
    }

    fn check_all(&self, reports: &Reports) -> Result<(), AppError> {
        reports.check_unique_file_names()?;
        for request in reports.requests() {
            self.check(&request)?;
        }
        Ok(())
    }

    fn generate(
        &self,
        project_id: Uuid,
        scan_result_id: Uuid,
        request: &ReportRequest,
        file_ops: &dyn FileOperations,
    ) -> Result<(), AppError> {
        let mut task = ReportTask::new(request.file_name());
        match self.run(&mut task, project_id, scan_result_id, request, file_ops) {
            Ok(()) => {
                tracing::info!(kind = request.kind(), file = request.file_name(), "Report generated");
                Ok(())
            }
            Err(err) => {
                if matches!(task.state(), ReportState::Validated | ReportState::Generated) {
                    task.advance(ReportState::Failed)?;
                }
                tracing::error!(
                    kind = request.kind(),
                    file = request.file_name(),
                    state = ?task.state(),
                    error = %err,
                    "Report generation failed"
                );
                Err(AppError::generic(
                    format!("Failed to generate {} {}", request.kind(), request.file_name()),
                    err,
                ))
            }
        }
    }

    fn generate_all(
        &self,
        project_id: Uuid,
        scan_result_id: Uuid,
        reports: &Reports,
        file_ops: &dyn FileOperations,
    ) -> Result<(), AppError> {
        self.check_all(reports)
            .map_err(|e| AppError::generic("Report requests check failed", e))?;
        for request in reports.requests() {
            self.generate(project_id, scan_result_id, &request, file_ops)?;
        }
        Ok(())
    }

    fn list_report_templates(&self, locale: Locale) -> Result<Vec<String>, AppError> {
        Ok(self
            .templates(locale)?
            .into_iter()
            .map(|template| template.name)
            .collect())
    }

    fn get_dummy_report_template_id(&self, locale: Locale) -> Result<Uuid, AppError> {
        let name = dummy_template_name(locale);
        self.templates(locale)?
            .into_iter()
            .find(|template| template.name == name)
            .map(|template| template.id)
            .ok_or_else(|| AppError::NotFound(format!("report template {name} for locale {locale}")))
    }
}
