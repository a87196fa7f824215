//! Settings conversion for the legacy v4.1.1 server API.

use crate::converters::{apply_white_box, blackbox};
use crate::errors::AppError;
use crate::mapping::map_value;
use crate::mapping::v411::PROGRAMMING_LANGUAGE;
use crate::models::settings::ScanSettings;
use crate::server::v411::{CreateProjectModel, DefaultProjectSettingsModel, ProgrammingLanguage};

/// Build a project creation request. The legacy API takes one language,
/// so only the primary language is sent.
pub fn convert(
    settings: &ScanSettings,
    defaults: &DefaultProjectSettingsModel,
) -> Result<CreateProjectModel, AppError> {
    let mut result = CreateProjectModel::from(defaults);

    result.name = Some(settings.project_name.clone());
    result.programming_language = Some(
        settings
            .programming_language()
            .map(|language| map_value(language, &PROGRAMMING_LANGUAGE))
            .unwrap_or(ProgrammingLanguage::None),
    );
    if settings.programming_languages.len() > 1 {
        tracing::debug!(
            count = settings.programming_languages.len(),
            "Legacy server accepts one language, using the first"
        );
    }
    if let Some(black_box) = &settings.black_box_settings {
        result.project_url = Some(black_box.site.clone());
    }
    result.white_box = Some(apply_white_box(
        settings,
        result.white_box.take().unwrap_or_default(),
    ));

    let black_box = settings.active_black_box();
    result.black_box_enabled = Some(black_box.is_some());
    if let Some(black_box) = black_box {
        let base = blackbox::fresh_base(result.black_box.as_ref());
        result.black_box = Some(blackbox::apply_base(black_box, base)?);
    }

    tracing::debug!(project = %settings.project_name, "Converted project settings for v411");
    Ok(result)
}
