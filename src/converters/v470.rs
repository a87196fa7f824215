//! Settings conversion for the v4.7 server API.

use crate::converters::{apply_white_box, blackbox};
use crate::errors::AppError;
use crate::mapping::map_value;
use crate::mapping::v470::{DOTNET_PROJECT_TYPE, JAVA_VERSION, LANGUAGE_GROUP};
use crate::models::policy::Policy;
use crate::models::settings::{DotNetSettings, Language, LanguageSettings, ScanSettings};
use crate::server::v470::{
    AnalysisRulesBaseModel, BlackBoxSettingsModel, CreateProjectSettingsModel,
    DefaultProjectSettingsModel, DotNetSettingsModel, GoSettingsModel, JavaScriptSettingsModel,
    JavaSettingsModel, JsaDotNetSettingsModel, LaunchSettingsModel, PhpSettingsModel,
    PmRulesBaseModel, PmTaintBaseSettingsModel, ProgrammingLanguageGroup, ProjectSettingsModel,
    PythonSettingsModel, RubySettingsModel, SastRulesBaseModel, SecurityPoliciesModel,
    SourceType, UpdateProjectRequest,
};
use crate::server::WhiteBoxSettingsModel;

/// Build a project creation request from the server's default project
/// settings. Server fields the settings do not cover are kept as is.
pub fn convert(
    settings: &ScanSettings,
    defaults: &DefaultProjectSettingsModel,
) -> Result<CreateProjectSettingsModel, AppError> {
    let mut result = CreateProjectSettingsModel::from(defaults);

    result.name = Some(settings.project_name.clone());
    result.languages = Some(convert_languages(&settings.programming_languages));
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

    tracing::debug!(
        project = %settings.project_name,
        black_box = black_box.is_some(),
        "Converted project settings for v470"
    );
    Ok(result)
}

/// Mapped language groups in settings order, each group once.
pub fn convert_languages(languages: &[Language]) -> Vec<ProgrammingLanguageGroup> {
    let mut groups = Vec::with_capacity(languages.len());
    for language in languages {
        let group = map_value(*language, &LANGUAGE_GROUP);
        if !groups.contains(&group) {
            groups.push(group);
        }
    }
    groups
}

pub fn apply_java(settings: &ScanSettings, mut model: JavaSettingsModel) -> JavaSettingsModel {
    let Some(java) = &settings.java_settings else {
        return model;
    };
    model.unpack_user_packages = Some(java.unpack_user_packages);
    model.download_dependencies = Some(java.download_dependencies);
    model.use_available_public_and_protected_methods = Some(java.use_public_analysis_method);
    model.version = Some(map_value(java.java_version, &JAVA_VERSION));
    model.user_package_prefixes = java.user_package_prefixes.clone();
    model.parameters = java.parameters.clone();
    model.launch_parameters = java.custom_parameters.clone();
    model
}

fn apply_dot_net_settings(dot_net: &DotNetSettings, mut model: DotNetSettingsModel) -> DotNetSettingsModel {
    model.project_type = Some(map_value(dot_net.project_type, &DOTNET_PROJECT_TYPE));
    model.solution_file = dot_net.solution_file.clone();
    model.launch_parameters = dot_net.custom_parameters.clone();
    model.download_dependencies = Some(dot_net.download_dependencies);
    model.use_available_public_and_protected_methods = Some(dot_net.use_public_analysis_method);
    model
}

/// Cross-platform .NET analysis.
pub fn apply_dot_net(settings: &ScanSettings, model: JsaDotNetSettingsModel) -> JsaDotNetSettingsModel {
    match &settings.dot_net_settings {
        Some(dot_net) => apply_dot_net_settings(dot_net, model),
        None => model,
    }
}

/// Windows-only .NET analysis.
pub fn apply_windows_dot_net(settings: &ScanSettings, model: DotNetSettingsModel) -> DotNetSettingsModel {
    match &settings.windows_dot_net_settings {
        Some(dot_net) => apply_dot_net_settings(dot_net, model),
        None => model,
    }
}

fn apply_launch_settings(
    language: Option<&LanguageSettings>,
    mut model: LaunchSettingsModel,
    with_dependencies: bool,
) -> LaunchSettingsModel {
    let Some(language) = language else {
        return model;
    };
    model.use_available_public_and_protected_methods = Some(language.use_public_analysis_method);
    model.launch_parameters = language.custom_parameters.clone();
    if with_dependencies {
        model.download_dependencies = Some(language.download_dependencies);
    }
    model
}

pub fn apply_go(settings: &ScanSettings, model: GoSettingsModel) -> GoSettingsModel {
    apply_launch_settings(settings.go_settings.as_ref(), model, false)
}

pub fn apply_java_script(settings: &ScanSettings, model: JavaScriptSettingsModel) -> JavaScriptSettingsModel {
    apply_launch_settings(settings.java_script_settings.as_ref(), model, true)
}

pub fn apply_php(settings: &ScanSettings, model: PhpSettingsModel) -> PhpSettingsModel {
    apply_launch_settings(settings.php_settings.as_ref(), model, true)
}

pub fn apply_python(settings: &ScanSettings, model: PythonSettingsModel) -> PythonSettingsModel {
    apply_launch_settings(settings.python_settings.as_ref(), model, true)
}

pub fn apply_ruby(settings: &ScanSettings, model: RubySettingsModel) -> RubySettingsModel {
    apply_launch_settings(settings.ruby_settings.as_ref(), model, false)
}

pub fn apply_pm_taint(settings: &ScanSettings, model: PmTaintBaseSettingsModel) -> PmTaintBaseSettingsModel {
    apply_launch_settings(settings.pm_taint_settings.as_ref(), model, false)
}

/// Full project settings for an update of an existing project.
pub fn apply_project_settings(settings: &ScanSettings, mut model: ProjectSettingsModel) -> ProjectSettingsModel {
    tracing::trace!(project = %settings.project_name, "Set project settings");
    model.source_type = Some(SourceType::Empty);
    model.project_name = Some(settings.project_name.clone());
    model.white_box_settings = Some(apply_white_box(settings, WhiteBoxSettingsModel::default()));
    model.dot_net_settings = Some(apply_windows_dot_net(settings, Default::default()));
    model.jsa_dot_net_settings = Some(apply_dot_net(settings, Default::default()));
    model.java_settings = Some(apply_java(settings, Default::default()));
    model.go_settings = Some(apply_go(settings, Default::default()));
    model.java_script_settings = Some(apply_java_script(settings, Default::default()));
    model.php_settings = Some(apply_php(settings, Default::default()));
    model.python_settings = Some(apply_python(settings, Default::default()));
    model.ruby_settings = Some(apply_ruby(settings, Default::default()));
    model.pm_taint_settings = Some(apply_pm_taint(settings, Default::default()));
    model
}

pub fn apply_analysis_rules(settings: &ScanSettings) -> AnalysisRulesBaseModel {
    AnalysisRulesBaseModel {
        pm_rules: PmRulesBaseModel {
            use_rules: settings.use_custom_pm_rules,
        },
        sast_rules: SastRulesBaseModel {
            use_rules: settings.use_sast_rules,
        },
    }
}

/// Policies are checked only when at least one is given.
pub fn apply_security_policies(
    policies: Option<&[Policy]>,
    mut model: SecurityPoliciesModel,
) -> Result<SecurityPoliciesModel, AppError> {
    let policies = policies.filter(|policies| !policies.is_empty());
    model.check_security_policies_accordance = policies.is_some();
    model.security_policies = match policies {
        Some(policies) => Policy::serialize_all(policies)?,
        None => String::new(),
    };
    Ok(model)
}

/// Everything needed to update the settings of an existing project.
pub fn convert_update(
    settings: &ScanSettings,
    policies: Option<&[Policy]>,
) -> Result<UpdateProjectRequest, AppError> {
    Ok(UpdateProjectRequest {
        project_settings: apply_project_settings(settings, Default::default()),
        black_box_settings: blackbox::apply_full(
            settings.active_black_box(),
            BlackBoxSettingsModel::default(),
        )?,
        analysis_rules: apply_analysis_rules(settings),
        security_policies: apply_security_policies(
            policies.filter(|_| settings.use_security_policies),
            Default::default(),
        )?,
    })
}
