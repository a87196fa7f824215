//! End-to-end test of the CI pipeline: settings conversion for both server
//! generations, scan-result normalization and local artifact export.
//!
//! Fixtures live in `tests/fixtures/`. Artifacts are written to a temporary
//! directory, no server is needed.

use scanbridge::converters::{self, CreateProjectRequest, DefaultProjectSettings};
use scanbridge::errors::AppError;
use scanbridge::models::reports::{Locale, Reports};
use scanbridge::models::scan_result::IssueClass;
use scanbridge::models::settings::{Authentication, CookieAuthentication, ScanSettings};
use scanbridge::parsers::scan_result::ScanResultNormalizer;
use scanbridge::server::ServerVersion;
use scanbridge::services::file_ops::LocalFileOperations;
use scanbridge::services::offline::OfflineReportServer;
use scanbridge::services::reports::{ReportsTasks, ServerReportsTasks};
use serde_json::{json, Value};
use uuid::Uuid;

const SETTINGS: &str = include_str!("fixtures/settings.json");
const DEFAULTS_V470: &[u8] = include_bytes!("fixtures/defaults_v470.json");
const SCAN_RESULT: &[u8] = include_bytes!("fixtures/scan_result.json");
const REPORTS: &str = include_str!("fixtures/reports.json");

/// Minimal v4.1.1 defaults; that server only reports a primary language.
fn defaults_v411() -> DefaultProjectSettings {
    let data = json!({
        "name": "default",
        "programmingLanguage": "None",
        "blackBoxEnabled": false,
        "blackBox": {"site": "http://default", "level": "Normal"}
    });
    DefaultProjectSettings::from_json(ServerVersion::V411, data.to_string().as_bytes())
        .expect("v411 defaults")
}

fn read_json(path: &std::path::Path) -> Value {
    let data = std::fs::read(path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()));
    serde_json::from_slice(&data).expect("artifact is JSON")
}

#[test]
fn convert_settings_for_v470() {
    let settings = ScanSettings::load(SETTINGS).expect("settings");
    let defaults = DefaultProjectSettings::from_json(ServerVersion::V470, DEFAULTS_V470)
        .expect("v470 defaults");

    let request = converters::convert(&settings, &defaults).expect("conversion");
    assert_eq!(request.version(), ServerVersion::V470);

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["name"], "bricks");
    assert_eq!(json["languages"], json!(["Php", "JavaScript"]));
    assert_eq!(json["projectUrl"], "http://bricks.example.com");
    assert_eq!(json["blackBoxEnabled"], true);
    assert_eq!(json["whiteBox"]["staticCodeAnalysisEnabled"], true);
    assert_eq!(json["whiteBox"]["searchForVulnerableComponentsEnabled"], true);
    assert_eq!(json["whiteBox"]["patternMatchingEnabled"], false);
    // server fields outside the settings survive
    assert_eq!(json["reportTemplates"], json!(["Scan results report"]));

    let black_box = &json["blackBox"];
    assert_eq!(black_box["site"], "http://bricks.example.com");
    assert_eq!(black_box["level"], "Full");
    assert_eq!(black_box["scanScope"], "Folder");
    assert_eq!(black_box["sslCheck"], true);
    assert_eq!(black_box["scanDelay"], 250);
    assert_eq!(
        black_box["additionalHttpHeaders"],
        json!([{"key": "X-Scan", "value": "ci"}])
    );
    assert_eq!(
        black_box["whiteListedAddresses"],
        json!([{"address": "http://bricks.example.com/app", "format": "ExactMatch"}])
    );
    // empty black list is omitted, the server default is not carried over
    assert!(black_box.get("blackListedAddresses").is_none());

    let authentication = &black_box["authentication"];
    assert_eq!(authentication["type"], "Form");
    assert_eq!(authentication["form"]["formDetection"], "Manual");
    assert_eq!(authentication["form"]["loginKey"], "user");
    assert_eq!(authentication["form"]["formXPath"], "//form[@id='login']");

    let proxy = &black_box["proxySettings"];
    assert_eq!(proxy["isActive"], true);
    assert_eq!(proxy["type"], "Socks4");
    assert_eq!(proxy["port"], 1080);
}

#[test]
fn convert_settings_for_v411() {
    let settings = ScanSettings::load(SETTINGS).expect("settings");
    let request = converters::convert(&settings, &defaults_v411()).expect("conversion");

    let CreateProjectRequest::V411(model) = &request else {
        panic!("Expected a v411 request, got {request:?}");
    };
    assert_eq!(model.black_box_enabled, Some(true));

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["programmingLanguage"], "Php");
    // socks4 is unknown to v4.1.1 and falls back to plain HTTP
    assert_eq!(json["blackBox"]["proxySettings"]["type"], "Http");
}

#[test]
fn cookie_authentication_unsupported_by_v411() {
    let mut settings = ScanSettings::load(SETTINGS).expect("settings");
    if let Some(black_box) = settings.black_box_settings.as_mut() {
        black_box.authentication = Some(Authentication::Cookie(CookieAuthentication {
            cookie: Some("session=1".to_string()),
            ..Default::default()
        }));
    }

    let err = converters::convert(&settings, &defaults_v411()).unwrap_err();
    match err {
        AppError::Conversion {
            field,
            variant,
            version,
        } => {
            assert_eq!(field, "authentication");
            assert_eq!(variant, "COOKIE");
            assert_eq!(version, ServerVersion::V411);
        }
        other => panic!("Expected conversion error, got {other:?}"),
    }

    let defaults = DefaultProjectSettings::from_json(ServerVersion::V470, DEFAULTS_V470).unwrap();
    let json = serde_json::to_value(converters::convert(&settings, &defaults).unwrap()).unwrap();
    assert_eq!(json["blackBox"]["authentication"]["type"], "RawCookie");
}

#[test]
fn normalize_scan_result_across_generations() {
    let normalized = ScanResultNormalizer::new(Locale::En)
        .normalize(SCAN_RESULT)
        .expect("normalization");
    let result = &normalized.scan_result;

    assert_eq!(result.project_name.as_deref(), Some("bricks"));
    let classes: Vec<IssueClass> = result.issues.iter().map(|issue| issue.class()).collect();
    assert_eq!(
        classes,
        vec![
            IssueClass::Vulnerability,
            IssueClass::Weakness,
            IssueClass::Sca,
            IssueClass::BlackBox
        ]
    );

    // unknown subtype at index 4 skipped with its record index
    assert!(normalized
        .warnings
        .iter()
        .any(|warning| warning.record_index == Some(4)));

    // every issue type resolves in every locale
    for issue in &result.issues {
        for locale in Locale::ALL {
            assert!(result.localized(&issue.base().type_id, locale).is_some());
        }
    }
    assert_eq!(result.title("weak-hash", Locale::Ru), "Weak hash");
    assert_eq!(result.title("xss", Locale::En), "Межсайтовый скриптинг");
    assert_eq!(result.title("vulnerable-component", Locale::En), "vulnerable-component");
    assert_eq!(result.title("sqli", Locale::Ru), "Внедрение SQL");

    // re-serialized result reads back without the server discriminator
    let data = serde_json::to_vec(result).unwrap();
    assert!(!String::from_utf8_lossy(&data).contains("clazz"));
    let again = ScanResultNormalizer::new(Locale::En).normalize(&data).unwrap();
    assert_eq!(&again.scan_result, result);
    assert!(again.warnings.is_empty());
}

#[test]
fn export_local_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let scan_result = dir.path().join("scan_result.json");
    std::fs::write(&scan_result, SCAN_RESULT).unwrap();
    let output = dir.path().join("out");

    let reports = Reports::load(REPORTS).expect("reports");
    let tasks = ServerReportsTasks::new(
        OfflineReportServer::new(ServerVersion::V470, &scan_result),
        Locale::En,
    );
    tasks
        .generate_all(Uuid::nil(), Uuid::nil(), &reports, &LocalFileOperations::new(&output))
        .expect("export");

    // suppressed weakness filtered out of the raw data
    let raw = read_json(&output.join("raw.json"));
    assert_eq!(raw["issues"].as_array().unwrap().len(), 3);
    assert!(raw["i18n"].get("weak-hash").is_none());
    assert_eq!(raw["issues"][0]["class"], "VULNERABILITY");

    let sarif = read_json(&output.join("result.sarif"));
    assert_eq!(sarif["version"], "2.1.0");
    let results = sarif["runs"][0]["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[0]["level"], "error");
    assert_eq!(sarif["runs"][0]["tool"]["driver"]["rules"][0]["name"], "SQL Injection");

    // HIGH and LOW only, and only issues tied to a file
    let sonar = read_json(&output.join("sonar.json"));
    let issues = sonar["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0]["severity"], "CRITICAL");
    assert_eq!(issues[1]["type"], "CODE_SMELL");
}

#[test]
fn export_rejected_before_writing_anything() {
    let dir = tempfile::tempdir().unwrap();
    let scan_result = dir.path().join("scan_result.json");
    std::fs::write(&scan_result, SCAN_RESULT).unwrap();
    let output = dir.path().join("out");

    let reports = Reports::load(
        r#"{"raw": [{"fileName": "raw.json"}],
            "report": [{"fileName": "report.html", "format": "HTML"}]}"#,
    )
    .unwrap();
    let tasks = ServerReportsTasks::new(
        OfflineReportServer::new(ServerVersion::V470, &scan_result),
        Locale::En,
    );
    let err = tasks
        .generate_all(Uuid::nil(), Uuid::nil(), &reports, &LocalFileOperations::new(&output))
        .unwrap_err();

    assert!(err.original().is_some_and(AppError::is_not_found));
    assert!(!output.exists());
}
