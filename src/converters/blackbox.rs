//! Black-box sub-converters, generic over the target server schema.

use crate::errors::AppError;
use crate::mapping::map_value;
use crate::models::settings::{
    AddressListItem, Authentication, AuthenticationType, BlackBoxSettings, DetectionType,
    HttpHeader, ProxySettings,
};
use crate::server::blackbox::{
    BlackBoxAddressModel, BlackBoxAuthenticationFullModel, BlackBoxFormAuthenticationModel,
    BlackBoxHttpAuthenticationModel, BlackBoxProxySettingsModel,
    BlackBoxRawCookieAuthenticationModel, BlackBoxSettingsBaseModel, BlackBoxSettingsModel,
    HttpHeaderModel,
};
use crate::server::WireSchema;

/// Convert authentication settings. Absent settings mean no authentication.
///
/// Only the sub-model of the active variant is populated. Fails when the
/// target schema has no equivalent of the variant.
pub fn apply_authentication<S: WireSchema>(
    authentication: Option<&Authentication>,
) -> Result<BlackBoxAuthenticationFullModel<S>, AppError> {
    let tables = S::black_box_tables();
    let mut model = BlackBoxAuthenticationFullModel::<S> {
        auth_type: Some(tables.auth_type.map(AuthenticationType::None)),
        ..Default::default()
    };
    let Some(authentication) = authentication else {
        return Ok(model);
    };

    let kind = authentication.kind();
    let auth_type = tables
        .auth_type
        .get(kind)
        .ok_or_else(|| AppError::Conversion {
            field: "authentication",
            variant: kind.to_string(),
            version: S::VERSION,
        })?;
    model.auth_type = Some(auth_type);

    match authentication {
        Authentication::None => {}
        Authentication::Form(form) => {
            let mut form_model = BlackBoxFormAuthenticationModel::<S> {
                form_detection: Some(map_value(form.detection, &tables.form_detection)),
                login: form.login.clone(),
                password: form.password.clone(),
                form_address: form.form_address.clone(),
                validation_template: form.validation_template.clone(),
                ..Default::default()
            };
            if form.detection == DetectionType::Manual {
                form_model.login_key = form.login_key.clone();
                form_model.password_key = form.password_key.clone();
                form_model.form_x_path = form.xpath.clone();
            }
            model.form = Some(form_model);
        }
        Authentication::Http(http) => {
            model.http = Some(BlackBoxHttpAuthenticationModel {
                login: http.login.clone(),
                password: http.password.clone(),
                validation_address: http.validation_address.clone(),
            });
        }
        Authentication::Cookie(cookie) => {
            model.cookie = Some(BlackBoxRawCookieAuthenticationModel {
                cookie: cookie.cookie.clone(),
                validation_address: cookie.validation_address.clone(),
                validation_template: cookie.validation_template.clone(),
            });
        }
    }
    Ok(model)
}

/// Convert proxy settings. A disabled proxy only carries `isActive=false`.
pub fn apply_proxy<S: WireSchema>(
    proxy: Option<&ProxySettings>,
) -> Option<BlackBoxProxySettingsModel<S>> {
    let proxy = proxy?;
    if !proxy.enabled {
        return Some(BlackBoxProxySettingsModel {
            is_active: Some(false),
            ..Default::default()
        });
    }
    Some(BlackBoxProxySettingsModel {
        is_active: Some(true),
        proxy_type: Some(map_value(proxy.proxy_type, &S::black_box_tables().proxy_type)),
        host: proxy.host.clone(),
        port: proxy.port,
        login: proxy.login.clone(),
        password: proxy.password.clone(),
    })
}

/// Convert one address list; empty lists yield `None`.
pub fn apply_address_list<S: WireSchema>(
    items: &[AddressListItem],
) -> Option<Vec<BlackBoxAddressModel<S>>> {
    if items.is_empty() {
        return None;
    }
    let table = &S::black_box_tables().address_format;
    Some(
        items
            .iter()
            .map(|item| BlackBoxAddressModel {
                address: Some(item.address.clone()),
                format: Some(map_value(item.format, table)),
            })
            .collect(),
    )
}

/// Set the white and black address lists. An empty list is omitted, so
/// "no restriction" never turns into an empty restriction list.
pub fn apply_address_lists<S: WireSchema>(
    settings: &BlackBoxSettings,
    mut model: BlackBoxSettingsBaseModel<S>,
) -> BlackBoxSettingsBaseModel<S> {
    model.white_listed_addresses = apply_address_list(&settings.white_listed_addresses);
    model.black_listed_addresses = apply_address_list(&settings.black_listed_addresses);
    tracing::trace!(
        white = settings.white_listed_addresses.len(),
        black = settings.black_listed_addresses.len(),
        "Set address lists"
    );
    model
}

pub fn apply_http_headers(headers: &[HttpHeader]) -> Option<Vec<HttpHeaderModel>> {
    if headers.is_empty() {
        return None;
    }
    Some(
        headers
            .iter()
            .map(|header| HttpHeaderModel {
                key: Some(header.key.clone()),
                value: Some(header.value.clone()),
            })
            .collect(),
    )
}

/// Empty base model keeping only the server fields the settings do not
/// cover. Lists, headers and credentials of `defaults` are dropped.
pub fn fresh_base<S: WireSchema>(
    defaults: Option<&BlackBoxSettingsBaseModel<S>>,
) -> BlackBoxSettingsBaseModel<S> {
    BlackBoxSettingsBaseModel {
        extra: defaults.map(|model| model.extra.clone()).unwrap_or_default(),
        ..Default::default()
    }
}

/// Overlay black-box settings onto a base model.
pub fn apply_base<S: WireSchema>(
    settings: &BlackBoxSettings,
    model: BlackBoxSettingsBaseModel<S>,
) -> Result<BlackBoxSettingsBaseModel<S>, AppError> {
    let tables = S::black_box_tables();
    let mut model = apply_address_lists(settings, model);

    model.site = Some(settings.site.clone());
    model.level = Some(map_value(settings.scan_level, &tables.scan_level));
    model.scan_scope = Some(map_value(settings.scan_scope, &tables.scan_scope));
    model.ssl_check = Some(settings.ssl_check);
    model.run_autocheck_after_scan = Some(settings.run_autocheck_after_scan);
    model.additional_http_headers = apply_http_headers(&settings.http_headers);
    model.authentication = Some(apply_authentication(settings.authentication.as_ref())?);
    model.proxy_settings = apply_proxy(settings.proxy_settings.as_ref());

    tracing::debug!(site = %settings.site, version = %S::VERSION, "Applied black-box settings");
    Ok(model)
}

/// Overlay black-box settings onto a full model. `None` disables black-box
/// scanning and leaves everything else untouched.
pub fn apply_full<S: WireSchema>(
    settings: Option<&BlackBoxSettings>,
    mut model: BlackBoxSettingsModel<S>,
) -> Result<BlackBoxSettingsModel<S>, AppError> {
    let Some(settings) = settings else {
        model.is_active = Some(false);
        return Ok(model);
    };
    model.base = apply_base(settings, model.base)?;
    model.is_active = Some(true);
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::{
        AddressFormat, CookieAuthentication, FormAuthentication, HttpAuthentication, ProxyType,
        ScanLevel,
    };
    use crate::server::v411::{self, V411};
    use crate::server::v470::{self, V470};

    fn settings() -> BlackBoxSettings {
        BlackBoxSettings {
            site: "http://example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn absent_authentication_is_none_type_without_sub_models() {
        let model = apply_authentication::<V470>(None).unwrap();
        assert_eq!(model.auth_type, Some(v470::AuthType::None));
        assert!(model.form.is_none());
        assert!(model.http.is_none());
        assert!(model.cookie.is_none());
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json, serde_json::json!({"type": "None"}));
    }

    #[test]
    fn auto_form_omits_manual_fields() {
        let form = FormAuthentication {
            detection: DetectionType::Auto,
            login: Some("admin".to_string()),
            login_key: Some("user".to_string()),
            xpath: Some("//form".to_string()),
            ..Default::default()
        };
        let model = apply_authentication::<V470>(Some(&Authentication::Form(form))).unwrap();
        let form = model.form.unwrap();
        assert_eq!(form.form_detection, Some(v470::BlackBoxFormDetection::Auto));
        assert_eq!(form.login.as_deref(), Some("admin"));
        assert!(form.login_key.is_none());
        assert!(form.form_x_path.is_none());
    }

    #[test]
    fn manual_form_carries_keys_and_xpath() {
        let form = FormAuthentication {
            detection: DetectionType::Manual,
            login_key: Some("user".to_string()),
            password_key: Some("pass".to_string()),
            xpath: Some("//form".to_string()),
            ..Default::default()
        };
        let model = apply_authentication::<V411>(Some(&Authentication::Form(form))).unwrap();
        assert_eq!(model.auth_type, Some(v411::AuthType::Form));
        let form = model.form.unwrap();
        assert_eq!(form.login_key.as_deref(), Some("user"));
        assert_eq!(form.password_key.as_deref(), Some("pass"));
        assert_eq!(form.form_x_path.as_deref(), Some("//form"));
    }

    #[test]
    fn cookie_authentication_per_version() {
        let cookie = Authentication::Cookie(CookieAuthentication {
            cookie: Some("session=1".to_string()),
            ..Default::default()
        });
        let model = apply_authentication::<V470>(Some(&cookie)).unwrap();
        assert_eq!(model.auth_type, Some(v470::AuthType::RawCookie));
        assert_eq!(model.cookie.unwrap().cookie.as_deref(), Some("session=1"));

        let err = apply_authentication::<V411>(Some(&cookie)).unwrap_err();
        match err {
            AppError::Conversion { field, variant, version } => {
                assert_eq!(field, "authentication");
                assert_eq!(variant, "COOKIE");
                assert_eq!(version, V411::VERSION);
            }
            other => panic!("Expected conversion error, got {other:?}"),
        }
    }

    #[test]
    fn disabled_proxy_only_reports_inactive() {
        assert!(apply_proxy::<V470>(None).is_none());
        let proxy = ProxySettings {
            enabled: false,
            host: Some("proxy.local".to_string()),
            port: Some(3128),
            ..Default::default()
        };
        let model = apply_proxy::<V470>(Some(&proxy)).unwrap();
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json, serde_json::json!({"isActive": false}));
    }

    #[test]
    fn socks4_proxy_falls_back_on_legacy_server() {
        let proxy = ProxySettings {
            enabled: true,
            proxy_type: ProxyType::Socks4,
            host: Some("proxy.local".to_string()),
            port: Some(1080),
            ..Default::default()
        };
        let legacy = apply_proxy::<V411>(Some(&proxy)).unwrap();
        assert_eq!(legacy.proxy_type, Some(v411::ProxyType::Http));
        let current = apply_proxy::<V470>(Some(&proxy)).unwrap();
        assert_eq!(current.proxy_type, Some(v470::ProxyType::Socks4));
        assert_eq!(current.port, Some(1080));
    }

    #[test]
    fn wildcard_address_keeps_address_and_maps_format() {
        let items = vec![AddressListItem {
            format: AddressFormat::Wildcard,
            address: "*.example.com".to_string(),
        }];
        let converted = apply_address_list::<V470>(&items).unwrap();
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].address.as_deref(), Some("*.example.com"));
        assert_eq!(converted[0].format, Some(v470::BlackBoxFormat::Wildcard));
    }

    #[test]
    fn white_list_converted_when_black_list_empty() {
        let mut bb = settings();
        bb.white_listed_addresses = vec![AddressListItem {
            format: AddressFormat::ExactMatch,
            address: "http://example.com/app".to_string(),
        }];
        let stale = BlackBoxSettingsBaseModel::<V470> {
            black_listed_addresses: Some(vec![BlackBoxAddressModel {
                address: Some("*/logout".to_string()),
                format: Some(v470::BlackBoxFormat::Wildcard),
            }]),
            ..Default::default()
        };
        let model = apply_address_lists::<V470>(&bb, stale);
        assert_eq!(model.white_listed_addresses.map(|l| l.len()), Some(1));
        assert!(model.black_listed_addresses.is_none());
    }

    #[test]
    fn fresh_base_drops_server_lists_and_headers() {
        let mut defaults = BlackBoxSettingsBaseModel::<V470> {
            white_listed_addresses: Some(vec![BlackBoxAddressModel {
                address: Some("http://default/*".to_string()),
                format: Some(v470::BlackBoxFormat::Wildcard),
            }]),
            black_listed_addresses: Some(vec![BlackBoxAddressModel {
                address: Some("*/logout".to_string()),
                format: Some(v470::BlackBoxFormat::Wildcard),
            }]),
            additional_http_headers: Some(vec![HttpHeaderModel {
                key: Some("X-Default".to_string()),
                value: Some("1".to_string()),
            }]),
            ..Default::default()
        };
        defaults.extra.insert("scanDelay".to_string(), serde_json::json!(250));

        let model = apply_base(&settings(), fresh_base(Some(&defaults))).unwrap();
        let json = serde_json::to_value(&model).unwrap();
        assert!(json.get("whiteListedAddresses").is_none());
        assert!(json.get("blackListedAddresses").is_none());
        assert!(json.get("additionalHttpHeaders").is_none());
        assert_eq!(json["scanDelay"], 250);
        assert!(fresh_base::<V411>(None).extra.is_empty());
    }

    #[test]
    fn http_authentication_per_version() {
        let http = Authentication::Http(HttpAuthentication {
            login: Some("user".to_string()),
            password: Some("secret".to_string()),
            validation_address: Some("http://example.com/me".to_string()),
        });

        let current = apply_authentication::<V470>(Some(&http)).unwrap();
        assert_eq!(current.auth_type, Some(v470::AuthType::Http));
        let model = current.http.unwrap();
        assert_eq!(model.login.as_deref(), Some("user"));
        assert_eq!(model.password.as_deref(), Some("secret"));
        assert_eq!(model.validation_address.as_deref(), Some("http://example.com/me"));
        assert!(current.form.is_none());
        assert!(current.cookie.is_none());

        let legacy = apply_authentication::<V411>(Some(&http)).unwrap();
        assert_eq!(legacy.auth_type, Some(v411::AuthType::Http));
        assert_eq!(legacy.http.unwrap().login.as_deref(), Some("user"));
        assert!(legacy.form.is_none());
        assert!(legacy.cookie.is_none());
    }

    #[test]
    fn base_overlay_keeps_server_fields() {
        let mut defaults = BlackBoxSettingsBaseModel::<V470>::default();
        defaults
            .extra
            .insert("scanPolicyId".to_string(), serde_json::json!("p1"));
        let mut bb = settings();
        bb.scan_level = ScanLevel::Fast;
        bb.http_headers = vec![HttpHeader {
            key: "X-Scan".to_string(),
            value: "1".to_string(),
        }];

        let model = apply_base(&bb, defaults).unwrap();
        assert_eq!(model.site.as_deref(), Some("http://example.com"));
        assert_eq!(model.level, Some(v470::BlackBoxScanLevel::Fast));
        assert_eq!(model.extra["scanPolicyId"], "p1");
        assert_eq!(model.additional_http_headers.unwrap()[0].key.as_deref(), Some("X-Scan"));
        assert!(model.proxy_settings.is_none());
    }

    #[test]
    fn full_model_active_only_with_settings() {
        let model = apply_full::<V470>(None, Default::default()).unwrap();
        assert_eq!(model.is_active, Some(false));
        assert!(model.base.site.is_none());

        let model = apply_full::<V470>(Some(&settings()), Default::default()).unwrap();
        assert_eq!(model.is_active, Some(true));
        assert_eq!(model.base.site.as_deref(), Some("http://example.com"));
    }
}
