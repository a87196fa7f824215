//! Black-box wire models shared by all supported server versions.
//!
//! The base model is what project creation accepts; the full model used by
//! settings updates is the base model plus `isActive`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::server::WireSchema;

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpHeaderModel {
    pub key: Option<String>,
    pub value: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct BlackBoxAddressModel<S: WireSchema> {
    pub address: Option<String>,
    pub format: Option<S::AddressFormat>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct BlackBoxFormAuthenticationModel<S: WireSchema> {
    pub form_detection: Option<S::FormDetection>,
    pub login_key: Option<String>,
    pub password_key: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub form_address: Option<String>,
    pub form_x_path: Option<String>,
    pub validation_template: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackBoxHttpAuthenticationModel {
    pub login: Option<String>,
    pub password: Option<String>,
    pub validation_address: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackBoxRawCookieAuthenticationModel {
    pub cookie: Option<String>,
    pub validation_address: Option<String>,
    pub validation_template: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct BlackBoxAuthenticationFullModel<S: WireSchema> {
    #[serde(rename = "type")]
    pub auth_type: Option<S::AuthType>,
    pub form: Option<BlackBoxFormAuthenticationModel<S>>,
    pub http: Option<BlackBoxHttpAuthenticationModel>,
    pub cookie: Option<BlackBoxRawCookieAuthenticationModel>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct BlackBoxProxySettingsModel<S: WireSchema> {
    pub is_active: Option<bool>,
    #[serde(rename = "type")]
    pub proxy_type: Option<S::ProxyType>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub login: Option<String>,
    pub password: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct BlackBoxSettingsBaseModel<S: WireSchema> {
    pub site: Option<String>,
    pub level: Option<S::ScanLevel>,
    pub scan_scope: Option<S::ScanScope>,
    pub ssl_check: Option<bool>,
    pub run_autocheck_after_scan: Option<bool>,
    pub additional_http_headers: Option<Vec<HttpHeaderModel>>,
    pub white_listed_addresses: Option<Vec<BlackBoxAddressModel<S>>>,
    pub black_listed_addresses: Option<Vec<BlackBoxAddressModel<S>>>,
    pub authentication: Option<BlackBoxAuthenticationFullModel<S>>,
    pub proxy_settings: Option<BlackBoxProxySettingsModel<S>>,
    /// Server-side fields this crate does not model, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct BlackBoxSettingsModel<S: WireSchema> {
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub base: BlackBoxSettingsBaseModel<S>,
}

// Not derived: wire enums carry no `Default`.

impl<S: WireSchema> Default for BlackBoxAddressModel<S> {
    fn default() -> Self {
        Self {
            address: None,
            format: None,
        }
    }
}

impl<S: WireSchema> Default for BlackBoxFormAuthenticationModel<S> {
    fn default() -> Self {
        Self {
            form_detection: None,
            login_key: None,
            password_key: None,
            login: None,
            password: None,
            form_address: None,
            form_x_path: None,
            validation_template: None,
        }
    }
}

impl<S: WireSchema> Default for BlackBoxAuthenticationFullModel<S> {
    fn default() -> Self {
        Self {
            auth_type: None,
            form: None,
            http: None,
            cookie: None,
        }
    }
}

impl<S: WireSchema> Default for BlackBoxProxySettingsModel<S> {
    fn default() -> Self {
        Self {
            is_active: None,
            proxy_type: None,
            host: None,
            port: None,
            login: None,
            password: None,
        }
    }
}

impl<S: WireSchema> Default for BlackBoxSettingsBaseModel<S> {
    fn default() -> Self {
        Self {
            site: None,
            level: None,
            scan_scope: None,
            ssl_check: None,
            run_autocheck_after_scan: None,
            additional_http_headers: None,
            white_listed_addresses: None,
            black_listed_addresses: None,
            authentication: None,
            proxy_settings: None,
            extra: BTreeMap::new(),
        }
    }
}

impl<S: WireSchema> Default for BlackBoxSettingsModel<S> {
    fn default() -> Self {
        Self {
            is_active: None,
            base: BlackBoxSettingsBaseModel::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::v411::V411;
    use crate::server::v470::{AuthType, BlackBoxScanLevel, V470};

    #[test]
    fn base_model_keeps_unknown_server_fields() {
        let json = serde_json::json!({
            "site": "http://example.com",
            "level": "Fast",
            "scanPolicyId": "7d1f"
        });
        let model: BlackBoxSettingsBaseModel<V470> = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(model.level, Some(BlackBoxScanLevel::Fast));
        assert_eq!(model.extra["scanPolicyId"], "7d1f");
        assert_eq!(serde_json::to_value(&model).unwrap(), json);
    }

    #[test]
    fn full_model_is_base_plus_is_active() {
        let model = BlackBoxSettingsModel::<V470> {
            is_active: Some(true),
            base: BlackBoxSettingsBaseModel {
                site: Some("http://example.com".to_string()),
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"isActive": true, "site": "http://example.com"})
        );
        let back: BlackBoxSettingsModel<V470> = serde_json::from_value(json).unwrap();
        assert_eq!(back, model);
        assert!(back.base.extra.is_empty());
    }

    #[test]
    fn authentication_omits_inactive_variants() {
        let model = BlackBoxAuthenticationFullModel::<V470> {
            auth_type: Some(AuthType::Http),
            http: Some(BlackBoxHttpAuthenticationModel {
                login: Some("user".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Http", "http": {"login": "user"}}));
    }

    #[test]
    fn default_models_serialize_empty() {
        let v470 = BlackBoxSettingsModel::<V470>::default();
        assert_eq!(serde_json::to_value(&v470).unwrap(), serde_json::json!({}));
        let v411 = BlackBoxSettingsBaseModel::<V411> {
            authentication: Some(Default::default()),
            proxy_settings: Some(Default::default()),
            white_listed_addresses: Some(vec![Default::default()]),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&v411).unwrap(),
            serde_json::json!({"authentication": {}, "proxySettings": {}, "whiteListedAddresses": [{}]})
        );
    }

    #[test]
    fn form_x_path_wire_name() {
        let model = BlackBoxFormAuthenticationModel::<V470> {
            form_x_path: Some("//form".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json, serde_json::json!({"formXPath": "//form"}));
    }
}
