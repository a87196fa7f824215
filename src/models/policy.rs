//! Security policy definitions checked by the server after a scan.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRule {
    pub field: String,
    pub value: String,
    #[serde(default)]
    pub is_regex: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyScope {
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

/// A policy is violated when at least `count_to_actualize` issues match any scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default = "default_count_to_actualize")]
    pub count_to_actualize: u32,
    #[serde(default)]
    pub scopes: Vec<PolicyScope>,
}

fn default_count_to_actualize() -> u32 {
    1
}

impl Policy {
    pub fn load_all(data: &str) -> Result<Vec<Policy>, AppError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Compact JSON form the server stores.
    pub fn serialize_all(policies: &[Policy]) -> Result<String, AppError> {
        Ok(serde_json::to_string(policies)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_load_with_defaults() {
        let policies = Policy::load_all(
            r#"[{"scopes": [{"rules": [{"field": "Level", "value": "High"}]}]}]"#,
        )
        .unwrap();
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].count_to_actualize, 1);
        assert!(!policies[0].scopes[0].rules[0].is_regex);
    }

    #[test]
    fn serialized_policies_use_server_field_names() {
        let policies = vec![Policy {
            count_to_actualize: 2,
            scopes: vec![PolicyScope {
                rules: vec![PolicyRule {
                    field: "Type".to_string(),
                    value: "SQL.*".to_string(),
                    is_regex: true,
                }],
            }],
        }];
        let json = Policy::serialize_all(&policies).unwrap();
        assert!(json.contains("\"countToActualize\":2"));
        assert!(json.contains("\"isRegex\":true"));
    }
}
