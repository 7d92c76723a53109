//! Update, update run and update summary models.

use serde::{Deserialize, Serialize};

/// Aggregated update state for one cluster resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<UpdateSummaryProperties>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummaryProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,
}

/// One available or applied update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

/// One execution of an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRun {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_summary_round_trips() {
        let summary = UpdateSummary {
            id: Some("/clusters/c1/updateSummaries/default".to_string()),
            name: Some("default".to_string()),
            properties: Some(UpdateSummaryProperties {
                current_version: Some("10.2311.0.26".to_string()),
                state: Some("AppliedSuccessfully".to_string()),
                last_checked: None,
            }),
        };

        let encoded = serde_json::to_string(&summary).unwrap();
        assert!(encoded.contains(r#""currentVersion":"10.2311.0.26""#));
        assert!(!encoded.contains("lastChecked"));
        let decoded: UpdateSummary = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, summary);
    }

    #[test]
    fn update_list_decodes_from_array() {
        let body = r#"[{"name":"Solution10.2405"},{"name":"Solution10.2408","extra":1}]"#;
        let updates: Vec<Update> = serde_json::from_str(body).unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].name.as_deref(), Some("Solution10.2408"));
    }
}
