use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

/// Resources grouped by resource type, then by id.
pub type GroupedResources = HashMap<String, HashMap<String, Value>>;

/// Paginated container of resources returned by list-style queries.
///
/// Only `total` and `entry` are interpreted; everything else the server sends
/// passes through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Bundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bundle {
    /// The contained resources in original entry order.
    ///
    /// Entries without a `resource` are skipped; no reordering, no
    /// deduplication.
    pub fn into_resources(self) -> Vec<Value> {
        self.entry
            .into_iter()
            .filter_map(|entry| entry.resource)
            .collect()
    }

    /// Group the contained resources by `resourceType`, then by `id`.
    ///
    /// On a duplicate (type, id) pair the last entry wins. Fails when a
    /// resource lacks `resourceType` or `id` — both are grouping keys here.
    pub fn into_grouped(self) -> Result<GroupedResources> {
        let mut grouped = GroupedResources::new();
        for resource in self.entry.into_iter().filter_map(|entry| entry.resource) {
            let resource_type = required_str(&resource, "resourceType")?;
            let id = required_str(&resource, "id")?;
            grouped
                .entry(resource_type)
                .or_default()
                .insert(id, resource);
        }
        Ok(grouped)
    }
}

fn required_str(resource: &Value, field: &str) -> Result<String> {
    resource
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClientError::malformed_response(format!("resource is missing \"{field}\"")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle(entries: Vec<Value>) -> Bundle {
        serde_json::from_value(json!({
            "resourceType": "Bundle",
            "total": entries.len(),
            "entry": entries.into_iter().map(|r| json!({"resource": r})).collect::<Vec<_>>(),
        }))
        .unwrap()
    }

    #[test]
    fn test_flat_preserves_order() {
        let bundle = bundle(vec![
            json!({"resourceType": "Patient", "id": "1"}),
            json!({"resourceType": "Patient", "id": "2"}),
        ]);
        let resources = bundle.into_resources();
        assert_eq!(
            resources,
            vec![
                json!({"resourceType": "Patient", "id": "1"}),
                json!({"resourceType": "Patient", "id": "2"}),
            ]
        );
    }

    #[test]
    fn test_flat_empty_when_entry_absent() {
        let bundle: Bundle =
            serde_json::from_value(json!({"resourceType": "Bundle", "total": 0})).unwrap();
        assert!(bundle.into_resources().is_empty());
    }

    #[test]
    fn test_flat_skips_entries_without_resource() {
        let bundle: Bundle = serde_json::from_value(json!({
            "entry": [
                {"fullUrl": "urn:uuid:1"},
                {"resource": {"resourceType": "Patient", "id": "1"}},
            ],
        }))
        .unwrap();
        assert_eq!(
            bundle.into_resources(),
            vec![json!({"resourceType": "Patient", "id": "1"})]
        );
    }

    #[test]
    fn test_flat_does_not_deduplicate() {
        let resource = json!({"resourceType": "Patient", "id": "1"});
        let bundle = bundle(vec![resource.clone(), resource.clone()]);
        assert_eq!(bundle.into_resources().len(), 2);
    }

    #[test]
    fn test_grouped_by_type_and_id() {
        let bundle = bundle(vec![
            json!({"resourceType": "Patient", "id": "1", "name": [{"text": "Ada"}]}),
            json!({"resourceType": "Encounter", "id": "e1", "status": "arrived"}),
            json!({"resourceType": "Patient", "id": "2"}),
        ]);
        let grouped = bundle.into_grouped().unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["Patient"].len(), 2);
        assert_eq!(grouped["Encounter"]["e1"]["status"], "arrived");
        assert_eq!(grouped["Patient"]["1"]["name"][0]["text"], "Ada");
    }

    // Duplicate (type, id) pairs are overwritten silently. Pinned here so a
    // future change to this behavior is deliberate.
    #[test]
    fn test_grouped_last_entry_wins_on_duplicate() {
        let bundle = bundle(vec![
            json!({"resourceType": "Patient", "id": "1", "active": false}),
            json!({"resourceType": "Patient", "id": "1", "active": true}),
        ]);
        let grouped = bundle.into_grouped().unwrap();
        assert_eq!(grouped["Patient"].len(), 1);
        assert_eq!(grouped["Patient"]["1"]["active"], true);
    }

    #[test]
    fn test_grouped_requires_resource_type() {
        let bundle = bundle(vec![json!({"id": "1"})]);
        let err = bundle.into_grouped().unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
        assert!(err.to_string().contains("resourceType"));
    }

    #[test]
    fn test_grouped_requires_id() {
        let bundle = bundle(vec![json!({"resourceType": "Patient"})]);
        let err = bundle.into_grouped().unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let raw = json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "total": 1,
            "link": [{"relation": "self", "url": "https://fhir.example.org/Patient"}],
            "entry": [{"fullUrl": "Patient/1", "resource": {"resourceType": "Patient", "id": "1"}}],
        });
        let bundle: Bundle = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(bundle.extra["type"], "searchset");
        assert_eq!(bundle.entry[0].extra["fullUrl"], "Patient/1");
        assert_eq!(serde_json::to_value(&bundle).unwrap(), raw);
    }
}
