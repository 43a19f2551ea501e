//! Data-driven default shapes for new resources.
//!
//! Each template describes the default structure of a resource type as plain
//! data; there is no per-type logic. Templates carry no `resourceType` —
//! [`ResourceClient::create`](crate::client::ResourceClient::create) stamps
//! it unconditionally.

use serde_json::{Map, Value, json};

use crate::error::{ClientError, Result};

/// Default shape for a resource type, or `None` when no template is
/// registered for it.
pub fn template(resource_type: &str) -> Option<Value> {
    let template = match resource_type {
        "Patient" => json!({
            "identifier": [{}],
            "gender": {},
            "address": [],
            "name": [{"given": [], "family": []}],
            "telecom": [{"system": "email"}, {"system": "phone"}],
            "photo": [{}],
        }),
        "Encounter" => json!({
            "identifier": [{}],
            "patient": {},
            "episodeOfCare": {},
            "serviceProvider": {},
            "careManager": {},
            "period": {},
            "location": [{"location": {}}],
            "type": {"coding": [{}]},
            "status": {},
            "class": {},
            "priority": {"coding": [{}]},
            "reason": {"coding": [{}]},
            "participant": [{"individual": {}, "type": {}}],
        }),
        "EpisodeOfCare" => json!({
            "identifier": [{}],
            "patient": {},
            "managingOrganization": {},
            "careManager": {},
            "careTeam": [{"member": {}}],
        }),
        "Observation" => json!({
            "code": {"coding": [{}]},
            "valueQuantity": {},
            "effectiveDateTime": {},
            "subject": {},
            "performer": {},
        }),
        "Organization" => json!({
            "identifier": [{}],
            "name": {},
        }),
        "DeviceUseStatement" => json!({
            "device": {"reference": ""},
            "subject": {"reference": ""},
            "whenUsed": {"start": ""},
            "extension": [],
        }),
        _ => return None,
    };
    Some(template)
}

/// Assign `value` at a dotted path inside `target`.
///
/// Absent intermediate segments are created as objects; integer segments
/// index into existing arrays. Traversing through a scalar fails with
/// `InvalidArgument`.
pub fn set_path(target: &mut Value, path: &str, value: Value) -> Result<()> {
    if path.is_empty() {
        return Err(ClientError::invalid_argument("path must not be empty"));
    }
    match path.split_once('.') {
        None => assign(target, path, value),
        Some((segment, rest)) => set_path(descend(target, segment)?, rest, value),
    }
}

/// Apply a set of path → value substitutions to a copy of `template`.
pub fn populate(template: &Value, replacements: &[(&str, Value)]) -> Result<Value> {
    let mut resource = template.clone();
    for (path, value) in replacements {
        set_path(&mut resource, path, value.clone())?;
    }
    Ok(resource)
}

fn assign(target: &mut Value, segment: &str, value: Value) -> Result<()> {
    match target {
        Value::Object(map) => {
            map.insert(segment.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            *array_slot(items, segment)? = value;
            Ok(())
        }
        _ => Err(ClientError::invalid_argument(format!(
            "cannot set \"{segment}\" on a non-container value"
        ))),
    }
}

fn descend<'a>(target: &'a mut Value, segment: &str) -> Result<&'a mut Value> {
    match target {
        Value::Object(map) => Ok(map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()))),
        Value::Array(items) => array_slot(items, segment),
        _ => Err(ClientError::invalid_argument(format!(
            "cannot traverse \"{segment}\" through a non-container value"
        ))),
    }
}

fn array_slot<'a>(items: &'a mut Vec<Value>, segment: &str) -> Result<&'a mut Value> {
    let index: usize = segment.parse().map_err(|_| {
        ClientError::invalid_argument(format!("\"{segment}\" is not a valid array index"))
    })?;
    let len = items.len();
    items.get_mut(index).ok_or_else(|| {
        ClientError::invalid_argument(format!("array index {index} out of bounds (len {len})"))
    })
}
