use std::fmt;

use crate::error::{ClientError, Result};

/// A relationship pointer of the form `"ResourceType/id"`.
///
/// Pure identifier; carries no ownership semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub resource_type: String,
    pub id: String,
}

impl Reference {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Parse a relative reference string.
    pub fn parse(reference: &str) -> Result<Self> {
        let Some((resource_type, id)) = reference.split_once('/') else {
            return Err(ClientError::invalid_argument(format!(
                "invalid reference \"{reference}\", expected ResourceType/id"
            )));
        };
        if resource_type.is_empty() || id.is_empty() {
            return Err(ClientError::invalid_argument(format!(
                "invalid reference \"{reference}\", expected ResourceType/id"
            )));
        }
        Ok(Self::new(resource_type, id))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.id)
    }
}

/// Extract the id part from an input that may or may not carry a type prefix.
///
/// `strip_type_prefix("Device/dev-1", "Device")` and
/// `strip_type_prefix("dev-1", "Device")` both yield `"dev-1"`.
pub fn strip_type_prefix<'a>(value: &'a str, resource_type: &str) -> &'a str {
    value
        .strip_prefix(resource_type)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(value)
}
