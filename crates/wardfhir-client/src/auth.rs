use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// API credentials used for Basic auth when no bearer token is present.
///
/// Immutable once supplied at configuration time; there is no runtime
/// rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub api_user: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(api_user: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_user: api_user.into(),
            api_key: api_key.into(),
        }
    }

    fn basic_value(&self) -> String {
        let material = format!("{}:{}", self.api_user, self.api_key);
        format!("Basic {}", STANDARD.encode(material))
    }
}

/// Compute the Authorization header value for the current identity state.
///
/// A non-empty bearer token always wins; otherwise credentials fall back to
/// Basic auth. Fails when neither is available.
pub fn authorization_value(
    credentials: Option<&Credentials>,
    token: Option<&str>,
) -> Result<String> {
    if let Some(token) = token
        && !token.is_empty()
    {
        return Ok(format!("Bearer {token}"));
    }
    match credentials {
        Some(credentials) => Ok(credentials.basic_value()),
        None => Err(ClientError::configuration(
            "no bearer token or API credentials available for the Authorization header",
        )),
    }
}
