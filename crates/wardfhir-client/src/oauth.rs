//! Token-endpoint helpers for completing an OAuth flow out of band.
//!
//! The flow itself is the host application's concern: it obtains an access
//! token (these helpers cover the password and client-credentials grants),
//! then calls [`FhirClientConfig::set_auth_token`] exactly once per
//! successful authorization.

use serde::Deserialize;

use crate::config::FhirClientConfig;
use crate::error::{ClientError, Result};

/// Token endpoint response for the supported grants.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Resource-owner password grant against `{base_url}auth/token`.
pub async fn password_grant(
    config: &FhirClientConfig,
    username: &str,
    password: &str,
) -> Result<TokenResponse> {
    let client_id = required_client_id(config)?;
    let body = format!(
        "grant_type=password&username={}&password={}&client_id={}",
        form_encode(username),
        form_encode(password),
        form_encode(client_id),
    );
    request_token(config, body).await
}

/// Client-credentials grant against `{base_url}auth/token`.
pub async fn client_credentials_grant(
    config: &FhirClientConfig,
    client_secret: &str,
) -> Result<TokenResponse> {
    let client_id = required_client_id(config)?;
    let body = format!(
        "grant_type=client_credentials&client_id={}&client_secret={}",
        form_encode(client_id),
        form_encode(client_secret),
    );
    request_token(config, body).await
}

fn required_client_id(config: &FhirClientConfig) -> Result<&str> {
    config
        .oauth_client_id()
        .ok_or_else(|| ClientError::configuration("OAuth client id is not configured"))
}

async fn request_token(config: &FhirClientConfig, body: String) -> Result<TokenResponse> {
    let url = format!("{}auth/token", config.backend_url());
    let response = reqwest::Client::new()
        .post(&url)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::http(status.as_u16(), text));
    }
    Ok(serde_json::from_str(&text)?)
}

fn form_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
