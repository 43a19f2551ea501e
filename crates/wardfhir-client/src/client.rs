use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::bundle::{Bundle, GroupedResources};
use crate::config::FhirClientConfig;
use crate::error::{ClientError, Result};
use crate::params::SearchParams;

/// Reaction to an authentication failure (HTTP 401) on any request.
///
/// Implementations must clear the token via the supplied config handle and
/// signal the host application to re-authenticate. The failed request's
/// error still propagates to the original caller afterwards — handlers never
/// swallow it.
pub trait AuthFailureHandler: Send + Sync {
    fn on_auth_failure(&self, config: &FhirClientConfig);
}

/// Handler that clears the stored token and nothing else; navigating to a
/// re-authentication flow is left to the host application.
pub struct ClearTokenOnUnauthorized;

impl AuthFailureHandler for ClearTokenOnUnauthorized {
    fn on_auth_failure(&self, config: &FhirClientConfig) {
        tracing::warn!("authentication failure, clearing stored token");
        config.clear_auth_token();
    }
}

/// Uniform CRUD surface over one resource type.
///
/// Every per-resource accessor is a thin instantiation of this client;
/// request construction, header attachment, and response shaping live here
/// once. Headers are read from the shared config at call time, so a token
/// refresh between calls is picked up automatically. Failed requests are
/// never retried; errors propagate to the caller as-is.
pub struct ResourceClient {
    http: reqwest::Client,
    config: Arc<FhirClientConfig>,
    resource_type: String,
    on_auth_failure: Option<Arc<dyn AuthFailureHandler>>,
}

impl ResourceClient {
    pub fn new(config: Arc<FhirClientConfig>, resource_type: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            resource_type: resource_type.into(),
            on_auth_failure: None,
        }
    }

    pub fn with_auth_failure_handler(mut self, handler: Arc<dyn AuthFailureHandler>) -> Self {
        self.on_auth_failure = Some(handler);
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Raw search: GET the collection with the given query parameters.
    pub async fn search(&self, params: &SearchParams) -> Result<Bundle> {
        let request = self
            .request(Method::GET, &self.collection_url())
            .query(params.pairs());
        let body = self.execute(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Search and flatten the response bundle into a resource list.
    pub async fn list(&self, params: &SearchParams) -> Result<Vec<Value>> {
        Ok(self.search(params).await?.into_resources())
    }

    /// Search and group the response bundle by resource type and id.
    pub async fn list_grouped(&self, params: &SearchParams) -> Result<GroupedResources> {
        self.search(params).await?.into_grouped()
    }

    /// GET `{base_url}[{resource_type}/]{id}`.
    pub async fn get_by_id(&self, id: &str, include_type_prefix: bool) -> Result<Value> {
        let url = if include_type_prefix {
            self.instance_url(id)
        } else {
            format!("{}{id}", self.config.backend_url())
        };
        self.execute(self.request(Method::GET, &url)).await
    }

    /// POST the resource to the collection.
    ///
    /// Stamps `resourceType` into the caller's resource first, overwriting
    /// any caller-supplied value — the input object is mutated in place and
    /// stays stamped after the call returns.
    pub async fn create(&self, resource: &mut Value) -> Result<Value> {
        self.stamp_resource_type(resource)?;
        let request = self
            .request(Method::POST, &self.collection_url())
            .json(resource);
        self.execute(request).await
    }

    /// PUT the resource to its instance URL, derived from `resource.id`.
    ///
    /// Stamps `resourceType` like [`create`](Self::create).
    pub async fn update(&self, resource: &mut Value) -> Result<Value> {
        let id = resource
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ClientError::invalid_argument("update requires the resource to carry an id")
            })?
            .to_string();
        self.stamp_resource_type(resource)?;
        let request = self.request(Method::PUT, &self.instance_url(&id)).json(resource);
        self.execute(request).await
    }

    /// DELETE `{base_url}{resource_type}/{id}`.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.execute(self.request(Method::DELETE, &self.instance_url(id)))
            .await?;
        Ok(())
    }

    fn collection_url(&self) -> String {
        // Direct concatenation — the base URL carries its own trailing slash.
        format!("{}{}", self.config.backend_url(), self.resource_type)
    }

    fn instance_url(&self, id: &str) -> String {
        format!("{}/{id}", self.collection_url())
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.http.request(method, url);
        for (name, value) in self.config.headers() {
            request = request.header(&name, &value);
        }
        request
    }

    fn stamp_resource_type(&self, resource: &mut Value) -> Result<()> {
        match resource.as_object_mut() {
            Some(object) => {
                object.insert(
                    "resourceType".to_string(),
                    Value::String(self.resource_type.clone()),
                );
                Ok(())
            }
            None => Err(ClientError::invalid_argument(
                "resource must be a JSON object",
            )),
        }
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED
                && let Some(handler) = &self.on_auth_failure
            {
                handler.on_auth_failure(&self.config);
            }
            return Err(ClientError::http(status.as_u16(), body));
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TokenStore;
    use serde_json::json;

    fn test_client(resource_type: &str) -> ResourceClient {
        let config = FhirClientConfig::builder("https://fhir.example.org/")
            .credentials("user", "key")
            .token_store(TokenStore::in_memory())
            .build()
            .unwrap();
        ResourceClient::new(Arc::new(config), resource_type)
    }

    #[test]
    fn test_url_building() {
        let client = test_client("Encounter");
        assert_eq!(
            client.collection_url(),
            "https://fhir.example.org/Encounter"
        );
        assert_eq!(
            client.instance_url("enc-1"),
            "https://fhir.example.org/Encounter/enc-1"
        );
    }

    #[test]
    fn test_stamp_overwrites_caller_value() {
        let client = test_client("Encounter");
        let mut resource = json!({"resourceType": "Patient", "status": "arrived"});
        client.stamp_resource_type(&mut resource).unwrap();
        assert_eq!(resource["resourceType"], "Encounter");
        assert_eq!(resource["status"], "arrived");
    }

    #[test]
    fn test_stamp_rejects_non_object() {
        let client = test_client("Encounter");
        let err = client.stamp_resource_type(&mut json!([])).unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_update_without_id() {
        let client = test_client("Order");
        let err = client.update(&mut json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
    }
}
