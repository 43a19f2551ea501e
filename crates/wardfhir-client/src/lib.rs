//! Client library for FHIR-style clinical data servers.
//!
//! The pieces every accessor shares live here once: a shared
//! [`FhirClientConfig`] owning the Authorization header lifecycle (bearer
//! token over Basic credentials, persisted across restarts via
//! [`TokenStore`]), a [`ResourceClient`] issuing CRUD/search requests for one
//! resource type, and bundle normalization into flat or grouped shapes.

pub mod auth;
pub mod bundle;
pub mod client;
pub mod config;
pub mod error;
pub mod oauth;
pub mod params;
pub mod reference;
pub mod store;
pub mod templates;

pub use auth::{Credentials, authorization_value};
pub use bundle::{Bundle, BundleEntry, GroupedResources};
pub use client::{AuthFailureHandler, ClearTokenOnUnauthorized, ResourceClient};
pub use config::{CONTENT_TYPE_FHIR_JSON, FhirClientConfig, FhirClientConfigBuilder};
pub use error::{ClientError, Result};
pub use oauth::TokenResponse;
pub use params::SearchParams;
pub use reference::{Reference, strip_type_prefix};
pub use store::TokenStore;
