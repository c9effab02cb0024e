//! Client configuration loaded via OrthoConfig.
//!
//! Endpoints are plain addresses such as `identity.local:8000/graphql`; an
//! address without a scheme is reached over `http://`.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::graphql::{DEFAULT_USER_AGENT, GraphQlClientOptions};

/// Errors raised while turning settings into service endpoints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A required endpoint is unset or blank.
    #[error("{key} is not configured")]
    MissingEndpoint { key: &'static str },
    /// An endpoint could not be parsed as a URL.
    #[error("{key} is not a valid address: {message}")]
    InvalidEndpoint { key: &'static str, message: String },
    /// The request timeout must be positive.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Connection settings for the identity and mapping services.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONSENT")]
pub struct ClientSettings {
    /// Address of the identity service (users and consents).
    pub identity_ip: Option<String>,
    /// Address of the GeneTrustee mapping service.
    pub genetrustee_ip: Option<String>,
    /// Whole-request timeout in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// HTTP user-agent sent to both services.
    pub user_agent: Option<String>,
}

impl ClientSettings {
    /// Resolve the identity service endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the address is missing or malformed.
    pub fn identity_endpoint(&self) -> Result<Url, SettingsError> {
        resolve_endpoint("CONSENT_IDENTITY_IP", self.identity_ip.as_deref())
    }

    /// Resolve the mapping service endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the address is missing or malformed.
    pub fn mapping_endpoint(&self) -> Result<Url, SettingsError> {
        resolve_endpoint("CONSENT_GENETRUSTEE_IP", self.genetrustee_ip.as_deref())
    }

    /// HTTP options shared by both adapters.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] for a zero timeout.
    pub fn client_options(&self) -> Result<GraphQlClientOptions, SettingsError> {
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(GraphQlClientOptions {
            timeout: Duration::from_secs(self.request_timeout_secs),
            user_agent: self
                .user_agent
                .clone()
                .filter(|agent| !agent.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
        })
    }
}

/// Turn a configured address into a URL, defaulting the scheme to `http`.
///
/// ```
/// use consent_client::config::resolve_endpoint;
///
/// let url = resolve_endpoint("CONSENT_IDENTITY_IP", Some("localhost:8000/graphql"))
///     .expect("address resolves");
/// assert_eq!(url.as_str(), "http://localhost:8000/graphql");
/// ```
///
/// # Errors
///
/// Returns [`SettingsError`] when the address is missing or malformed.
pub fn resolve_endpoint(key: &'static str, address: Option<&str>) -> Result<Url, SettingsError> {
    let trimmed = address
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(SettingsError::MissingEndpoint { key })?;
    let candidate = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    };
    Url::parse(&candidate).map_err(|error| SettingsError::InvalidEndpoint {
        key,
        message: error.to_string(),
    })
}
