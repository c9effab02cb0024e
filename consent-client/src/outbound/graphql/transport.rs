//! Reqwest-backed GraphQL transport shared by the service adapters.
//!
//! The transport owns request serialisation, timeout and HTTP error mapping,
//! and envelope decoding. Adapters own documents and domain mapping.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{GraphQlErrorsDto, GraphQlRequest, GraphQlResponseDto, join_messages};
use crate::domain::ports::{ConsentQueryError, IdentityServiceError, MappingServiceError};

/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "dynamic-consent-client/0.1";

/// HTTP settings applied to every request an adapter sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQlClientOptions {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// HTTP user-agent header value.
    pub user_agent: String,
}

impl Default for GraphQlClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// Transport-level failure, converted into each port's error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum GraphQlFailure {
    Transport(String),
    Timeout(String),
    Status { status: u16, message: String },
    Rejected(String),
    Decode(String),
}

macro_rules! impl_from_failure {
    ($($target:ty),* $(,)?) => {
        $(
            impl From<GraphQlFailure> for $target {
                fn from(failure: GraphQlFailure) -> Self {
                    match failure {
                        GraphQlFailure::Transport(message) => Self::transport(message),
                        GraphQlFailure::Timeout(message) => Self::timeout(message),
                        GraphQlFailure::Status { status, message } => Self::status(status, message),
                        GraphQlFailure::Rejected(message) => Self::rejected(message),
                        GraphQlFailure::Decode(message) => Self::decode(message),
                    }
                }
            }
        )*
    };
}

impl_from_failure!(IdentityServiceError, MappingServiceError, ConsentQueryError);

/// One GraphQL endpoint reached over a long-lived HTTP client.
pub(super) struct GraphQlTransport {
    client: Client,
    endpoint: Url,
    user_agent: String,
}

impl GraphQlTransport {
    pub(super) fn new(
        endpoint: Url,
        options: &GraphQlClientOptions,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            user_agent: options.user_agent.clone(),
        })
    }

    /// POST `{ query, variables }` and decode the `data` member.
    pub(super) async fn execute<V, D>(
        &self,
        operation: &'static str,
        query: &str,
        variables: &V,
    ) -> Result<D, GraphQlFailure>
    where
        V: Serialize + Sync,
        D: DeserializeOwned + Send,
    {
        debug!(operation, endpoint = %self.endpoint, "sending GraphQL request");
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let failure = map_status_error(status, body.as_ref());
            debug!(operation, status = status.as_u16(), "GraphQL request failed");
            return Err(failure);
        }
        decode_response(body.as_ref())
    }
}

fn decode_response<D: DeserializeOwned>(body: &[u8]) -> Result<D, GraphQlFailure> {
    let decoded: GraphQlResponseDto<D> = serde_json::from_slice(body).map_err(|error| {
        GraphQlFailure::Decode(format!("invalid GraphQL JSON payload: {error}"))
    })?;
    if !decoded.errors.is_empty() {
        return Err(GraphQlFailure::Rejected(join_messages(&decoded.errors)));
    }
    decoded
        .data
        .ok_or_else(|| GraphQlFailure::Decode("response carried no data".to_owned()))
}

/// Remove one mutation field from `data`, rejecting `null` and absence alike.
pub(super) fn take_field<P>(
    data: &mut std::collections::BTreeMap<String, Option<P>>,
    field: &str,
) -> Result<P, GraphQlFailure> {
    data.remove(field)
        .flatten()
        .ok_or_else(|| GraphQlFailure::Decode(format!("response is missing `{field}`")))
}

fn map_transport_error(error: reqwest::Error) -> GraphQlFailure {
    if error.is_timeout() {
        GraphQlFailure::Timeout(error.to_string())
    } else {
        GraphQlFailure::Transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GraphQlFailure {
    if let Ok(decoded) = serde_json::from_slice::<GraphQlErrorsDto>(body) {
        if !decoded.errors.is_empty() {
            return GraphQlFailure::Rejected(join_messages(&decoded.errors));
        }
    }

    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        body_preview
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GraphQlFailure::Timeout(message)
        }
        _ => GraphQlFailure::Status {
            status: status.as_u16(),
            message,
        },
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
