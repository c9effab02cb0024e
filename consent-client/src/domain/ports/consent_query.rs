//! Driven port for reading consent records.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::Consent;

define_port_error! {
    /// Errors surfaced while reading consents.
    pub enum ConsentQueryError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "consent query transport failed: {message}",
        /// The call exceeded the client timeout.
        Timeout { message: String } =>
            "consent query timeout: {message}",
        /// The service answered with a non-success HTTP status.
        Status { status: u16, message: String } =>
            "consent query returned status {status}: {message}",
        /// The service answered with a GraphQL `errors` array.
        Rejected { message: String } =>
            "consent query rejected: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "consent query response decode failed: {message}",
    }
}

/// Port for listing consent records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConsentQuery: Send + Sync {
    /// Return every consent in service order.
    async fn list_consents(&self) -> Result<Vec<Consent>, ConsentQueryError>;
}

/// Fixture implementation returning no consents.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureConsentQuery;

#[async_trait]
impl ConsentQuery for FixtureConsentQuery {
    async fn list_consents(&self) -> Result<Vec<Consent>, ConsentQueryError> {
        Ok(Vec::new())
    }
}
