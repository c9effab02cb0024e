//! Driven port for the sample-mapping service.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{SampleId, SampleMapping, UserId};

define_port_error! {
    /// Errors surfaced while calling the mapping service.
    pub enum MappingServiceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "mapping service transport failed: {message}",
        /// The call exceeded the client timeout.
        Timeout { message: String } =>
            "mapping service timeout: {message}",
        /// The service answered with a non-success HTTP status.
        Status { status: u16, message: String } =>
            "mapping service returned status {status}: {message}",
        /// The service answered with a GraphQL `errors` array.
        Rejected { message: String } =>
            "mapping service rejected the operation: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "mapping service response decode failed: {message}",
    }
}

/// Port for associating a user with a genomic sample.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingService: Send + Sync {
    /// Record that `sample_id` belongs to `user_id`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use consent_client::domain::ports::{FixtureMappingService, MappingService};
    /// use consent_client::domain::{SampleId, UserId};
    ///
    /// let service = FixtureMappingService;
    /// let mapping = service
    ///     .create_mapping(&UserId::new("u-1")?, &SampleId::new("S-42")?)
    ///     .await?;
    /// assert_eq!(mapping.genome_id, "S-42");
    /// ```
    async fn create_mapping(
        &self,
        user_id: &UserId,
        sample_id: &SampleId,
    ) -> Result<SampleMapping, MappingServiceError>;
}

/// Fixture implementation that echoes the requested mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureMappingService;

#[async_trait]
impl MappingService for FixtureMappingService {
    async fn create_mapping(
        &self,
        user_id: &UserId,
        sample_id: &SampleId,
    ) -> Result<SampleMapping, MappingServiceError> {
        Ok(SampleMapping {
            user_id: user_id.clone(),
            genome_id: sample_id.to_string(),
        })
    }
}
