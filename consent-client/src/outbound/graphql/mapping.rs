//! Mapping service adapter.

use async_trait::async_trait;
use reqwest::Url;

use super::documents;
use super::dto::{CreateMappingVariables, MappingPayloadDto, MutationDataDto};
use super::transport::{GraphQlClientOptions, GraphQlTransport, take_field};
use crate::domain::ports::{MappingService, MappingServiceError};
use crate::domain::{SampleId, SampleMapping, UserId};

/// GraphQL client for the sample-mapping service.
pub struct GraphQlMappingService {
    transport: GraphQlTransport,
}

impl GraphQlMappingService {
    /// Build an adapter with its own long-lived HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, options: &GraphQlClientOptions) -> Result<Self, reqwest::Error> {
        Ok(Self {
            transport: GraphQlTransport::new(endpoint, options)?,
        })
    }
}

#[async_trait]
impl MappingService for GraphQlMappingService {
    async fn create_mapping(
        &self,
        user_id: &UserId,
        sample_id: &SampleId,
    ) -> Result<SampleMapping, MappingServiceError> {
        let variables = CreateMappingVariables {
            user_id: user_id.as_ref(),
            sample_id: sample_id.as_ref(),
        };
        let mut data: MutationDataDto<MappingPayloadDto> = self
            .transport
            .execute("createMapping", documents::CREATE_MAPPING, &variables)
            .await?;
        let mapping = take_field(&mut data, "createMapping")?
            .mapping
            .ok_or_else(|| MappingServiceError::decode("`createMapping` returned no mapping"))?;
        mapping.into_domain().map_err(MappingServiceError::decode)
    }
}
