//! Identity service adapter.
//!
//! Users and consents live on the same GraphQL endpoint, so one adapter
//! serves both the identity and consent-query ports.

use async_trait::async_trait;
use reqwest::Url;
use serde_json::json;

use super::documents;
use super::dto::{
    ConsentDto, ConsentsDataDto, CreateUserVariables, MutationDataDto, UpdateUserVariables,
    UserDto, UserIdDto, UserIdVariables, UserPayloadDto,
};
use super::transport::{GraphQlClientOptions, GraphQlFailure, GraphQlTransport, take_field};
use crate::domain::ports::{ConsentQuery, ConsentQueryError, IdentityService, IdentityServiceError};
use crate::domain::{Consent, ConsentChange, ConsentTarget, NewUser, UserId, UserRecord, UserUpdate};

/// GraphQL client for the identity service.
pub struct GraphQlIdentityService {
    transport: GraphQlTransport,
}

impl GraphQlIdentityService {
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

    async fn user_id_mutation<V>(
        &self,
        field: &'static str,
        document: &str,
        variables: &V,
    ) -> Result<UserId, GraphQlFailure>
    where
        V: serde::Serialize + Sync,
    {
        let mut data: MutationDataDto<UserPayloadDto<UserIdDto>> =
            self.transport.execute(field, document, variables).await?;
        let user = take_field(&mut data, field)?
            .user
            .ok_or_else(|| GraphQlFailure::Decode(format!("`{field}` returned no user")))?;
        user.into_domain().map_err(GraphQlFailure::Decode)
    }
}

#[async_trait]
impl IdentityService for GraphQlIdentityService {
    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, IdentityServiceError> {
        let variables = CreateUserVariables {
            email: user.email(),
            first_name: user.first_name(),
            last_name: user.last_name(),
            date_of_birth: user.date_of_birth().as_millis().to_string(),
        };
        let mut data: MutationDataDto<UserPayloadDto<UserDto>> = self
            .transport
            .execute("createUser", documents::CREATE_USER, &variables)
            .await?;
        let created = take_field(&mut data, "createUser")?
            .user
            .ok_or_else(|| IdentityServiceError::decode("`createUser` returned no user"))?;
        created.into_domain().map_err(IdentityServiceError::decode)
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<UserId, IdentityServiceError> {
        let variables = UpdateUserVariables {
            id: update.id().as_ref(),
            email: update.email(),
            first_name: update.first_name(),
            last_name: update.last_name(),
        };
        Ok(self
            .user_id_mutation("updateUser", documents::UPDATE_USER, &variables)
            .await?)
    }

    async fn delete_user(&self, id: &UserId) -> Result<UserId, IdentityServiceError> {
        let variables = UserIdVariables { id: id.as_ref() };
        Ok(self
            .user_id_mutation("deleteUser", documents::DELETE_USER, &variables)
            .await?)
    }

    async fn change_consents(
        &self,
        change: &ConsentChange,
    ) -> Result<UserId, IdentityServiceError> {
        let field = documents::consent_change_field(change.action(), change.target());
        let document = documents::consent_change(change.action(), change.target());
        let consent_ids = match change.target() {
            ConsentTarget::Organisations(ids) => json!(ids),
            ConsentTarget::Purposes(ids) | ConsentTarget::Hpos(ids) => json!(ids),
        };
        let variables = json!({
            "userId": change.user_id().as_ref(),
            "consentIds": consent_ids,
        });
        Ok(self.user_id_mutation(field, &document, &variables).await?)
    }
}

#[async_trait]
impl ConsentQuery for GraphQlIdentityService {
    async fn list_consents(&self) -> Result<Vec<Consent>, ConsentQueryError> {
        let data: ConsentsDataDto = self
            .transport
            .execute("consents", documents::CONSENTS, &json!({}))
            .await?;
        let consents = data
            .consents
            .ok_or_else(|| ConsentQueryError::decode("response is missing `consents`"))?;
        Ok(consents.into_iter().map(ConsentDto::into_domain).collect())
    }
}
