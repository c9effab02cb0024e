//! Driven port for the identity service.
//!
//! The identity service owns user records and their consent lists. The
//! enrolment sequencer only needs [`IdentityService::create_user`]; the other
//! operations back the user-administration commands.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{ConsentChange, NewUser, UserId, UserRecord, UserUpdate};

define_port_error! {
    /// Errors surfaced while calling the identity service.
    pub enum IdentityServiceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "identity service transport failed: {message}",
        /// The call exceeded the client timeout.
        Timeout { message: String } =>
            "identity service timeout: {message}",
        /// The service answered with a non-success HTTP status.
        Status { status: u16, message: String } =>
            "identity service returned status {status}: {message}",
        /// The service answered with a GraphQL `errors` array.
        Rejected { message: String } =>
            "identity service rejected the operation: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "identity service response decode failed: {message}",
    }
}

/// Port for user creation and administration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Create a user and return the stored record with its assigned id.
    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, IdentityServiceError>;

    /// Apply a partial update; returns the id of the updated user.
    async fn update_user(&self, update: &UserUpdate) -> Result<UserId, IdentityServiceError>;

    /// Delete a user; returns the id of the deleted user.
    async fn delete_user(&self, id: &UserId) -> Result<UserId, IdentityServiceError>;

    /// Grant or revoke consents; returns the id of the affected user.
    async fn change_consents(
        &self,
        change: &ConsentChange,
    ) -> Result<UserId, IdentityServiceError>;
}

/// Fixture implementation that echoes requests back with a fixed id.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureIdentityService;

/// Id assigned by [`FixtureIdentityService`].
pub const FIXTURE_USER_ID: &str = "fixture-user";

#[async_trait]
impl IdentityService for FixtureIdentityService {
    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, IdentityServiceError> {
        let id = UserId::new(FIXTURE_USER_ID)
            .map_err(|error| IdentityServiceError::decode(error.to_string()))?;
        Ok(UserRecord {
            id,
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            email: user.email().to_owned(),
            date_of_birth: Some(user.date_of_birth()),
        })
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<UserId, IdentityServiceError> {
        Ok(update.id().clone())
    }

    async fn delete_user(&self, id: &UserId) -> Result<UserId, IdentityServiceError> {
        Ok(id.clone())
    }

    async fn change_consents(
        &self,
        change: &ConsentChange,
    ) -> Result<UserId, IdentityServiceError> {
        Ok(change.user_id().clone())
    }
}
