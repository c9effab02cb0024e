//! Two-step enrolment: create the user, then map the sample to it.
//!
//! The steps are not atomic. A user whose mapping fails is kept, and the
//! outcome reports it as [`MappingOutcome::Failed`] so callers can follow up.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::{
    IdentityService, IdentityServiceError, MappingService, MappingServiceError,
};
use crate::domain::{EnrolmentForm, FieldError, SampleMapping, SubmissionStatus, UserRecord};

/// Why an enrolment stopped before any user was created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrolmentError {
    /// Required fields are missing; no request was sent.
    #[error("enrolment form has {} missing field(s)", .errors.len())]
    Validation { errors: Vec<FieldError> },
    /// The identity service did not create the user.
    #[error("user creation failed: {0}")]
    Identity(#[from] IdentityServiceError),
}

/// Result of the mapping step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOutcome {
    Created(SampleMapping),
    Failed(MappingServiceError),
}

/// Result of an enrolment in which the user was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolmentOutcome {
    pub user: UserRecord,
    pub mapping: MappingOutcome,
}

impl EnrolmentOutcome {
    /// Whether the sample mapping was recorded too.
    pub const fn is_mapped(&self) -> bool {
        matches!(self.mapping, MappingOutcome::Created(_))
    }
}

/// Coordinates the identity and mapping services for one form submission.
#[derive(Clone)]
pub struct EnrolmentSequencer {
    identity: Arc<dyn IdentityService>,
    mapping: Arc<dyn MappingService>,
}

impl EnrolmentSequencer {
    /// Build a sequencer over long-lived service clients.
    pub fn new(identity: Arc<dyn IdentityService>, mapping: Arc<dyn MappingService>) -> Self {
        Self { identity, mapping }
    }

    /// Submit the form.
    ///
    /// The identity call gates everything else: on failure the form keeps its
    /// values and the mapping service is not called. On success the form is
    /// cleared before the mapping call, whatever that call returns.
    ///
    /// # Errors
    ///
    /// Returns [`EnrolmentError::Validation`] when required fields are missing
    /// and [`EnrolmentError::Identity`] when user creation fails.
    pub async fn submit(
        &self,
        form: &mut EnrolmentForm,
    ) -> Result<EnrolmentOutcome, EnrolmentError> {
        let enrolment = match form.validate() {
            Ok(enrolment) => enrolment,
            Err(errors) => {
                debug!(missing = errors.len(), "enrolment blocked by local validation");
                form.set_status(SubmissionStatus::Idle);
                return Err(EnrolmentError::Validation { errors });
            }
        };

        form.set_status(SubmissionStatus::Submitting);
        let user = match self.identity.create_user(&enrolment.user).await {
            Ok(user) => user,
            Err(error) => {
                warn!(%error, "user creation failed; sample mapping skipped");
                form.set_status(SubmissionStatus::Failed);
                return Err(error.into());
            }
        };
        info!(user_id = %user.id, "user created");
        form.reset();

        let mapping = match self
            .mapping
            .create_mapping(&user.id, &enrolment.sample_id)
            .await
        {
            Ok(mapping) => {
                info!(user_id = %user.id, "sample mapping created");
                form.set_status(SubmissionStatus::DoneWithMapping);
                MappingOutcome::Created(mapping)
            }
            Err(error) => {
                warn!(user_id = %user.id, %error, "sample mapping failed; user left unmapped");
                form.set_status(SubmissionStatus::DoneWithoutMapping);
                MappingOutcome::Failed(error)
            }
        };

        Ok(EnrolmentOutcome { user, mapping })
    }
}

#[cfg(test)]
#[path = "sequencer_tests.rs"]
mod tests;
