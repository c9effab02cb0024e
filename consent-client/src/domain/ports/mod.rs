//! Domain ports for the services the client talks to.

mod macros;
pub(crate) use macros::define_port_error;

mod consent_query;
mod identity_service;
mod mapping_service;

#[cfg(test)]
pub use consent_query::MockConsentQuery;
pub use consent_query::{ConsentQuery, ConsentQueryError, FixtureConsentQuery};
#[cfg(test)]
pub use identity_service::MockIdentityService;
pub use identity_service::{
    FIXTURE_USER_ID, FixtureIdentityService, IdentityService, IdentityServiceError,
};
#[cfg(test)]
pub use mapping_service::MockMappingService;
pub use mapping_service::{FixtureMappingService, MappingService, MappingServiceError};
