//! GraphQL-over-HTTP adapters.
//!
//! Each adapter holds one long-lived reqwest client bound to one endpoint and
//! sends `{ query, variables }` JSON bodies.

pub mod documents;
mod dto;
mod identity;
mod mapping;
mod transport;

pub use identity::GraphQlIdentityService;
pub use mapping::GraphQlMappingService;
pub use transport::{DEFAULT_USER_AGENT, GraphQlClientOptions};
