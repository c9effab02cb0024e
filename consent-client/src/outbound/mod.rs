//! Outbound adapters for the identity and mapping services.

pub mod graphql;
