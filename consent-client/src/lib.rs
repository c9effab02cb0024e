//! Client for the dynamic consent services.
//!
//! Enrols users (identity service) and maps their genomic samples (mapping
//! service), administers user consents, and lists consent records.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;
