//! DTOs for GraphQL request envelopes and responses.
//!
//! Responses decode into these transport DTOs first, then map into domain
//! records in one pass. Fields the services may return as `null` are optional
//! here and checked during mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Consent, DateOfBirth, SampleMapping, UserId, UserRecord};

#[derive(Debug, Serialize)]
pub(super) struct GraphQlRequest<'a, V> {
    pub(super) query: &'a str,
    pub(super) variables: &'a V,
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQlResponseDto<D> {
    pub(super) data: Option<D>,
    #[serde(default)]
    pub(super) errors: Vec<GraphQlErrorDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQlErrorDto {
    pub(super) message: String,
}

/// Errors-only view used when a non-success status carries a GraphQL body.
#[derive(Debug, Deserialize)]
pub(super) struct GraphQlErrorsDto {
    #[serde(default)]
    pub(super) errors: Vec<GraphQlErrorDto>,
}

pub(super) fn join_messages(errors: &[GraphQlErrorDto]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// `data` of a mutation, keyed by mutation field name.
pub(super) type MutationDataDto<P> = BTreeMap<String, Option<P>>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateUserVariables<'a> {
    pub(super) email: &'a str,
    pub(super) first_name: &'a str,
    pub(super) last_name: &'a str,
    pub(super) date_of_birth: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateUserVariables<'a> {
    pub(super) id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) last_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct UserIdVariables<'a> {
    pub(super) id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateMappingVariables<'a> {
    pub(super) user_id: &'a str,
    pub(super) sample_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserPayloadDto<U> {
    pub(super) user: Option<U>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserIdDto {
    pub(super) id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserDto {
    pub(super) id: String,
    pub(super) first_name: Option<String>,
    pub(super) last_name: Option<String>,
    pub(super) email: Option<String>,
    pub(super) date_of_birth: Option<DateOfBirthDto>,
}

/// Dates come back as epoch milliseconds or as `YYYY-MM-DD` text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum DateOfBirthDto {
    Millis(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub(super) struct MappingPayloadDto {
    pub(super) mapping: Option<MappingDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MappingDto {
    pub(super) user_id: String,
    pub(super) genome_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ConsentsDataDto {
    pub(super) consents: Option<Vec<ConsentDto>>,
}

/// GraphQL `ID`s are usually strings but some servers emit integers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum IdDto {
    Text(String),
    Number(i64),
}

#[derive(Debug, Deserialize)]
pub(super) struct ConsentDto {
    pub(super) id: IdDto,
    pub(super) name: Option<String>,
    pub(super) purpose: Option<String>,
    pub(super) commercial: Option<bool>,
}

impl UserIdDto {
    pub(super) fn into_domain(self) -> Result<UserId, String> {
        UserId::new(self.id).map_err(|error| format!("user payload: {error}"))
    }
}

impl UserDto {
    pub(super) fn into_domain(self) -> Result<UserRecord, String> {
        let id = UserId::new(self.id).map_err(|error| format!("user payload: {error}"))?;
        let date_of_birth = self
            .date_of_birth
            .map(DateOfBirthDto::into_domain)
            .transpose()?;
        Ok(UserRecord {
            id,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            date_of_birth,
        })
    }
}

impl DateOfBirthDto {
    fn into_domain(self) -> Result<DateOfBirth, String> {
        match self {
            Self::Millis(millis) => Ok(DateOfBirth::from_millis(millis)),
            Self::Text(text) => DateOfBirth::parse(&text)
                .map_err(|error| format!("user payload dateOfBirth `{text}`: {error}")),
        }
    }
}

impl MappingDto {
    pub(super) fn into_domain(self) -> Result<SampleMapping, String> {
        let user_id =
            UserId::new(self.user_id).map_err(|error| format!("mapping payload: {error}"))?;
        Ok(SampleMapping {
            user_id,
            genome_id: self.genome_id,
        })
    }
}

impl ConsentDto {
    pub(super) fn into_domain(self) -> Consent {
        let id = match self.id {
            IdDto::Text(text) => text,
            IdDto::Number(number) => number.to_string(),
        };
        Consent {
            id,
            name: self.name.unwrap_or_default(),
            purpose: self.purpose.unwrap_or_default(),
            commercial: self.commercial.unwrap_or(false),
        }
    }
}
