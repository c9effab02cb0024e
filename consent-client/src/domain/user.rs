//! User and sample-mapping data model.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime};

/// Validation errors returned by the user model constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    EmptyFirstName,
    EmptyLastName,
    EmptyEmail,
    EmptySampleId,
    InvalidDateOfBirth,
    EmptyUpdate,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::EmptyLastName => write!(f, "last name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptySampleId => write!(f, "sample id must not be empty"),
            Self::InvalidDateOfBirth => {
                write!(f, "date of birth must be epoch milliseconds or a YYYY-MM-DD date")
            }
            Self::EmptyUpdate => write!(f, "an update must change at least one field"),
        }
    }
}

impl std::error::Error for UserValidationError {}

fn require(value: String, error: UserValidationError) -> Result<String, UserValidationError> {
    if value.trim().is_empty() {
        Err(error)
    } else {
        Ok(value)
    }
}

/// Server-assigned user identifier.
///
/// The identity backend owns the format; the client only requires it to be
/// non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        require(id.into(), UserValidationError::EmptyId).map(Self)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// User-supplied identifier of a genomic sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleId(String);

impl SampleId {
    /// Validate and construct a [`SampleId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        require(id.into(), UserValidationError::EmptySampleId).map(Self)
    }
}

impl AsRef<str> for SampleId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Date of birth as milliseconds since the Unix epoch.
///
/// Calendar dates map to UTC midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateOfBirth(i64);

impl DateOfBirth {
    /// Wrap a raw epoch-millisecond value.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Convert a calendar date to UTC midnight.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
    }

    /// Parse either an integer millisecond value or a `YYYY-MM-DD` date.
    ///
    /// ```
    /// use consent_client::domain::DateOfBirth;
    ///
    /// let from_text = DateOfBirth::parse("1970-01-02").expect("date parses");
    /// assert_eq!(from_text, DateOfBirth::from_millis(86_400_000));
    /// assert_eq!(DateOfBirth::parse("86400000"), Ok(from_text));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if let Ok(millis) = trimmed.parse::<i64>() {
            return Ok(Self(millis));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| UserValidationError::InvalidDateOfBirth)
    }

    /// Milliseconds since the Unix epoch.
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Calendar date in UTC, when the value is within chrono's range.
    pub fn to_date(self) -> Option<NaiveDate> {
        DateTime::from_timestamp_millis(self.0).map(|instant| instant.date_naive())
    }
}

impl fmt::Display for DateOfBirth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_date() {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// Creation payload for a user record.
///
/// ## Invariants
/// - names and email are non-blank; values are kept exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    first_name: String,
    last_name: String,
    email: String,
    date_of_birth: DateOfBirth,
}

impl NewUser {
    /// Validate and construct a creation payload.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        date_of_birth: DateOfBirth,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            first_name: require(first_name.into(), UserValidationError::EmptyFirstName)?,
            last_name: require(last_name.into(), UserValidationError::EmptyLastName)?,
            email: require(email.into(), UserValidationError::EmptyEmail)?,
            date_of_birth,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub const fn date_of_birth(&self) -> DateOfBirth {
        self.date_of_birth
    }
}

/// User record as returned by the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Absent when the service returns a null date.
    pub date_of_birth: Option<DateOfBirth>,
}

/// Association between a user and a genomic sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMapping {
    pub user_id: UserId,
    pub genome_id: String,
}

/// Partial update of an existing user. Unset fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    id: UserId,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

impl UserUpdate {
    /// Build an update; blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyUpdate`] when no field would change.
    pub fn new(
        id: UserId,
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<Self, UserValidationError> {
        let keep = |value: Option<String>| value.filter(|text| !text.trim().is_empty());
        let update = Self {
            id,
            email: keep(email),
            first_name: keep(first_name),
            last_name: keep(last_name),
        };
        if update.email.is_none() && update.first_name.is_none() && update.last_name.is_none() {
            return Err(UserValidationError::EmptyUpdate);
        }
        Ok(update)
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }
}
