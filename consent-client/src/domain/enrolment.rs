//! Enrolment form state.
//!
//! The form is owned by the caller. It holds raw field values, tracks which
//! fields were touched, and reports the required-field errors. The sequencer
//! drives its [`SubmissionStatus`] and clears it after a user is created.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;

use super::user::{DateOfBirth, NewUser, SampleId};

/// Fields of the enrolment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    DateOfBirth,
    SampleId,
}

impl FormField {
    /// All fields in display order.
    pub const ALL: [Self; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::DateOfBirth,
        Self::SampleId,
    ];

    /// Message shown when the field is left empty.
    pub const fn required_message(self) -> &'static str {
        match self {
            Self::FirstName => "First name is required",
            Self::LastName => "Last name is required",
            Self::Email => "Email is required",
            Self::DateOfBirth => "Date of birth is required",
            Self::SampleId => "Sample ID is required",
        }
    }
}

/// A required field that is missing or blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
}

impl FieldError {
    pub const fn message(&self) -> &'static str {
        self.field.required_message()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for FieldError {}

/// Lifecycle of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    /// User and sample mapping were both created.
    DoneWithMapping,
    /// User was created but the sample mapping failed.
    DoneWithoutMapping,
    /// User creation failed; nothing was created.
    Failed,
}

impl SubmissionStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::DoneWithMapping | Self::DoneWithoutMapping | Self::Failed
        )
    }
}

/// Field values that passed local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEnrolment {
    pub user: NewUser,
    pub sample_id: SampleId,
}

/// Transient enrolment form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrolmentForm {
    first_name: String,
    last_name: String,
    email: String,
    date_of_birth: Option<NaiveDate>,
    sample_id: String,
    touched: BTreeSet<FormField>,
    status: SubmissionStatus,
}

impl EnrolmentForm {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) -> &mut Self {
        self.first_name = value.into();
        self.touch(FormField::FirstName)
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) -> &mut Self {
        self.last_name = value.into();
        self.touch(FormField::LastName)
    }

    pub fn set_email(&mut self, value: impl Into<String>) -> &mut Self {
        self.email = value.into();
        self.touch(FormField::Email)
    }

    pub fn set_date_of_birth(&mut self, value: Option<NaiveDate>) -> &mut Self {
        self.date_of_birth = value;
        self.touch(FormField::DateOfBirth)
    }

    pub fn set_sample_id(&mut self, value: impl Into<String>) -> &mut Self {
        self.sample_id = value.into();
        self.touch(FormField::SampleId)
    }

    fn touch(&mut self, field: FormField) -> &mut Self {
        self.touched.insert(field);
        self
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

    pub const fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }

    pub fn sample_id(&self) -> &str {
        &self.sample_id
    }

    pub const fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: SubmissionStatus) {
        self.status = status;
    }

    pub fn is_touched(&self, field: FormField) -> bool {
        self.touched.contains(&field)
    }

    /// Whether every field is empty.
    pub fn is_empty(&self) -> bool {
        FormField::ALL.into_iter().all(|field| self.is_missing(field))
    }

    fn is_missing(&self, field: FormField) -> bool {
        let blank = |value: &str| value.trim().is_empty();
        match field {
            FormField::FirstName => blank(&self.first_name),
            FormField::LastName => blank(&self.last_name),
            FormField::Email => blank(&self.email),
            FormField::DateOfBirth => self.date_of_birth.is_none(),
            FormField::SampleId => blank(&self.sample_id),
        }
    }

    /// Error to display next to a field; only touched fields report one.
    pub fn field_error(&self, field: FormField) -> Option<FieldError> {
        (self.is_touched(field) && self.is_missing(field)).then_some(FieldError { field })
    }

    /// All required-field errors, touched or not.
    pub fn errors(&self) -> Vec<FieldError> {
        FormField::ALL
            .into_iter()
            .filter(|field| self.is_missing(*field))
            .map(|field| FieldError { field })
            .collect()
    }

    /// Whether submission should be blocked.
    pub fn has_errors(&self) -> bool {
        FormField::ALL.into_iter().any(|field| self.is_missing(field))
    }

    /// Validate every field and produce the service payloads.
    ///
    /// # Errors
    ///
    /// Returns every missing field, in display order.
    pub fn validate(&self) -> Result<ValidatedEnrolment, Vec<FieldError>> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(errors);
        }
        let missing = |field| vec![FieldError { field }];
        let date_of_birth = self
            .date_of_birth
            .map(DateOfBirth::from_date)
            .ok_or_else(|| missing(FormField::DateOfBirth))?;
        let user = NewUser::new(
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            date_of_birth,
        )
        .map_err(|_| self.errors())?;
        let sample_id =
            SampleId::new(self.sample_id.as_str()).map_err(|_| missing(FormField::SampleId))?;
        Ok(ValidatedEnrolment { user, sample_id })
    }

    /// Clear values and touched flags, keeping the submission status.
    pub fn reset(&mut self) {
        let status = self.status;
        *self = Self {
            status,
            ..Self::default()
        };
    }
}
