//! Domain model and services of the consent client.
//!
//! Purpose: hold the enrolment form, the user and consent records, and the
//! services that coordinate the identity and mapping backends. Transport
//! lives behind the traits in [`ports`].
//!
//! Public surface:
//! - `EnrolmentForm` and `EnrolmentSequencer`: the create-user-then-map flow.
//! - `ConsentCatalogue`: read-only consent listing.
//! - `UserUpdate` and `ConsentChange`: validated administration requests.

mod consent;
mod consent_catalogue;
mod enrolment;
pub mod ports;
mod sequencer;
mod user;

pub use self::consent::{
    Consent, ConsentAction, ConsentChange, ConsentTarget, ConsentValidationError,
    render_consent_table,
};
pub use self::consent_catalogue::ConsentCatalogue;
pub use self::enrolment::{
    EnrolmentForm, FieldError, FormField, SubmissionStatus, ValidatedEnrolment,
};
pub use self::sequencer::{EnrolmentError, EnrolmentOutcome, EnrolmentSequencer, MappingOutcome};
pub use self::user::{
    DateOfBirth, NewUser, SampleId, SampleMapping, UserId, UserRecord, UserUpdate,
    UserValidationError,
};
