//! Tests for the enrolment sequencer.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    FIXTURE_USER_ID, FixtureIdentityService, FixtureMappingService, MockIdentityService,
    MockMappingService,
};
use crate::domain::{DateOfBirth, FormField, UserId};

#[fixture]
fn ada_form() -> EnrolmentForm {
    let mut form = EnrolmentForm::new();
    form.set_first_name("Ada")
        .set_last_name("Lovelace")
        .set_email("ada@example.com")
        .set_date_of_birth(NaiveDate::from_ymd_opt(1815, 12, 10))
        .set_sample_id("S-42");
    form
}

fn created_user(id: &str) -> UserRecord {
    UserRecord {
        id: UserId::new(id).expect("valid id"),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        email: "ada@example.com".to_owned(),
        date_of_birth: Some(DateOfBirth::from_millis(-4_861_728_000_000)),
    }
}

fn sequencer(identity: MockIdentityService, mapping: MockMappingService) -> EnrolmentSequencer {
    EnrolmentSequencer::new(Arc::new(identity), Arc::new(mapping))
}

#[rstest]
#[tokio::test]
async fn maps_sample_to_the_created_user_and_clears_the_form(mut ada_form: EnrolmentForm) {
    let mut identity = MockIdentityService::new();
    identity
        .expect_create_user()
        .withf(|user| {
            user.first_name() == "Ada"
                && user.last_name() == "Lovelace"
                && user.email() == "ada@example.com"
                && user.date_of_birth().as_millis() == -4_861_728_000_000
        })
        .times(1)
        .returning(|_| Ok(created_user("u-1")));
    let mut mapping = MockMappingService::new();
    mapping
        .expect_create_mapping()
        .withf(|user_id, sample_id| user_id.as_ref() == "u-1" && sample_id.as_ref() == "S-42")
        .times(1)
        .returning(|user_id, sample_id| {
            Ok(SampleMapping {
                user_id: user_id.clone(),
                genome_id: sample_id.to_string(),
            })
        });

    let outcome = sequencer(identity, mapping)
        .submit(&mut ada_form)
        .await
        .expect("enrolment succeeds");

    assert_eq!(outcome.user.id.as_ref(), "u-1");
    assert_eq!(
        outcome.mapping,
        MappingOutcome::Created(SampleMapping {
            user_id: UserId::new("u-1").expect("valid id"),
            genome_id: "S-42".to_owned(),
        })
    );
    assert!(outcome.is_mapped());
    assert!(ada_form.is_empty());
    assert_eq!(ada_form.status(), SubmissionStatus::DoneWithMapping);
}

#[rstest]
#[case::first_name(FormField::FirstName)]
#[case::date_of_birth(FormField::DateOfBirth)]
#[case::sample_id(FormField::SampleId)]
#[tokio::test]
async fn incomplete_form_issues_no_requests(
    mut ada_form: EnrolmentForm,
    #[case] cleared: FormField,
) {
    match cleared {
        FormField::DateOfBirth => ada_form.set_date_of_birth(None),
        FormField::SampleId => ada_form.set_sample_id(""),
        _ => ada_form.set_first_name(""),
    };
    let mut identity = MockIdentityService::new();
    identity.expect_create_user().times(0);
    let mut mapping = MockMappingService::new();
    mapping.expect_create_mapping().times(0);

    let error = sequencer(identity, mapping)
        .submit(&mut ada_form)
        .await
        .expect_err("validation fails");

    assert_eq!(
        error,
        EnrolmentError::Validation {
            errors: vec![FieldError { field: cleared }],
        }
    );
    assert_eq!(ada_form.email(), "ada@example.com");
    assert_eq!(ada_form.status(), SubmissionStatus::Idle);
}

#[rstest]
#[case::transport(IdentityServiceError::transport("connection refused"))]
#[case::status(IdentityServiceError::status(502_u16, "bad gateway"))]
#[case::rejected(IdentityServiceError::rejected("email already registered"))]
#[tokio::test]
async fn identity_failure_skips_mapping_and_keeps_the_form(
    mut ada_form: EnrolmentForm,
    #[case] failure: IdentityServiceError,
) {
    let returned = failure.clone();
    let mut identity = MockIdentityService::new();
    identity
        .expect_create_user()
        .times(1)
        .return_once(move |_| Err(returned));
    let mut mapping = MockMappingService::new();
    mapping.expect_create_mapping().times(0);

    let error = sequencer(identity, mapping)
        .submit(&mut ada_form)
        .await
        .expect_err("identity fails");

    assert_eq!(error, EnrolmentError::Identity(failure));
    assert_eq!(ada_form.first_name(), "Ada");
    assert_eq!(ada_form.sample_id(), "S-42");
    assert!(ada_form.is_touched(FormField::Email));
    assert_eq!(ada_form.status(), SubmissionStatus::Failed);
}

#[rstest]
#[tokio::test]
async fn mapping_failure_still_clears_the_form_and_reports_the_orphan(
    mut ada_form: EnrolmentForm,
) {
    let mut identity = MockIdentityService::new();
    identity
        .expect_create_user()
        .times(1)
        .returning(|_| Ok(created_user("u-7")));
    let mut mapping = MockMappingService::new();
    mapping
        .expect_create_mapping()
        .times(1)
        .returning(|_, _| Err(MappingServiceError::timeout("deadline elapsed")));

    let outcome = sequencer(identity, mapping)
        .submit(&mut ada_form)
        .await
        .expect("user creation succeeded");

    assert_eq!(outcome.user.id.as_ref(), "u-7");
    assert_eq!(
        outcome.mapping,
        MappingOutcome::Failed(MappingServiceError::timeout("deadline elapsed"))
    );
    assert!(!outcome.is_mapped());
    assert!(ada_form.is_empty());
    assert_eq!(ada_form.status(), SubmissionStatus::DoneWithoutMapping);
}

#[rstest]
#[tokio::test]
async fn fixture_services_complete_an_enrolment(mut ada_form: EnrolmentForm) {
    let sequencer = EnrolmentSequencer::new(
        Arc::new(FixtureIdentityService),
        Arc::new(FixtureMappingService),
    );

    let outcome = sequencer
        .submit(&mut ada_form)
        .await
        .expect("fixtures succeed");

    assert_eq!(outcome.user.id.as_ref(), FIXTURE_USER_ID);
    assert!(outcome.is_mapped());
    assert!(ada_form.status().is_terminal());
}

#[rstest]
#[tokio::test]
async fn blocked_resubmission_after_enrolment_returns_to_idle(mut ada_form: EnrolmentForm) {
    let sequencer = EnrolmentSequencer::new(
        Arc::new(FixtureIdentityService),
        Arc::new(FixtureMappingService),
    );
    sequencer
        .submit(&mut ada_form)
        .await
        .expect("fixtures succeed");
    assert_eq!(ada_form.status(), SubmissionStatus::DoneWithMapping);

    let error = sequencer
        .submit(&mut ada_form)
        .await
        .expect_err("cleared form is incomplete");

    assert!(matches!(error, EnrolmentError::Validation { ref errors } if errors.len() == 5));
    assert_eq!(ada_form.status(), SubmissionStatus::Idle);
}

#[rstest]
#[tokio::test]
async fn blocked_retry_after_identity_failure_returns_to_idle(mut ada_form: EnrolmentForm) {
    let mut identity = MockIdentityService::new();
    identity
        .expect_create_user()
        .times(1)
        .returning(|_| Err(IdentityServiceError::transport("connection refused")));
    let mut mapping = MockMappingService::new();
    mapping.expect_create_mapping().times(0);
    let sequencer = sequencer(identity, mapping);

    sequencer
        .submit(&mut ada_form)
        .await
        .expect_err("identity fails");
    assert_eq!(ada_form.status(), SubmissionStatus::Failed);

    ada_form.set_email("");
    sequencer
        .submit(&mut ada_form)
        .await
        .expect_err("email is missing");

    assert_eq!(ada_form.first_name(), "Ada");
    assert_eq!(ada_form.status(), SubmissionStatus::Idle);
}
