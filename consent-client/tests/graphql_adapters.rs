//! Adapter tests against mock GraphQL servers.

use httpmock::prelude::*;
use reqwest::Url;
use rstest::rstest;
use serde_json::json;

use consent_client::domain::ports::{
    ConsentQuery, ConsentQueryError, IdentityService, IdentityServiceError, MappingService,
    MappingServiceError,
};
use consent_client::domain::{
    ConsentAction, ConsentChange, ConsentTarget, DateOfBirth, NewUser, SampleId, UserId,
    UserUpdate,
};
use consent_client::outbound::graphql::{
    GraphQlClientOptions, GraphQlIdentityService, GraphQlMappingService, documents,
};

fn endpoint(server: &MockServer) -> Url {
    Url::parse(&server.url("/graphql")).expect("mock server url")
}

fn identity(server: &MockServer) -> GraphQlIdentityService {
    GraphQlIdentityService::new(endpoint(server), &GraphQlClientOptions::default())
        .expect("client builds")
}

fn mapping(server: &MockServer) -> GraphQlMappingService {
    GraphQlMappingService::new(endpoint(server), &GraphQlClientOptions::default())
        .expect("client builds")
}

fn ada(first_name: &str) -> NewUser {
    NewUser::new(
        first_name,
        "Lovelace",
        "ada@example.com",
        DateOfBirth::from_millis(-4_861_728_000_000),
    )
    .expect("valid user")
}

#[tokio::test]
async fn create_user_sends_bound_variables_and_decodes_the_record() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/graphql")
            .header("content-type", "application/json")
            .json_body(json!({
                "query": documents::CREATE_USER,
                "variables": {
                    "email": "ada@example.com",
                    "firstName": "Ada",
                    "lastName": "Lovelace",
                    "dateOfBirth": "-4861728000000",
                },
            }));
        then.status(200).json_body(json!({
            "data": {
                "createUser": {
                    "user": {
                        "id": "u-1",
                        "firstName": "Ada",
                        "lastName": "Lovelace",
                        "email": "ada@example.com",
                        "dateOfBirth": "1815-12-10",
                    }
                }
            }
        }));
    });

    let user = identity(&server)
        .create_user(&ada("Ada"))
        .await
        .expect("user is created");

    mock.assert();
    assert_eq!(user.id.as_ref(), "u-1");
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(
        user.date_of_birth,
        Some(DateOfBirth::from_millis(-4_861_728_000_000))
    );
}

#[tokio::test]
async fn create_user_passes_quote_laden_input_through_variables() {
    let hostile = r#"Ada", lastName: "x") { user { id } } deleteUser(id: "u-0"#;
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/graphql").json_body(json!({
            "query": documents::CREATE_USER,
            "variables": {
                "email": "ada@example.com",
                "firstName": hostile,
                "lastName": "Lovelace",
                "dateOfBirth": "-4861728000000",
            },
        }));
        then.status(200)
            .json_body(json!({ "data": { "createUser": { "user": { "id": "u-2" } } } }));
    });

    let user = identity(&server)
        .create_user(&ada(hostile))
        .await
        .expect("user is created");

    mock.assert();
    assert_eq!(user.id.as_ref(), "u-2");
    assert!(user.date_of_birth.is_none());
}

#[rstest]
#[case::graphql_errors(
    200,
    json!({ "data": { "createUser": null }, "errors": [{ "message": "duplicate email" }] }),
    IdentityServiceError::rejected("duplicate email")
)]
#[case::server_error(
    500,
    json!({ "detail": "boom" }),
    IdentityServiceError::status(500_u16, r#"{"detail":"boom"}"#)
)]
#[case::null_payload(
    200,
    json!({ "data": { "createUser": null } }),
    IdentityServiceError::decode("response is missing `createUser`")
)]
#[tokio::test]
async fn create_user_maps_failures(
    #[case] status: u16,
    #[case] body: serde_json::Value,
    #[case] expected: IdentityServiceError,
) {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/graphql");
        then.status(status).json_body(body);
    });

    let error = identity(&server)
        .create_user(&ada("Ada"))
        .await
        .expect_err("creation fails");
    assert_eq!(error, expected);
}

#[tokio::test]
async fn unreachable_identity_service_is_a_transport_error() {
    let endpoint = Url::parse("http://127.0.0.1:1/graphql").expect("url");
    let service = GraphQlIdentityService::new(endpoint, &GraphQlClientOptions::default())
        .expect("client builds");

    let error = service
        .create_user(&ada("Ada"))
        .await
        .expect_err("connection refused");
    assert!(matches!(error, IdentityServiceError::Transport { .. }));
}

#[tokio::test]
async fn create_mapping_posts_json_with_user_and_sample_ids() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/graphql")
            .header("content-type", "application/json")
            .json_body(json!({
                "query": documents::CREATE_MAPPING,
                "variables": { "userId": "u-1", "sampleId": "S-42" },
            }));
        then.status(200).json_body(json!({
            "data": { "createMapping": { "mapping": { "userId": "u-1", "genomeId": "S-42" } } }
        }));
    });

    let created = mapping(&server)
        .create_mapping(
            &UserId::new("u-1").expect("valid id"),
            &SampleId::new("S-42").expect("valid sample"),
        )
        .await
        .expect("mapping is created");

    mock.assert();
    assert_eq!(created.user_id.as_ref(), "u-1");
    assert_eq!(created.genome_id, "S-42");
}

#[tokio::test]
async fn create_mapping_reports_graphql_rejections() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/graphql");
        then.status(200)
            .json_body(json!({ "errors": [{ "message": "unknown sample" }] }));
    });

    let error = mapping(&server)
        .create_mapping(
            &UserId::new("u-1").expect("valid id"),
            &SampleId::new("S-404").expect("valid sample"),
        )
        .await
        .expect_err("mapping fails");
    assert_eq!(error, MappingServiceError::rejected("unknown sample"));
}

#[tokio::test]
async fn consents_are_listed_in_server_order() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/graphql").json_body(json!({
            "query": documents::CONSENTS,
            "variables": {},
        }));
        then.status(200).json_body(json!({
            "data": {
                "consents": [
                    {
                        "id": "2",
                        "name": "Pharma Co",
                        "purpose": "Drug discovery",
                        "commercial": true,
                    },
                    {
                        "id": "1",
                        "name": "Biobank",
                        "purpose": "Research",
                        "commercial": false,
                    },
                ]
            }
        }));
    });

    let consents = identity(&server)
        .list_consents()
        .await
        .expect("consents load");

    mock.assert();
    let names: Vec<&str> = consents.iter().map(|consent| consent.name.as_str()).collect();
    assert_eq!(names, ["Pharma Co", "Biobank"]);
    let commercial: Vec<bool> = consents.iter().map(|consent| consent.commercial).collect();
    assert_eq!(commercial, [true, false]);
}

#[tokio::test]
async fn consents_timeout_status_maps_to_timeout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/graphql");
        then.status(504);
    });

    let error = identity(&server)
        .list_consents()
        .await
        .expect_err("gateway timeout");
    assert_eq!(error, ConsentQueryError::timeout("status 504"));
}

#[tokio::test]
async fn update_user_omits_unchanged_fields() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/graphql").json_body(json!({
            "query": documents::UPDATE_USER,
            "variables": { "id": "u-1", "email": "ada@example.org" },
        }));
        then.status(200)
            .json_body(json!({ "data": { "updateUser": { "user": { "id": "u-1" } } } }));
    });
    let update = UserUpdate::new(
        UserId::new("u-1").expect("valid id"),
        Some("ada@example.org".to_owned()),
        None,
        None,
    )
    .expect("valid update");

    let updated = identity(&server)
        .update_user(&update)
        .await
        .expect("update succeeds");

    mock.assert();
    assert_eq!(updated.as_ref(), "u-1");
}

#[tokio::test]
async fn delete_user_returns_the_deleted_id() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/graphql").json_body(json!({
            "query": documents::DELETE_USER,
            "variables": { "id": "u-9" },
        }));
        then.status(200)
            .json_body(json!({ "data": { "deleteUser": { "user": { "id": "u-9" } } } }));
    });

    let deleted = identity(&server)
        .delete_user(&UserId::new("u-9").expect("valid id"))
        .await
        .expect("delete succeeds");

    mock.assert();
    assert_eq!(deleted.as_ref(), "u-9");
}

#[rstest]
#[case::grant_orgs(
    ConsentAction::Grant,
    ConsentTarget::Organisations(vec![3, 5]),
    "addConsentOrgs",
    json!([3, 5])
)]
#[case::revoke_hpos(
    ConsentAction::Revoke,
    ConsentTarget::Hpos(vec!["HP:0001250".to_owned()]),
    "revokeConsentHpos",
    json!(["HP:0001250"])
)]
#[tokio::test]
async fn consent_changes_use_the_matching_mutation(
    #[case] action: ConsentAction,
    #[case] target: ConsentTarget,
    #[case] field: &str,
    #[case] ids: serde_json::Value,
) {
    let document = documents::consent_change(action, &target);
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/graphql").json_body(json!({
            "query": document,
            "variables": { "userId": "u-1", "consentIds": ids },
        }));
        then.status(200)
            .json_body(json!({ "data": { field: { "user": { "id": "u-1" } } } }));
    });
    let change = ConsentChange::new(UserId::new("u-1").expect("valid id"), action, target)
        .expect("valid change");

    let user_id = identity(&server)
        .change_consents(&change)
        .await
        .expect("change succeeds");

    mock.assert();
    assert_eq!(user_id.as_ref(), "u-1");
}
