//! GraphQL documents sent by the adapters.
//!
//! Every user-supplied value travels in `variables`; documents never embed
//! request data.

use crate::domain::{ConsentAction, ConsentTarget};

/// Create a user on the identity service.
///
/// `dateOfBirth` is epoch milliseconds rendered as a decimal string.
pub const CREATE_USER: &str = "mutation CreateUser($email: String, $firstName: String, \
$lastName: String, $dateOfBirth: String) { createUser(email: $email, firstName: $firstName, \
lastName: $lastName, dateOfBirth: $dateOfBirth) { user { id firstName lastName email \
dateOfBirth } } }";

/// Apply a partial user update on the identity service.
pub const UPDATE_USER: &str = "mutation UpdateUser($id: String!, $email: String, \
$firstName: String, $lastName: String) { updateUser(id: $id, email: $email, \
firstName: $firstName, lastName: $lastName) { user { id } } }";

/// Delete a user on the identity service.
pub const DELETE_USER: &str =
    "mutation DeleteUser($id: String!) { deleteUser(id: $id) { user { id } } }";

/// Map a sample to a user on the mapping service.
pub const CREATE_MAPPING: &str = "mutation addMapping($userId: String!, $sampleId: String!) \
{ createMapping(userId: $userId, genomeId: $sampleId) { mapping { userId genomeId } } }";

/// List consents on the identity service.
pub const CONSENTS: &str = "query Consents { consents { id name purpose commercial } }";

/// Mutation field that applies `action` to `target`.
pub const fn consent_change_field(action: ConsentAction, target: &ConsentTarget) -> &'static str {
    match (action, target) {
        (ConsentAction::Grant, ConsentTarget::Organisations(_)) => "addConsentOrgs",
        (ConsentAction::Revoke, ConsentTarget::Organisations(_)) => "revokeConsentOrgs",
        (ConsentAction::Grant, ConsentTarget::Purposes(_)) => "addConsentPurposes",
        (ConsentAction::Revoke, ConsentTarget::Purposes(_)) => "revokeConsentPurposes",
        (ConsentAction::Grant, ConsentTarget::Hpos(_)) => "addConsentHpos",
        (ConsentAction::Revoke, ConsentTarget::Hpos(_)) => "revokeConsentHpos",
    }
}

/// Document for a consent grant or revocation.
///
/// Organisation ids are GraphQL `Int`s; purpose and HPO ids are `String`s.
pub fn consent_change(action: ConsentAction, target: &ConsentTarget) -> String {
    let field = consent_change_field(action, target);
    let list_type = match target {
        ConsentTarget::Organisations(_) => "[Int]",
        ConsentTarget::Purposes(_) | ConsentTarget::Hpos(_) => "[String]",
    };
    format!(
        "mutation ChangeConsents($userId: String!, $consentIds: {list_type}) \
{{ {field}(userId: $userId, consentIds: $consentIds) {{ user {{ id }} }} }}"
    )
}

#[cfg(test)]
mod tests {
    //! Unit tests for document construction.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::grant_orgs(
        ConsentAction::Grant,
        ConsentTarget::Organisations(vec![1]),
        "addConsentOrgs",
        "[Int]"
    )]
    #[case::revoke_purposes(
        ConsentAction::Revoke,
        ConsentTarget::Purposes(vec!["p".to_owned()]),
        "revokeConsentPurposes",
        "[String]"
    )]
    #[case::grant_hpos(
        ConsentAction::Grant,
        ConsentTarget::Hpos(vec!["HP:1".to_owned()]),
        "addConsentHpos",
        "[String]"
    )]
    fn consent_change_selects_field_and_list_type(
        #[case] action: ConsentAction,
        #[case] target: ConsentTarget,
        #[case] field: &str,
        #[case] list_type: &str,
    ) {
        let document = consent_change(action, &target);
        assert!(document.contains(&format!("{field}(userId: $userId")));
        assert!(document.contains(&format!("$consentIds: {list_type})")));
    }

    #[test]
    fn documents_only_reference_variables() {
        for document in [CREATE_USER, UPDATE_USER, DELETE_USER, CREATE_MAPPING] {
            assert!(!document.contains('"'), "documents must not carry literals");
        }
    }
}
