//! Consent records and consent-scope changes.

use std::fmt;

use super::user::UserId;

/// Read-only consent record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consent {
    pub id: String,
    pub name: String,
    pub purpose: String,
    pub commercial: bool,
}

/// Validation errors for consent changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentValidationError {
    NoConsentIds,
    BlankConsentId,
}

impl fmt::Display for ConsentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConsentIds => write!(f, "at least one consent id is required"),
            Self::BlankConsentId => write!(f, "consent ids must not be blank"),
        }
    }
}

impl std::error::Error for ConsentValidationError {}

/// Whether consents are added to or removed from a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentAction {
    Grant,
    Revoke,
}

/// The consent list a change applies to.
///
/// Organisations are keyed by integer ids; purposes and HPO terms by strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentTarget {
    Organisations(Vec<i64>),
    Purposes(Vec<String>),
    Hpos(Vec<String>),
}

impl ConsentTarget {
    /// Number of consent ids carried by this target.
    pub fn len(&self) -> usize {
        match self {
            Self::Organisations(ids) => ids.len(),
            Self::Purposes(ids) | Self::Hpos(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short label used in logs and CLI output.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Organisations(_) => "organisations",
            Self::Purposes(_) => "purposes",
            Self::Hpos(_) => "hpos",
        }
    }
}

/// Validated request to grant or revoke consents for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentChange {
    user_id: UserId,
    action: ConsentAction,
    target: ConsentTarget,
}

impl ConsentChange {
    /// Validate and construct a consent change.
    ///
    /// ```
    /// use consent_client::domain::{ConsentAction, ConsentChange, ConsentTarget, UserId};
    ///
    /// let user = UserId::new("u-1").expect("valid id");
    /// let empty = ConsentChange::new(
    ///     user,
    ///     ConsentAction::Grant,
    ///     ConsentTarget::Organisations(vec![]),
    /// );
    /// assert!(empty.is_err());
    /// ```
    pub fn new(
        user_id: UserId,
        action: ConsentAction,
        target: ConsentTarget,
    ) -> Result<Self, ConsentValidationError> {
        if target.is_empty() {
            return Err(ConsentValidationError::NoConsentIds);
        }
        let has_blank_id = match &target {
            ConsentTarget::Organisations(_) => false,
            ConsentTarget::Purposes(ids) | ConsentTarget::Hpos(ids) => {
                ids.iter().any(|id| id.trim().is_empty())
            }
        };
        if has_blank_id {
            return Err(ConsentValidationError::BlankConsentId);
        }
        Ok(Self {
            user_id,
            action,
            target,
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub const fn action(&self) -> ConsentAction {
        self.action
    }

    pub fn target(&self) -> &ConsentTarget {
        &self.target
    }
}

const NAME_HEADER: &str = "Name";
const PURPOSE_HEADER: &str = "Purpose";
const COMMERCIAL_HEADER: &str = "Commercial";

/// Render consents as a fixed-width text table.
///
/// Columns are Name, Purpose and Commercial (`yes`/`no`), in input order.
pub fn render_consent_table(consents: &[Consent]) -> String {
    let commercial = |consent: &Consent| if consent.commercial { "yes" } else { "no" };
    let name_width = consents
        .iter()
        .map(|consent| consent.name.chars().count())
        .fold(NAME_HEADER.len(), usize::max);
    let purpose_width = consents
        .iter()
        .map(|consent| consent.purpose.chars().count())
        .fold(PURPOSE_HEADER.len(), usize::max);

    let mut lines = Vec::with_capacity(consents.len() + 2);
    lines.push(format!(
        "{NAME_HEADER:<name_width$}  {PURPOSE_HEADER:<purpose_width$}  {COMMERCIAL_HEADER}"
    ));
    lines.push(format!(
        "{}  {}  {}",
        "-".repeat(name_width),
        "-".repeat(purpose_width),
        "-".repeat(COMMERCIAL_HEADER.len())
    ));
    for consent in consents {
        lines.push(format!(
            "{:<name_width$}  {:<purpose_width$}  {}",
            consent.name,
            consent.purpose,
            commercial(consent)
        ));
    }
    lines.join("\n")
}
