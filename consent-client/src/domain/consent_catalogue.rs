//! Read-only consent catalogue.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{ConsentQuery, ConsentQueryError};
use crate::domain::{Consent, render_consent_table};

/// Lists consents and renders them for display.
#[derive(Clone)]
pub struct ConsentCatalogue {
    query: Arc<dyn ConsentQuery>,
}

impl ConsentCatalogue {
    pub fn new(query: Arc<dyn ConsentQuery>) -> Self {
        Self { query }
    }

    /// Return every consent in service order.
    ///
    /// # Errors
    ///
    /// Propagates the query port's error.
    pub async fn list(&self) -> Result<Vec<Consent>, ConsentQueryError> {
        let consents = self.query.list_consents().await?;
        debug!(count = consents.len(), "consents loaded");
        Ok(consents)
    }

    /// Load consents and render them as a text table.
    ///
    /// # Errors
    ///
    /// Propagates the query port's error.
    pub async fn render_table(&self) -> Result<String, ConsentQueryError> {
        self.list()
            .await
            .map(|consents| render_consent_table(&consents))
    }
}
