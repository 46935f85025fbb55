//! The async boundary between the remote API and the reconciled list

use crate::core::error::FetchError;
use crate::core::record::{InvoiceRecord, RecordOrigin};
use crate::core::source::InvoiceSource;
use crate::reconcile::reconcile;
use std::sync::Arc;

const SERVER_REFUSED: &str = "server reported failure";

/// Fetches the remote invoice set and reconciles it against the seed set.
///
/// Holds no collection state of its own; see [`InvoiceCache`](super::InvoiceCache)
/// for the last-known-good list.
#[derive(Clone)]
pub struct Reconciler {
    source: Arc<dyn InvoiceSource>,
    seed: Vec<InvoiceRecord>,
}

impl Reconciler {
    pub fn new(source: Arc<dyn InvoiceSource>, seed: Vec<InvoiceRecord>) -> Self {
        Self { source, seed }
    }

    pub fn seed(&self) -> &[InvoiceRecord] {
        &self.seed
    }

    pub fn source(&self) -> &Arc<dyn InvoiceSource> {
        &self.source
    }

    /// List remote invoices and merge them behind the seed set.
    ///
    /// Transport errors, a `success: false` response, a success without an
    /// invoice list, and any record that fails validation all surface as
    /// [`FetchError`].
    pub async fn fetch_and_reconcile(&self) -> Result<Vec<InvoiceRecord>, FetchError> {
        tracing::debug!("Fetching invoices from remote source");

        let response = self.source.list().await.map_err(|e| {
            tracing::warn!(error = %e, "Invoice list request failed");
            FetchError::new(format!("{:#}", e))
        })?;

        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| SERVER_REFUSED.to_string());
            tracing::warn!(%message, "Invoice list refused by server");
            return Err(FetchError::new(message));
        }

        let invoices = response
            .invoices
            .ok_or_else(|| FetchError::new("response carried no invoices"))?;

        let fetched = invoices
            .into_iter()
            .map(|invoice| invoice.into_record(RecordOrigin::Remote))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(fetched = fetched.len(), "Fetched remote invoices");

        Ok(reconcile(self.seed.iter().cloned(), fetched))
    }
}
