//! Draft editor state machine

use crate::core::draft::{DraftField, InvoiceDraft, ItemField};
use crate::core::error::{DraftError, FetchError, InvoiceResult, SaveError};
use crate::core::field::FieldValue;
use crate::core::record::{IdentityKey, InvoiceRecord};
use crate::core::source::InvoiceSource;
use std::sync::Arc;
use uuid::Uuid;

/// Token for the currently open draft
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftHandle {
    token: Uuid,
    invoice_id: IdentityKey,
}

impl DraftHandle {
    /// Identity of the invoice being edited
    pub fn invoice_id(&self) -> &IdentityKey {
        &self.invoice_id
    }
}

#[derive(Debug)]
enum DraftState {
    Closed,
    Open {
        handle: DraftHandle,
        draft: InvoiceDraft,
    },
}

/// Holds the one invoice under edit and keeps its totals consistent
pub struct DraftEditor {
    source: Arc<dyn InvoiceSource>,
    state: DraftState,
}

impl DraftEditor {
    pub fn new(source: Arc<dyn InvoiceSource>) -> Self {
        Self {
            source,
            state: DraftState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DraftState::Open { .. })
    }

    /// Handle of the open draft, if any
    pub fn active_handle(&self) -> Option<&DraftHandle> {
        match &self.state {
            DraftState::Open { handle, .. } => Some(handle),
            DraftState::Closed => None,
        }
    }

    /// Read the open draft
    pub fn draft(&self, handle: &DraftHandle) -> Result<&InvoiceDraft, DraftError> {
        match &self.state {
            DraftState::Open { handle: open, draft } if open == handle => Ok(draft),
            _ => Err(DraftError::NoActiveDraft),
        }
    }

    fn draft_mut(&mut self, handle: &DraftHandle) -> Result<&mut InvoiceDraft, DraftError> {
        match &mut self.state {
            DraftState::Open { handle: open, draft } if open == handle => Ok(draft),
            _ => Err(DraftError::NoActiveDraft),
        }
    }

    /// Take ownership of a detailed invoice and open it for editing.
    ///
    /// The draft must carry at least one line item. Derived amounts are
    /// recomputed on open so the draft is consistent from the start.
    pub fn begin_edit(&mut self, mut detailed: InvoiceDraft) -> Result<DraftHandle, DraftError> {
        if let DraftState::Open { handle, .. } = &self.state {
            return Err(DraftError::DraftAlreadyOpen {
                id: handle.invoice_id.clone(),
            });
        }

        if detailed.items.is_empty() {
            return Err(DraftError::NotEditable {
                id: detailed.id,
                reason: "invoice has no line items".to_string(),
            });
        }

        let reported_total = detailed.total;
        if detailed.recompute()? {
            tracing::warn!(
                id = %detailed.id,
                reported = %reported_total,
                recomputed = %detailed.total,
                "Invoice amounts were inconsistent, recomputed on open"
            );
        }

        let handle = DraftHandle {
            token: Uuid::new_v4(),
            invoice_id: detailed.id.clone(),
        };
        tracing::info!(id = %handle.invoice_id, items = detailed.items.len(), "Opened invoice draft");

        self.state = DraftState::Open {
            handle: handle.clone(),
            draft: detailed,
        };
        Ok(handle)
    }

    /// Load the detailed form of a listed invoice and open it.
    ///
    /// Bundled seed invoices have no remote counterpart and are refused
    /// without contacting the source.
    pub async fn open_record(&mut self, record: &InvoiceRecord) -> InvoiceResult<DraftHandle> {
        if !record.is_editable() {
            return Err(DraftError::NotEditable {
                id: record.id.clone(),
                reason: "bundled invoices are read-only".to_string(),
            }
            .into());
        }
        if let Some(open) = self.active_handle() {
            return Err(DraftError::DraftAlreadyOpen {
                id: open.invoice_id.clone(),
            }
            .into());
        }

        let detailed = self.source.get(&record.id).await.map_err(|e| {
            tracing::warn!(id = %record.id, error = %e, "Failed to load invoice details");
            FetchError::new(format!("{:#}", e))
        })?;

        Ok(self.begin_edit(detailed)?)
    }

    /// Update one scalar field of the open draft
    pub fn set_field(
        &mut self,
        handle: &DraftHandle,
        field: DraftField,
        value: impl Into<FieldValue>,
    ) -> Result<(), DraftError> {
        let value = value.into();
        let draft = self.draft_mut(handle)?;
        draft.apply_field(field, &value).inspect_err(|e| {
            tracing::debug!(field = field.as_str(), error = %e, "Rejected field update");
        })
    }

    /// Update one field of a line item; the item amount and the draft total
    /// are recomputed before this returns
    pub fn set_item_field(
        &mut self,
        handle: &DraftHandle,
        index: usize,
        field: ItemField,
        value: impl Into<FieldValue>,
    ) -> Result<(), DraftError> {
        let value = value.into();
        let draft = self.draft_mut(handle)?;
        draft.apply_item_field(index, field, &value).inspect_err(|e| {
            tracing::debug!(index, field = field.as_str(), error = %e, "Rejected item update");
        })
    }

    /// Send the open draft to the remote API.
    ///
    /// On acknowledgment the draft is closed and returned so the caller can
    /// refresh its list. On any failure the draft stays open, unchanged.
    pub async fn commit(&mut self, handle: &DraftHandle) -> InvoiceResult<InvoiceDraft> {
        let snapshot = self.draft(handle)?.clone();

        let response = self.source.update(&snapshot).await.map_err(|e| {
            tracing::warn!(id = %snapshot.id, error = %e, "Invoice update request failed");
            SaveError::new(format!("{:#}", e))
        })?;

        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "update was not acknowledged".to_string());
            tracing::warn!(id = %snapshot.id, %message, "Invoice update rejected");
            return Err(SaveError::new(message).into());
        }

        tracing::info!(id = %snapshot.id, total = %snapshot.total, "Invoice saved");
        self.state = DraftState::Closed;
        Ok(snapshot)
    }

    /// Close the draft without saving.
    ///
    /// Returns the discarded draft; a handle that does not match the open
    /// draft is a no-op.
    pub fn discard(&mut self, handle: &DraftHandle) -> Option<InvoiceDraft> {
        match std::mem::replace(&mut self.state, DraftState::Closed) {
            DraftState::Open { handle: open, draft } if &open == handle => {
                tracing::info!(id = %open.invoice_id, "Discarded invoice draft");
                Some(draft)
            }
            other => {
                self.state = other;
                None
            }
        }
    }
}
