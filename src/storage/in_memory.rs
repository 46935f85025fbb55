//! In-memory implementation of InvoiceSource for testing and development

use crate::core::draft::InvoiceDraft;
use crate::core::record::{IdentityKey, WireInvoice};
use crate::core::source::{InvoiceSource, ListResponse, UpdateResponse};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Default)]
struct Behavior {
    offline: Option<String>,
    refuse_list: Option<String>,
    refuse_updates: Option<String>,
    extra_summaries: Vec<WireInvoice>,
}

/// In-memory stand-in for the remote invoice API
///
/// Keeps detailed invoices in insertion order and lists them in the remote
/// API's field naming. Failures can be switched on to exercise error paths.
/// Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceSource {
    invoices: Arc<RwLock<IndexMap<IdentityKey, InvoiceDraft>>>,
    behavior: Arc<RwLock<Behavior>>,
}

impl InMemoryInvoiceSource {
    /// Create an empty in-memory source
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invoices(invoices: impl IntoIterator<Item = InvoiceDraft>) -> Self {
        let source = Self::new();
        for invoice in invoices {
            source.insert(invoice);
        }
        source
    }

    /// Add or replace a detailed invoice
    pub fn insert(&self, invoice: InvoiceDraft) {
        self.invoices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(invoice.id.clone(), invoice);
    }

    /// Stored copy of an invoice
    pub fn stored(&self, id: &IdentityKey) -> Option<InvoiceDraft> {
        self.invoices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Add a listed row that has no detailed form behind it
    pub fn push_summary(&self, summary: WireInvoice) {
        self.behavior_mut().extra_summaries.push(summary);
    }

    /// Make every call fail as if the network were down
    pub fn set_offline(&self, reason: Option<&str>) {
        self.behavior_mut().offline = reason.map(str::to_string);
    }

    /// Answer list calls with `success: false`
    pub fn refuse_list(&self, message: Option<&str>) {
        self.behavior_mut().refuse_list = message.map(str::to_string);
    }

    /// Answer update calls with `success: false`
    pub fn refuse_updates(&self, message: Option<&str>) {
        self.behavior_mut().refuse_updates = message.map(str::to_string);
    }

    fn behavior_mut(&self) -> std::sync::RwLockWriteGuard<'_, Behavior> {
        self.behavior.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn behavior(&self) -> Result<Behavior> {
        let behavior = self
            .behavior
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        if let Some(reason) = &behavior.offline {
            return Err(anyhow!("connection failed: {}", reason));
        }
        Ok(behavior.clone())
    }
}

#[async_trait]
impl InvoiceSource for InMemoryInvoiceSource {
    async fn list(&self) -> Result<ListResponse> {
        let behavior = self.behavior()?;
        if let Some(message) = behavior.refuse_list {
            return Ok(ListResponse::failed(message));
        }

        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut summaries: Vec<WireInvoice> =
            invoices.values().map(InvoiceDraft::to_summary).collect();
        summaries.extend(behavior.extra_summaries);

        Ok(ListResponse::ok(summaries))
    }

    async fn get(&self, id: &IdentityKey) -> Result<InvoiceDraft> {
        self.behavior()?;

        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        invoices
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("Invoice not found: {}", id))
    }

    async fn update(&self, draft: &InvoiceDraft) -> Result<UpdateResponse> {
        let behavior = self.behavior()?;
        if let Some(message) = behavior.refuse_updates {
            return Ok(UpdateResponse::rejected(message));
        }

        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(stored) = invoices.get_mut(&draft.id) else {
            return Ok(UpdateResponse::rejected(format!(
                "Invoice not found: {}",
                draft.id
            )));
        };
        *stored = draft.clone();

        Ok(UpdateResponse::acknowledged())
    }
}
