//! The remote invoice API as seen by the core

use crate::core::draft::InvoiceDraft;
use crate::core::record::{IdentityKey, WireInvoice};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Response of the list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub success: bool,

    /// Present on success, in the source's own field naming
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoices: Option<Vec<WireInvoice>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ListResponse {
    pub fn ok(invoices: Vec<WireInvoice>) -> Self {
        Self {
            success: true,
            invoices: Some(invoices),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            invoices: None,
            message: Some(message.into()),
        }
    }
}

/// Response of the update endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UpdateResponse {
    pub fn acknowledged() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Remote collaborator holding the authoritative invoices.
///
/// `Err` means the call itself failed (transport, decoding); a call that
/// went through but was refused comes back as `success: false`.
#[async_trait]
pub trait InvoiceSource: Send + Sync {
    /// List invoice summaries
    async fn list(&self) -> Result<ListResponse>;

    /// Get the detailed, editable form of one invoice
    async fn get(&self, id: &IdentityKey) -> Result<InvoiceDraft>;

    /// Replace an invoice with the given draft
    async fn update(&self, draft: &InvoiceDraft) -> Result<UpdateResponse>;
}
