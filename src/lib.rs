//! # invoice-desk
//!
//! The state engine behind an invoice-tracking client: reconciling the
//! invoice list from a bundled seed set and a remote API, filtering it by
//! status, and editing one invoice draft whose line amounts and total can
//! never drift from their inputs.
//!
//! ## Features
//!
//! - **Reconciliation**: seed and remote invoices merged by identity, seed first,
//!   no duplicates, order preserved
//! - **Normalization at the boundary**: `id`/`_id`, `company`/`clientName`,
//!   `"Pending"`/`"pending"` all land on one strict record type
//! - **Status filters and counts** over the reconciled list
//! - **Draft editor**: one open draft, handle-checked mutators, amounts and total
//!   recomputed on every item edit, edits kept when a save fails
//! - **Refresh supersession**: a stale fetch never overwrites a newer list
//! - **Pluggable remote source**: in-memory (default) or HTTP (`http` feature)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_desk::prelude::*;
//!
//! let config = ClientConfig::default_config();
//! let source = Arc::new(InMemoryInvoiceSource::new());
//!
//! let reconciler = Reconciler::new(source.clone(), config.seed_records()?);
//! let mut cache = InvoiceCache::new(reconciler.seed().to_vec());
//! cache.refresh(&reconciler).await;
//!
//! for invoice in cache.view(StatusFilter::Only(InvoiceStatus::Pending)) {
//!     println!("{} {} {}", invoice.number, invoice.company, invoice.amount);
//! }
//!
//! let mut editor = DraftEditor::new(source);
//! let handle = editor.open_record(&cache.records()[7]).await?;
//! editor.set_item_field(&handle, 0, ItemField::Quantity, "3")?;
//! editor.commit(&handle).await?;
//! ```

pub mod config;
pub mod core;
pub mod editor;
pub mod logging;
pub mod reconcile;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        draft::{DraftField, InvoiceDraft, ItemField, LineItem},
        error::{
            ConfigError, DraftError, FetchError, InvoiceError, InvoiceResult, SaveError,
        },
        field::FieldValue,
        record::{IdentityKey, InvoiceRecord, RecordOrigin, WireInvoice},
        source::{InvoiceSource, ListResponse, UpdateResponse},
        status::{InvoiceStatus, StatusFilter},
    };

    // === Reconciliation ===
    pub use crate::reconcile::{
        InvoiceCache, Reconciler, RefreshOutcome, RefreshTicket, StatusCounts, filter_by_status,
        reconcile, status_counts,
    };

    // === Editing ===
    pub use crate::editor::{DraftEditor, DraftHandle};

    // === Storage ===
    #[cfg(feature = "http")]
    pub use crate::storage::HttpInvoiceSource;
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryInvoiceSource;

    // === Config ===
    pub use crate::config::{ApiConfig, ClientConfig, LoggingConfig};
    pub use crate::logging::init_logging;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use rust_decimal::Decimal;
    pub use std::sync::Arc;
}
