//! Reconciliation of the seed and remote invoice sets
//!
//! The list screen shows one collection built from two sources. Everything
//! here is pure except [`Reconciler::fetch_and_reconcile`], the single async
//! call to the remote API. The displayed collection itself lives in an
//! [`InvoiceCache`] owned by the caller and replaced only at refresh points.

pub mod cache;
pub mod reconciler;

pub use cache::{InvoiceCache, RefreshOutcome, RefreshTicket};
pub use reconciler::Reconciler;

use crate::core::record::{IdentityKey, InvoiceRecord};
use crate::core::status::{InvoiceStatus, StatusFilter};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;

/// Merge `seed` and `fetched` into one collection without duplicate identities.
///
/// Seed records come first, in seed order; fetched records follow in their
/// own order. When two records share an identity key the one already present
/// wins and the later one is dropped, so a seed record is never overwritten
/// by a fetched one.
pub fn reconcile<S, F>(seed: S, fetched: F) -> Vec<InvoiceRecord>
where
    S: IntoIterator<Item = InvoiceRecord>,
    F: IntoIterator<Item = InvoiceRecord>,
{
    let mut merged: IndexMap<IdentityKey, InvoiceRecord> = IndexMap::new();

    let seed_dropped = insert_new(&mut merged, seed);
    if seed_dropped > 0 {
        tracing::warn!(dropped = seed_dropped, "Seed set contains duplicate invoice ids");
    }

    let before = merged.len();
    let fetched_dropped = insert_new(&mut merged, fetched);

    tracing::debug!(
        seed = before,
        appended = merged.len() - before,
        dropped = fetched_dropped,
        "Reconciled invoice collection"
    );

    merged.into_values().collect()
}

/// Insert records whose identity is not yet present; returns how many were dropped
fn insert_new(
    merged: &mut IndexMap<IdentityKey, InvoiceRecord>,
    records: impl IntoIterator<Item = InvoiceRecord>,
) -> usize {
    let mut dropped = 0;
    for record in records {
        match merged.entry(record.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(_) => dropped += 1,
        }
    }
    dropped
}

/// Records matching `filter`, in their original relative order
pub fn filter_by_status(collection: &[InvoiceRecord], filter: StatusFilter) -> Vec<InvoiceRecord> {
    match filter {
        StatusFilter::All => collection.to_vec(),
        StatusFilter::Only(_) => collection
            .iter()
            .filter(|record| filter.matches(record.status))
            .cloned()
            .collect(),
    }
}

/// Per-status totals for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub validated: usize,
    pub paid: usize,
}

impl StatusCounts {
    pub fn get(&self, status: InvoiceStatus) -> usize {
        match status {
            InvoiceStatus::Pending => self.pending,
            InvoiceStatus::Validated => self.validated,
            InvoiceStatus::Paid => self.paid,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.validated + self.paid
    }
}

pub fn status_counts(collection: &[InvoiceRecord]) -> StatusCounts {
    collection
        .iter()
        .fold(StatusCounts::default(), |mut counts, record| {
            match record.status {
                InvoiceStatus::Pending => counts.pending += 1,
                InvoiceStatus::Validated => counts.validated += 1,
                InvoiceStatus::Paid => counts.paid += 1,
            }
            counts
        })
}
