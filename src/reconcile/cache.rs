//! Last-known-good invoice collection

use crate::core::error::FetchError;
use crate::core::record::InvoiceRecord;
use crate::core::status::StatusFilter;
use crate::reconcile::{Reconciler, StatusCounts, filter_by_status, status_counts};
use chrono::{DateTime, Utc};

/// Identifies one refresh request; only the newest ticket may apply its result
#[derive(Debug, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// What happened to a completed refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The collection was replaced
    Applied { count: usize },
    /// A newer refresh was started meanwhile; this result was discarded
    Superseded,
    /// The fetch failed; the previous collection is still displayed
    Failed(FetchError),
}

/// The collection a list screen displays.
///
/// Replaced wholesale on a successful refresh and never partially. A failed,
/// superseded or cancelled refresh leaves it as it was.
#[derive(Debug, Clone, Default)]
pub struct InvoiceCache {
    records: Vec<InvoiceRecord>,
    latest_ticket: u64,
    refreshed_at: Option<DateTime<Utc>>,
    last_error: Option<FetchError>,
}

impl InvoiceCache {
    /// Start from an initial collection, usually the seed set
    pub fn new(initial: Vec<InvoiceRecord>) -> Self {
        Self {
            records: initial,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[InvoiceRecord] {
        &self.records
    }

    /// The records to display under `filter`
    pub fn view(&self, filter: StatusFilter) -> Vec<InvoiceRecord> {
        filter_by_status(&self.records, filter)
    }

    pub fn counts(&self) -> StatusCounts {
        status_counts(&self.records)
    }

    /// When the collection was last replaced by a fetch
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Error of the most recent current refresh, cleared by the next success
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Register a new refresh, superseding any still in flight
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.latest_ticket += 1;
        RefreshTicket(self.latest_ticket)
    }

    pub fn is_current(&self, ticket: &RefreshTicket) -> bool {
        ticket.0 == self.latest_ticket
    }

    /// Hand in the result of the refresh identified by `ticket`
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<InvoiceRecord>, FetchError>,
    ) -> RefreshOutcome {
        if !self.is_current(&ticket) {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "Discarding superseded refresh"
            );
            return RefreshOutcome::Superseded;
        }

        match result {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                self.refreshed_at = Some(Utc::now());
                self.last_error = None;
                RefreshOutcome::Applied { count }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Refresh failed, keeping previous invoices");
                self.last_error = Some(err.clone());
                RefreshOutcome::Failed(err)
            }
        }
    }

    /// Fetch, reconcile and apply in one step
    pub async fn refresh(&mut self, reconciler: &Reconciler) -> RefreshOutcome {
        let ticket = self.begin_refresh();
        let result = reconciler.fetch_and_reconcile().await;
        self.complete_refresh(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{IdentityKey, RecordOrigin};
    use crate::core::status::InvoiceStatus;
    use rust_decimal::Decimal;

    fn record(id: &str, status: InvoiceStatus) -> InvoiceRecord {
        InvoiceRecord {
            id: IdentityKey::new(id).unwrap(),
            company: "Acme".to_string(),
            number: id.to_string(),
            date: String::new(),
            amount: Decimal::ONE,
            status,
            origin: RecordOrigin::Remote,
        }
    }

    #[test]
    fn test_applies_current_result() {
        let mut cache = InvoiceCache::new(vec![record("1", InvoiceStatus::Pending)]);
        let ticket = cache.begin_refresh();

        let outcome = cache.complete_refresh(
            ticket,
            Ok(vec![
                record("1", InvoiceStatus::Pending),
                record("2", InvoiceStatus::Paid),
            ]),
        );

        assert_eq!(outcome, RefreshOutcome::Applied { count: 2 });
        assert_eq!(cache.records().len(), 2);
        assert!(cache.refreshed_at().is_some());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut cache = InvoiceCache::default();
        let first = cache.begin_refresh();
        let second = cache.begin_refresh();

        let outcome = cache.complete_refresh(second, Ok(vec![record("new", InvoiceStatus::Paid)]));
        assert_eq!(outcome, RefreshOutcome::Applied { count: 1 });

        let outcome = cache.complete_refresh(first, Ok(vec![record("old", InvoiceStatus::Paid)]));
        assert_eq!(outcome, RefreshOutcome::Superseded);
        assert_eq!(cache.records()[0].id.as_str(), "new");
    }

    #[test]
    fn test_failure_keeps_previous_collection() {
        let mut cache = InvoiceCache::new(vec![record("1", InvoiceStatus::Pending)]);
        let ticket = cache.begin_refresh();

        let outcome = cache.complete_refresh(ticket, Err(FetchError::new("timeout")));

        assert!(matches!(outcome, RefreshOutcome::Failed(_)));
        assert_eq!(cache.records().len(), 1);
        assert_eq!(cache.last_error().unwrap().message, "timeout");
        assert!(cache.refreshed_at().is_none());
    }

    #[test]
    fn test_abandoned_ticket_changes_nothing() {
        let mut cache = InvoiceCache::new(vec![record("1", InvoiceStatus::Pending)]);
        let ticket = cache.begin_refresh();
        drop(ticket);

        assert_eq!(cache.records().len(), 1);
        assert!(cache.last_error().is_none());
    }

    #[test]
    fn test_view_and_counts() {
        let cache = InvoiceCache::new(vec![
            record("1", InvoiceStatus::Pending),
            record("2", InvoiceStatus::Paid),
        ]);
        assert_eq!(cache.view(StatusFilter::All).len(), 2);
        assert_eq!(cache.view(InvoiceStatus::Paid.into()).len(), 1);
        assert_eq!(cache.counts().pending, 1);
    }
}
