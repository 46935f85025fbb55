//! Shared test harness for InvoiceSource testing
//!
//! Provides invoice fixtures and the `invoice_source_tests!` contract suite.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod source_harness;
//! use source_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod invoice_source_tests;

use invoice_desk::prelude::*;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn key(s: &str) -> IdentityKey {
    IdentityKey::new(s).unwrap()
}

/// A detailed invoice with the two reference lines: 2 x 10 and 1 x 5
pub fn sample_invoice(id: &str, client: &str) -> InvoiceDraft {
    InvoiceDraft {
        id: key(id),
        invoice_number: format!("INV-{}", id),
        client_name: client.to_string(),
        client_email: format!("billing@{}.test", client.to_lowercase()),
        issue_date: "2024-03-01".to_string(),
        due_date: "2024-03-31".to_string(),
        status: InvoiceStatus::Pending,
        items: vec![
            LineItem::new("Consulting", dec("2"), dec("10")),
            LineItem::new("Travel", dec("1"), dec("5")),
        ],
        total: dec("25"),
    }
}

/// Three remote invoices, the first sharing id "1" with the built-in seed set
pub fn remote_batch() -> Vec<InvoiceDraft> {
    let mut paid = sample_invoice("1", "Shadow");
    paid.status = InvoiceStatus::Paid;

    let mut validated = sample_invoice("r-200", "Globex");
    validated.status = InvoiceStatus::Validated;

    vec![paid, sample_invoice("r-100", "Initech"), validated]
}

/// Summary record in seed form
pub fn seed_record(id: &str, status: InvoiceStatus) -> InvoiceRecord {
    InvoiceRecord {
        id: key(id),
        company: format!("Seed {}", id),
        number: format!("FAC-{}", id),
        date: "01/05/2023".to_string(),
        amount: dec("100"),
        status,
        origin: RecordOrigin::Seed,
    }
}

pub fn remote_record(id: &str, status: InvoiceStatus) -> InvoiceRecord {
    InvoiceRecord {
        origin: RecordOrigin::Remote,
        ..seed_record(id, status)
    }
}

pub fn ids(records: &[InvoiceRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}
