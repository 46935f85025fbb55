//! Integration tests for InMemoryInvoiceSource using the source test harness.
//!
//! This file invokes `invoice_source_tests!` to validate that
//! InMemoryInvoiceSource fully conforms to the InvoiceSource contract.

#[macro_use]
mod source_harness;

use invoice_desk::prelude::*;
use source_harness::*;

invoice_source_tests!(|invoices: Vec<InvoiceDraft>| async move {
    InMemoryInvoiceSource::with_invoices(invoices)
});
