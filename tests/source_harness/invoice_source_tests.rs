//! Macro-generated test suite for `InvoiceSource` contract validation.
//!
//! The `invoice_source_tests!` macro generates a test module that validates
//! any `InvoiceSource` implementation against the contract the reconciler and
//! draft editor rely on, then drives both through it end to end.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod source_harness;
//!
//! use source_harness::*;
//!
//! invoice_source_tests!(|invoices| async move {
//!     InMemoryInvoiceSource::with_invoices(invoices)
//! });
//! ```
//!
//! # Generated Tests
//!
//! ## Contract
//! - `test_list_returns_all_in_order`: listed ids follow stored order
//! - `test_list_rows_normalize`: every listed row validates into a record
//! - `test_list_empty`: an empty source lists an empty array
//! - `test_get_returns_items`: detail carries the line items
//! - `test_get_unknown_fails`: unknown id is an `Err`
//! - `test_update_persists`: updated draft is served by the next `get`
//! - `test_update_unknown_not_acknowledged`: `success: false`, not `Err`
//!
//! ## End to end
//! - `test_reconcile_against_source`: seed set wins the shared id
//! - `test_edit_and_commit_roundtrip`: open, edit, commit, reload

/// Generate an `InvoiceSource` conformance suite.
///
/// `$factory` must be callable as `$factory(Vec<InvoiceDraft>)` and return a
/// future resolving to a source pre-loaded with those invoices. It is called
/// afresh for every test.
#[macro_export]
macro_rules! invoice_source_tests {
    ($factory:expr) => {
        mod invoice_source_contract_tests {
            use super::*;
            use invoice_desk::prelude::*;

            async fn make(invoices: Vec<InvoiceDraft>) -> Arc<dyn InvoiceSource> {
                let factory = $factory;
                Arc::new(factory(invoices).await)
            }

            // ==================================================================
            // Contract: list
            // ==================================================================

            #[tokio::test]
            async fn test_list_returns_all_in_order() {
                let source = make(remote_batch()).await;

                let response = source.list().await.unwrap();
                assert!(response.success);

                let listed: Vec<String> = response
                    .invoices
                    .unwrap()
                    .iter()
                    .map(|row| row.identity().unwrap().to_string())
                    .collect();
                assert_eq!(listed, vec!["1", "r-100", "r-200"]);
            }

            #[tokio::test]
            async fn test_list_rows_normalize() {
                let source = make(remote_batch()).await;

                let records: Vec<InvoiceRecord> = source
                    .list()
                    .await
                    .unwrap()
                    .invoices
                    .unwrap()
                    .into_iter()
                    .map(|row| row.into_record(RecordOrigin::Remote).unwrap())
                    .collect();

                assert_eq!(records[0].status, InvoiceStatus::Paid);
                assert_eq!(records[1].company, "Initech");
                assert_eq!(records[1].number, "INV-r-100");
                assert_eq!(records[1].amount, dec("25"));
                assert_eq!(records[2].status, InvoiceStatus::Validated);
            }

            #[tokio::test]
            async fn test_list_empty() {
                let source = make(Vec::new()).await;
                let response = source.list().await.unwrap();
                assert!(response.success);
                assert!(response.invoices.unwrap().is_empty());
            }

            // ==================================================================
            // Contract: get / update
            // ==================================================================

            #[tokio::test]
            async fn test_get_returns_items() {
                let source = make(remote_batch()).await;

                let draft = source.get(&key("r-100")).await.unwrap();
                assert_eq!(draft.client_name, "Initech");
                assert_eq!(draft.items.len(), 2);
                assert_eq!(draft.items[0].unit_price, dec("10"));
                assert!(draft.is_consistent());
            }

            #[tokio::test]
            async fn test_get_unknown_fails() {
                let source = make(remote_batch()).await;
                assert!(source.get(&key("missing")).await.is_err());
            }

            #[tokio::test]
            async fn test_update_persists() {
                let source = make(remote_batch()).await;

                let mut draft = source.get(&key("r-100")).await.unwrap();
                draft.client_name = "Initrode".to_string();
                draft.status = InvoiceStatus::Validated;

                let response = source.update(&draft).await.unwrap();
                assert!(response.success);

                let reloaded = source.get(&key("r-100")).await.unwrap();
                assert_eq!(reloaded.client_name, "Initrode");
                assert_eq!(reloaded.status, InvoiceStatus::Validated);
            }

            #[tokio::test]
            async fn test_update_unknown_not_acknowledged() {
                let source = make(remote_batch()).await;
                let response = source
                    .update(&sample_invoice("ghost", "Nobody"))
                    .await
                    .unwrap();
                assert!(!response.success);
            }

            // ==================================================================
            // End to end
            // ==================================================================

            #[tokio::test]
            async fn test_reconcile_against_source() {
                let source = make(remote_batch()).await;
                let seed = ClientConfig::default_config().seed_records().unwrap();
                let reconciler = Reconciler::new(source, seed);

                let merged = reconciler.fetch_and_reconcile().await.unwrap();

                assert_eq!(merged.len(), 9);
                assert_eq!(merged[0].company, "Entreprise Martin");
                assert_eq!(merged[0].origin, RecordOrigin::Seed);
                assert_eq!(merged[7].id.as_str(), "r-100");
                assert_eq!(merged[8].id.as_str(), "r-200");
            }

            #[tokio::test]
            async fn test_edit_and_commit_roundtrip() {
                let source = make(remote_batch()).await;
                let reconciler = Reconciler::new(source.clone(), Vec::new());
                let records = reconciler.fetch_and_reconcile().await.unwrap();

                let mut editor = DraftEditor::new(source.clone());
                let handle = editor.open_record(&records[1]).await.unwrap();
                editor
                    .set_item_field(&handle, 0, ItemField::Quantity, "3")
                    .unwrap();
                editor
                    .set_field(&handle, DraftField::Status, "paid")
                    .unwrap();

                let saved = editor.commit(&handle).await.unwrap();
                assert_eq!(saved.total, dec("35"));
                assert!(!editor.is_open());

                let reloaded = source.get(&key("r-100")).await.unwrap();
                assert_eq!(reloaded.total, dec("35"));
                assert_eq!(reloaded.items[0].amount, dec("30"));
                assert_eq!(reloaded.status, InvoiceStatus::Paid);
            }
        }
    };
}
