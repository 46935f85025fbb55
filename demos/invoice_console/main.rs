//! Invoice Console Example
//!
//! Walks through one session of an invoice-tracking client:
//! - Loads the bundled seed invoices (or a YAML config given as argument)
//! - Refreshes the list against an in-memory remote API
//! - Filters by status and shows the counts
//! - Opens a remote invoice, edits a line, and saves it
//!
//! Run with `RUST_LOG=invoice_desk=debug` to see every step logged.

use anyhow::Result;
use invoice_desk::prelude::*;

fn remote_invoice(id: &str, client: &str, status: InvoiceStatus) -> Result<InvoiceDraft> {
    let id = IdentityKey::new(id).ok_or_else(|| anyhow::anyhow!("empty invoice id"))?;
    let items = vec![
        LineItem::new("Consulting", Decimal::from(2), Decimal::from(10)),
        LineItem::new("Travel", Decimal::ONE, Decimal::from(5)),
    ];
    Ok(InvoiceDraft {
        invoice_number: format!("INV-{}", id),
        client_name: client.to_string(),
        client_email: format!("billing@{}.test", client.to_lowercase()),
        issue_date: "2024-03-01".to_string(),
        due_date: "2024-03-31".to_string(),
        status,
        total: Decimal::from(25),
        items,
        id,
    })
}

fn print_list(cache: &InvoiceCache, filter: StatusFilter) {
    for invoice in cache.view(filter) {
        println!(
            "  {:<14} {:<22} {:>10} {:<10} {}",
            invoice.number,
            invoice.company,
            invoice.amount,
            invoice.status.label(),
            if invoice.is_editable() { "" } else { "(bundled)" }
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => ClientConfig::from_yaml_file(path)?,
        None => ClientConfig::default_config(),
    };
    init_logging(&config.logging);

    // Remote API stand-in, sharing id "1" with the seed set
    let source = Arc::new(InMemoryInvoiceSource::with_invoices([
        remote_invoice("1", "Shadow Copy", InvoiceStatus::Paid)?,
        remote_invoice("64ab01", "Initech", InvoiceStatus::Pending)?,
        remote_invoice("64ab02", "Globex", InvoiceStatus::Validated)?,
    ]));

    let reconciler = Reconciler::new(source.clone(), config.seed_records()?);
    let mut cache = InvoiceCache::new(reconciler.seed().to_vec());

    match cache.refresh(&reconciler).await {
        RefreshOutcome::Applied { count } => println!("📦 {} invoices loaded", count),
        RefreshOutcome::Failed(e) => println!("⚠️  {}", e),
        RefreshOutcome::Superseded => {}
    }

    let counts = cache.counts();
    println!(
        "   pending: {}  validated: {}  paid: {}",
        counts.pending, counts.validated, counts.paid
    );

    println!("\n📋 All invoices:");
    print_list(&cache, StatusFilter::All);

    println!("\n📋 Pending only:");
    print_list(&cache, StatusFilter::Only(InvoiceStatus::Pending));

    let Some(target) = cache.records().iter().find(|r| r.is_editable()).cloned() else {
        println!("\nNo remote invoice to edit");
        return Ok(());
    };

    let mut editor = DraftEditor::new(source);
    let handle = editor.open_record(&target).await?;
    println!("\n✏️  Editing {} ({})", target.number, target.company);

    editor.set_item_field(&handle, 0, ItemField::Quantity, "3")?;
    editor.set_field(&handle, DraftField::Status, "validated")?;

    let draft = editor.draft(&handle)?;
    for item in &draft.items {
        println!(
            "   {:<12} {:>4} x {:>6} = {:>8}",
            item.description, item.quantity, item.unit_price, item.amount
        );
    }
    println!("   total: {}", draft.total);

    let saved = editor.commit(&handle).await?;
    println!("✅ Saved {} with total {}", saved.invoice_number, saved.total);

    cache.refresh(&reconciler).await;
    println!("\n📋 After save:");
    print_list(&cache, StatusFilter::All);

    Ok(())
}
