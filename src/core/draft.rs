//! Editable invoice drafts and the arithmetic that keeps them consistent
//!
//! Two values are derived and never set directly:
//!
//! - `LineItem::amount == quantity * unit_price`
//! - `InvoiceDraft::total == sum of item amounts`, summed in index order
//!
//! [`InvoiceDraft::apply_item_field`] recomputes both before returning, and
//! computes into scratch values first so a rejected edit leaves the draft as
//! it was.

use crate::core::error::DraftError;
use crate::core::field::FieldValue;
use crate::core::record::{IdentityKey, RecordError, WireInvoice};
use crate::core::status::InvoiceStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One invoice line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default)]
    pub amount: Decimal,
}

impl LineItem {
    /// Build an item with its amount computed.
    ///
    /// If `quantity * unit_price` overflows the amount is left at zero and
    /// the item is not consistent; [`InvoiceDraft::recompute`] reports it.
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        let mut item = Self {
            description: description.into(),
            quantity,
            unit_price,
            amount: Decimal::ZERO,
        };
        item.amount = item.computed_amount().unwrap_or(Decimal::ZERO);
        item
    }

    /// `quantity * unit_price`, or `None` on overflow
    pub fn computed_amount(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.unit_price)
    }

    pub fn is_consistent(&self) -> bool {
        self.computed_amount() == Some(self.amount)
    }
}

/// The full, editable form of an invoice as returned by the detail endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireDraft")]
pub struct InvoiceDraft {
    pub id: IdentityKey,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub issue_date: String,
    #[serde(default)]
    pub due_date: String,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub total: Decimal,
}

/// Detail body as sent; `id` and `_id` may both be present
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDraft {
    #[serde(default)]
    id: Option<IdentityKey>,
    #[serde(default, rename = "_id")]
    object_id: Option<IdentityKey>,
    #[serde(default)]
    invoice_number: String,
    #[serde(default)]
    client_name: String,
    #[serde(default)]
    client_email: String,
    #[serde(default)]
    issue_date: String,
    #[serde(default)]
    due_date: String,
    status: InvoiceStatus,
    #[serde(default)]
    items: Vec<LineItem>,
    #[serde(default)]
    total: Decimal,
}

impl TryFrom<WireDraft> for InvoiceDraft {
    type Error = RecordError;

    fn try_from(wire: WireDraft) -> Result<Self, Self::Error> {
        let id = wire
            .id
            .or(wire.object_id)
            .ok_or(RecordError::MissingIdentity)?;
        Ok(InvoiceDraft {
            id,
            invoice_number: wire.invoice_number,
            client_name: wire.client_name,
            client_email: wire.client_email,
            issue_date: wire.issue_date,
            due_date: wire.due_date,
            status: wire.status,
            items: wire.items,
            total: wire.total,
        })
    }
}

/// Sum item amounts in ascending index order
fn sum_amounts<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> Option<Decimal> {
    items
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.amount))
}

impl InvoiceDraft {
    /// Sum of the current item amounts, or `None` on overflow
    pub fn items_total(&self) -> Option<Decimal> {
        sum_amounts(&self.items)
    }

    /// List-row form of this invoice, spelled the way the remote API lists it
    pub fn to_summary(&self) -> WireInvoice {
        WireInvoice {
            object_id: Some(self.id.clone()),
            client_name: Some(self.client_name.clone()),
            invoice_number: Some(self.invoice_number.clone()),
            issue_date: Some(self.issue_date.clone()),
            total: Some(self.total),
            status: Some(self.status.as_str().to_string()),
            ..WireInvoice::default()
        }
    }

    /// Every item amount and the total agree with their inputs
    pub fn is_consistent(&self) -> bool {
        self.items.iter().all(LineItem::is_consistent) && self.items_total() == Some(self.total)
    }

    /// Recompute every derived value.
    ///
    /// Returns `true` if anything changed. On overflow the draft is left
    /// untouched.
    pub fn recompute(&mut self) -> Result<bool, DraftError> {
        let mut items = self.items.clone();
        for (index, item) in items.iter_mut().enumerate() {
            item.amount = item
                .computed_amount()
                .ok_or(DraftError::AmountOverflow { index })?;
        }
        let total = sum_amounts(&items).ok_or(DraftError::AmountOverflow {
            index: items.len().saturating_sub(1),
        })?;

        let changed = items != self.items || total != self.total;
        self.items = items;
        self.total = total;
        Ok(changed)
    }

    /// Set one scalar field.
    ///
    /// `status` must name one of the three known statuses; anything else is
    /// rejected and the draft is unchanged.
    pub fn apply_field(&mut self, field: DraftField, value: &FieldValue) -> Result<(), DraftError> {
        match field {
            DraftField::InvoiceNumber => self.invoice_number = value.to_text(),
            DraftField::ClientName => self.client_name = value.to_text(),
            DraftField::ClientEmail => self.client_email = value.to_text(),
            DraftField::IssueDate => self.issue_date = value.to_text(),
            DraftField::DueDate => self.due_date = value.to_text(),
            DraftField::Status => {
                let raw = value.to_text();
                self.status =
                    InvoiceStatus::parse(&raw).ok_or(DraftError::InvalidStatus { value: raw })?;
            }
        }
        Ok(())
    }

    /// Set one field of the item at `index`, then recompute that item's
    /// amount (for quantity and unit price) and the draft total.
    ///
    /// Numeric input is coerced, never rejected: see [`FieldValue::to_decimal`].
    pub fn apply_item_field(
        &mut self,
        index: usize,
        field: ItemField,
        value: &FieldValue,
    ) -> Result<(), DraftError> {
        let len = self.items.len();
        let mut item = self
            .items
            .get(index)
            .cloned()
            .ok_or(DraftError::IndexOutOfRange { index, len })?;

        match field {
            ItemField::Description => item.description = value.to_text(),
            ItemField::Quantity => item.quantity = value.to_decimal(),
            ItemField::UnitPrice => item.unit_price = value.to_decimal(),
        }

        if field.affects_amount() {
            item.amount = item
                .computed_amount()
                .ok_or(DraftError::AmountOverflow { index })?;
        }

        let total = sum_amounts(
            self.items
                .iter()
                .enumerate()
                .map(|(i, existing)| if i == index { &item } else { existing }),
        )
        .ok_or(DraftError::AmountOverflow { index })?;

        self.items[index] = item;
        self.total = total;
        Ok(())
    }
}

/// Scalar fields of a draft that may be edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    InvoiceNumber,
    ClientName,
    ClientEmail,
    IssueDate,
    DueDate,
    Status,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::InvoiceNumber => "invoiceNumber",
            DraftField::ClientName => "clientName",
            DraftField::ClientEmail => "clientEmail",
            DraftField::IssueDate => "issueDate",
            DraftField::DueDate => "dueDate",
            DraftField::Status => "status",
        }
    }
}

impl FromStr for DraftField {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invoiceNumber" | "invoice_number" => Ok(DraftField::InvoiceNumber),
            "clientName" | "client_name" => Ok(DraftField::ClientName),
            "clientEmail" | "client_email" => Ok(DraftField::ClientEmail),
            "issueDate" | "issue_date" => Ok(DraftField::IssueDate),
            "dueDate" | "due_date" => Ok(DraftField::DueDate),
            "status" => Ok(DraftField::Status),
            "total" | "items" | "id" => Err(DraftError::ReadOnlyField {
                field: s.to_string(),
            }),
            _ => Err(DraftError::UnknownField {
                field: s.to_string(),
            }),
        }
    }
}

/// Editable fields of a line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemField {
    Description,
    Quantity,
    UnitPrice,
}

impl ItemField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemField::Description => "description",
            ItemField::Quantity => "quantity",
            ItemField::UnitPrice => "unitPrice",
        }
    }

    /// Whether changing this field changes the item amount
    pub fn affects_amount(&self) -> bool {
        matches!(self, ItemField::Quantity | ItemField::UnitPrice)
    }
}

impl FromStr for ItemField {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "description" => Ok(ItemField::Description),
            "quantity" => Ok(ItemField::Quantity),
            "unitPrice" | "unit_price" => Ok(ItemField::UnitPrice),
            "amount" => Err(DraftError::ReadOnlyField {
                field: s.to_string(),
            }),
            _ => Err(DraftError::UnknownField {
                field: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample() -> InvoiceDraft {
        InvoiceDraft {
            id: IdentityKey::new("inv-1").unwrap(),
            invoice_number: "INV-001".to_string(),
            client_name: "Acme".to_string(),
            client_email: "billing@acme.test".to_string(),
            issue_date: "2024-03-01".to_string(),
            due_date: "2024-03-31".to_string(),
            status: InvoiceStatus::Pending,
            items: vec![
                LineItem::new("Widgets", dec("2"), dec("10")),
                LineItem::new("Bolts", dec("1"), dec("5")),
            ],
            total: dec("25"),
        }
    }

    #[test]
    fn test_sample_is_consistent() {
        assert!(sample().is_consistent());
    }

    #[test]
    fn test_quantity_update_recomputes_amount_and_total() {
        let mut draft = sample();
        draft
            .apply_item_field(0, ItemField::Quantity, &FieldValue::from(3i64))
            .unwrap();

        assert_eq!(draft.items[0].amount, dec("30"));
        assert_eq!(draft.total, dec("35"));
        assert!(draft.is_consistent());
    }

    #[test]
    fn test_non_numeric_quantity_is_zero() {
        let mut draft = sample();
        draft
            .apply_item_field(0, ItemField::Quantity, &FieldValue::from("abc"))
            .unwrap();

        assert_eq!(draft.items[0].quantity, Decimal::ZERO);
        assert_eq!(draft.items[0].amount, Decimal::ZERO);
        assert_eq!(draft.total, dec("5"));
    }

    #[test]
    fn test_unit_price_with_cents() {
        let mut draft = sample();
        draft
            .apply_item_field(1, ItemField::UnitPrice, &FieldValue::from("0.1"))
            .unwrap();
        draft
            .apply_item_field(1, ItemField::Quantity, &FieldValue::from("3"))
            .unwrap();

        assert_eq!(draft.items[1].amount, dec("0.3"));
        assert_eq!(draft.total, dec("20.3"));
    }

    #[test]
    fn test_description_keeps_amount() {
        let mut draft = sample();
        draft
            .apply_item_field(1, ItemField::Description, &FieldValue::from("Nuts"))
            .unwrap();

        assert_eq!(draft.items[1].description, "Nuts");
        assert_eq!(draft.items[1].amount, dec("5"));
        assert_eq!(draft.total, dec("25"));
    }

    #[test]
    fn test_description_edit_still_resyncs_total() {
        let mut draft = sample();
        draft.total = dec("999");
        draft
            .apply_item_field(0, ItemField::Description, &FieldValue::from("Gears"))
            .unwrap();
        assert_eq!(draft.total, dec("25"));
    }

    #[test]
    fn test_index_out_of_range() {
        let mut draft = sample();
        let before = draft.clone();
        let err = draft
            .apply_item_field(2, ItemField::Quantity, &FieldValue::from(1i64))
            .unwrap_err();

        assert_eq!(err, DraftError::IndexOutOfRange { index: 2, len: 2 });
        assert_eq!(draft, before);
    }

    #[test]
    fn test_overflow_leaves_draft_unchanged() {
        let mut draft = sample();
        draft.items[0] = LineItem::new("Bulk", Decimal::ONE, Decimal::MAX);
        draft.items[1] = LineItem::new("Free", Decimal::ZERO, dec("5"));
        draft.total = Decimal::MAX;
        let before = draft.clone();

        let err = draft
            .apply_item_field(0, ItemField::Quantity, &FieldValue::from(5i64))
            .unwrap_err();
        assert_eq!(err, DraftError::AmountOverflow { index: 0 });
        assert_eq!(draft, before);
    }

    #[test]
    fn test_status_field() {
        let mut draft = sample();
        draft
            .apply_field(DraftField::Status, &FieldValue::from("Validated"))
            .unwrap();
        assert_eq!(draft.status, InvoiceStatus::Validated);

        let err = draft
            .apply_field(DraftField::Status, &FieldValue::from("archived"))
            .unwrap_err();
        assert_eq!(
            err,
            DraftError::InvalidStatus {
                value: "archived".to_string()
            }
        );
        assert_eq!(draft.status, InvoiceStatus::Validated);
    }

    #[test]
    fn test_text_fields() {
        let mut draft = sample();
        draft
            .apply_field(DraftField::ClientEmail, &FieldValue::from("ap@acme.test"))
            .unwrap();
        draft
            .apply_field(DraftField::InvoiceNumber, &FieldValue::from(1042i64))
            .unwrap();
        assert_eq!(draft.client_email, "ap@acme.test");
        assert_eq!(draft.invoice_number, "1042");
    }

    #[test]
    fn test_recompute_fixes_drift() {
        let mut draft = sample();
        draft.items[0].amount = dec("1");
        draft.total = dec("0");

        assert!(draft.recompute().unwrap());
        assert!(draft.is_consistent());
        assert_eq!(draft.total, dec("25"));
        assert!(!draft.recompute().unwrap());
    }

    #[test]
    fn test_field_names() {
        assert_eq!("clientName".parse::<DraftField>().unwrap(), DraftField::ClientName);
        assert_eq!("unitPrice".parse::<ItemField>().unwrap(), ItemField::UnitPrice);
        assert!(matches!(
            "amount".parse::<ItemField>(),
            Err(DraftError::ReadOnlyField { .. })
        ));
        assert!(matches!(
            "colour".parse::<DraftField>(),
            Err(DraftError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_deserialize_detail() {
        let draft: InvoiceDraft = serde_json::from_value(json!({
            "_id": "abc",
            "invoiceNumber": "INV-7",
            "clientName": "Acme",
            "clientEmail": "a@acme.test",
            "issueDate": "2024-01-01",
            "dueDate": "2024-02-01",
            "status": "paid",
            "items": [{"description": "Work", "quantity": 2, "unitPrice": 12.5, "amount": 25}],
            "total": 25
        }))
        .unwrap();

        assert_eq!(draft.id.as_str(), "abc");
        assert_eq!(draft.status, InvoiceStatus::Paid);
        assert_eq!(draft.items[0].unit_price, dec("12.5"));
        assert!(draft.is_consistent());
    }

    #[test]
    fn test_deserialize_detail_with_both_ids() {
        let draft: InvoiceDraft = serde_json::from_value(json!({
            "_id": "64ab",
            "id": "inv-64ab",
            "status": "pending",
            "items": [{"description": "Work", "quantity": 1, "unitPrice": 5, "amount": 5}],
            "total": 5
        }))
        .unwrap();
        assert_eq!(draft.id.as_str(), "inv-64ab");

        let draft: InvoiceDraft =
            serde_json::from_value(json!({"_id": "64ab", "status": "paid"})).unwrap();
        assert_eq!(draft.id.as_str(), "64ab");
    }

    #[test]
    fn test_deserialize_detail_without_identity_fails() {
        let result = serde_json::from_value::<InvoiceDraft>(json!({"status": "paid"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_draft_reads_back() {
        let draft = sample();
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["id"], "inv-1");
        assert_eq!(serde_json::from_value::<InvoiceDraft>(value).unwrap(), draft);
    }

    #[test]
    fn test_new_item_overflow_is_inconsistent() {
        let item = LineItem::new("Bulk", dec("2"), Decimal::MAX);
        assert_eq!(item.amount, Decimal::ZERO);
        assert!(!item.is_consistent());

        let mut draft = sample();
        draft.items.push(item);
        assert_eq!(
            draft.recompute().unwrap_err(),
            DraftError::AmountOverflow { index: 2 }
        );
    }
}
