//! Invoice summary records and their normalization at ingestion
//!
//! Two sources feed the invoice list: the bundled seed set and the remote
//! API. They name the same things differently (`company` vs `clientName`,
//! `id` vs `_id`, `"Pending"` vs `"pending"`). [`WireInvoice`] accepts every
//! spelling; [`WireInvoice::into_record`] validates it into the one strict
//! [`InvoiceRecord`] shape the rest of the crate works with.

use crate::core::status::InvoiceStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Normalized identity of an invoice, used to de-duplicate across sources
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Build a key from raw text; surrounding whitespace is dropped.
    ///
    /// Returns `None` if nothing is left.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Primary keys arrive as strings, bare numbers, or Mongo-style `{"$oid": ".."}`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    ObjectId {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl RawId {
    fn into_text(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Unsigned(n) => n.to_string(),
            RawId::Signed(n) => n.to_string(),
            RawId::ObjectId { oid } => oid,
        }
    }
}

impl<'de> Deserialize<'de> for IdentityKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawId::deserialize(deserializer)?.into_text();
        IdentityKey::new(&raw).ok_or_else(|| serde::de::Error::custom("identity key is empty"))
    }
}

/// Where a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    /// Bundled with the client
    Seed,
    /// Listed by the remote invoice API
    Remote,
}

/// One invoice as shown in the list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: IdentityKey,
    pub company: String,
    pub number: String,
    pub date: String,
    pub amount: Decimal,
    pub status: InvoiceStatus,
    pub origin: RecordOrigin,
}

impl InvoiceRecord {
    /// Only records backed by the remote API have a detailed form to edit
    pub fn is_editable(&self) -> bool {
        self.origin == RecordOrigin::Remote
    }
}

/// Why a wire record could not be accepted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("invoice record has neither 'id' nor '_id'")]
    MissingIdentity,

    #[error("invoice '{id}' has no status")]
    MissingStatus { id: IdentityKey },

    #[error("invoice '{id}' has unknown status '{value}'")]
    UnknownStatus { id: IdentityKey, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorDetails {
    #[serde(default)]
    pub name: Option<String>,
}

/// Invoice summary as any source may spell it.
///
/// Every field is optional; alternatives are resolved in declaration order
/// by [`WireInvoice::into_record`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireInvoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdentityKey>,
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<IdentityKey>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, rename = "clientName", skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_details: Option<VendorDetails>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, rename = "invoiceNumber", skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, rename = "invoice_number", skip_serializing_if = "Option::is_none")]
    pub invoice_number_snake: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, rename = "issueDate", skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

fn first_text(candidates: [Option<String>; 3]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

impl WireInvoice {
    /// The identity this record will be known by: `id`, else `_id`
    pub fn identity(&self) -> Option<&IdentityKey> {
        self.id.as_ref().or(self.object_id.as_ref())
    }

    /// Validate into the canonical record, tagging where it came from
    pub fn into_record(self, origin: RecordOrigin) -> Result<InvoiceRecord, RecordError> {
        let id = self
            .identity()
            .cloned()
            .ok_or(RecordError::MissingIdentity)?;

        let raw_status = self
            .status
            .ok_or_else(|| RecordError::MissingStatus { id: id.clone() })?;
        let status =
            InvoiceStatus::parse(&raw_status).ok_or_else(|| RecordError::UnknownStatus {
                id: id.clone(),
                value: raw_status.clone(),
            })?;

        let company = first_text([
            self.company,
            self.client_name,
            self.vendor_details.and_then(|vendor| vendor.name),
        ])
        .unwrap_or_else(|| "Unknown".to_string());

        let number =
            first_text([self.number, self.invoice_number, self.invoice_number_snake])
                .unwrap_or_default();

        let date = first_text([self.date, self.issue_date, self.invoice_date]).unwrap_or_default();

        let amount = self
            .amount
            .or(self.total)
            .or(self.total_amount)
            .unwrap_or(Decimal::ZERO);

        Ok(InvoiceRecord {
            id,
            company,
            number,
            date,
            amount,
            status,
            origin,
        })
    }
}

impl From<&InvoiceRecord> for WireInvoice {
    fn from(record: &InvoiceRecord) -> Self {
        WireInvoice {
            id: Some(record.id.clone()),
            company: Some(record.company.clone()),
            number: Some(record.number.clone()),
            date: Some(record.date.clone()),
            amount: Some(record.amount),
            status: Some(record.status.label().to_string()),
            ..WireInvoice::default()
        }
    }
}
