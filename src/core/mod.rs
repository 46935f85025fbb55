//! Core module containing the invoice model, error taxonomy and the
//! remote source abstraction

pub mod draft;
pub mod error;
pub mod field;
pub mod record;
pub mod source;
pub mod status;

pub use draft::{DraftField, InvoiceDraft, ItemField, LineItem};
pub use error::{ConfigError, DraftError, FetchError, InvoiceError, InvoiceResult, SaveError};
pub use field::FieldValue;
pub use record::{IdentityKey, InvoiceRecord, RecordError, RecordOrigin, WireInvoice};
pub use source::{InvoiceSource, ListResponse, UpdateResponse};
pub use status::{InvoiceStatus, StatusFilter};
