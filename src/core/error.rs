//! Typed error handling for invoice-desk
//!
//! Every failure in this crate is recoverable by the caller; the categories
//! below tell it which recovery applies.
//!
//! # Error Categories
//!
//! - [`FetchError`]: listing or loading invoices from the remote API failed.
//!   The caller keeps showing its last good collection.
//! - [`SaveError`]: the remote API did not acknowledge an update. The draft
//!   stays open with the user's edits intact.
//! - [`DraftError`]: a single draft mutation was rejected. The rest of the
//!   draft is untouched.
//! - [`ConfigError`]: client configuration could not be loaded.
//!
//! # Example
//!
//! ```rust,ignore
//! match editor.set_item_field(&handle, 4, ItemField::Quantity, "2") {
//!     Ok(()) => {}
//!     Err(DraftError::IndexOutOfRange { index, len }) => {
//!         println!("line {} does not exist ({} lines)", index, len);
//!     }
//!     Err(e) => eprintln!("rejected: {}", e),
//! }
//! ```

use crate::core::record::{IdentityKey, RecordError};
use thiserror::Error;

/// The umbrella error type for invoice-desk operations
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Listing or loading from the remote API failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Persisting a draft failed
    #[error(transparent)]
    Save(#[from] SaveError),

    /// A draft mutation was rejected
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl InvoiceError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            InvoiceError::Fetch(_) => "FETCH_FAILED",
            InvoiceError::Save(_) => "SAVE_FAILED",
            InvoiceError::Draft(e) => e.error_code(),
            InvoiceError::Config(_) => "CONFIG_ERROR",
        }
    }
}

// =============================================================================
// Remote boundary errors
// =============================================================================

/// Listing invoices failed: transport, decoding, or a response that
/// reported `success: false`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to load invoices: {message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<RecordError> for FetchError {
    fn from(err: RecordError) -> Self {
        FetchError::new(err.to_string())
    }
}

/// The remote API rejected an update or could not be reached
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to update invoice: {message}")]
pub struct SaveError {
    pub message: String,
}

impl SaveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Draft errors
// =============================================================================

/// A draft operation that was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// Status value outside Pending / Validated / Paid
    #[error("Invalid status '{value}': expected pending, validated or paid")]
    InvalidStatus { value: String },

    /// No line item at this position
    #[error("Line item {index} does not exist (draft has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The invoice cannot be opened for editing
    #[error("Invoice '{id}' cannot be edited: {reason}")]
    NotEditable { id: IdentityKey, reason: String },

    /// A mutator was called with no open draft, or with a handle that no
    /// longer refers to the open draft
    #[error("No invoice is currently being edited")]
    NoActiveDraft,

    /// Only one draft may be open at a time
    #[error("Invoice '{id}' is already being edited")]
    DraftAlreadyOpen { id: IdentityKey },

    /// Field name not recognised
    #[error("Unknown field '{field}'")]
    UnknownField { field: String },

    /// Field is computed and cannot be set directly
    #[error("Field '{field}' is derived and cannot be set")]
    ReadOnlyField { field: String },

    /// Recomputing amounts exceeded the decimal range
    #[error("Amount of line item {index} is out of range")]
    AmountOverflow { index: usize },
}

impl DraftError {
    pub fn error_code(&self) -> &'static str {
        match self {
            DraftError::InvalidStatus { .. } => "INVALID_STATUS",
            DraftError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            DraftError::NotEditable { .. } => "NOT_EDITABLE",
            DraftError::NoActiveDraft => "NO_ACTIVE_DRAFT",
            DraftError::DraftAlreadyOpen { .. } => "DRAFT_ALREADY_OPEN",
            DraftError::UnknownField { .. } => "UNKNOWN_FIELD",
            DraftError::ReadOnlyField { .. } => "READ_ONLY_FIELD",
            DraftError::AmountOverflow { .. } => "AMOUNT_OVERFLOW",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

fn describe_file(file: &Option<String>) -> String {
    file.as_ref()
        .map(|file| format!(" file '{}'", file))
        .unwrap_or_default()
}

/// Errors related to configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", describe_file(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },

    /// A seed invoice failed validation
    #[error("Seed invoice #{index} is invalid: {message}")]
    InvalidSeed { index: usize, message: String },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for invoice-desk operations
pub type InvoiceResult<T> = Result<T, InvoiceError>;
