//! Client configuration loading and management

use crate::core::error::ConfigError;
use crate::core::record::{IdentityKey, InvoiceRecord, RecordOrigin, WireInvoice};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Where the remote invoice API lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout handed to the HTTP client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

/// Complete client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,

    /// Invoices bundled with the client, shown ahead of remote ones
    #[serde(default)]
    pub seed: Vec<WireInvoice>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::from(e),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validate the seed entries into list records
    pub fn seed_records(&self) -> Result<Vec<InvoiceRecord>, ConfigError> {
        self.seed
            .iter()
            .enumerate()
            .map(|(index, invoice)| {
                invoice
                    .clone()
                    .into_record(RecordOrigin::Seed)
                    .map_err(|e| ConfigError::InvalidSeed {
                        index,
                        message: e.to_string(),
                    })
            })
            .collect()
    }

    /// Configuration with the built-in seed invoices
    pub fn default_config() -> Self {
        let seed = [
            ("1", "Entreprise Martin", "FAC-2023-001", "15/05/2023", 125050, 2, "Pending"),
            ("2", "Tech Solutions", "FAC-2023-002", "18/05/2023", 3750, 0, "Validated"),
            ("3", "Bureau Pro", "FAC-2023-003", "01/05/2023", 87525, 2, "Paid"),
            ("4", "Librairie Centrale", "FAC-2023-004", "22/05/2023", 450, 0, "Pending"),
            ("5", "Fournitures Express", "FAC-2023-005", "25/05/2023", 1200, 0, "Pending"),
            ("6", "Design Moderne", "FAC-2023-006", "27/05/2023", 2800, 0, "Validated"),
            ("7", "Transport Rapide", "FAC-2023-007", "28/05/2023", 65075, 2, "Paid"),
        ]
        .into_iter()
        .map(|(id, company, number, date, cents, scale, status)| WireInvoice {
            id: IdentityKey::new(id),
            company: Some(company.to_string()),
            number: Some(number.to_string()),
            date: Some(date.to_string()),
            amount: Some(Decimal::new(cents, scale)),
            status: Some(status.to_string()),
            ..WireInvoice::default()
        })
        .collect();

        Self {
            api: ApiConfig::default(),
            seed,
            logging: LoggingConfig::default(),
        }
    }
}
