//! InvoiceSource backed by the remote invoice REST API
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `GET  /invoices`       → `{ "success": bool, "invoices": [...], "message"? }`
//! - `GET  /invoices/{id}`  → the invoice, bare or as `{ "success", "invoice", "message"? }`
//! - `PUT  /invoices/{id}`  ← the full draft as camelCase JSON

use crate::config::ApiConfig;
use crate::core::draft::InvoiceDraft;
use crate::core::record::IdentityKey;
use crate::core::source::{InvoiceSource, ListResponse, UpdateResponse};
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize)]
#[serde(untagged)]
enum DetailResponse {
    Wrapped {
        success: bool,
        #[serde(default)]
        invoice: Option<InvoiceDraft>,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(InvoiceDraft),
}

/// HTTP client for the remote invoice API
#[derive(Clone)]
pub struct HttpInvoiceSource {
    client: Client,
    base_url: Url,
}

impl HttpInvoiceSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API base URL '{}'", base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("API base URL '{}' cannot have paths appended", base_url);
        }
        Ok(Self { client, base_url })
    }

    /// Build from the `api` section of the client configuration.
    ///
    /// `timeout_secs` bounds each request; without it reqwest's default applies.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Self::with_client(client, &config.base_url)
    }

    fn invoices_url(&self, id: Option<&IdentityKey>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("invoices");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }
}

#[async_trait]
impl InvoiceSource for HttpInvoiceSource {
    async fn list(&self) -> Result<ListResponse> {
        let url = self.invoices_url(None);
        tracing::debug!(%url, "GET invoice list");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Invoice list request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {}", status);
        }

        response
            .json::<ListResponse>()
            .await
            .context("Invalid invoice list response")
    }

    async fn get(&self, id: &IdentityKey) -> Result<InvoiceDraft> {
        let url = self.invoices_url(Some(id));
        tracing::debug!(%url, "GET invoice");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Invoice request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {}", status);
        }

        let detail = response
            .json::<DetailResponse>()
            .await
            .context("Invalid invoice response")?;

        match detail {
            DetailResponse::Bare(invoice) => Ok(invoice),
            DetailResponse::Wrapped {
                success: true,
                invoice: Some(invoice),
                ..
            } => Ok(invoice),
            DetailResponse::Wrapped { message, .. } => Err(anyhow!(
                message.unwrap_or_else(|| format!("Invoice {} is not available", id))
            )),
        }
    }

    async fn update(&self, draft: &InvoiceDraft) -> Result<UpdateResponse> {
        let url = self.invoices_url(Some(&draft.id));
        tracing::debug!(%url, "PUT invoice");

        let response = self
            .client
            .put(url)
            .json(draft)
            .send()
            .await
            .context("Invoice update request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Ok(UpdateResponse::rejected(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .context("Failed to read update response")?;
        Ok(interpret_update_body(&body))
    }
}

/// Read a 2xx update body.
///
/// Empty bodies and servers that echo the invoice back acknowledge; a
/// `success` flag is taken at its word; a body that is not JSON is refused.
fn interpret_update_body(body: &str) -> UpdateResponse {
    if body.trim().is_empty() {
        return UpdateResponse::acknowledged();
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => serde_json::from_value::<UpdateResponse>(value)
            .unwrap_or_else(|_| UpdateResponse::acknowledged()),
        Err(e) => {
            tracing::warn!(error = %e, "Update response is not valid JSON");
            UpdateResponse::rejected(format!("Invalid update response: {}", e))
        }
    }
}
