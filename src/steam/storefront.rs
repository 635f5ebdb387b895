// Storefront metadata fetcher.
// One `appdetails` lookup per app id, classified, retried, and memoized.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::{Result, ShelfError};
use crate::retry::RetryPolicy;

use super::types::{AppDetailsEnvelope, StoreAppDetail};

const STORE_API_BASE: &str = "https://store.steampowered.com";

/// A hung storefront request must not stall the whole run.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// One raw `appdetails` lookup.
///
/// Implementations classify the outcome: `Err(NotFound)` when the app has no
/// store page (terminal, never retried), transient errors for everything
/// that might succeed on a retry.
pub trait DetailTransport {
    async fn fetch(&self, app_id: u64) -> Result<StoreAppDetail>;
}

/// HTTP transport against the public storefront endpoint.
pub struct HttpDetailTransport {
    client: Client,
    base_url: String,
}

impl HttpDetailTransport {
    pub fn new() -> Result<Self> {
        Self::with_base_url(STORE_API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }
}

impl DetailTransport for HttpDetailTransport {
    async fn fetch(&self, app_id: u64) -> Result<StoreAppDetail> {
        let url = format!("{}/api/appdetails", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("appids", app_id.to_string())])
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShelfError::Transient(format!(
                "appdetails for {} returned HTTP {}",
                app_id, status
            )));
        }

        let mut envelope: AppDetailsEnvelope = response.json().await?;
        let entry = envelope
            .remove(&app_id.to_string())
            .ok_or_else(|| ShelfError::Transient(format!("appdetails for {} missing entry", app_id)))?;

        if !entry.success {
            return Err(ShelfError::NotFound(format!("app {} has no store page", app_id)));
        }

        entry
            .data
            .ok_or_else(|| ShelfError::Transient(format!("appdetails for {} missing data", app_id)))
    }
}

/// Storefront fetcher with per-session memoization and bounded retry.
pub struct Storefront<T: DetailTransport> {
    transport: T,
    retry: RetryPolicy,
    memo: HashMap<u64, StoreAppDetail>,
}

impl Storefront<HttpDetailTransport> {
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(
            HttpDetailTransport::new()?,
            RetryPolicy::storefront(),
        ))
    }
}

impl<T: DetailTransport> Storefront<T> {
    pub fn with_transport(transport: T, retry: RetryPolicy) -> Self {
        Self {
            transport,
            retry,
            memo: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn transport_for_tests(&self) -> &T {
        &self.transport
    }

    /// Fetch store metadata for an app.
    ///
    /// `Ok(Some)` is a successful (and now memoized) lookup; `Ok(None)` means
    /// the retry budget was exhausted and the caller should fall back to
    /// library-only data; `Err(NotFound)` means the app has no store page.
    pub async fn app_details(&mut self, app_id: u64) -> Result<Option<StoreAppDetail>> {
        if let Some(detail) = self.memo.get(&app_id) {
            return Ok(Some(detail.clone()));
        }

        let transport = &self.transport;
        let result = self.retry.run(|| transport.fetch(app_id)).await?;

        match result {
            Some(detail) => {
                self.memo.insert(app_id, detail.clone());
                Ok(Some(detail))
            }
            None => {
                debug!(app_id, "store lookup exhausted retries");
                Ok(None)
            }
        }
    }
}
