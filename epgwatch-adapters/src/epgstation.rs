//! EPGStation adapter using the HTTP API.
//!
//! The adapter issues one GET per metric family against
//! `http://<host:port>/api/<path>` and reduces each response with
//! [`crate::decode::reduce`].
//!
//! Transport failures (connection refused, DNS, timeouts, broken bodies) are
//! returned as [`AdapterError`]. A non-2xx status is not an error: the body
//! is decoded like any other response.
//!
//! ## Example
//!
//! ```rust,no_run
//! use epgwatch_adapters::epgstation::EpgStationAdapter;
//! use epgwatch_adapters::MetricFamily;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = EpgStationAdapter::builder()
//!         .target("recorder.local:8888")
//!         .build()?;
//!
//!     let queue = adapter.fetch(MetricFamily::Queue).await?;
//!     println!("Encode queue: {queue}");
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use futures_util::future::try_join_all;
use reqwest::Client;

use epgwatch_types::{CollectionResult, CollectionResultBuilder, MetricFamily};

use crate::decode::{api_path, reduce};
use crate::AdapterError;

/// Default EPGStation address.
pub const DEFAULT_TARGET: &str = "127.0.0.1:8888";

/// EPGStation adapter for collecting server metrics.
#[derive(Debug, Clone)]
pub struct EpgStationAdapter {
    client: Client,
    target: String,
}

impl EpgStationAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> EpgStationAdapterBuilder {
        EpgStationAdapterBuilder::default()
    }

    /// The `host:port` this adapter talks to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Full URL for an API path.
    pub fn api_url(&self, path: &str) -> String {
        format!("http://{}/api/{}", self.target, path)
    }

    /// Issue a GET against an API path and return the raw body.
    pub async fn get_api(&self, path: &str) -> Result<Vec<u8>, AdapterError> {
        let url = self.api_url(path);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, %status, "API returned non-success status, decoding body anyway");
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AdapterError::Body(e.to_string()))?;

        tracing::debug!(%url, bytes = body.len(), "Fetched");
        Ok(body.to_vec())
    }

    /// Fetch and reduce a single metric family.
    pub async fn fetch(&self, family: MetricFamily) -> Result<f64, AdapterError> {
        let body = self.get_api(api_path(family)).await?;
        Ok(reduce(family, &body))
    }

    /// Collect every metric family.
    ///
    /// The requests are issued concurrently. The first transport error
    /// aborts the pass and no partial result is returned.
    pub async fn collect(&self) -> Result<CollectionResult, AdapterError> {
        let fetches = MetricFamily::ALL.iter().map(|&family| async move {
            let value = self.fetch(family).await?;
            Ok::<_, AdapterError>((family, value))
        });

        let values = try_join_all(fetches).await?;

        Ok(values
            .into_iter()
            .collect::<CollectionResultBuilder>()
            .build())
    }
}

/// Builder for EpgStationAdapter.
#[derive(Debug, Default)]
pub struct EpgStationAdapterBuilder {
    target: Option<String>,
    timeout: Option<Duration>,
}

impl EpgStationAdapterBuilder {
    /// Set the server address as `host:port` (default: "127.0.0.1:8888").
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the server address from separate host and port.
    pub fn host_port(self, host: &str, port: &str) -> Self {
        self.target(format!("{host}:{port}"))
    }

    /// Set a request timeout. No timeout is applied unless one is set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<EpgStationAdapter, AdapterError> {
        let target = self.target.unwrap_or_else(|| DEFAULT_TARGET.to_string());
        if target.trim().is_empty() {
            return Err(AdapterError::InvalidEndpoint("empty host:port".to_string()));
        }

        let mut client = Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        let client = client.build().map_err(|e| AdapterError::Http(e.to_string()))?;

        Ok(EpgStationAdapter { client, target })
    }
}
