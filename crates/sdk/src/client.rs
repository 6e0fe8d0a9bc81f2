//! Brewline Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{ExecuteBrewResponse, OrderRequest, OrderResult, StatsResponse};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://127.0.0.1:9630";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Brewline daemon client
///
/// # Example
///
/// ```no_run
/// use brewline_sdk::{BrewlineClient, OrderRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = BrewlineClient::connect("http://127.0.0.1:9630").await?;
/// let results = client
///     .execute_brew(2, vec![OrderRequest::new(1, "latte")])
///     .await?;
/// println!("{} orders served", results.len());
/// # Ok(())
/// # }
/// ```
pub struct BrewlineClient {
    client: HttpClient,
}

impl BrewlineClient {
    /// Connect to the daemon at `url` (e.g., `http://127.0.0.1:9630`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        Self::connect_with_timeout(url, DEFAULT_REQUEST_TIMEOUT).await
    }

    pub async fn connect_with_timeout(url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(timeout)
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Brew a batch with `baristas` concurrent baristas.
    ///
    /// Returns only the orders that finished before the daemon's request
    /// deadline, in completion order.
    pub async fn execute_brew(
        &self,
        baristas: i64,
        orders: Vec<OrderRequest>,
    ) -> Result<Vec<OrderResult>> {
        let mut params = ObjectParams::new();
        params.insert("baristas", baristas)?;
        params.insert("orders", orders)?;

        let response: ExecuteBrewResponse =
            self.client.request("brew.execute.v1", params).await?;

        Ok(response.results)
    }

    /// Process-wide order statistics
    pub async fn stats(&self) -> Result<StatsResponse> {
        let response: StatsResponse = self.client.request("admin.stats.v1", rpc_params![]).await?;

        Ok(response)
    }
}
