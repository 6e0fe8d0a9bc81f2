//! RPC Method Handlers
//!
//! Validates requests before any concurrent work starts, attaches the
//! per-request deadline, and maps between wire and domain types.

use crate::error::to_rpc_error;
use crate::mapper::{to_domain_order, to_response};
use crate::types::{ExecuteBrewRequest, ExecuteBrewResponse, StatsResponse};
use brewline_core::error::AppError;
use brewline_core::port::BrewService;
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Default per-request deadline
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<dyn BrewService>,
    request_timeout: Duration,
}

impl RpcHandler {
    pub fn new(service: Arc<dyn BrewService>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }

    /// brew.execute.v1
    ///
    /// Orders still unfinished when the deadline passes are left out of the
    /// response; that is a successful, partial answer.
    pub async fn execute_brew(
        &self,
        params: ExecuteBrewRequest,
    ) -> Result<ExecuteBrewResponse, ErrorObjectOwned> {
        validate(&params).map_err(to_rpc_error)?;

        let orders: Vec<_> = params.orders.iter().map(to_domain_order).collect();
        let baristas = params.baristas as usize;
        info!(orders = orders.len(), baristas, "Incoming brew request");

        // Dropping the request (client gone) cancels the batch as well
        let deadline = CancellationToken::new();
        let _request_guard = deadline.clone().drop_guard();

        let brew = self
            .service
            .execute_brew(deadline.clone(), orders, baristas);
        tokio::pin!(brew);

        let results = tokio::select! {
            results = &mut brew => results,
            _ = tokio::time::sleep(self.request_timeout) => {
                deadline.cancel();
                brew.await
            }
        };

        Ok(to_response(results))
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        Ok(self.service.stats().into())
    }
}

/// Reject malformed batches before they reach the engine
pub fn validate(params: &ExecuteBrewRequest) -> Result<(), AppError> {
    if params.baristas < 1 {
        return Err(AppError::Validation(
            "at least 1 barista is required".to_string(),
        ));
    }
    if params.orders.is_empty() {
        return Err(AppError::Validation(
            "at least 1 order is required".to_string(),
        ));
    }
    if let Some(index) = params.orders.iter().position(|o| o.id <= 0) {
        return Err(AppError::Validation(format!(
            "invalid order id at index {}",
            index
        )));
    }
    Ok(())
}
