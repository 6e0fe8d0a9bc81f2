//! JSON-RPC Server
//!
//! Serves the brew engine over JSON-RPC 2.0 on TCP.

use crate::handler::{RpcHandler, DEFAULT_REQUEST_TIMEOUT};
use crate::types::ExecuteBrewRequest;
use brewline_core::port::BrewService;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9630;

pub const METHOD_EXECUTE_BREW: &str = "brew.execute.v1";
pub const METHOD_STATS: &str = "admin.stats.v1";

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    /// 0 binds an ephemeral port; read it back from `RunningServer::local_addr`
    pub port: u16,
    pub request_timeout: Duration,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// A started server
pub struct RunningServer {
    pub handle: ServerHandle,
    pub local_addr: SocketAddr,
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<dyn BrewService>) -> Self {
        let handler = Arc::new(RpcHandler::new(service, config.request_timeout));
        Self { config, handler }
    }

    /// Bind and start serving. Returns once the listener is up.
    pub async fn start(self) -> Result<RunningServer, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method(METHOD_EXECUTE_BREW, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ExecuteBrewRequest = params.parse()?;
                    handler.execute_brew(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        // Takes no parameters; anything sent is ignored
        let handler = self.handler.clone();
        module
            .register_async_method(METHOD_STATS, move |_, _, _| {
                let handler = handler.clone();
                async move { handler.stats().await }
            })
            .map_err(|e| e.to_string())?;

        info!(
            %local_addr,
            request_timeout = ?self.config.request_timeout,
            "JSON-RPC server started"
        );

        let handle = server.start(module);
        Ok(RunningServer { handle, local_addr })
    }
}
