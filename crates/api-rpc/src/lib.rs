//! JSON-RPC API Layer
//!
//! Exposes the brew engine over JSON-RPC 2.0: request validation, the
//! per-request deadline, and mapping between wire and domain types.

pub mod error;
pub mod handler;
pub mod mapper;
pub mod server;
pub mod types;

pub use handler::RpcHandler;
pub use server::{RpcServer, RpcServerConfig, RunningServer};
