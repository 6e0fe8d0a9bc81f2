//! Brewline SDK - Rust Client Library
//!
//! Client for the Brewline daemon's JSON-RPC API.
//!
//! # Example
//!
//! ```no_run
//! use brewline_sdk::{BrewlineClient, OrderRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BrewlineClient::connect("http://127.0.0.1:9630").await?;
//!
//!     let results = client
//!         .execute_brew(
//!             2,
//!             vec![OrderRequest::new(1, "latte"), OrderRequest::new(2, "espresso")],
//!         )
//!         .await?;
//!
//!     for result in &results {
//!         println!("order {} took {:?}ms", result.order_id, result.latency_ms());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{BrewlineClient, DEFAULT_URL};
pub use error::{Result, SdkError};
pub use types::{OrderRequest, OrderResult, StatsResponse, StepResult};
