//! Simple SDK Example
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package brewline-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package brewline-sdk --example simple
//!    ```

use brewline_sdk::{BrewlineClient, OrderRequest, DEFAULT_URL};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Brewline SDK - Simple Example");
    println!("=============================\n");

    println!("1. Connecting to daemon...");
    let client = BrewlineClient::connect(DEFAULT_URL).await?;
    println!("   ✓ Connected\n");

    println!("2. Brewing four drinks with two baristas...");
    let orders = vec![
        OrderRequest::new(1, "espresso"),
        OrderRequest::new(2, "latte"),
        OrderRequest::new(3, "frappe"),
        OrderRequest::new(4, "matcha"),
    ];
    let results = client.execute_brew(2, orders).await?;

    println!("   ✓ {} orders served:", results.len());
    for result in &results {
        let equipment: Vec<_> = result.steps.iter().map(|s| s.equipment.as_str()).collect();
        println!(
            "     - #{} in {}ms via {}",
            result.order_id,
            result.latency_ms().unwrap_or(0),
            equipment.join(" -> ")
        );
    }
    println!();

    println!("3. Fetching stats...");
    let stats = client.stats().await?;
    println!("   ✓ Batches: {}", stats.total_batches);
    println!("     Orders completed: {}/{}", stats.total_orders_completed, stats.total_orders_submitted);
    println!("     p90 latency: {}ms", stats.p90_latency_ms);

    Ok(())
}
