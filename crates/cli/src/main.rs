//! Brewline CLI - Command-line interface for the Brewline daemon

use anyhow::{Context, Result};
use brewline_sdk::{BrewlineClient, OrderRequest, OrderResult, DEFAULT_URL};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tabled::{Table, Tabled};

#[derive(Parser)]
#[command(name = "brewline")]
#[command(about = "Brewline coffee shop CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "BREWLINE_RPC_URL", default_value = DEFAULT_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Brew a batch of orders
    Brew {
        /// Number of concurrent baristas
        #[arg(short, long, default_value = "1")]
        baristas: i64,

        /// Orders as ID:DRINK (e.g., 1:latte 2:espresso)
        #[arg(required = true, value_parser = parse_order)]
        orders: Vec<OrderRequest>,
    },

    /// Show order statistics
    Stats,
}

#[derive(Tabled)]
struct OrderRow {
    order: i64,
    steps: String,
    start_ms: i64,
    latency_ms: String,
    queued_ms: i64,
}

impl From<&OrderResult> for OrderRow {
    fn from(result: &OrderResult) -> Self {
        let steps: Vec<_> = result.steps.iter().map(|s| s.equipment.as_str()).collect();
        Self {
            order: result.order_id,
            steps: if steps.is_empty() {
                "-".to_string()
            } else {
                steps.join(" > ")
            },
            start_ms: result.steps.first().map(|s| s.start_ms).unwrap_or(0),
            latency_ms: result
                .latency_ms()
                .map(|ms| ms.to_string())
                .unwrap_or_else(|| "-".to_string()),
            queued_ms: result.steps.iter().map(|s| s.queued_ms()).sum(),
        }
    }
}

/// `ID:DRINK`
fn parse_order(raw: &str) -> Result<OrderRequest, String> {
    let (id, drink) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected ID:DRINK, got '{}'", raw))?;
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid order id '{}': {}", id, e))?;
    Ok(OrderRequest::new(id, drink.trim()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = BrewlineClient::connect(&cli.rpc_url)
        .await
        .context("Failed to connect to daemon")?;

    match cli.command {
        Commands::Brew { baristas, orders } => {
            let submitted = orders.len();
            let results = client
                .execute_brew(baristas, orders)
                .await
                .context("Brew request failed")?;

            let summary = format!("✓ {}/{} orders served", results.len(), submitted);
            if results.len() == submitted {
                println!("{}", summary.green().bold());
            } else {
                println!("{}", summary.yellow().bold());
            }
            println!();

            if !results.is_empty() {
                let rows: Vec<OrderRow> = results.iter().map(OrderRow::from).collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Stats => {
            println!("{}", "Shop Statistics".cyan().bold());
            println!();

            match client.stats().await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Batches:".bold(), stats.total_batches);
                    println!("  {} {}", "Orders Submitted:".bold(), stats.total_orders_submitted);
                    println!("  {} {}", "Orders Completed:".bold(), stats.total_orders_completed);
                    println!("  {} {} ms", "p90 Latency:".bold(), stats.p90_latency_ms);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewline_sdk::StepResult;

    #[test]
    fn test_parse_order() {
        assert_eq!(parse_order("12:latte").unwrap(), OrderRequest::new(12, "latte"));
        assert_eq!(parse_order(" 3 : matcha ").unwrap(), OrderRequest::new(3, "matcha"));
        assert!(parse_order("latte").is_err());
        assert!(parse_order("x:latte").is_err());
    }

    #[test]
    fn test_cli_parses_brew() {
        let cli = Cli::try_parse_from(["brewline", "brew", "-b", "3", "1:latte", "2:espresso"])
            .unwrap();
        match cli.command {
            Commands::Brew { baristas, orders } => {
                assert_eq!(baristas, 3);
                assert_eq!(orders.len(), 2);
                assert_eq!(orders[1], OrderRequest::new(2, "espresso"));
            }
            Commands::Stats => panic!("expected brew"),
        }
    }

    #[test]
    fn test_order_row() {
        let row = OrderRow::from(&OrderResult {
            order_id: 4,
            steps: vec![
                StepResult {
                    equipment: "grinder".into(),
                    start_ms: 50,
                    end_ms: 55,
                    hold_start_ms: 50,
                    hold_end_ms: 55,
                },
                StepResult {
                    equipment: "blender".into(),
                    start_ms: 55,
                    end_ms: 67,
                    hold_start_ms: 55,
                    hold_end_ms: 67,
                },
            ],
        });
        assert_eq!(row.steps, "grinder > blender");
        assert_eq!(row.latency_ms, "17");
        assert_eq!(row.queued_ms, 0);
    }
}
