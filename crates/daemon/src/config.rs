//! Daemon configuration from environment variables
//!
//! Every setting has a default. A value that fails to parse is logged and
//! replaced by its default.

use brewline_api_rpc::RpcServerConfig;
use brewline_core::domain::{EquipmentType, ShopConfig};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const ENV_RPC_HOST: &str = "BREWLINE_RPC_HOST";
pub const ENV_RPC_PORT: &str = "BREWLINE_RPC_PORT";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "BREWLINE_REQUEST_TIMEOUT_MS";
pub const ENV_METRICS_WINDOW: &str = "BREWLINE_METRICS_WINDOW";
const ENV_WORKERS_PREFIX: &str = "BREWLINE_WORKERS_";

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub rpc: RpcServerConfig,
    pub shop: ShopConfig,
}

impl DaemonConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rpc = RpcServerConfig::default();
        if let Some(host) = lookup(ENV_RPC_HOST).filter(|h| !h.trim().is_empty()) {
            rpc.host = host.trim().to_string();
        }
        rpc.port = parse_or(&lookup, ENV_RPC_PORT, rpc.port);
        let timeout_ms = parse_or(
            &lookup,
            ENV_REQUEST_TIMEOUT_MS,
            u64::try_from(rpc.request_timeout.as_millis()).unwrap_or(u64::MAX),
        );
        rpc.request_timeout = Duration::from_millis(timeout_ms);

        let mut shop = ShopConfig::default();
        shop.metrics_window = parse_or(&lookup, ENV_METRICS_WINDOW, shop.metrics_window);
        for equipment in EquipmentType::ALL {
            let key = workers_key(equipment);
            let current = shop.equipment_workers.get(&equipment).copied().unwrap_or(1);
            let workers = parse_or(&lookup, &key, current);
            shop.equipment_workers.insert(equipment, workers);
        }

        Self { rpc, shop }
    }
}

/// `BREWLINE_WORKERS_ESPRESSO_MACHINE` and friends
pub fn workers_key(equipment: EquipmentType) -> String {
    format!("{}{}", ENV_WORKERS_PREFIX, equipment.as_str().to_uppercase())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, ?default, "Invalid config value, using default");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> DaemonConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DaemonConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.rpc.host, "127.0.0.1");
        assert_eq!(config.rpc.port, 9630);
        assert_eq!(config.rpc.request_timeout, Duration::from_millis(2000));
        assert_eq!(config.shop.metrics_window, 1024);
        assert_eq!(
            config.shop.equipment_workers[&EquipmentType::EspressoMachine],
            2
        );
        assert_eq!(config.shop.equipment_workers[&EquipmentType::Grinder], 1);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BREWLINE_RPC_HOST", "0.0.0.0"),
            ("BREWLINE_RPC_PORT", "7000"),
            ("BREWLINE_REQUEST_TIMEOUT_MS", "500"),
            ("BREWLINE_METRICS_WINDOW", "64"),
            ("BREWLINE_WORKERS_GRINDER", "3"),
            ("BREWLINE_WORKERS_MILK_STEAMER", " 2 "),
        ]);

        assert_eq!(config.rpc.host, "0.0.0.0");
        assert_eq!(config.rpc.port, 7000);
        assert_eq!(config.rpc.request_timeout, Duration::from_millis(500));
        assert_eq!(config.shop.metrics_window, 64);
        assert_eq!(config.shop.equipment_workers[&EquipmentType::Grinder], 3);
        assert_eq!(config.shop.equipment_workers[&EquipmentType::MilkSteamer], 2);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("BREWLINE_RPC_PORT", "not-a-port"),
            ("BREWLINE_WORKERS_WHISK", "-1"),
            ("BREWLINE_RPC_HOST", "   "),
        ]);

        assert_eq!(config.rpc.port, 9630);
        assert_eq!(config.rpc.host, "127.0.0.1");
        assert_eq!(config.shop.equipment_workers[&EquipmentType::Whisk], 2);
    }

    #[test]
    fn test_workers_key() {
        assert_eq!(
            workers_key(EquipmentType::EspressoMachine),
            "BREWLINE_WORKERS_ESPRESSO_MACHINE"
        );
    }
}
