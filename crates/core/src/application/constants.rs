// Engine constants (No magic values)

/// Quantile reported by the stats endpoint
pub const P90_QUANTILE: f64 = 0.9;

/// Minimum worker count for an equipment pool
pub const MIN_POOL_WORKERS: usize = 1;

/// Minimum barista count for a batch
pub const MIN_BARISTAS: usize = 1;
