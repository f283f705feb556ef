/// Continuous imbalance is penalized two orders of magnitude below
/// categorical imbalance.
pub const CONTINUOUS_WEIGHT: f64 = 0.01;

/// Progress is reported on every Nth iteration of a solve (0-indexed).
pub const PROGRESS_INTERVAL: usize = 500;

/// Upper bound on random draws while looking for a swappable pair.
pub const DEFAULT_MAX_SWAP_ATTEMPTS: usize = 100_000;

/// Name of the assignment column appended to written tables.
pub const GROUP_COLUMN: &str = "group";
