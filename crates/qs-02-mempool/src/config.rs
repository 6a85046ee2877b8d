//! Mempool configuration.

/// Mempool configuration.
#[derive(Clone, Debug)]
pub struct MempoolConfig {
    /// Enable Replace-by-Fee.
    pub enable_rbf: bool,
    /// Minimum fee bump percentage for RBF.
    pub rbf_min_bump_percent: u64,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            enable_rbf: true,
            rbf_min_bump_percent: 10,
        }
    }
}

impl MempoolConfig {
    /// Creates a minimal config for testing.
    pub fn for_testing() -> Self {
        Self {
            rbf_min_bump_percent: 1,
            ..Default::default()
        }
    }
}
