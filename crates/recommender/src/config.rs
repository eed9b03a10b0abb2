//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Default number of distinct frequency levels turned into clusters
pub const DEFAULT_MAX_CLUSTERS: usize = 5;

/// Tunables for the recommendation engine.
///
/// ```ignore
/// let config = EngineConfig::default().with_max_clusters(3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How many of a member's distinct genre counts become clusters
    pub max_clusters: usize,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            max_clusters: DEFAULT_MAX_CLUSTERS,
        }
    }

    /// Configure how many frequency levels are kept (default: 5)
    pub fn with_max_clusters(mut self, max_clusters: usize) -> Self {
        self.max_clusters = max_clusters;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
