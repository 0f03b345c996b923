//! Donor matching configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the geo-proximity donor matching layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Default search radius in kilometers when the caller supplies none.
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    /// Upper bound on the search radius in kilometers.
    #[serde(default = "default_max_radius_km")]
    pub max_radius_km: f64,
    /// Maximum number of donors notified per request.
    #[serde(default = "default_max_matches")]
    pub max_matches: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            max_radius_km: default_max_radius_km(),
            max_matches: default_max_matches(),
        }
    }
}

fn default_radius_km() -> f64 {
    20.0
}

fn default_max_radius_km() -> f64 {
    200.0
}

fn default_max_matches() -> usize {
    100
}
