use serde::{Deserialize, Serialize};

use crate::core::types::{AmbiguityMode, DistanceModel};

/// Default minimum overlap, in aligned columns, for a valid comparison
pub const DEFAULT_MIN_OVERLAP: usize = 300;

/// Default clustering threshold (3%)
pub const DEFAULT_CLUSTER_THRESHOLD: f64 = 0.03;

/// Immutable settings for one analysis run.
///
/// Passed explicitly into every engine call; there is no global mutable
/// configuration anywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Comparisons spanning fewer defined columns than this are invalid
    pub min_overlap: usize,

    /// Pairwise distance model
    pub distance_model: DistanceModel,

    /// How ambiguity codes take part in identity checks
    pub ambiguity_mode: AmbiguityMode,

    /// Single-linkage clustering threshold, a fraction in [0, 1]
    pub cluster_threshold: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            min_overlap: DEFAULT_MIN_OVERLAP,
            distance_model: DistanceModel::default(),
            ambiguity_mode: AmbiguityMode::default(),
            cluster_threshold: DEFAULT_CLUSTER_THRESHOLD,
        }
    }
}

impl Configuration {
    #[must_use]
    pub fn with_min_overlap(mut self, min_overlap: usize) -> Self {
        self.min_overlap = min_overlap;
        self
    }

    #[must_use]
    pub fn with_distance_model(mut self, model: DistanceModel) -> Self {
        self.distance_model = model;
        self
    }

    #[must_use]
    pub fn with_ambiguity_mode(mut self, mode: AmbiguityMode) -> Self {
        self.ambiguity_mode = mode;
        self
    }

    #[must_use]
    pub fn with_cluster_threshold(mut self, threshold: f64) -> Self {
        self.cluster_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert_eq!(config.min_overlap, 300);
        assert_eq!(config.distance_model, DistanceModel::Uncorrected);
        assert_eq!(config.ambiguity_mode, AmbiguityMode::UseAmbiguous);
        assert!((config.cluster_threshold - 0.03).abs() < f64::EPSILON);
    }

    #[test]
    fn test_builder_chain() {
        let config = Configuration::default()
            .with_min_overlap(10)
            .with_distance_model(DistanceModel::K2p)
            .with_cluster_threshold(0.05);
        assert_eq!(config.min_overlap, 10);
        assert_eq!(config.distance_model, DistanceModel::K2p);
        assert!((config.cluster_threshold - 0.05).abs() < f64::EPSILON);
    }
}
