//! Threshold clustering: partition, classification, and diagnostics.

pub mod classify;
pub mod engine;
pub mod overlap;

pub use classify::{Cluster, ClusterRow, ClusterRunSummary, ConsensusSets};
pub use engine::partition;
pub use overlap::{OverlapConflict, SpeciesRow};

use crate::core::cancel::{CancelToken, Cancelled};
use crate::core::config::Configuration;
use crate::core::corpus::Corpus;
use crate::distance::cache::DistanceCache;

/// Everything the clustering stage reports.
#[derive(Debug, Clone)]
pub struct ClusterReport {
    pub clusters: Vec<Cluster>,
    pub rows: Vec<ClusterRow>,
    pub species_rows: Vec<SpeciesRow>,
    pub overlap_conflicts: Vec<OverlapConflict>,
    pub consensus: ConsensusSets,
    pub summary: ClusterRunSummary,
}

/// Partition the corpus and classify every cluster.
pub fn analyze(
    corpus: &Corpus,
    cache: &mut DistanceCache,
    config: &Configuration,
    cancel: &CancelToken,
) -> Result<ClusterReport, Cancelled> {
    let partition = engine::partition(corpus, cache, config, cancel)?;
    let (species_rows, overlap_conflicts) =
        overlap::species_cross_reference(corpus, &partition, config);
    let (clusters, consensus, summary) =
        classify::classify_partition(partition, corpus, cache, config, cancel)?;

    let rows = clusters
        .iter()
        .enumerate()
        .map(|(index, cluster)| cluster.row(index + 1))
        .collect();

    Ok(ClusterReport {
        clusters,
        rows,
        species_rows,
        overlap_conflicts,
        consensus,
        summary,
    })
}
