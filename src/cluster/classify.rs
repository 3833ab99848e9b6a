//! Per-cluster taxonomic classification and report rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consensus::{self, ConsensusRecord};
use crate::core::cancel::{CancelToken, Cancelled};
use crate::core::config::Configuration;
use crate::core::corpus::{Corpus, SpeciesCensus};
use crate::core::record::SequenceRecord;
use crate::core::types::{ClusterTag, SequenceId};
use crate::distance::cache::DistanceCache;
use crate::utils::round::percentage;

/// One threshold-connected group with its derived classification.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Members in corpus order
    pub members: Vec<SequenceId>,

    pub tag: ClusterTag,

    /// Distinct species keys inside (unnamed members count individually)
    pub species_count: usize,

    /// Largest valid pairwise distance observed between two members
    pub max_pairwise_distance: Option<f64>,

    /// The max distance exceeds the clustering threshold (chaining)
    pub threshold_violation: bool,

    /// Percentage of valid member comparisons above the threshold
    pub percent_over_threshold: f64,

    /// Consensus of the members; None when the fold failed
    pub consensus: Option<ConsensusRecord>,

    pub consensus_failed: bool,
}

/// Flat per-cluster report row for the export collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRow {
    /// 1-based cluster number
    pub cluster_index: usize,
    pub sequence_count: usize,
    pub species_count: usize,
    pub max_pairwise_distance: Option<f64>,
    pub percent_over_threshold: f64,
    pub tag: ClusterTag,
    pub threshold_violation: bool,
    pub consensus_failed: bool,
}

/// Run-level totals over all clusters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterRunSummary {
    pub cluster_count: usize,
    pub threshold_violations: usize,
    /// Largest valid pairwise distance observed inside any cluster
    pub largest_pairwise_distance: f64,
    pub single_species_clusters: usize,
    /// Clusters matching traditional taxonomy exactly
    pub perfect_clusters: usize,
    pub largest_species_count_in_a_cluster: usize,
}

/// Consensus records grouped for the FASTA-writing collaborator.
///
/// Lumped/split clusters file under the lumped set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsensusSets {
    pub perfect: Vec<ConsensusRecord>,
    pub split: Vec<ConsensusRecord>,
    pub lumped: Vec<ConsensusRecord>,
}

/// Key a member contributes to the cluster's species tally.
///
/// Unnamed sequences bucket individually under their brace-wrapped full name
/// so they can never merge with a real species group.
pub(crate) fn species_key(record: &SequenceRecord) -> String {
    match &record.species_name {
        Some(name) => name.clone(),
        None => format!("{{{}}}", record.full_name),
    }
}

fn is_real_species(key: &str) -> bool {
    !key.starts_with('{')
}

/// Classify one cluster's membership against the corpus-wide census.
fn classify_members(
    counts: &HashMap<String, usize>,
    member_count: usize,
    census: &SpeciesCensus,
) -> ClusterTag {
    if counts.len() == 1 {
        let (key, _) = counts.iter().next().expect("cluster cannot be empty");
        // compare against the species' total count over the whole corpus;
        // unnamed buckets are never perfect
        let complete = is_real_species(key)
            && census.total_for(key) == Some(member_count);
        if complete {
            ClusterTag::Perfect
        } else {
            ClusterTag::Split
        }
    } else {
        let any_missing = counts.iter().any(|(key, &in_cluster)| {
            match census.total_for(key) {
                Some(total) => in_cluster != total,
                // an unnamed bucket is its whole "species"
                None => false,
            }
        });
        if any_missing {
            ClusterTag::LumpedSplit
        } else {
            ClusterTag::Lumped
        }
    }
}

/// Build the classified clusters for a raw partition.
///
/// A consensus failure is isolated to its cluster: the row is marked failed
/// and processing continues. Cancellation is checked once per cluster.
pub fn classify_partition(
    partition: Vec<Vec<SequenceId>>,
    corpus: &Corpus,
    cache: &mut DistanceCache,
    config: &Configuration,
    cancel: &CancelToken,
) -> Result<(Vec<Cluster>, ConsensusSets, ClusterRunSummary), Cancelled> {
    let census = corpus.species_census();
    let mut clusters = Vec::with_capacity(partition.len());
    let mut sets = ConsensusSets::default();
    let mut summary = ClusterRunSummary {
        cluster_count: partition.len(),
        ..ClusterRunSummary::default()
    };

    for (index, members) in partition.into_iter().enumerate() {
        cancel.check()?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for &id in &members {
            *counts.entry(species_key(corpus.get(id))).or_insert(0) += 1;
        }

        let (max_distance, valid, over) = pairwise_stats(&members, corpus, cache, config);
        let tag = classify_members(&counts, members.len(), &census);

        let threshold_violation =
            max_distance.is_some_and(|d| d > config.cluster_threshold);
        if threshold_violation {
            summary.threshold_violations += 1;
        }
        if let Some(d) = max_distance {
            if d > summary.largest_pairwise_distance {
                summary.largest_pairwise_distance = d;
            }
        }
        if counts.len() == 1 {
            summary.single_species_clusters += 1;
        }
        if tag == ClusterTag::Perfect {
            summary.perfect_clusters += 1;
        }
        summary.largest_species_count_in_a_cluster =
            summary.largest_species_count_in_a_cluster.max(counts.len());

        let species_label = if counts.len() == 1 {
            counts.keys().next().expect("cluster cannot be empty").clone()
        } else {
            "Multiple species".to_string()
        };
        let consensus_name =
            format!("{} {} (cluster #{})", tag.label(), species_label, index + 1);

        let records: Vec<&SequenceRecord> =
            members.iter().map(|&id| corpus.get(id)).collect();
        let (consensus, consensus_failed) =
            match consensus::consensus(consensus_name, &records) {
                Ok(record) => {
                    let group = match tag {
                        ClusterTag::Perfect => &mut sets.perfect,
                        ClusterTag::Split => &mut sets.split,
                        ClusterTag::Lumped | ClusterTag::LumpedSplit => &mut sets.lumped,
                    };
                    group.push(record.clone());
                    (Some(record), false)
                }
                Err(error) => {
                    warn!(cluster = index + 1, %error, "consensus failed");
                    (None, true)
                }
            };

        clusters.push(Cluster {
            members,
            tag,
            species_count: counts.len(),
            max_pairwise_distance: max_distance,
            threshold_violation,
            percent_over_threshold: percentage(over as f64, valid as f64),
            consensus,
            consensus_failed,
        });
    }

    Ok((clusters, sets, summary))
}

/// Largest valid distance, valid comparison count, and over-threshold count
/// across all unordered member pairs.
fn pairwise_stats(
    members: &[SequenceId],
    corpus: &Corpus,
    cache: &mut DistanceCache,
    config: &Configuration,
) -> (Option<f64>, usize, usize) {
    let mut max_distance: Option<f64> = None;
    let mut valid = 0;
    let mut over = 0;

    for (offset, &a) in members.iter().enumerate() {
        for &b in &members[offset + 1..] {
            let Some(distance) = cache.get(a, b, corpus, config).distance() else {
                continue;
            };
            valid += 1;
            if distance > config.cluster_threshold {
                over += 1;
            }
            if max_distance.map_or(true, |current| distance > current) {
                max_distance = Some(distance);
            }
        }
    }

    (max_distance, valid, over)
}

impl Cluster {
    /// Flatten into the export row.
    #[must_use]
    pub fn row(&self, cluster_index: usize) -> ClusterRow {
        ClusterRow {
            cluster_index,
            sequence_count: self.members.len(),
            species_count: self.species_count,
            max_pairwise_distance: self.max_pairwise_distance,
            percent_over_threshold: self.percent_over_threshold,
            tag: self.tag,
            threshold_violation: self.threshold_violation,
            consensus_failed: self.consensus_failed,
        }
    }
}
