//! Per-species cross-reference rows and coverage-overlap diagnostics.
//!
//! When a species is split across clusters, the split can be a sequencing
//! artifact rather than true divergence: if the columns its members cover in
//! one cluster barely overlap the columns its members cover in another, the
//! two groups were never comparable in the first place. Cluster pairs whose
//! covered ranges overlap by fewer than `min_overlap` columns are flagged.

use serde::{Deserialize, Serialize};

use crate::core::config::Configuration;
use crate::core::corpus::Corpus;
use crate::core::types::SequenceId;

/// Per-species summary across the whole clustering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesRow {
    pub species_name: String,
    /// Sequences of this species in the corpus
    pub sequence_count: usize,
    /// Clusters containing at least one of them
    pub cluster_count: usize,
    /// Other species sharing those clusters, summed per cluster
    pub co_occurring_species_count: usize,
}

/// Two clusters holding the same species with almost-disjoint coverage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlapConflict {
    pub species_name: String,
    /// 1-based cluster numbers
    pub cluster_a: usize,
    pub cluster_b: usize,
    /// Columns the two covered ranges share
    pub overlap_columns: usize,
}

/// Column range `[left, right]` covered by one species inside one cluster.
struct CoveredRange {
    cluster_index: usize,
    left: usize,
    right: usize,
}

/// Build the species rows and overlap conflicts for a partition.
///
/// Species are reported in sorted name order; unnamed sequences contribute
/// to no species row.
#[must_use]
pub fn species_cross_reference(
    corpus: &Corpus,
    partition: &[Vec<SequenceId>],
    config: &Configuration,
) -> (Vec<SpeciesRow>, Vec<OverlapConflict>) {
    let census = corpus.species_census();
    let mut names: Vec<&str> = census.iter().map(|(name, _)| name).collect();
    names.sort_unstable();

    let mut rows = Vec::with_capacity(names.len());
    let mut conflicts = Vec::new();

    for name in names {
        let mut cluster_count = 0;
        let mut co_occurring = 0;
        let mut ranges: Vec<CoveredRange> = Vec::new();

        for (index, members) in partition.iter().enumerate() {
            let mut contains = false;
            let mut range: Option<(usize, usize)> = None;
            let mut other_species: Vec<&str> = Vec::new();

            for &id in members {
                let record = corpus.get(id);
                let Some(species) = record.species_name.as_deref() else {
                    continue;
                };

                if species == name {
                    contains = true;
                    if let (Some(first), Some(last)) =
                        (record.first_real(), record.last_real())
                    {
                        range = Some(match range {
                            Some((left, right)) => (left.min(first), right.max(last)),
                            None => (first, last),
                        });
                    }
                } else if !other_species.contains(&species) {
                    other_species.push(species);
                }
            }

            if contains {
                cluster_count += 1;
                co_occurring += other_species.len();
                if let Some((left, right)) = range {
                    ranges.push(CoveredRange {
                        cluster_index: index + 1,
                        left,
                        right,
                    });
                }
            }
        }

        for (offset, a) in ranges.iter().enumerate() {
            for b in &ranges[offset + 1..] {
                let overlap = covered_overlap(a, b);
                if overlap < config.min_overlap {
                    conflicts.push(OverlapConflict {
                        species_name: name.to_string(),
                        cluster_a: a.cluster_index,
                        cluster_b: b.cluster_index,
                        overlap_columns: overlap,
                    });
                }
            }
        }

        rows.push(SpeciesRow {
            species_name: name.to_string(),
            sequence_count: census.total_for(name).unwrap_or(0),
            cluster_count,
            co_occurring_species_count: co_occurring,
        });
    }

    (rows, conflicts)
}

/// Columns shared by two inclusive ranges.
fn covered_overlap(a: &CoveredRange, b: &CoveredRange) -> usize {
    let left = a.left.max(b.left);
    let right = a.right.min(b.right);
    (right as i64 - left as i64 + 1).max(0) as usize
}
