use petgraph::unionfind::UnionFind;
use std::collections::HashMap;
use tracing::debug;

use crate::core::cancel::{CancelToken, Cancelled};
use crate::core::config::Configuration;
use crate::core::corpus::Corpus;
use crate::core::types::SequenceId;
use crate::distance::cache::DistanceCache;

/// Partition the corpus into threshold-connected groups.
///
/// Two sequences belong to the same cluster when they are connected by a
/// chain of valid pairwise distances, each at most `cluster_threshold`: the
/// transitive closure of the threshold relation (single linkage). A naive
/// accumulate-and-merge scan over growing clusters computes the same
/// closure; a disjoint set over sequence indexes produces an identical
/// partition without the nested rescans.
///
/// Clusters are returned ordered by their earliest member, with members in
/// corpus order. Purely distance-defined: nothing here is hierarchical or
/// phylogenetic.
pub fn partition(
    corpus: &Corpus,
    cache: &mut DistanceCache,
    config: &Configuration,
    cancel: &CancelToken,
) -> Result<Vec<Vec<SequenceId>>, Cancelled> {
    let n = corpus.len();
    let mut linked = UnionFind::<usize>::new(n);

    for i in 0..n {
        cancel.check()?;
        for j in (i + 1)..n {
            let result = cache.get(SequenceId(i), SequenceId(j), corpus, config);
            if let Some(distance) = result.distance() {
                if distance <= config.cluster_threshold {
                    linked.union(i, j);
                }
            }
        }
    }

    let mut order: HashMap<usize, usize> = HashMap::new();
    let mut clusters: Vec<Vec<SequenceId>> = Vec::new();
    for i in 0..n {
        let root = linked.find_mut(i);
        let slot = *order.entry(root).or_insert_with(|| {
            clusters.push(Vec::new());
            clusters.len() - 1
        });
        clusters[slot].push(SequenceId(i));
    }

    debug!(
        sequences = n,
        clusters = clusters.len(),
        threshold = config.cluster_threshold,
        "partitioned corpus"
    );
    Ok(clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::SequenceRecord;

    fn corpus(raws: &[&str]) -> Corpus {
        Corpus::from_records(
            raws.iter()
                .map(|raw| SequenceRecord::new("r", None, raw).unwrap())
                .collect(),
        )
    }

    fn config(threshold: f64) -> Configuration {
        Configuration::default()
            .with_min_overlap(5)
            .with_cluster_threshold(threshold)
    }

    fn members(clusters: &[Vec<SequenceId>]) -> Vec<Vec<usize>> {
        clusters
            .iter()
            .map(|c| c.iter().map(|id| id.index()).collect())
            .collect()
    }

    #[test]
    fn test_singletons_when_nothing_links() {
        // pairwise distances all 0.5, threshold 0.03
        let corpus = corpus(&["AAAAAAAAAA", "TTTTTAAAAA", "AAAAATTTTT"]);
        let mut cache = DistanceCache::new();
        let clusters =
            partition(&corpus, &mut cache, &config(0.03), &CancelToken::new()).unwrap();
        assert_eq!(members(&clusters), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_chaining_links_transitively() {
        // 50 columns: d(0,1) = 0.02, d(1,2) = 0.02, d(0,2) = 0.04;
        // at threshold 0.03 the chain through 1 pulls all three together
        let corpus = corpus(&[
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
            "TAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
            "TTAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
        ]);
        let mut cache = DistanceCache::new();
        let clusters =
            partition(&corpus, &mut cache, &config(0.03), &CancelToken::new()).unwrap();
        assert_eq!(members(&clusters), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_invalid_distances_never_link() {
        // identical content but no shared window
        let corpus = corpus(&["AAAAAAA-------", "-------AAAAAAA"]);
        let mut cache = DistanceCache::new();
        let clusters =
            partition(&corpus, &mut cache, &config(0.5), &CancelToken::new()).unwrap();
        assert_eq!(members(&clusters), vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_cancellation_discards_partition() {
        let corpus = corpus(&["AAAAAAAAAA", "AAAAAAAAAA"]);
        let mut cache = DistanceCache::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(
            partition(&corpus, &mut cache, &config(0.03), &cancel),
            Err(Cancelled)
        );
    }
}
