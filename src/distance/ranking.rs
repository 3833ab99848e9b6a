use std::cmp::Ordering;

use crate::core::config::Configuration;
use crate::core::corpus::Corpus;
use crate::core::types::SequenceId;
use crate::distance::cache::DistanceCache;
use crate::distance::metric::DistanceResult;

/// One entry in a neighbor ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: SequenceId,
    pub result: DistanceResult,
}

/// Every sequence other than the query, ordered by ascending distance.
///
/// Invalid comparisons are kept at the tail rather than dropped, so callers
/// can tell "no valid neighbor exists" from "a neighbor was excluded". The
/// sort is stable: equal distances, and the whole invalid tail, stay in
/// corpus order. Tie-block detection depends on that ordering.
#[must_use]
pub fn rank(
    query: SequenceId,
    corpus: &Corpus,
    cache: &mut DistanceCache,
    config: &Configuration,
) -> Vec<Neighbor> {
    let mut neighbors: Vec<Neighbor> = corpus
        .ids()
        .filter(|&id| id != query)
        .map(|id| Neighbor {
            id,
            result: cache.get(query, id, corpus, config),
        })
        .collect();

    neighbors.sort_by(|a, b| match (a.result.distance(), b.result.distance()) {
        (Some(da), Some(db)) => da.partial_cmp(&db).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    neighbors
}
