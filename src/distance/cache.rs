use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use crate::core::cancel::{CancelToken, Cancelled};
use crate::core::config::Configuration;
use crate::core::corpus::Corpus;
use crate::core::types::SequenceId;
use crate::distance::metric::{compare, DistanceResult};

/// Memoized pairwise distances for one analysis run.
///
/// Entries are keyed by the unordered id pair, so each pair is computed at
/// most once per run regardless of argument order. The cache never outlives
/// the run that filled it.
#[derive(Debug, Default)]
pub struct DistanceCache {
    entries: HashMap<(SequenceId, SequenceId), DistanceResult>,
}

fn pair_key(a: SequenceId, b: SequenceId) -> (SequenceId, SequenceId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl DistanceCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance between two records, computing and storing on first access.
    pub fn get(
        &mut self,
        a: SequenceId,
        b: SequenceId,
        corpus: &Corpus,
        config: &Configuration,
    ) -> DistanceResult {
        *self
            .entries
            .entry(pair_key(a, b))
            .or_insert_with(|| compare(corpus.get(a), corpus.get(b), config))
    }

    /// Compute every pairwise distance up front.
    ///
    /// Rows are filled in parallel and joined before this returns, so later
    /// readers never observe a partially-computed entry. Cancellation is
    /// honored once per row; on cancellation the partial fill is discarded.
    pub fn prefill(
        &mut self,
        corpus: &Corpus,
        config: &Configuration,
        cancel: &CancelToken,
    ) -> Result<(), Cancelled> {
        let n = corpus.len();
        debug!(sequences = n, "prefilling pairwise distance cache");

        let rows: Vec<Vec<((SequenceId, SequenceId), DistanceResult)>> = (0..n)
            .into_par_iter()
            .map(|i| {
                if cancel.is_cancelled() {
                    return Vec::new();
                }
                let a = SequenceId(i);
                let record_a = corpus.get(a);
                ((i + 1)..n)
                    .map(|j| {
                        let b = SequenceId(j);
                        ((a, b), compare(record_a, corpus.get(b), config))
                    })
                    .collect()
            })
            .collect();

        cancel.check()?;

        for row in rows {
            self.entries.extend(row);
        }
        debug!(entries = self.entries.len(), "distance cache filled");
        Ok(())
    }

    /// Number of cached pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
