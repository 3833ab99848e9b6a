//! One complete analysis over an exclusively-held corpus.

use tracing::info;

use crate::cluster::{self, ClusterReport};
use crate::core::cancel::{CancelToken, Cancelled};
use crate::core::config::Configuration;
use crate::core::corpus::Corpus;
use crate::distance::cache::DistanceCache;
use crate::identify::{self, IdentificationReport};
use crate::summary::{self, PairwiseSummaryReport};

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub clusters: ClusterReport,
    pub identification: IdentificationReport,
    pub pairwise: PairwiseSummaryReport,
}

/// Runs the full pipeline (cache prefill, clustering, identification,
/// pairwise summary) over a corpus the caller holds exclusively.
///
/// The run owns a fresh [`DistanceCache`]; nothing is shared across runs.
/// Hand the [`CancelToken`] to a controller thread to abort: cancellation
/// discards all partial results and [`execute`](Self::execute) returns
/// `Err(Cancelled)`.
pub struct AnalysisRun<'a> {
    corpus: &'a Corpus,
    config: Configuration,
    identification_threshold: f64,
    cancel: CancelToken,
}

impl<'a> AnalysisRun<'a> {
    #[must_use]
    pub fn new(corpus: &'a Corpus, config: Configuration) -> Self {
        Self {
            corpus,
            config,
            identification_threshold: config.cluster_threshold,
            cancel: CancelToken::new(),
        }
    }

    /// Use a different threshold for the best-close-match rule than for
    /// clustering (for instance the five percent cutoff of a previous run).
    #[must_use]
    pub fn with_identification_threshold(mut self, threshold: f64) -> Self {
        self.identification_threshold = threshold;
        self
    }

    /// A clone of the token a controller can cancel this run through.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn execute(&self) -> Result<AnalysisReport, Cancelled> {
        info!(
            sequences = self.corpus.len(),
            threshold = self.config.cluster_threshold,
            model = %self.config.distance_model,
            "starting analysis run"
        );

        let mut cache = DistanceCache::new();
        cache.prefill(self.corpus, &self.config, &self.cancel)?;

        let clusters =
            cluster::analyze(self.corpus, &mut cache, &self.config, &self.cancel)?;
        let identification = identify::classify(
            self.corpus,
            &mut cache,
            &self.config,
            self.identification_threshold,
            &self.cancel,
        )?;
        let pairwise =
            summary::summarize(self.corpus, &mut cache, &self.config, &self.cancel)?;

        info!(
            clusters = clusters.summary.cluster_count,
            scored = identification.scored_queries(),
            "analysis run finished"
        );
        Ok(AnalysisReport {
            clusters,
            identification,
            pairwise,
        })
    }
}
