//! Best Match / Best Close Match identification scoring.
//!
//! Every query with a species name is identified against the rest of the
//! corpus through its nearest neighbor. **Best Match** takes the rank-1
//! neighbor as the identification; **Best Close Match** additionally requires
//! the match to sit within a caller-supplied distance threshold. A run of
//! neighbors tied with the best distance (the tie block) makes the
//! identification ambiguous as soon as it mixes species.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::cancel::{CancelToken, Cancelled};
use crate::core::config::Configuration;
use crate::core::corpus::Corpus;
use crate::core::record::SequenceRecord;
use crate::core::types::MatchOutcome;
use crate::distance::cache::DistanceCache;
use crate::distance::ranking::{rank, Neighbor};
use crate::utils::round::{distances_tied, percentage};

/// A named neighbor with its distance, for the report listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborHit {
    pub name: String,
    pub distance: f64,
    pub overlap: usize,
}

/// Identification result for one query sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRow {
    pub query_name: String,
    pub best_match_name: Option<String>,
    pub best_match_distance: Option<f64>,
    /// Neighbors beyond the best match at a tied distance
    pub tie_block_size: usize,
    /// Nearest valid neighbor sharing the query's species
    pub first_conspecific: Option<NeighborHit>,
    /// Nearest valid neighbor of another species
    pub first_allospecific: Option<NeighborHit>,
    pub best_match: MatchOutcome,
    pub best_close_match: MatchOutcome,
}

/// Outcome counts for one identification rule.
///
/// Queries with no valid neighbor at all are counted once in
/// [`IdentificationReport::no_match`], not here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub correct: usize,
    pub ambiguous: usize,
    pub incorrect: usize,
    /// Best match outside the threshold (Best Close Match only)
    pub no_match: usize,
}

impl OutcomeTally {
    fn record(&mut self, outcome: MatchOutcome) {
        match outcome {
            MatchOutcome::Correct => self.correct += 1,
            MatchOutcome::Ambiguous => self.ambiguous += 1,
            MatchOutcome::Incorrect => self.incorrect += 1,
            MatchOutcome::NoMatch => self.no_match += 1,
        }
    }
}

/// Per-query rows plus the aggregate counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentificationReport {
    /// Best-close-match threshold the run used
    pub threshold: f64,
    pub total_sequences: usize,
    /// Queries skipped for lack of a species name
    pub without_species_name: usize,
    /// Queries whose rank-1 neighbor was invalid
    pub no_match: usize,
    /// Queries with at least one valid conspecific in the corpus
    pub with_valid_conspecific: usize,
    /// Queries whose best match sits at distance zero
    pub zero_distance_matches: usize,
    /// Allospecific or ambiguous best matches at distance zero
    pub allospecific_at_zero: usize,
    pub best_match: OutcomeTally,
    pub best_close_match: OutcomeTally,
    pub rows: Vec<QueryRow>,
}

impl IdentificationReport {
    /// The accuracy denominator: queries that were actually scored.
    ///
    /// Unnamed and unmatched sequences are excluded from the rates while
    /// still appearing in the raw totals.
    #[must_use]
    pub fn scored_queries(&self) -> usize {
        self.total_sequences - self.no_match - self.without_species_name
    }

    /// A count as a percentage of the scored queries.
    #[must_use]
    pub fn percent_of_scored(&self, count: usize) -> f64 {
        percentage(count as f64, self.scored_queries() as f64)
    }
}

/// Score every named query against the rest of the corpus.
///
/// `threshold` is the best-close-match distance limit, a fraction.
/// Cancellation is checked once per query.
pub fn classify(
    corpus: &Corpus,
    cache: &mut DistanceCache,
    config: &Configuration,
    threshold: f64,
    cancel: &CancelToken,
) -> Result<IdentificationReport, Cancelled> {
    let mut report = IdentificationReport {
        threshold,
        total_sequences: corpus.len(),
        without_species_name: 0,
        no_match: 0,
        with_valid_conspecific: 0,
        zero_distance_matches: 0,
        allospecific_at_zero: 0,
        best_match: OutcomeTally::default(),
        best_close_match: OutcomeTally::default(),
        rows: Vec::new(),
    };

    for query in corpus.iter() {
        cancel.check()?;

        if query.species_name.is_none() {
            report.without_species_name += 1;
            continue;
        }

        let ranking = rank(query.id(), corpus, cache, config);
        let row = classify_query(query, &ranking, corpus, threshold, &mut report);
        report.rows.push(row);
    }

    debug!(
        queries = report.rows.len(),
        no_match = report.no_match,
        "identification scored"
    );
    Ok(report)
}

fn classify_query(
    query: &SequenceRecord,
    ranking: &[Neighbor],
    corpus: &Corpus,
    threshold: f64,
    report: &mut IdentificationReport,
) -> QueryRow {
    let best = ranking.first();
    let best_distance = best.and_then(|n| n.result.distance());

    let (Some(best), Some(best_distance)) = (best, best_distance) else {
        report.no_match += 1;
        return QueryRow {
            query_name: query.display_name.clone(),
            best_match_name: None,
            best_match_distance: None,
            tie_block_size: 0,
            first_conspecific: None,
            first_allospecific: None,
            best_match: MatchOutcome::NoMatch,
            best_close_match: MatchOutcome::NoMatch,
        };
    };

    let best_record = corpus.get(best.id);

    if distances_tied(best_distance, 0.0) {
        report.zero_distance_matches += 1;
    }

    // scan the tie block: neighbors at a distance indistinguishable from the
    // best. Clean/mixed is judged against the best match's species, not the
    // query's.
    let mut tie_block_size = 0;
    let mut mixed_block = false;
    for neighbor in &ranking[1..] {
        let Some(distance) = neighbor.result.distance() else {
            break;
        };
        if !distances_tied(distance, best_distance) {
            break;
        }
        tie_block_size += 1;

        let member = corpus.get(neighbor.id);
        match (&member.species_name, &best_record.species_name) {
            (Some(a), Some(b)) if a == b => {}
            _ => mixed_block = true,
        }
    }

    let conspecific = best_record.is_conspecific(query);
    let best_match = if mixed_block {
        MatchOutcome::Ambiguous
    } else if conspecific {
        MatchOutcome::Correct
    } else {
        MatchOutcome::Incorrect
    };
    let best_close_match = if best_distance <= threshold {
        best_match
    } else {
        MatchOutcome::NoMatch
    };

    if distances_tied(best_distance, 0.0) && best_match != MatchOutcome::Correct {
        report.allospecific_at_zero += 1;
    }

    // independently of the outcome: the nearest valid conspecific and
    // allospecific neighbors, for the listing
    let mut first_conspecific = None;
    let mut first_allospecific = None;
    for neighbor in ranking {
        let Some(distance) = neighbor.result.distance() else {
            break;
        };
        let record = corpus.get(neighbor.id);
        if record.species_name.is_none() {
            continue;
        }

        let hit = || NeighborHit {
            name: record.display_name.clone(),
            distance,
            overlap: neighbor.result.overlap(),
        };
        if record.is_conspecific(query) {
            if first_conspecific.is_none() {
                first_conspecific = Some(hit());
            }
        } else if first_allospecific.is_none() {
            first_allospecific = Some(hit());
        }
        if first_conspecific.is_some() && first_allospecific.is_some() {
            break;
        }
    }
    if first_conspecific.is_some() {
        report.with_valid_conspecific += 1;
    }

    report.best_match.record(best_match);
    report.best_close_match.record(best_close_match);

    QueryRow {
        query_name: query.display_name.clone(),
        best_match_name: Some(best_record.display_name.clone()),
        best_match_distance: Some(best_distance),
        tie_block_size,
        first_conspecific,
        first_allospecific,
        best_match,
        best_close_match,
    }
}
