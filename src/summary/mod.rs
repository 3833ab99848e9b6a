//! Intraspecific vs. interspecific distance distributions.
//!
//! Whether barcodes can separate species at all shows up as a gap between
//! the distances seen *within* species and the distances seen *between*
//! species of the same genus. This module reports both distributions, their
//! overlap region, and the "five percent cutoff" (the largest intraspecific
//! distance after discarding the top 5%), the usual data-driven threshold
//! for the best-close-match rule.

use serde::{Deserialize, Serialize};

use crate::core::cancel::{CancelToken, Cancelled};
use crate::core::config::Configuration;
use crate::core::corpus::Corpus;
use crate::core::types::SequenceId;
use crate::distance::cache::DistanceCache;
use crate::utils::round::percentage;

/// Shape of one distance distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub comparisons: usize,
    pub minimum: f64,
    pub maximum: f64,
}

/// Where the intraspecific and interspecific distributions overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapRegion {
    /// Smallest interspecific distance
    pub from: f64,
    /// Largest intraspecific distance
    pub to: f64,
    pub width: f64,
    /// Share of all intra- and interspecific distances inside the region
    pub percent_within: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairwiseSummaryReport {
    pub sequence_count: usize,
    pub species_count: usize,
    /// Distances between conspecific sequences
    pub intraspecific: Option<DistributionStats>,
    /// Distances between congeneric sequences of different species
    pub interspecific_congeneric: Option<DistributionStats>,
    pub overlap: Option<OverlapRegion>,
    /// Overlap region after trimming 5% off both ends
    pub trimmed_overlap: Option<OverlapRegion>,
    /// Suggested best-close-match threshold, as a fraction
    pub five_percent_cutoff: Option<f64>,
}

/// Summarize all valid intra- and interspecific congeneric distances.
///
/// Cancellation is checked once per outer sequence.
pub fn summarize(
    corpus: &Corpus,
    cache: &mut DistanceCache,
    config: &Configuration,
    cancel: &CancelToken,
) -> Result<PairwiseSummaryReport, Cancelled> {
    let mut intra: Vec<f64> = Vec::new();
    let mut inter: Vec<f64> = Vec::new();

    let n = corpus.len();
    for i in 0..n {
        cancel.check()?;
        let a = corpus.get(SequenceId(i));
        if a.species_name.is_none() {
            continue;
        }
        for j in (i + 1)..n {
            let b = corpus.get(SequenceId(j));
            if b.species_name.is_none() {
                continue;
            }
            let bucket = if a.is_conspecific(b) {
                &mut intra
            } else if a.is_congeneric(b) {
                &mut inter
            } else {
                continue;
            };
            let result = cache.get(SequenceId(i), SequenceId(j), corpus, config);
            if let Some(distance) = result.distance() {
                bucket.push(distance);
            }
        }
    }

    intra.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    inter.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let intra_stats = stats(&intra);
    let inter_stats = stats(&inter);

    let (overlap, trimmed_overlap, five_percent_cutoff) =
        match (intra_stats, inter_stats) {
            (Some(intra_stats), Some(inter_stats)) => {
                let overlap =
                    region(inter_stats.minimum, intra_stats.maximum, &intra, &inter);

                // drop the smallest 5% of interspecific and the largest 5% of
                // intraspecific distances for the conservative estimate
                let trimmed_from = inter[trim_index(inter.len())];
                let trimmed_to = intra[intra.len() - 1 - trim_index(intra.len())];
                let trimmed = region(trimmed_from, trimmed_to, &intra, &inter);

                (Some(overlap), Some(trimmed), Some(trimmed_to))
            }
            _ => (None, None, None),
        };

    Ok(PairwiseSummaryReport {
        sequence_count: corpus.len(),
        species_count: corpus.species_census().species_count(),
        intraspecific: intra_stats,
        interspecific_congeneric: inter_stats,
        overlap,
        trimmed_overlap,
        five_percent_cutoff,
    })
}

fn stats(sorted: &[f64]) -> Option<DistributionStats> {
    let (&minimum, &maximum) = (sorted.first()?, sorted.last()?);
    Some(DistributionStats {
        comparisons: sorted.len(),
        minimum,
        maximum,
    })
}

/// Number of elements trimmed off one end of a distribution of `n`.
fn trim_index(n: usize) -> usize {
    ((0.05 * n as f64).floor() as usize).min(n - 1)
}

fn region(from: f64, to: f64, intra: &[f64], inter: &[f64]) -> OverlapRegion {
    let total = intra.len() + inter.len();
    let within = if from <= to {
        count_between(intra, from, to) + count_between(inter, from, to)
    } else {
        0
    };
    OverlapRegion {
        from,
        to,
        width: (to - from).abs(),
        percent_within: percentage(within as f64, total as f64),
    }
}

fn count_between(sorted: &[f64], lo: f64, hi: f64) -> usize {
    sorted.iter().filter(|&&d| d >= lo && d <= hi).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::SequenceRecord;

    fn rec(species: &str, raw: &str) -> SequenceRecord {
        SequenceRecord::new(species, Some(species.to_string()), raw).unwrap()
    }

    fn config() -> Configuration {
        Configuration::default().with_min_overlap(5)
    }

    fn seq(subs: &[usize]) -> String {
        let mut chars: Vec<u8> = vec![b'A'; 100];
        for &col in subs {
            chars[col] = b'T';
        }
        String::from_utf8(chars).unwrap()
    }

    #[test]
    fn test_buckets_split_by_species_and_genus() {
        let corpus = Corpus::from_records(vec![
            rec("Aus bus", &seq(&[])),
            rec("Aus bus", &seq(&[0])),         // intra: 0.01
            rec("Aus cus", &seq(&[0, 1, 2])),   // inter vs both Aus bus
            rec("Xus yus", &seq(&[0, 1, 2, 3])), // different genus: ignored
        ]);
        let mut cache = DistanceCache::new();
        let report =
            summarize(&corpus, &mut cache, &config(), &CancelToken::new()).unwrap();

        let intra = report.intraspecific.unwrap();
        assert_eq!(intra.comparisons, 1);
        assert!((intra.maximum - 0.01).abs() < 1e-9);

        let inter = report.interspecific_congeneric.unwrap();
        assert_eq!(inter.comparisons, 2);
        assert!((inter.minimum - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_region_with_barcode_gap() {
        // intra tops out at 0.01, inter starts at 0.02: no overlap
        let corpus = Corpus::from_records(vec![
            rec("Aus bus", &seq(&[])),
            rec("Aus bus", &seq(&[0])),
            rec("Aus cus", &seq(&[0, 1, 2])),
        ]);
        let mut cache = DistanceCache::new();
        let report =
            summarize(&corpus, &mut cache, &config(), &CancelToken::new()).unwrap();

        let overlap = report.overlap.unwrap();
        assert!(overlap.from > overlap.to);
        assert!((overlap.percent_within - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_five_percent_cutoff_drops_top_tail() {
        // 21 conspecific sequences of one species, distances spread out, and
        // one congeneric pair so the cutoff is defined
        let mut records: Vec<SequenceRecord> = (0..21)
            .map(|i| {
                let subs: Vec<usize> = (0..i).collect();
                rec("Aus bus", &seq(&subs))
            })
            .collect();
        records.push(rec("Aus cus", &seq(&(50..90).collect::<Vec<_>>())));
        let corpus = Corpus::from_records(records);

        let mut cache = DistanceCache::new();
        let report =
            summarize(&corpus, &mut cache, &config(), &CancelToken::new()).unwrap();

        let intra = report.intraspecific.unwrap();
        assert_eq!(intra.comparisons, 21 * 20 / 2);
        // the cutoff sits strictly below the raw maximum once the top 5% of
        // 210 comparisons (10 of them) are gone
        let cutoff = report.five_percent_cutoff.unwrap();
        assert!(cutoff < intra.maximum);
    }

    #[test]
    fn test_no_interspecific_means_no_cutoff() {
        let corpus = Corpus::from_records(vec![
            rec("Aus bus", &seq(&[])),
            rec("Aus bus", &seq(&[0])),
        ]);
        let mut cache = DistanceCache::new();
        let report =
            summarize(&corpus, &mut cache, &config(), &CancelToken::new()).unwrap();

        assert!(report.interspecific_congeneric.is_none());
        assert!(report.overlap.is_none());
        assert!(report.five_percent_cutoff.is_none());
    }

    #[test]
    fn test_cancellation_propagates() {
        let corpus = Corpus::from_records(vec![rec("Aus bus", &seq(&[]))]);
        let mut cache = DistanceCache::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            summarize(&corpus, &mut cache, &config(), &cancel),
            Err(Cancelled)
        ));
    }
}
