//! Overlap-aware pairwise distances.
//!
//! The comparison window spans the columns where both sequences have started
//! and not yet ended: leading and trailing gap/missing runs on *either*
//! sequence are excluded entirely and are never differences. A gap inside the
//! window is an insertion and scores as an ordinary mismatch. This asymmetric
//! gap policy is deliberate and matches how barcode gap analyses are scored.

use serde::{Deserialize, Serialize};

use crate::core::config::Configuration;
use crate::core::record::SequenceRecord;
use crate::core::residue::{self, MISSING};
use crate::core::types::DistanceModel;

/// The outcome of one pairwise comparison.
///
/// Insufficient overlap is a value, not an error: real corpora contain many
/// such pairs and callers iterate straight past them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum DistanceResult {
    /// A usable comparison
    Valid {
        /// Distance under the configured model
        distance: f64,
        /// Defined columns the comparison was computed over
        overlap: usize,
    },
    /// Overlap below the minimum, a degenerate window, or a saturated model
    Invalid {
        /// Defined columns shared, still reported for diagnostics
        overlap: usize,
    },
}

impl DistanceResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Distance when valid, None otherwise.
    #[must_use]
    pub fn distance(&self) -> Option<f64> {
        match self {
            Self::Valid { distance, .. } => Some(*distance),
            Self::Invalid { .. } => None,
        }
    }

    #[must_use]
    pub fn overlap(&self) -> usize {
        match self {
            Self::Valid { overlap, .. } | Self::Invalid { overlap } => *overlap,
        }
    }
}

/// Column tallies accumulated over one comparison window.
#[derive(Debug, Default)]
struct WindowCounts {
    overlap: usize,
    mismatches: usize,
    transitions: usize,
    /// Strict purine-against-pyrimidine mismatches
    transversions: usize,
}

/// Compare two aligned sequences under the given configuration.
///
/// Pure: no caching, no side effects. Symmetric in its arguments.
#[must_use]
pub fn compare(a: &SequenceRecord, b: &SequenceRecord, config: &Configuration) -> DistanceResult {
    let window = match comparison_window(a, b) {
        Some(window) => window,
        None => return DistanceResult::Invalid { overlap: 0 },
    };

    let counts = count_columns(a, b, window, config);

    if counts.overlap < config.min_overlap {
        return DistanceResult::Invalid {
            overlap: counts.overlap,
        };
    }

    let overlap = counts.overlap;
    let distance = match config.distance_model {
        DistanceModel::Uncorrected => counts.mismatches as f64 / overlap as f64,
        DistanceModel::TransversionsOnly => counts.transversions as f64 / overlap as f64,
        DistanceModel::K2p => match k2p_distance(&counts) {
            Some(distance) => distance,
            None => return DistanceResult::Invalid { overlap },
        },
    };

    DistanceResult::Valid { distance, overlap }
}

/// The inclusive column range where both sequences have real characters.
fn comparison_window(a: &SequenceRecord, b: &SequenceRecord) -> Option<(usize, usize)> {
    let start = a.first_real()?.max(b.first_real()?);
    let end = a.last_real()?.min(b.last_real()?);
    (start <= end).then_some((start, end))
}

fn count_columns(
    a: &SequenceRecord,
    b: &SequenceRecord,
    (start, end): (usize, usize),
    config: &Configuration,
) -> WindowCounts {
    let mut counts = WindowCounts::default();

    for col in start..=end {
        let c1 = a.residues()[col];
        let c2 = b.residues()[col];

        // missing data is ignored, always
        if c1 == MISSING || c2 == MISSING {
            continue;
        }

        counts.overlap += 1;

        if residue::identical(c1, c2, config.ambiguity_mode) {
            continue;
        }

        counts.mismatches += 1;

        if is_transition(c1, c2) {
            counts.transitions += 1;
        }
        if (residue::is_purine(c1) && residue::is_pyrimidine(c2))
            || (residue::is_pyrimidine(c1) && residue::is_purine(c2))
        {
            counts.transversions += 1;
        }
    }

    counts
}

/// A pure A<->G or C<->T substitution.
fn is_transition(c1: u8, c2: u8) -> bool {
    matches!(
        (c1, c2),
        (b'A', b'G') | (b'G', b'A') | (b'C', b'T') | (b'T', b'C')
    )
}

/// Kimura 2-parameter: `d = -1/2 ln(1-2P-Q) - 1/4 ln(1-2Q)` with
/// P = transitions/overlap and Q = all remaining mismatches/overlap.
///
/// Returns None when either logarithm argument is non-positive (the distance
/// is saturated and undefined), never NaN.
fn k2p_distance(counts: &WindowCounts) -> Option<f64> {
    let n = counts.overlap as f64;
    let p = counts.transitions as f64 / n;
    let q = (counts.mismatches - counts.transitions) as f64 / n;

    let w1 = 1.0 - 2.0 * p - q;
    let w2 = 1.0 - 2.0 * q;
    if w1 <= 0.0 || w2 <= 0.0 {
        return None;
    }

    let distance = -0.5 * w1.ln() - 0.25 * w2.ln();
    // rounding can leave a -0 for identical sequences
    Some(distance.max(0.0))
}
