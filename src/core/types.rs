use serde::{Deserialize, Serialize};

/// Identifier for a sequence within one corpus.
///
/// Ids are dense indexes assigned by [`crate::core::corpus::Corpus`] at load
/// time and are only meaningful for the corpus that assigned them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SequenceId(pub usize);

impl SequenceId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for SequenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pairwise distance model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceModel {
    /// Uncorrected p-distance: mismatches / overlap
    #[default]
    Uncorrected,
    /// Kimura 2-parameter, correcting for transition/transversion rates
    K2p,
    /// Transversions only: purine/pyrimidine mismatches / overlap
    TransversionsOnly,
}

impl std::fmt::Display for DistanceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uncorrected => write!(f, "uncorrected"),
            Self::K2p => write!(f, "K2P"),
            Self::TransversionsOnly => write!(f, "transversions only"),
        }
    }
}

/// How ambiguity codes take part in per-column identity checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityMode {
    /// Two codes are identical when their base sets intersect
    #[default]
    UseAmbiguous,
    /// Every ambiguity code is widened to the full N wildcard first
    CollapseToN,
}

/// Taxonomic classification of a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterTag {
    /// One species, and every corpus sequence of that species is here
    Perfect,
    /// One species, but some of its sequences sit in other clusters
    Split,
    /// Multiple species, each fully contained in this cluster
    Lumped,
    /// Multiple species, at least one with sequences outside this cluster
    LumpedSplit,
}

impl ClusterTag {
    /// Label used when naming consensus records
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect",
            Self::Split => "Split",
            Self::Lumped => "Lumped",
            Self::LumpedSplit => "Lumped/Split",
        }
    }
}

impl std::fmt::Display for ClusterTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Outcome of one identification rule for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Best match (and its whole tie block) is conspecific with the query
    Correct,
    /// Best match belongs to another species
    Incorrect,
    /// The tie block mixes species; no single identification is possible
    Ambiguous,
    /// No valid comparison, or nothing within the close-match threshold
    NoMatch,
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Correct => write!(f, "correct"),
            Self::Incorrect => write!(f, "incorrect"),
            Self::Ambiguous => write!(f, "ambiguous"),
            Self::NoMatch => write!(f, "no match"),
        }
    }
}
