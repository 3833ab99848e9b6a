//! # barcode-id
//!
//! A library for deciding whether DNA barcode sequences can reliably
//! separate species.
//!
//! Given an aligned corpus of barcode sequences with (partial) species
//! labels, `barcode-id` answers three questions:
//!
//! - **How far apart are the sequences?** Overlap-aware pairwise distances
//!   under the uncorrected or Kimura-2-parameter model, with IUPAC
//!   ambiguity handling and an explicit invalid value for pairs that share
//!   too little sequence.
//! - **Do distance clusters match species?** Single-linkage clustering at a
//!   threshold, with every cluster classified as perfect, split, lumped, or
//!   lumped/split against the corpus-wide species census, plus consensus
//!   sequences and coverage diagnostics.
//! - **Would a nearest-neighbor lookup identify them?** Best Match / Best
//!   Close Match scoring per sequence, with tie-block detection and the
//!   standard accuracy denominators.
//!
//! Corpus loading (FASTA and friends) and report formatting are the calling
//! application's job: this crate takes [`SequenceRecord`]s in and hands
//! typed report rows back.
//!
//! ## Example
//!
//! ```rust
//! use barcode_id::{AnalysisRun, Configuration, Corpus, SequenceRecord};
//!
//! let records = vec![
//!     SequenceRecord::new("s1", Some("Papilio machaon".into()), "ACGTACGTAC")?,
//!     SequenceRecord::new("s2", Some("Papilio machaon".into()), "ACGTACGTAT")?,
//!     SequenceRecord::new("s3", Some("Papilio glaucus".into()), "TCGTTCGTTG")?,
//! ];
//! let corpus = Corpus::from_records(records);
//!
//! let config = Configuration::default().with_min_overlap(10);
//! let report = AnalysisRun::new(&corpus, config).execute()?;
//!
//! for row in &report.clusters.rows {
//!     println!("cluster {}: {} sequences, {}", row.cluster_index, row.sequence_count, row.tag);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`core`]: records, the corpus, configuration, the residue alphabet
//! - [`distance`]: pairwise metrics, the distance cache, neighbor ranking
//! - [`cluster`]: threshold partition, classification, diagnostics
//! - [`consensus`]: ambiguity-aware consensus sequences
//! - [`identify`]: Best Match / Best Close Match scoring
//! - [`summary`]: intra- vs. interspecific distance distributions
//! - [`run`]: the full pipeline over one corpus

pub mod cluster;
pub mod consensus;
pub mod core;
pub mod distance;
pub mod identify;
pub mod run;
pub mod summary;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::cluster::{Cluster, ClusterReport, ClusterRow};
pub use crate::consensus::{ConsensusError, ConsensusRecord};
pub use crate::core::{
    AmbiguityMode, CancelToken, Cancelled, ClusterTag, Configuration, Corpus, DistanceModel,
    MatchOutcome, RecordError, SequenceId, SequenceRecord,
};
pub use crate::distance::{DistanceCache, DistanceResult};
pub use crate::identify::IdentificationReport;
pub use crate::run::{AnalysisReport, AnalysisRun};
pub use crate::summary::PairwiseSummaryReport;
