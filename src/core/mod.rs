//! Core data types: records, the corpus, configuration, the residue
//! alphabet, and the cooperative cancellation token.

pub mod cancel;
pub mod config;
pub mod corpus;
pub mod record;
pub mod residue;
pub mod types;

pub use cancel::{CancelToken, Cancelled};
pub use config::Configuration;
pub use corpus::{Corpus, SpeciesCensus};
pub use record::{RecordError, SequenceRecord};
pub use types::{AmbiguityMode, ClusterTag, DistanceModel, MatchOutcome, SequenceId};
