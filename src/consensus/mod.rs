//! Ambiguity-aware consensus sequences.
//!
//! A cluster's consensus is the left-to-right fold of its members under the
//! position-wise merge in [`crate::core::residue::merge_char`]: identical
//! characters survive, a missing or absent column defers to the other side,
//! and differing bases widen to the smallest covering IUPAC code. Leading and
//! trailing runs of the full wildcard `N` in the folded result are rewritten
//! to gaps: an edge that could be anything is an absence-of-data artifact,
//! not sequence.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::record::SequenceRecord;
use crate::core::residue::{merge_char, GAP, MISSING};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsensusError {
    #[error("cannot build a consensus of zero sequences")]
    Empty,
}

/// A named consensus sequence, ready for an external FASTA writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusRecord {
    pub name: String,
    pub residues: String,
}

/// Fold a set of records into one consensus record.
///
/// The result is as long as the longest member; a single member is returned
/// unchanged (no fold happens, so no edge rewrite applies).
pub fn consensus(
    name: impl Into<String>,
    records: &[&SequenceRecord],
) -> Result<ConsensusRecord, ConsensusError> {
    let (first, rest) = records.split_first().ok_or(ConsensusError::Empty)?;

    let mut folded = first.residues().to_vec();
    if rest.is_empty() {
        return Ok(ConsensusRecord {
            name: name.into(),
            residues: String::from_utf8_lossy(&folded).into_owned(),
        });
    }

    for record in rest {
        fold_into(&mut folded, record.residues());
    }
    rewrite_wildcard_edges(&mut folded);

    Ok(ConsensusRecord {
        name: name.into(),
        residues: String::from_utf8_lossy(&folded).into_owned(),
    })
}

/// Merge `next` into the accumulator, padding the shorter side with `?`.
fn fold_into(acc: &mut Vec<u8>, next: &[u8]) {
    let len = acc.len().max(next.len());
    acc.resize(len, MISSING);
    for (col, slot) in acc.iter_mut().enumerate() {
        let other = next.get(col).copied().unwrap_or(MISSING);
        *slot = merge_char(*slot, other);
    }
}

/// Rewrite leading and trailing `N` runs to gaps.
fn rewrite_wildcard_edges(residues: &mut [u8]) {
    for slot in residues.iter_mut() {
        if *slot != b'N' {
            break;
        }
        *slot = GAP;
    }
    for slot in residues.iter_mut().rev() {
        if *slot != b'N' {
            break;
        }
        *slot = GAP;
    }
}
