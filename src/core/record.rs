use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::residue::{self, GAP, MISSING};
use crate::core::types::SequenceId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("sequence '{name}': RNA is not supported, found a uracil at index {index}")]
    Uracil { name: String, index: usize },

    #[error("sequence '{name}': illegal residue '{residue}' at index {index}")]
    IllegalResidue {
        name: String,
        residue: char,
        index: usize,
    },

    #[error("sequence '{name}': ambiguity group opened at index {index} is never closed")]
    UnclosedGroup { name: String, index: usize },

    #[error("sequence '{name}': nested ambiguity group at index {index}")]
    NestedGroup { name: String, index: usize },
}

/// One aligned DNA barcode sequence.
///
/// Records are immutable once loaded; renaming and sequence editing belong to
/// the corpus-editing collaborator, never to the analysis core. The residue
/// string is uppercased on construction and bracketed ambiguity groups
/// (`[AG]`, `(AG)`) are collapsed to their covering IUPAC code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Corpus-assigned id (dense index)
    pub(crate) id: SequenceId,

    /// Short name used in report rows
    pub display_name: String,

    /// Raw header text this record was loaded from
    pub full_name: String,

    /// Binomial species name, when one could be recognized
    pub species_name: Option<String>,

    /// Aligned residues (uppercase ASCII)
    residues: Vec<u8>,

    /// Index of the first column that is neither gap nor missing
    first_real: Option<usize>,

    /// Index of the last column that is neither gap nor missing
    last_real: Option<usize>,
}

impl SequenceRecord {
    /// Build a record from a raw header and an aligned residue string.
    ///
    /// The id is a placeholder until the record joins a
    /// [`crate::core::corpus::Corpus`].
    pub fn new(
        full_name: impl Into<String>,
        species_name: Option<String>,
        raw: &str,
    ) -> Result<Self, RecordError> {
        let full_name = full_name.into();
        let residues = parse_residues(&full_name, raw)?;
        let first_real = residues
            .iter()
            .position(|&c| c != GAP && c != MISSING);
        let last_real = residues
            .iter()
            .rposition(|&c| c != GAP && c != MISSING);

        Ok(Self {
            id: SequenceId(usize::MAX),
            display_name: full_name.clone(),
            full_name,
            species_name,
            residues,
            first_real,
            last_real,
        })
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub fn id(&self) -> SequenceId {
        self.id
    }

    #[must_use]
    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    /// Residues as a string, for consensus records and display.
    #[must_use]
    pub fn residue_string(&self) -> String {
        String::from_utf8_lossy(&self.residues).into_owned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// First column holding a defined character, None for blank sequences.
    #[must_use]
    pub fn first_real(&self) -> Option<usize> {
        self.first_real
    }

    /// Last column holding a defined character, None for blank sequences.
    #[must_use]
    pub fn last_real(&self) -> Option<usize> {
        self.last_real
    }

    /// Genus: the first whitespace-separated token of the species name.
    #[must_use]
    pub fn genus_name(&self) -> &str {
        self.species_name
            .as_deref()
            .and_then(|s| s.split_whitespace().next())
            .unwrap_or("")
    }

    /// Does `other` carry the same species name? False when either is unnamed.
    #[must_use]
    pub fn is_conspecific(&self, other: &Self) -> bool {
        match (&self.species_name, &other.species_name) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Same genus, regardless of species. False when either genus is empty.
    #[must_use]
    pub fn is_congeneric(&self, other: &Self) -> bool {
        let g1 = self.genus_name();
        let g2 = other.genus_name();
        !g1.is_empty() && g1 == g2
    }
}

/// Uppercase, validate, and collapse `[..]`/`(..)` ambiguity groups.
fn parse_residues(name: &str, raw: &str) -> Result<Vec<u8>, RecordError> {
    let mut out = Vec::with_capacity(raw.len());
    let bytes = raw.trim().as_bytes();
    let mut x = 0;

    while x < bytes.len() {
        let ch = bytes[x].to_ascii_uppercase();
        match ch {
            b'[' | b'(' => {
                let closer = if ch == b'[' { b']' } else { b')' };
                let open_at = x;
                let mut bits = 0u8;
                x += 1;
                loop {
                    let Some(&inner) = bytes.get(x) else {
                        return Err(RecordError::UnclosedGroup {
                            name: name.to_string(),
                            index: open_at,
                        });
                    };
                    let inner = inner.to_ascii_uppercase();
                    if inner == closer {
                        break;
                    }
                    if inner == b'[' || inner == b'(' {
                        return Err(RecordError::NestedGroup {
                            name: name.to_string(),
                            index: x,
                        });
                    }
                    check_residue(name, inner, x)?;
                    bits |= residue::base_bits(inner);
                    x += 1;
                }
                out.push(residue::code_for_bits(bits));
            }
            _ => {
                check_residue(name, ch, x)?;
                out.push(ch);
            }
        }
        x += 1;
    }

    Ok(out)
}

fn check_residue(name: &str, ch: u8, index: usize) -> Result<(), RecordError> {
    if ch == b'U' {
        return Err(RecordError::Uracil {
            name: name.to_string(),
            index,
        });
    }
    if !residue::is_valid(ch) {
        return Err(RecordError::IllegalResidue {
            name: name.to_string(),
            residue: ch as char,
            index,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(raw: &str) -> SequenceRecord {
        SequenceRecord::new("test", None, raw).unwrap()
    }

    #[test]
    fn test_residues_uppercased() {
        assert_eq!(record("acgt").residues(), b"ACGT");
    }

    #[test]
    fn test_real_character_range() {
        let rec = record("--?ACGT-A??--");
        assert_eq!(rec.first_real(), Some(3));
        assert_eq!(rec.last_real(), Some(8));
    }

    #[test]
    fn test_blank_sequence_has_no_real_range() {
        let rec = record("---???---");
        assert_eq!(rec.first_real(), None);
        assert_eq!(rec.last_real(), None);
    }

    #[test]
    fn test_ambiguity_group_collapses() {
        assert_eq!(record("A[AG]T").residues(), b"ART");
        assert_eq!(record("A(CT)G").residues(), b"AYG");
        assert_eq!(record("[ACTG]").residues(), b"N");
    }

    #[test]
    fn test_unclosed_group_is_an_error() {
        assert!(matches!(
            SequenceRecord::new("x", None, "A[AG"),
            Err(RecordError::UnclosedGroup { index: 1, .. })
        ));
    }

    #[test]
    fn test_uracil_rejected() {
        assert!(matches!(
            SequenceRecord::new("x", None, "ACGU"),
            Err(RecordError::Uracil { index: 3, .. })
        ));
    }

    #[test]
    fn test_illegal_residue_rejected() {
        assert!(matches!(
            SequenceRecord::new("x", None, "ACXG"),
            Err(RecordError::IllegalResidue { residue: 'X', .. })
        ));
    }

    #[test]
    fn test_genus_derivation() {
        let rec = SequenceRecord::new("h", Some("Papilio machaon".to_string()), "ACGT").unwrap();
        assert_eq!(rec.genus_name(), "Papilio");

        let unnamed = record("ACGT");
        assert_eq!(unnamed.genus_name(), "");
    }

    #[test]
    fn test_conspecific_and_congeneric() {
        let a = SequenceRecord::new("a", Some("Papilio machaon".into()), "ACGT").unwrap();
        let b = SequenceRecord::new("b", Some("Papilio machaon".into()), "ACGT").unwrap();
        let c = SequenceRecord::new("c", Some("Papilio glaucus".into()), "ACGT").unwrap();
        let u = record("ACGT");

        assert!(a.is_conspecific(&b));
        assert!(!a.is_conspecific(&c));
        assert!(a.is_congeneric(&c));
        assert!(!a.is_conspecific(&u));
        assert!(!a.is_congeneric(&u));
    }
}
