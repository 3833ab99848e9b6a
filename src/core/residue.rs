//! The DNA residue alphabet.
//!
//! Residues are stored as uppercase ASCII bytes: the four bases `A`/`C`/`G`/`T`,
//! the IUPAC ambiguity codes (`R`, `Y`, `K`, `M`, `S`, `W`, `B`, `D`, `H`, `V`,
//! `N`), the gap `-` and the missing-data marker `?`. Every ambiguity code maps
//! to a set of bases, represented as a 4-bit mask, which is what the identity
//! and consensus rules operate on.

use crate::core::types::AmbiguityMode;

/// Alignment gap
pub const GAP: u8 = b'-';

/// Missing data (unknown, as opposed to "might be anything" which is `N`)
pub const MISSING: u8 = b'?';

const BIT_A: u8 = 0x01;
const BIT_C: u8 = 0x02;
const BIT_T: u8 = 0x04;
const BIT_G: u8 = 0x08;
const BITS_ALL: u8 = BIT_A | BIT_C | BIT_T | BIT_G;

/// Base set of a residue as a bit mask (A=0x1, C=0x2, T=0x4, G=0x8).
///
/// Gap, missing and unknown characters have an empty set.
#[must_use]
pub fn base_bits(residue: u8) -> u8 {
    match residue.to_ascii_uppercase() {
        b'A' => BIT_A,
        b'C' => BIT_C,
        b'T' => BIT_T,
        b'G' => BIT_G,
        b'R' => BIT_A | BIT_G,
        b'Y' => BIT_C | BIT_T,
        b'K' => BIT_G | BIT_T,
        b'M' => BIT_A | BIT_C,
        b'S' => BIT_C | BIT_G,
        b'W' => BIT_A | BIT_T,
        b'B' => BIT_C | BIT_G | BIT_T,
        b'D' => BIT_A | BIT_G | BIT_T,
        b'H' => BIT_A | BIT_C | BIT_T,
        b'V' => BIT_A | BIT_C | BIT_G,
        b'N' => BITS_ALL,
        _ => 0,
    }
}

/// The smallest IUPAC code covering the given base set; `-` for the empty set.
#[must_use]
pub fn code_for_bits(bits: u8) -> u8 {
    match bits & BITS_ALL {
        0 => GAP,
        BIT_A => b'A',
        BIT_C => b'C',
        BIT_T => b'T',
        BIT_G => b'G',
        0x03 => b'M', // A/C
        0x05 => b'W', // A/T
        0x09 => b'R', // A/G
        0x06 => b'Y', // C/T
        0x0a => b'S', // C/G
        0x0c => b'K', // T/G
        0x07 => b'H', // A/C/T
        0x0b => b'V', // A/C/G
        0x0d => b'D', // A/T/G
        0x0e => b'B', // C/T/G
        _ => b'N',    // A/C/T/G
    }
}

/// Is this a character the core understands at all?
#[must_use]
pub fn is_valid(residue: u8) -> bool {
    residue == GAP || residue == MISSING || base_bits(residue) != 0
}

/// Is this an ambiguity code (a defined base set larger than one base)?
#[must_use]
pub fn is_ambiguity(residue: u8) -> bool {
    base_bits(residue).count_ones() > 1
}

/// Pure purine (A, G) or the purine ambiguity code R.
#[must_use]
pub fn is_purine(residue: u8) -> bool {
    matches!(residue.to_ascii_uppercase(), b'A' | b'G' | b'R')
}

/// Pure pyrimidine (C, T) or the pyrimidine ambiguity code Y.
#[must_use]
pub fn is_pyrimidine(residue: u8) -> bool {
    matches!(residue.to_ascii_uppercase(), b'C' | b'T' | b'Y')
}

/// Per-column identity check between two residues inside a comparison window.
///
/// Missing data never matches anything. A gap matches only another gap; a gap
/// against a base is an ordinary difference. Two defined codes are identical
/// when their base sets intersect: `W` ({A,T}) matches `M` ({A,C}) through the
/// shared A, but not `S` ({C,G}). Under [`AmbiguityMode::CollapseToN`] every
/// ambiguity code is widened to the full wildcard before the set test.
#[must_use]
pub fn identical(c1: u8, c2: u8, mode: AmbiguityMode) -> bool {
    if c1 == MISSING || c2 == MISSING {
        return false;
    }
    if c1 == GAP || c2 == GAP {
        return c1 == c2;
    }

    let mut b1 = base_bits(c1);
    let mut b2 = base_bits(c2);
    if b1 == 0 || b2 == 0 {
        return false;
    }

    if mode == AmbiguityMode::CollapseToN {
        if b1.count_ones() > 1 {
            b1 = BITS_ALL;
        }
        if b2.count_ones() > 1 {
            b2 = BITS_ALL;
        }
    }

    b1 & b2 != 0
}

/// Position-wise consensus of two residues.
///
/// Missing data yields the other side; a gap yields the other side's defined
/// character (two gaps stay a gap); two defined codes yield the smallest code
/// covering the union of their base sets. Commutative, and idempotent for
/// every character.
#[must_use]
pub fn merge_char(c1: u8, c2: u8) -> u8 {
    if c1 == MISSING {
        return c2;
    }
    if c2 == MISSING {
        return c1;
    }
    if c1 == GAP {
        return c2;
    }
    if c2 == GAP {
        return c1;
    }
    code_for_bits(base_bits(c1) | base_bits(c2))
}
