use std::collections::HashMap;

use crate::core::record::SequenceRecord;
use crate::core::types::SequenceId;

/// An ordered collection of sequence records, exclusively held for the
/// duration of one analysis run.
///
/// The corpus assigns every record a dense [`SequenceId`] on construction;
/// iteration order is load order and is what every "corpus order" rule in the
/// engines refers to.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<SequenceRecord>,
}

impl Corpus {
    #[must_use]
    pub fn from_records(mut records: Vec<SequenceRecord>) -> Self {
        for (index, record) in records.iter_mut().enumerate() {
            record.id = SequenceId(index);
        }
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Panics if the id was not assigned by this corpus.
    #[must_use]
    pub fn get(&self, id: SequenceId) -> &SequenceRecord {
        &self.records[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SequenceRecord> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = SequenceId> {
        (0..self.records.len()).map(SequenceId)
    }

    /// Per-species totals across the whole corpus.
    #[must_use]
    pub fn species_census(&self) -> SpeciesCensus {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut without_name = 0;

        for record in &self.records {
            match &record.species_name {
                Some(name) => *counts.entry(name.clone()).or_insert(0) += 1,
                None => without_name += 1,
            }
        }

        SpeciesCensus {
            counts,
            without_name,
        }
    }
}

/// Corpus-wide per-species sequence counts.
#[derive(Debug, Clone)]
pub struct SpeciesCensus {
    counts: HashMap<String, usize>,
    without_name: usize,
}

impl SpeciesCensus {
    /// Total sequences for a species, None for unknown names.
    #[must_use]
    pub fn total_for(&self, species_name: &str) -> Option<usize> {
        self.counts.get(species_name).copied()
    }

    #[must_use]
    pub fn species_count(&self) -> usize {
        self.counts.len()
    }

    /// Sequences carrying no recognizable species name.
    #[must_use]
    pub fn without_name(&self) -> usize {
        self.without_name
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, &count)| (name.as_str(), count))
    }
}
