//! Inverted index over the record set.
//!
//! Built once at engine construction and read-only afterwards. For every
//! (facet, value position) it holds the set of records carrying that value,
//! as a bit-packed [`RecordSet`]. Counting a (facet, value) pair is then a
//! word-wise AND + popcount across the candidate set and the per-facet
//! match sets the engine caches.

use crate::catalog::{Catalog, FacetId};
use crate::model::{Mask, Record};

/// Bit-packed set of record ids (1 bit per record, LSB = record 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordSet {
    words: Vec<u64>,
    len: usize,
}

impl RecordSet {
    pub fn empty(len: usize) -> Self {
        Self { words: vec![0; len.div_ceil(64)], len }
    }

    /// Set with every record present. Unused tail bits stay zero so
    /// popcounts are exact.
    pub fn full(len: usize) -> Self {
        let mut words = vec![!0u64; len.div_ceil(64)];
        let rem = len % 64;
        if rem != 0 {
            if let Some(last) = words.last_mut() {
                *last = (1u64 << rem) - 1;
            }
        }
        Self { words, len }
    }

    pub fn insert(&mut self, id: u32) {
        let i = id as usize;
        debug_assert!(i < self.len);
        self.words[i >> 6] |= 1u64 << (i & 63);
    }

    pub fn union_with(&mut self, other: &RecordSet) {
        debug_assert_eq!(self.len, other.len);
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w |= o;
        }
    }

    /// Popcount of `self ∩ others[0] ∩ others[1] ∩ ...` without
    /// materializing the intersection.
    pub fn intersection_count(&self, others: &[&RecordSet]) -> usize {
        self.words
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let folded = others.iter().fold(w, |acc, set| acc & set.words[i]);
                folded.count_ones() as usize
            })
            .sum()
    }
}

#[cfg(test)]
impl RecordSet {
    pub fn contains(&self, id: u32) -> bool {
        let i = id as usize;
        i < self.len && self.words[i >> 6] >> (i & 63) & 1 == 1
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Per-(facet, value) record postings.
#[derive(Debug, Clone)]
pub(crate) struct InvertedIndex {
    /// `postings[facet][position]` = records carrying that value.
    postings: Vec<Vec<RecordSet>>,
    record_count: usize,
}

impl InvertedIndex {
    pub fn build(catalog: &Catalog, records: &[Record]) -> Self {
        let record_count = records.len();
        let mut postings: Vec<Vec<RecordSet>> = catalog
            .facets()
            .map(|(_, def)| (0..def.value_count()).map(|_| RecordSet::empty(record_count)).collect())
            .collect();

        // Sets are keyed by position in the record list, which the loader
        // keeps identical to the record id.
        for (slot, record) in records.iter().enumerate() {
            for (facet, bit) in record.facet_bits().iter().enumerate() {
                // Loader guarantees exactly one position per facet.
                if let Some(position) = bit.positions().next() {
                    postings[facet][position].insert(slot as u32);
                }
            }
        }

        Self { postings, record_count }
    }

    /// Records carrying the value at `position` along `facet`.
    pub fn candidates(&self, facet: FacetId, position: usize) -> &RecordSet {
        &self.postings[facet.index()][position]
    }

    /// Records matching `mask` along `facet` under the engine's semantics:
    /// an empty mask is a wildcard, otherwise the union of the selected
    /// values' postings.
    pub fn match_set(&self, facet: FacetId, mask: Mask) -> RecordSet {
        if mask.is_empty() {
            return RecordSet::full(self.record_count);
        }
        let mut set = RecordSet::empty(self.record_count);
        for position in mask.positions() {
            if let Some(postings) = self.postings[facet.index()].get(position) {
                set.union_with(postings);
            }
        }
        set
    }
}

// ============================================================================
// Tests
// ============================================================================
