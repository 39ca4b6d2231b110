//! # Filter Engine
//!
//! Owns the loaded dataset and the one piece of mutable state in the crate:
//! the per-facet selection masks. Matching is AND across facets, OR within
//! a facet; an empty mask is a wildcard, so a cleared facet ("group by")
//! and a fully selected facet behave identically for matching and differ
//! only as observable display states.
//!
//! Two counting strategies are provided. `Scan` walks every record per
//! query; `Indexed` (the default) intersects bit-packed record sets from a
//! load-time inverted index, refreshing only the mutated facet's cached
//! match set per operation. The two are required to agree exactly; the
//! property suite in `tests/` holds them to that.

mod index;

use smallvec::SmallVec;
use tracing::debug;

use crate::catalog::{Catalog, FacetId};
use crate::model::{Mask, Record};
use crate::{Error, Result};

use index::{InvertedIndex, RecordSet};

/// How count queries are evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountStrategy {
    /// Walk every record per query. O(records × facets).
    Scan,
    /// Intersect postings from the inverted index. O(words × facets).
    #[default]
    Indexed,
}

/// Starting selection state, per facet.
///
/// The default is every value selected — "all active on load". A cleared
/// start (every facet in group-by state) and explicit per-facet overrides
/// are available for callers that need a different opening state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionDefault {
    #[default]
    AllSelected,
    Cleared,
    /// Named per-facet starting masks, applied over an all-selected base.
    /// Each mask must stay within its facet's full mask (empty is allowed).
    Explicit(Vec<(String, Mask)>),
}

/// Engine construction options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub selection: SelectionDefault,
    pub strategy: CountStrategy,
}

/// The faceted filtering and live-count engine.
///
/// Catalog, records, and index are read-only after construction; only the
/// selection masks (and the per-facet cached match sets derived from them)
/// change, and only through [`toggle`](Self::toggle),
/// [`select_all`](Self::select_all), and [`clear`](Self::clear).
#[derive(Debug, Clone)]
pub struct FilterEngine {
    catalog: Catalog,
    records: Vec<Record>,
    selection: SmallVec<[Mask; 8]>,
    index: InvertedIndex,
    /// Per facet: records matching that facet's current mask.
    facet_match: Vec<RecordSet>,
    strategy: CountStrategy,
}

impl FilterEngine {
    /// Build an engine with the default configuration (all values selected,
    /// indexed counting).
    pub fn new(catalog: Catalog, records: Vec<Record>) -> Self {
        let selection = catalog.facets().map(|(_, def)| def.full_mask()).collect();
        Self::build(catalog, records, selection, CountStrategy::default())
    }

    /// Build an engine with explicit configuration.
    ///
    /// Fails with [`Error::UnknownFacet`] / [`Error::InvalidValue`] when an
    /// explicit override names a missing facet or strays outside its full
    /// mask. The dataset is untouched on error.
    pub fn with_config(catalog: Catalog, records: Vec<Record>, config: EngineConfig) -> Result<Self> {
        let mut selection: SmallVec<[Mask; 8]> = match &config.selection {
            SelectionDefault::Cleared => catalog.facets().map(|_| Mask::EMPTY).collect(),
            _ => catalog.facets().map(|(_, def)| def.full_mask()).collect(),
        };

        if let SelectionDefault::Explicit(overrides) = &config.selection {
            for (name, mask) in overrides {
                let facet = catalog.resolve(name)?;
                let def = catalog.facet(facet);
                if !def.full_mask().contains(*mask) {
                    return Err(Error::InvalidValue { facet: name.clone(), bits: mask.bits() });
                }
                selection[facet.index()] = *mask;
            }
        }

        Ok(Self::build(catalog, records, selection, config.strategy))
    }

    fn build(
        catalog: Catalog,
        records: Vec<Record>,
        selection: SmallVec<[Mask; 8]>,
        strategy: CountStrategy,
    ) -> Self {
        let index = InvertedIndex::build(&catalog, &records);
        let facet_match = catalog
            .facets()
            .map(|(id, _)| index.match_set(id, selection[id.index()]))
            .collect();
        Self { catalog, records, selection, index, facet_match, strategy }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn strategy(&self) -> CountStrategy {
        self.strategy
    }

    /// Switch counting strategy. Selection state is unaffected.
    pub fn set_strategy(&mut self, strategy: CountStrategy) {
        self.strategy = strategy;
    }

    /// Current selection mask for `facet`.
    pub fn selection(&self, facet: FacetId) -> Mask {
        self.selection[facet.index()]
    }

    /// True when every value of `facet` is individually selected.
    pub fn all_selected(&self, facet: FacetId) -> bool {
        self.selection[facet.index()] == self.catalog.facet(facet).full_mask()
    }

    /// True when `facet` is in group-by state (no constraint).
    pub fn cleared(&self, facet: FacetId) -> bool {
        self.selection[facet.index()].is_empty()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Toggle one value in `facet`'s selection (XOR). Toggling the same
    /// value twice restores the prior mask.
    ///
    /// Fails with [`Error::InvalidValue`] when `bit` is not a single
    /// defined value of the facet; the selection is unchanged on error.
    pub fn toggle(&mut self, facet: FacetId, bit: Mask) -> Result<()> {
        self.catalog.check_value(facet, bit)?;
        self.selection[facet.index()] ^= bit;
        self.refresh(facet);
        debug!(
            facet = %self.catalog.facet(facet).name(),
            bit = %bit,
            mask = %self.selection[facet.index()],
            "toggle"
        );
        Ok(())
    }

    /// Select every value of `facet`.
    pub fn select_all(&mut self, facet: FacetId) {
        self.selection[facet.index()] = self.catalog.facet(facet).full_mask();
        self.refresh(facet);
        debug!(facet = %self.catalog.facet(facet).name(), "select_all");
    }

    /// Clear `facet`'s selection ("group by"): the facet no longer
    /// constrains matching.
    pub fn clear(&mut self, facet: FacetId) {
        self.selection[facet.index()] = Mask::EMPTY;
        self.refresh(facet);
        debug!(facet = %self.catalog.facet(facet).name(), "clear");
    }

    fn refresh(&mut self, facet: FacetId) {
        self.facet_match[facet.index()] =
            self.index.match_set(facet, self.selection[facet.index()]);
    }

    // ========================================================================
    // Matching & counting
    // ========================================================================

    /// Does `record` satisfy every facet's current constraint?
    pub fn is_match(&self, record: &Record) -> bool {
        Self::matches(&self.selection, record)
    }

    fn matches(selection: &[Mask], record: &Record) -> bool {
        selection
            .iter()
            .zip(record.facet_bits())
            .all(|(sel, bit)| sel.is_empty() || sel.intersects(*bit))
    }

    /// Number of records matching the current selection across all facets.
    pub fn match_count(&self) -> usize {
        match self.strategy {
            CountStrategy::Scan => self.records.iter().filter(|r| self.is_match(r)).count(),
            CountStrategy::Indexed => match self.facet_match.split_first() {
                Some((first, rest)) => {
                    let rest: SmallVec<[&RecordSet; 8]> = rest.iter().collect();
                    first.intersection_count(&rest)
                }
                None => self.records.len(),
            },
        }
    }

    /// Would-match count: records carrying exactly `bit` in `facet` that
    /// satisfy every facet under a hypothetical selection with `bit` forced
    /// on. The previewed facet is checked by exact equality against `bit`,
    /// not by intersection — the preview counts only records of that one
    /// value, even when other bits are already set in the facet.
    ///
    /// Never mutates the selection; repeated calls return the same value
    /// absent other mutations.
    pub fn count_if_added(&self, facet: FacetId, bit: Mask) -> Result<usize> {
        self.catalog.check_value(facet, bit)?;
        Ok(self.count_preview(facet, bit))
    }

    /// Count of records carrying exactly `bit` in `facet` matching the
    /// current (not hypothetical) selection. Used to flag selected values
    /// that yield no results.
    pub fn count_selected(&self, facet: FacetId, bit: Mask) -> Result<usize> {
        self.catalog.check_value(facet, bit)?;
        Ok(self.count_current(facet, bit))
    }

    pub(crate) fn count_preview(&self, facet: FacetId, bit: Mask) -> usize {
        match self.strategy {
            CountStrategy::Scan => {
                let mut hypothetical = self.selection.clone();
                hypothetical[facet.index()] |= bit;
                self.records
                    .iter()
                    .filter(|r| r.value_bit(facet) == bit && Self::matches(&hypothetical, r))
                    .count()
            }
            CountStrategy::Indexed => {
                let Some(position) = bit.positions().next() else { return 0 };
                // The forced-on bit makes the previewed facet's own
                // constraint vacuous for its candidates, so only the other
                // facets' cached sets participate.
                let others: SmallVec<[&RecordSet; 8]> = self
                    .facet_match
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != facet.index())
                    .map(|(_, set)| set)
                    .collect();
                self.index.candidates(facet, position).intersection_count(&others)
            }
        }
    }

    pub(crate) fn count_current(&self, facet: FacetId, bit: Mask) -> usize {
        match self.strategy {
            CountStrategy::Scan => self
                .records
                .iter()
                .filter(|r| r.value_bit(facet) == bit && self.is_match(r))
                .count(),
            CountStrategy::Indexed => {
                let Some(position) = bit.positions().next() else { return 0 };
                let all: SmallVec<[&RecordSet; 8]> = self.facet_match.iter().collect();
                self.index.candidates(facet, position).intersection_count(&all)
            }
        }
    }

    /// Full outbound table for the presentation layer; see [`crate::status`].
    pub fn snapshot(&self) -> crate::status::StateTable {
        crate::status::snapshot(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
