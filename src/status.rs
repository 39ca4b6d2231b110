//! Presentation status derivation.
//!
//! Consumed by, not owned by, the engine: after every mutation the caller
//! takes one [`StateTable`] and renders from it. The table is plain data
//! and serializes, since it crosses the presentation boundary.

use serde::{Deserialize, Serialize};

use crate::catalog::FacetId;
use crate::engine::FilterEngine;
use crate::model::Mask;

/// Three-way display status of one (facet, value) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueStatus {
    /// Value is selected and yields at least one matching record.
    SelectedMatching,
    /// Value is selected but yields no records under the current filters.
    /// Flagged distinctly rather than hidden.
    SelectedEmpty,
    /// Value is not selected; `count` is the would-match count.
    Unselected,
}

/// One cell of the outbound table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCell {
    pub label: String,
    pub bit: Mask,
    pub selected: bool,
    pub count: usize,
    pub status: ValueStatus,
    /// For unselected values: render the count as "would add N". Suppressed
    /// when the facet is cleared, where every value is a plain group total.
    pub would_add: bool,
}

/// Per-facet block of the outbound table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetReport {
    pub facet: FacetId,
    pub name: String,
    /// Mask equals the facet's full mask. Mutually exclusive with `cleared`
    /// (observable states; both behave as unconstrained for matching).
    pub all_selected: bool,
    /// Mask is empty ("group by").
    pub cleared: bool,
    pub values: Vec<ValueCell>,
}

/// The full outbound table, one block per facet in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTable {
    pub facets: Vec<FacetReport>,
}

impl StateTable {
    pub fn facet(&self, name: &str) -> Option<&FacetReport> {
        self.facets.iter().find(|f| f.name == name)
    }
}

impl FacetReport {
    pub fn value(&self, label: &str) -> Option<&ValueCell> {
        self.values.iter().find(|v| v.label == label)
    }
}

/// Derive the outbound table from the engine's current state.
pub fn snapshot(engine: &FilterEngine) -> StateTable {
    let facets = engine
        .catalog()
        .facets()
        .map(|(id, def)| {
            let mask = engine.selection(id);
            let values = def
                .value_labels()
                .iter()
                .enumerate()
                .map(|(position, label)| {
                    // Positions come from the catalog, so the bit exists.
                    let bit = def.value_bit(position).unwrap_or(Mask::EMPTY);
                    cell(engine, id, mask, label, bit)
                })
                .collect();

            FacetReport {
                facet: id,
                name: def.name().to_string(),
                all_selected: engine.all_selected(id),
                cleared: engine.cleared(id),
                values,
            }
        })
        .collect();

    StateTable { facets }
}

fn cell(engine: &FilterEngine, facet: FacetId, mask: Mask, label: &str, bit: Mask) -> ValueCell {
    let selected = mask.intersects(bit);
    let (count, status, would_add) = if selected {
        let count = engine.count_current(facet, bit);
        let status =
            if count > 0 { ValueStatus::SelectedMatching } else { ValueStatus::SelectedEmpty };
        (count, status, false)
    } else {
        (engine.count_preview(facet, bit), ValueStatus::Unselected, !mask.is_empty())
    };

    ValueCell { label: label.to_string(), bit, selected, count, status, would_add }
}

// ============================================================================
// Tests
// ============================================================================
