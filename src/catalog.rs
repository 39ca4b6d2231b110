//! Facet catalog: the static registry of facets, value labels, and bit
//! assignment.
//!
//! Built once from the inbound descriptor and never mutated. Each facet's
//! `i`-th value (in document order) is assigned the single-bit mask
//! `1 << i`; the union of a facet's value bits is its full mask.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::model::{DatasetDescriptor, Mask};
use crate::{Error, Result};

/// Opaque facet identifier (position in catalog order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacetId(pub u16);

impl std::fmt::Display for FacetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FacetId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// One facet: its name, ordered value labels, and full mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetDef {
    name: String,
    values: Vec<String>,
    full: Mask,
}

impl FacetDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn value_labels(&self) -> &[String] {
        &self.values
    }

    /// Union of all of this facet's value bits.
    pub fn full_mask(&self) -> Mask {
        self.full
    }

    /// Bit assigned to the value at `position`, or `None` past the end.
    pub fn value_bit(&self, position: usize) -> Option<Mask> {
        if position < self.values.len() { Mask::single(position) } else { None }
    }

    /// True when `bit` is exactly one of this facet's defined values.
    pub fn defines(&self, bit: Mask) -> bool {
        bit.is_single() && self.full.contains(bit)
    }
}

/// Ordered facet registry with name lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    facets: Vec<FacetDef>,
    by_name: HashMap<String, FacetId>,
}

impl Catalog {
    /// Build a catalog from the descriptor's facet section. Pure.
    ///
    /// Fails with [`Error::CapacityExceeded`] when a facet declares more
    /// values than [`Mask::CAPACITY`], and with [`Error::DuplicateFacet`]
    /// when two facets share a name.
    pub fn build(descriptor: &DatasetDescriptor) -> Result<Catalog> {
        let mut facets = Vec::with_capacity(descriptor.facets.len());
        let mut by_name = HashMap::with_capacity(descriptor.facets.len());

        for spec in &descriptor.facets {
            let full = Mask::all(spec.values.len()).ok_or_else(|| Error::CapacityExceeded {
                facet: spec.name.clone(),
                values: spec.values.len(),
                max: Mask::CAPACITY,
            })?;

            let id = FacetId(facets.len() as u16);
            if by_name.insert(spec.name.clone(), id).is_some() {
                return Err(Error::DuplicateFacet(spec.name.clone()));
            }
            facets.push(FacetDef { name: spec.name.clone(), values: spec.values.clone(), full });
        }

        Ok(Catalog { facets, by_name })
    }

    /// Number of facets.
    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Iterate facets in catalog order.
    pub fn facets(&self) -> impl Iterator<Item = (FacetId, &FacetDef)> {
        self.facets.iter().enumerate().map(|(i, def)| (FacetId(i as u16), def))
    }

    /// Look up a facet definition by id.
    ///
    /// Ids originate from this catalog (`facets()` / `resolve`), so lookup
    /// cannot fail for ids the caller obtained legitimately.
    pub fn facet(&self, id: FacetId) -> &FacetDef {
        &self.facets[id.index()]
    }

    /// Resolve a facet name to its id.
    pub fn resolve(&self, name: &str) -> Result<FacetId> {
        self.by_name.get(name).copied().ok_or_else(|| Error::UnknownFacet(name.to_string()))
    }

    /// Validate that `bit` names a single defined value of `facet`.
    pub(crate) fn check_value(&self, facet: FacetId, bit: Mask) -> Result<()> {
        let def = self.facet(facet);
        if def.defines(bit) {
            Ok(())
        } else {
            Err(Error::InvalidValue { facet: def.name.clone(), bits: bit.bits() })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
