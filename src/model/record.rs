//! A loaded record: one value per facet.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::Mask;
use crate::catalog::FacetId;

/// Opaque record identifier (position in the accepted record list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u32);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One item in the dataset, tagged with exactly one value per facet.
///
/// Invariant (enforced by the loader): `bits` has one entry per catalog
/// facet, in catalog order, and each entry is a single-bit mask inside that
/// facet's full mask. Records never change after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    bits: SmallVec<[Mask; 8]>,
}

impl Record {
    pub(crate) fn new(id: RecordId, bits: SmallVec<[Mask; 8]>) -> Self {
        Self { id, bits }
    }

    /// The record's single value bit along `facet`.
    pub fn value_bit(&self, facet: FacetId) -> Mask {
        self.bits[facet.0 as usize]
    }

    /// Value bits in catalog facet order.
    pub fn facet_bits(&self) -> &[Mask] {
        &self.bits
    }
}
