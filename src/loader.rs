//! Dataset loading and validation.
//!
//! Turns a [`DatasetDescriptor`] into a [`Catalog`] plus the accepted
//! record list. A malformed row does not abort the load: it is excluded,
//! reported with its position in the document, and logged, and the
//! remaining rows are still processed.

use smallvec::SmallVec;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::model::{DatasetDescriptor, Mask, Record, RecordId, RecordSpec};
use crate::{Error, Result};

/// Why a record row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordFault {
    #[error("expected {expected} facet values, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("bits {bits:#x} are not a single defined value of facet '{facet}'")]
    NotOneValue { facet: String, bits: u32 },
}

/// A rejected row: its position in the document and the fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Zero-based position of the row in the descriptor's record list.
    pub index: usize,
    pub fault: RecordFault,
}

impl RejectedRecord {
    /// The rejection as a crate-level error, for callers that treat any
    /// malformed row as fatal.
    pub fn to_error(&self) -> Error {
        Error::MalformedRecord { index: self.index, fault: self.fault.clone() }
    }
}

/// Result of a load: the catalog, the accepted records, and the rejects.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub catalog: Catalog,
    pub records: Vec<Record>,
    pub rejected: Vec<RejectedRecord>,
}

/// Build the catalog and validate every record row.
///
/// Catalog-level faults ([`Error::CapacityExceeded`],
/// [`Error::DuplicateFacet`]) are fatal; record-level faults are collected
/// in [`Loaded::rejected`] instead.
pub fn load(descriptor: &DatasetDescriptor) -> Result<Loaded> {
    let catalog = Catalog::build(descriptor)?;

    let mut records = Vec::with_capacity(descriptor.records.len());
    let mut rejected = Vec::new();

    for (index, row) in descriptor.records.iter().enumerate() {
        match convert_row(&catalog, row) {
            Ok(bits) => {
                let id = RecordId(records.len() as u32);
                records.push(Record::new(id, bits));
            }
            Err(fault) => {
                warn!(index, %fault, "rejecting malformed record");
                rejected.push(RejectedRecord { index, fault });
            }
        }
    }

    info!(
        facets = catalog.len(),
        accepted = records.len(),
        rejected = rejected.len(),
        "dataset loaded"
    );

    Ok(Loaded { catalog, records, rejected })
}

fn convert_row(catalog: &Catalog, row: &RecordSpec) -> std::result::Result<SmallVec<[Mask; 8]>, RecordFault> {
    if row.0.len() != catalog.len() {
        return Err(RecordFault::ArityMismatch { expected: catalog.len(), got: row.0.len() });
    }

    let mut bits = SmallVec::with_capacity(catalog.len());
    for ((_, def), &raw) in catalog.facets().zip(&row.0) {
        let bit = Mask::from_bits(raw);
        if !def.defines(bit) {
            return Err(RecordFault::NotOneValue { facet: def.name().to_string(), bits: raw });
        }
        bits.push(bit);
    }
    Ok(bits)
}

// ============================================================================
// Tests
// ============================================================================
