//! # facet-engine — Faceted Filtering & Live-Count Engine
//!
//! Records tagged with exactly one value per facet, a multi-select filter
//! per facet, and for every value of every facet a live count: how many
//! records would match if that value were added to (or kept in) the active
//! selection.
//!
//! ## Design Principles
//!
//! 1. **Pure core**: (dataset, selection state) → (counts, flags). No
//!    rendering, no persistence, no network.
//! 2. **Clean DTOs**: `Mask`, `Record`, `StateTable` cross all boundaries.
//! 3. **Explicit state**: the engine is an owned object built from the
//!    loaded dataset — no ambient globals.
//! 4. **Two counting strategies, one answer**: the naive scan and the
//!    inverted-index path must agree exactly.
//!
//! ## Quick Start
//!
//! ```rust
//! use facet_engine::{DatasetDescriptor, FilterEngine, Mask, loader};
//!
//! # fn main() -> facet_engine::Result<()> {
//! let doc = r#"{
//!     "facets": [
//!         {"name": "motor", "values": ["M1", "M2", "M3"]},
//!         {"name": "cell", "values": ["3S", "4S"]}
//!     ],
//!     "records": [[1, 1], [2, 1], [4, 2]]
//! }"#;
//!
//! let loaded = loader::load(&DatasetDescriptor::from_json(doc)?)?;
//! let mut engine = FilterEngine::new(loaded.catalog, loaded.records);
//!
//! // Deselect the 4S cell value; M3's only record is a 4S record.
//! let cell = engine.catalog().resolve("cell")?;
//! engine.toggle(cell, Mask::single(1).unwrap())?;
//!
//! let table = engine.snapshot();
//! let motor = table.facet("motor").unwrap();
//! assert_eq!(motor.value("M1").unwrap().count, 1);
//! assert_eq!(motor.value("M3").unwrap().count, 0);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod catalog;
pub mod engine;
pub mod loader;
pub mod model;
pub mod status;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{DatasetDescriptor, FacetSpec, Mask, Record, RecordId, RecordSpec};

// ============================================================================
// Re-exports: Catalog & loading
// ============================================================================

pub use catalog::{Catalog, FacetDef, FacetId};
pub use loader::{Loaded, RecordFault, RejectedRecord};

// ============================================================================
// Re-exports: Engine
// ============================================================================

pub use engine::{CountStrategy, EngineConfig, FilterEngine, SelectionDefault};

// ============================================================================
// Re-exports: Outbound table
// ============================================================================

pub use status::{FacetReport, StateTable, ValueCell, ValueStatus};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("facet '{facet}' declares {values} values; at most {max} are supported")]
    CapacityExceeded { facet: String, values: usize, max: usize },

    #[error("duplicate facet name: '{0}'")]
    DuplicateFacet(String),

    #[error("unknown facet: '{0}'")]
    UnknownFacet(String),

    #[error("bits {bits:#x} are not valid for facet '{facet}'")]
    InvalidValue { facet: String, bits: u32 },

    #[error("record {index}: {fault}")]
    MalformedRecord { index: usize, fault: loader::RecordFault },

    #[error("malformed dataset document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
