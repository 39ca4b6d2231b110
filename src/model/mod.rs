//! # Data model
//!
//! Pure DTOs that cross every boundary: loader ↔ catalog ↔ engine ↔ caller.
//!
//! Design rule: no I/O, no mutable state, no logging here. This module is
//! pure data.

pub mod dataset;
pub mod mask;
pub mod record;

pub use dataset::{DatasetDescriptor, FacetSpec, RecordSpec};
pub use mask::Mask;
pub use record::{Record, RecordId};
