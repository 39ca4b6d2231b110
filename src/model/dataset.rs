//! Inbound dataset document.
//!
//! The presentation layer hands the engine one document at startup: an
//! ordered list of facets with their value labels, plus one row per record
//! carrying the raw value bit for each facet in the same order. This module
//! only describes the shape; validation lives in the loader.

use serde::{Deserialize, Serialize};

use crate::Result;

/// One facet and its ordered value labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSpec {
    pub name: String,
    pub values: Vec<String>,
}

/// One record row: raw value bits, one per facet, in facet order.
///
/// Each entry is expected to be the power-of-two bit of the record's single
/// value along that facet (`1 << position`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSpec(pub Vec<u32>);

/// The full inbound document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub facets: Vec<FacetSpec>,
    pub records: Vec<RecordSpec>,
}

impl DatasetDescriptor {
    /// Parse a descriptor from its JSON form.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Convenience constructor for building descriptors in code.
    pub fn new(facets: Vec<FacetSpec>, records: Vec<RecordSpec>) -> Self {
        Self { facets, records }
    }
}

impl FacetSpec {
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { name: name.into(), values: values.into_iter().map(Into::into).collect() }
    }
}
