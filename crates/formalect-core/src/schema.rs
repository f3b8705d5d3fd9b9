//! JSON Schemas for the documents formalect emits.
//!
//! `transform --json` prints a [`TransformationReport`] and `--usage-file`
//! writes a [`UsageRecord`]. Downstream tooling validates against these.

use schemars::{Schema, schema_for};

use crate::report::TransformationReport;
use crate::usage::UsageRecord;

/// Machine-readable output with a published schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SchemaTarget {
    /// Run report printed by `transform --json`.
    Report,
    /// Usage record written to `--usage-file`.
    Usage,
}

impl SchemaTarget {
    /// Generate the schema for this output.
    pub fn schema(self) -> Schema {
        match self {
            Self::Report => schema_for!(TransformationReport),
            Self::Usage => schema_for!(UsageRecord),
        }
    }
}
