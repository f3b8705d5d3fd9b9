//! Run-wide usage accounting.
//!
//! Pure aggregation over file outcomes. Only the orchestrator calls this.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::report::FileOutcome;
use crate::settings::TierLevel;

/// Aggregate counters for one run.
///
/// `processed_files == transformed_files + unchanged_files + failed_files`;
/// skipped files were never attempted and are counted separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct UsageTotals {
    /// Files attempted (transformed, unchanged or failed).
    pub processed_files: usize,
    /// Files with at least one substitution.
    pub transformed_files: usize,
    /// Files read and rewritten without any substitution.
    pub unchanged_files: usize,
    /// Files that could not be read or rewritten.
    pub failed_files: usize,
    /// Files not started before the run deadline.
    pub skipped_files: usize,
    /// Total substitutions.
    pub transformed_words: usize,
    /// Net character delta across all files.
    pub transformed_chars: i64,
}

impl UsageTotals {
    /// Sum the counters of `outcomes`.
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        let mut totals = Self::default();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Transformed(result) => {
                    totals.processed_files += 1;
                    if result.transformed_words > 0 {
                        totals.transformed_files += 1;
                    } else {
                        totals.unchanged_files += 1;
                    }
                    totals.transformed_words += result.transformed_words;
                    totals.transformed_chars += result.transformed_chars;
                }
                FileOutcome::Failed { .. } => {
                    totals.processed_files += 1;
                    totals.failed_files += 1;
                }
                FileOutcome::Skipped { .. } => totals.skipped_files += 1,
            }
        }
        totals
    }
}

/// Counters handed to the billing collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UsageRecord {
    /// Tier the run was billed under.
    pub tier: TierLevel,
    /// Files attempted.
    pub processed_files: usize,
    /// Files with at least one substitution.
    pub transformed_files: usize,
    /// Total substitutions.
    pub transformed_words: usize,
    /// Net character delta.
    pub transformed_chars: i64,
}

impl UsageRecord {
    /// Record for `totals` billed under `tier`.
    pub const fn new(tier: TierLevel, totals: &UsageTotals) -> Self {
        Self {
            tier,
            processed_files: totals.processed_files,
            transformed_files: totals.transformed_files,
            transformed_words: totals.transformed_words,
            transformed_chars: totals.transformed_chars,
        }
    }
}
