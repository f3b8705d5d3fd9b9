//! Run reports: per-file outcomes, notices and the Markdown summary.

use std::fmt::Write as _;

use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::Serialize;

use crate::document::TransformationResult;
use crate::settings::TierLevel;
use crate::usage::{UsageRecord, UsageTotals};

/// Rows shown in the summary table before the remainder is elided.
pub const SUMMARY_TABLE_ROWS: usize = 10;

/// Category of an informational notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// A feature was withheld because of the caller's tier.
    TierGate,
    /// Custom terminology was malformed and the defaults were used.
    TerminologyDegraded,
    /// The run deadline passed before every file was started.
    DeadlineReached,
}

/// Informational message attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Notice {
    /// What kind of notice this is.
    pub kind: NoticeKind,
    /// Human-readable text.
    pub message: String,
}

impl Notice {
    /// A tier-gating notice.
    pub fn tier_gate(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::TierGate,
            message: message.into(),
        }
    }

    /// A terminology-degradation notice.
    pub fn terminology_degraded(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::TerminologyDegraded,
            message: message.into(),
        }
    }

    /// A deadline notice.
    pub fn deadline_reached(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::DeadlineReached,
            message: message.into(),
        }
    }
}

/// What happened to one selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Read and rewritten (possibly with zero substitutions).
    Transformed(TransformationResult),
    /// Could not be read or rewritten.
    Failed {
        /// Path relative to the run root.
        #[schemars(with = "String")]
        path: Utf8PathBuf,
        /// Why processing failed.
        reason: String,
    },
    /// Not started because the run deadline had passed.
    Skipped {
        /// Path relative to the run root.
        #[schemars(with = "String")]
        path: Utf8PathBuf,
    },
}

impl FileOutcome {
    /// Path relative to the run root.
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Transformed(result) => &result.path,
            Self::Failed { path, .. } | Self::Skipped { path } => path,
        }
    }

    /// The transformation result, if the file was rewritten.
    pub const fn result(&self) -> Option<&TransformationResult> {
        match self {
            Self::Transformed(result) => Some(result),
            _ => None,
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct TransformationReport {
    /// Outcomes in selection order.
    pub outcomes: Vec<FileOutcome>,
    /// Aggregate counters.
    pub totals: UsageTotals,
    /// Informational notices.
    pub notices: Vec<Notice>,
    /// Markdown summary.
    pub summary: String,
    /// Tier the run executed under.
    pub tier: TierLevel,
}

impl TransformationReport {
    /// Aggregate `outcomes` and render the summary.
    pub fn new(outcomes: Vec<FileOutcome>, notices: Vec<Notice>, tier: TierLevel) -> Self {
        let totals = UsageTotals::from_outcomes(&outcomes);
        let summary = render_summary(&outcomes, &totals, &notices);
        Self {
            outcomes,
            totals,
            notices,
            summary,
            tier,
        }
    }

    /// `(path, transformed text)` for every document whose text changed.
    ///
    /// Identity replacements are never counted as substitutions, so this
    /// yields exactly `totals.transformed_files` items.
    pub fn outputs(&self) -> impl Iterator<Item = (&Utf8Path, &str)> {
        self.outcomes
            .iter()
            .filter_map(FileOutcome::result)
            .filter(|r| r.changed)
            .map(|r| (r.path.as_path(), r.transformed.as_str()))
    }

    /// Counters for the billing collaborator.
    pub const fn usage(&self) -> UsageRecord {
        UsageRecord::new(self.tier, &self.totals)
    }
}

fn render_summary(outcomes: &[FileOutcome], totals: &UsageTotals, notices: &[Notice]) -> String {
    let mut out = String::from("## Formalization Summary\n\n");
    let _ = writeln!(out, "- Files processed: {}", totals.processed_files);
    let _ = writeln!(out, "- Files transformed: {}", totals.transformed_files);
    let _ = writeln!(out, "- Files unchanged: {}", totals.unchanged_files);
    if totals.failed_files > 0 {
        let _ = writeln!(out, "- Files failed: {}", totals.failed_files);
    }
    if totals.skipped_files > 0 {
        let _ = writeln!(out, "- Files skipped: {}", totals.skipped_files);
    }
    let _ = writeln!(out, "- Words transformed: {}", totals.transformed_words);
    let _ = writeln!(out, "- Character delta: {:+}", totals.transformed_chars);
    out.push('\n');

    let mut transformed: Vec<&TransformationResult> = outcomes
        .iter()
        .filter_map(FileOutcome::result)
        .filter(|r| r.transformed_words > 0)
        .collect();

    if transformed.is_empty() {
        out.push_str("No files were transformed.\n");
    } else {
        transformed.sort_by(|a, b| {
            b.transformed_chars
                .unsigned_abs()
                .cmp(&a.transformed_chars.unsigned_abs())
                .then_with(|| a.path.cmp(&b.path))
        });

        out.push_str("### Files Transformed\n\n");
        out.push_str("| File | Words | Characters |\n");
        out.push_str("|------|-------|------------|\n");
        for result in transformed.iter().take(SUMMARY_TABLE_ROWS) {
            let _ = writeln!(
                out,
                "| {} | {} | {:+} |",
                escape_cell(result.path.as_str()),
                result.transformed_words,
                result.transformed_chars
            );
        }
        if transformed.len() > SUMMARY_TABLE_ROWS {
            let _ = writeln!(
                out,
                "\n*… and {} more files*",
                transformed.len() - SUMMARY_TABLE_ROWS
            );
        }
    }

    let failures: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
            FileOutcome::Failed { path, reason } => Some((path, reason)),
            _ => None,
        })
        .collect();
    if !failures.is_empty() {
        out.push_str("\n### Failures\n\n");
        for (path, reason) in failures {
            let _ = writeln!(out, "- `{path}`: {reason}");
        }
    }

    if !notices.is_empty() {
        out.push_str("\n### Notices\n\n");
        for notice in notices {
            let _ = writeln!(out, "- {}", notice.message);
        }
    }

    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transformed(path: &str, words: usize, chars: i64) -> FileOutcome {
        FileOutcome::Transformed(TransformationResult {
            path: path.into(),
            original: "before".to_string(),
            transformed: if words > 0 { "after" } else { "before" }.to_string(),
            eligible_sites: words,
            transformed_words: words,
            transformed_chars: chars,
            changed: words > 0,
            substitutions: Vec::new(),
        })
    }

    #[test]
    fn empty_run_says_nothing_transformed() {
        let report = TransformationReport::new(Vec::new(), Vec::new(), TierLevel::Free);
        assert!(report.summary.starts_with("## Formalization Summary"));
        assert!(report.summary.contains("No files were transformed."));
        assert_eq!(report.outputs().count(), 0);
    }

    #[test]
    fn table_sorts_by_absolute_delta_then_path() {
        let report = TransformationReport::new(
            vec![
                transformed("b.md", 1, 5),
                transformed("a.md", 1, -9),
                transformed("c.md", 1, 5),
                transformed("d.md", 0, 0),
            ],
            Vec::new(),
            TierLevel::Free,
        );
        let rows: Vec<&str> = report.summary.lines().filter(|l| l.starts_with("| ") && !l.starts_with("| File")).collect();
        assert_eq!(
            rows,
            vec!["| a.md | 1 | -9 |", "| b.md | 1 | +5 |", "| c.md | 1 | +5 |"]
        );
    }

    #[test]
    fn table_is_capped_with_remainder_line() {
        let outcomes = (0..13).map(|i| transformed(&format!("f{i:02}.md"), 1, i)).collect();
        let report = TransformationReport::new(outcomes, Vec::new(), TierLevel::Free);
        assert!(report.summary.contains("| f12.md | 1 | +12 |"));
        assert!(!report.summary.contains("| f02.md |"));
        assert!(report.summary.contains("… and 3 more files"));
    }

    #[test]
    fn failures_and_notices_are_listed() {
        let report = TransformationReport::new(
            vec![FileOutcome::Failed {
                path: "bin.txt".into(),
                reason: "not valid UTF-8".to_string(),
            }],
            vec![Notice::tier_gate("Custom terminology was ignored.")],
            TierLevel::Free,
        );
        assert!(report.summary.contains("### Failures"));
        assert!(report.summary.contains("- `bin.txt`: not valid UTF-8"));
        assert!(report.summary.contains("### Notices"));
        assert!(report.summary.contains("Custom terminology was ignored."));
    }

    #[test]
    fn outputs_only_include_changed_documents() {
        let report = TransformationReport::new(
            vec![transformed("a.md", 2, 4), transformed("b.md", 0, 0)],
            Vec::new(),
            TierLevel::Pro,
        );
        let outputs: Vec<_> = report.outputs().collect();
        assert_eq!(outputs, vec![(Utf8Path::new("a.md"), "after")]);
        assert_eq!(report.usage().tier, TierLevel::Pro);
        assert_eq!(report.usage().transformed_words, 2);
    }

    #[test]
    fn outcomes_serialize_with_status_tag() {
        let skipped = FileOutcome::Skipped { path: "late.md".into() };
        let json = serde_json::to_value(&skipped).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["path"], "late.md");

        let json = serde_json::to_value(transformed("a.md", 1, 3)).unwrap();
        assert_eq!(json["status"], "transformed");
        assert_eq!(json["transformed_words"], 1);
        assert!(json.get("original").is_none());
    }
}
