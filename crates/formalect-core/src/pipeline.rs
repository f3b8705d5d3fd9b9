//! The transformation orchestrator.
//!
//! [`Pipeline`] selects files, resolves terminology once, rewrites every
//! selected file on a dedicated rayon pool and assembles the
//! [`TransformationReport`]. Per-file failures become
//! [`FileOutcome::Failed`]; only configuration, missing-path and (strict)
//! terminology errors abort a run.

use std::time::Instant;

use camino::Utf8Path;
use rayon::prelude::*;

use crate::document::Document;
use crate::error::{PipelineError, PipelineResult};
use crate::nlp::{RewriteContext, RuleTagger, Tagger, rewrite};
use crate::report::{FileOutcome, Notice, TransformationReport};
use crate::select::select_files;
use crate::settings::Settings;
use crate::terminology::TerminologyResolver;

/// Observer for run progress.
///
/// `file_done` is called from worker threads in completion order.
pub trait Progress: Sync {
    /// Called once with the number of selected files.
    fn start(&self, _total: usize) {}
    /// Called after each file finishes, fails or is skipped.
    fn file_done(&self, _path: &Utf8Path, _outcome: &FileOutcome) {}
    /// Called once after the last file.
    fn finish(&self) {}
}

/// A [`Progress`] that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// A configured run.
pub struct Pipeline {
    settings: Settings,
    tagger: Box<dyn Tagger>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Pipeline using the built-in [`RuleTagger`].
    pub fn new(settings: Settings) -> Self {
        Self::with_tagger(settings, Box::new(RuleTagger))
    }

    /// Pipeline using a custom tagger.
    pub fn with_tagger(settings: Settings, tagger: Box<dyn Tagger>) -> Self {
        Self { settings, tagger }
    }

    /// Settings this pipeline runs with.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Transform every selected file under `root`.
    pub fn run(&self, root: &Utf8Path) -> PipelineResult<TransformationReport> {
        self.run_with_progress(root, &NoProgress)
    }

    /// Like [`Pipeline::run`], reporting progress to `progress`.
    #[tracing::instrument(skip_all, fields(root = %root, tier = %self.settings.tier_level))]
    pub fn run_with_progress(
        &self,
        root: &Utf8Path,
        progress: &dyn Progress,
    ) -> PipelineResult<TransformationReport> {
        let settings = &self.settings;
        settings.validate()?;

        let files = select_files(root, &settings.file_patterns, &settings.exclude_patterns)?;
        let resolution = TerminologyResolver::from_settings(settings)
            .resolve(settings.custom_terminology.as_deref(), settings.tier_level)?;
        let mut notices = resolution.notices;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(settings.workers.unwrap_or(0))
            .thread_name(|i| format!("formalect-worker-{i}"))
            .build()
            .map_err(|e| PipelineError::configuration(format!("cannot start worker pool: {e}")))?;

        let ctx = RewriteContext {
            terminology: &resolution.map,
            intensity: settings.intensity,
            tagger: self.tagger.as_ref(),
            advanced: settings.advanced_enabled(),
        };
        let deadline = settings.deadline_from(Instant::now())?;

        tracing::info!(
            files = files.len(),
            terms = resolution.map.len(),
            intensity = %settings.intensity,
            workers = pool.current_num_threads(),
            "starting run"
        );
        progress.start(files.len());

        let mut indexed: Vec<(usize, FileOutcome)> = pool.install(|| {
            files
                .par_iter()
                .enumerate()
                .map(|(index, path)| {
                    let outcome = process_file(root, path, &ctx, deadline, settings.max_input_bytes);
                    progress.file_done(path, &outcome);
                    (index, outcome)
                })
                .collect()
        });
        indexed.sort_by_key(|(index, _)| *index);
        let outcomes: Vec<FileOutcome> = indexed.into_iter().map(|(_, outcome)| outcome).collect();
        progress.finish();

        let skipped = outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Skipped { .. }))
            .count();
        if skipped > 0 {
            tracing::warn!(skipped, "run deadline reached");
            notices.push(Notice::deadline_reached(format!(
                "The run deadline passed; {skipped} file(s) were not processed."
            )));
        }

        let report = TransformationReport::new(outcomes, notices, settings.tier_level);
        tracing::info!(
            processed = report.totals.processed_files,
            transformed = report.totals.transformed_files,
            failed = report.totals.failed_files,
            words = report.totals.transformed_words,
            "run complete"
        );
        Ok(report)
    }
}

fn process_file(
    root: &Utf8Path,
    path: &Utf8Path,
    ctx: &RewriteContext<'_>,
    deadline: Option<Instant>,
    max_bytes: Option<usize>,
) -> FileOutcome {
    if deadline.is_some_and(|d| Instant::now() >= d) {
        return FileOutcome::Skipped {
            path: path.to_path_buf(),
        };
    }

    let result = Document::read(root, path, max_bytes).and_then(|doc| rewrite(&doc, ctx));
    match result {
        Ok(result) => {
            tracing::debug!(%path, words = result.transformed_words, "file processed");
            FileOutcome::Transformed(result)
        }
        Err(PipelineError::Processing { path, reason }) => {
            tracing::warn!(%path, %reason, "file failed");
            FileOutcome::Failed { path, reason }
        }
        Err(other) => {
            tracing::warn!(%path, error = %other, "file failed");
            FileOutcome::Failed {
                path: path.to_path_buf(),
                reason: other.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NoticeKind;
    use crate::settings::{Intensity, TerminologyPolicy, TierLevel};
    use camino::Utf8PathBuf;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    fn tree(files: &[(&str, &[u8])]) -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        for (path, content) in files {
            let full = root.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        (tmp, root)
    }

    fn settings(intensity: f64) -> Settings {
        Settings {
            intensity: Intensity::new(intensity).unwrap(),
            ..Settings::default()
        }
    }

    #[test]
    fn transforms_selected_files_and_counts() {
        let (_tmp, root) = tree(&[
            ("a.md", b"This is a cool idea.\n"),
            ("notes.txt", b"Nothing here.\n"),
            ("drafts/x.md", b"A cool draft.\n"),
            ("image.png", b"\x89PNG"),
        ]);
        let pipeline = Pipeline::new(Settings {
            exclude_patterns: "drafts/**".to_string(),
            ..settings(1.0)
        });
        let report = pipeline.run(&root).unwrap();

        let paths: Vec<&str> = report.outcomes.iter().map(|o| o.path().as_str()).collect();
        assert_eq!(paths, vec!["a.md", "notes.txt"]);
        assert_eq!(report.totals.processed_files, 2);
        assert_eq!(report.totals.transformed_files, 1);
        assert_eq!(report.totals.unchanged_files, 1);

        let outputs: Vec<_> = report.outputs().collect();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].1, "This is a favorable conceptual construct.\n");
    }

    #[test]
    fn zero_intensity_leaves_every_file_unchanged() {
        let (_tmp, root) = tree(&[("a.md", b"We use the code to fix a bug.\n")]);
        let report = Pipeline::new(settings(0.0)).run(&root).unwrap();
        assert_eq!(report.totals.transformed_words, 0);
        assert_eq!(report.outputs().count(), 0);
        assert!(report.summary.contains("No files were transformed."));
    }

    #[test]
    fn binary_file_fails_without_aborting() {
        let (_tmp, root) = tree(&[("bad.txt", b"\xff\xfe\x00\x01"), ("good.txt", b"A good plan.")]);
        let report = Pipeline::new(settings(1.0)).run(&root).unwrap();
        assert_eq!(report.totals.failed_files, 1);
        assert_eq!(report.totals.processed_files, 2);
        assert!(matches!(&report.outcomes[0], FileOutcome::Failed { path, .. } if path == "bad.txt"));
        assert!(report.summary.contains("### Failures"));
    }

    #[test]
    fn oversize_file_fails() {
        let (_tmp, root) = tree(&[("big.txt", b"0123456789 words")]);
        let report = Pipeline::new(Settings {
            max_input_bytes: Some(4),
            ..settings(1.0)
        })
        .run(&root)
        .unwrap();
        assert_eq!(report.totals.failed_files, 1);
    }

    #[test]
    fn results_do_not_depend_on_worker_count() {
        let files: Vec<(String, Vec<u8>)> = (0..12)
            .map(|i| (format!("doc{i:02}.md"), b"We use tools to fix the bug in the code.".to_vec()))
            .collect();
        let borrowed: Vec<(&str, &[u8])> =
            files.iter().map(|(p, c)| (p.as_str(), c.as_slice())).collect();
        let (_tmp, root) = tree(&borrowed);

        let run = |workers| {
            Pipeline::new(Settings {
                workers: Some(workers),
                ..settings(0.5)
            })
            .run(&root)
            .unwrap()
        };
        let one = run(1);
        let four = run(4);
        assert_eq!(one.outcomes, four.outcomes);
        assert_eq!(one.summary, four.summary);
    }

    #[test]
    fn custom_terminology_is_tier_gated() {
        let (_tmp, root) = tree(&[
            ("a.md", b"This is a cool idea.\n"),
            ("terms.json", br#"{"cool": {"replacement": "optimal", "pos": "ADJ"}}"#),
        ]);
        let base = Settings {
            file_patterns: "*.md".to_string(),
            custom_terminology: Some(root.join("terms.json")),
            ..settings(1.0)
        };

        let enterprise = Pipeline::new(Settings {
            tier_level: TierLevel::Enterprise,
            ..base.clone()
        })
        .run(&root)
        .unwrap();
        let (_, text) = enterprise.outputs().next().unwrap();
        assert_eq!(text, "This is a optimal conceptual construct.\n");
        assert!(enterprise.notices.is_empty());

        let free = Pipeline::new(base).run(&root).unwrap();
        assert!(free.outputs().next().unwrap().1.contains("favorable"));
        assert_eq!(free.notices[0].kind, NoticeKind::TierGate);
        assert!(free.summary.contains("### Notices"));
    }

    #[test]
    fn identity_terms_do_not_count_as_transformed() {
        let (_tmp, root) = tree(&[
            ("a.md", b"A cool day.\n"),
            ("terms.json", br#"{"cool": "cool"}"#),
        ]);
        let report = Pipeline::new(Settings {
            file_patterns: "*.md".to_string(),
            custom_terminology: Some(root.join("terms.json")),
            tier_level: TierLevel::Pro,
            ..settings(1.0)
        })
        .run(&root)
        .unwrap();
        assert_eq!(report.totals.transformed_files, 0);
        assert_eq!(report.totals.unchanged_files, 1);
        assert_eq!(report.outputs().count(), report.totals.transformed_files);
    }

    #[test]
    fn malformed_terminology_is_fatal_or_degraded() {
        let (_tmp, root) = tree(&[("a.md", b"A cool idea.\n"), ("terms.json", b"{ not json")]);
        let strict = Settings {
            file_patterns: "*.md".to_string(),
            custom_terminology: Some(root.join("terms.json")),
            tier_level: TierLevel::Pro,
            ..settings(1.0)
        };
        let err = Pipeline::new(strict.clone()).run(&root).unwrap_err();
        assert!(matches!(err, PipelineError::Format { .. }));

        let degraded = Pipeline::new(Settings {
            terminology_policy: TerminologyPolicy::Degrade,
            ..strict
        })
        .run(&root)
        .unwrap();
        assert_eq!(degraded.notices[0].kind, NoticeKind::TerminologyDegraded);
        assert_eq!(degraded.totals.transformed_files, 1);
    }

    #[test]
    fn fatal_errors_abort_before_processing() {
        let (_tmp, root) = tree(&[("a.md", b"text")]);
        let bad_glob = Pipeline::new(Settings {
            file_patterns: "[".to_string(),
            ..settings(1.0)
        });
        assert!(matches!(bad_glob.run(&root), Err(PipelineError::Configuration { .. })));

        let zero_workers = Pipeline::new(Settings {
            workers: Some(0),
            ..settings(1.0)
        });
        assert!(matches!(zero_workers.run(&root), Err(PipelineError::Configuration { .. })));

        let missing = Pipeline::new(settings(1.0)).run(&root.join("nope"));
        assert!(matches!(missing, Err(PipelineError::NotFound { .. })));
    }

    #[test]
    fn huge_timeout_is_configuration_error() {
        let (_tmp, root) = tree(&[("a.md", b"A cool idea.")]);
        let result = Pipeline::new(Settings {
            timeout: Some(Duration::from_secs(u64::MAX)),
            ..settings(1.0)
        })
        .run(&root);
        assert!(matches!(result, Err(PipelineError::Configuration { .. })));
    }

    #[test]
    fn expired_deadline_skips_files() {
        let (_tmp, root) = tree(&[("a.md", b"A cool idea."), ("b.md", b"A bad idea.")]);
        let report = Pipeline::new(Settings {
            timeout: Some(Duration::ZERO),
            ..settings(1.0)
        })
        .run(&root)
        .unwrap();
        assert_eq!(report.totals.skipped_files, 2);
        assert_eq!(report.totals.processed_files, 0);
        assert_eq!(report.notices.last().unwrap().kind, NoticeKind::DeadlineReached);
    }

    #[test]
    fn progress_sees_every_file() {
        struct Counter(AtomicUsize, AtomicUsize);
        impl Progress for Counter {
            fn start(&self, total: usize) {
                self.0.store(total, Ordering::SeqCst);
            }
            fn file_done(&self, _path: &Utf8Path, _outcome: &FileOutcome) {
                self.1.fetch_add(1, Ordering::SeqCst);
            }
        }

        let (_tmp, root) = tree(&[("a.md", b"one"), ("b.txt", b"two"), ("c.rst", b"three")]);
        let counter = Counter(AtomicUsize::new(0), AtomicUsize::new(0));
        Pipeline::new(settings(1.0)).run_with_progress(&root, &counter).unwrap();
        assert_eq!(counter.0.load(Ordering::SeqCst), 3);
        assert_eq!(counter.1.load(Ordering::SeqCst), 3);
    }
}
