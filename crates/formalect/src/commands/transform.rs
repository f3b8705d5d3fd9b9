//! Transform command: rewrite the selected files under a directory.

use std::fs;

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use formalect_core::{Config, FileOutcome, Pipeline, Progress, TransformationReport};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{debug, info, instrument};

use super::{TerminologyArgs, build_settings};

/// Where transformed text goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Only print the summary; leave files untouched.
    #[default]
    Report,
    /// Overwrite changed files.
    InPlace,
    /// Write changed files under the artifact directory.
    Artifact,
}

/// Arguments for the `transform` subcommand.
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Directory to transform (defaults to the current directory).
    #[arg(value_name = "ROOT")]
    pub root: Option<Utf8PathBuf>,

    /// Fraction of eligible sites to rewrite (0.0 to 1.0).
    #[arg(long)]
    pub intensity: Option<f64>,

    /// Comma-separated include globs.
    #[arg(long, value_name = "GLOBS")]
    pub file_patterns: Option<String>,

    /// Comma-separated exclude globs.
    #[arg(long, value_name = "GLOBS")]
    pub exclude_patterns: Option<String>,

    /// Terminology selection.
    #[command(flatten)]
    pub terminology: TerminologyArgs,

    /// Worker threads (defaults to available parallelism).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Stop starting new files after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// What to do with transformed text.
    #[arg(long, value_enum, default_value_t)]
    pub output: OutputMode,

    /// Destination for `--output artifact`.
    #[arg(long, value_name = "DIR", default_value = "formalect-output")]
    pub artifact_dir: Utf8PathBuf,

    /// Write the usage record as JSON to this file.
    #[arg(long, value_name = "FILE")]
    pub usage_file: Option<Utf8PathBuf>,
}

impl TransformArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(intensity) = self.intensity {
            config.intensity = intensity;
        }
        if let Some(ref patterns) = self.file_patterns {
            config.file_patterns.clone_from(patterns);
        }
        if let Some(ref patterns) = self.exclude_patterns {
            config.exclude_patterns.clone_from(patterns);
        }
        self.terminology.apply(config);
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = Some(secs);
        }
    }
}

/// Progress bar on stderr; hidden when stderr is not a terminal.
struct BarProgress(ProgressBar);

impl BarProgress {
    fn new(visible: bool) -> Self {
        if !visible {
            return Self(ProgressBar::hidden());
        }
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} [{bar:40.green/dim}] {pos}/{len} {msg}")
                .map(|s| s.progress_chars("█▓░"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self(bar)
    }
}

impl Progress for BarProgress {
    fn start(&self, total: usize) {
        self.0.set_length(total as u64);
    }

    fn file_done(&self, path: &Utf8Path, _outcome: &FileOutcome) {
        self.0.set_message(path.to_string());
        self.0.inc(1);
    }

    fn finish(&self) {
        self.0.finish_and_clear();
    }
}

/// Run the pipeline and dispatch its output.
#[instrument(name = "cmd_transform", skip_all, fields(output = ?args.output))]
pub fn cmd_transform(
    args: TransformArgs,
    global_json: bool,
    quiet: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    args.apply(&mut config);

    let root = args.root.clone().unwrap_or_else(|| Utf8PathBuf::from("."));
    if args.output == OutputMode::Artifact
        && let Some(dir) = artifact_exclusion(&root, &args.artifact_dir)
    {
        // Keep earlier artifacts out of the selection.
        config.exclude_patterns = format!("{},{dir}/**", config.exclude_patterns);
    }

    let settings = build_settings(&config)?;
    debug!(
        root = %root,
        intensity = %settings.intensity,
        tier = %settings.tier_level,
        "executing transform command"
    );

    let progress = BarProgress::new(!quiet && !global_json);
    let report = Pipeline::new(settings)
        .run_with_progress(&root, &progress)
        .with_context(|| format!("failed to transform {root}"))?;

    let written = match args.output {
        OutputMode::Report => 0,
        OutputMode::InPlace => write_outputs(&report, &root)?,
        OutputMode::Artifact => write_outputs(&report, &args.artifact_dir)?,
    };
    info!(written, "outputs dispatched");

    if let Some(ref path) = args.usage_file {
        let json = serde_json::to_string_pretty(&report.usage())?;
        fs::write(path, json).with_context(|| format!("failed to write usage record to {path}"))?;
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", report.summary);
    if !quiet {
        println!();
        match args.output {
            OutputMode::Report if report.totals.transformed_files > 0 => println!(
                "{} re-run with {} or {} to write changes",
                "note:".cyan(),
                "--output in-place".bold(),
                "--output artifact".bold()
            ),
            OutputMode::InPlace | OutputMode::Artifact => {
                println!("{} {written} file(s) written", "done:".green());
            }
            OutputMode::Report => {}
        }
        if report.totals.failed_files > 0 {
            eprintln!(
                "{} {} file(s) could not be processed",
                "warning:".yellow(),
                report.totals.failed_files
            );
        }
    }

    Ok(())
}

/// The artifact directory relative to `root`, when it lies inside it.
fn artifact_exclusion(root: &Utf8Path, artifact_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    match artifact_dir.strip_prefix(root) {
        Ok(inside) if !inside.as_str().is_empty() => Some(inside.to_path_buf()),
        _ if root == "." && artifact_dir.is_relative() => Some(artifact_dir.to_path_buf()),
        _ => None,
    }
}

/// Write every changed document under `dest`, mirroring relative paths.
fn write_outputs(report: &TransformationReport, dest: &Utf8Path) -> anyhow::Result<usize> {
    let mut written = 0;
    for (path, text) in report.outputs() {
        if path.is_absolute() || path.components().any(|c| c.as_str() == "..") {
            bail!("refusing to write outside {dest}: {path}");
        }
        let target = dest.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).with_context(|| format!("failed to create {parent}"))?;
        }
        fs::write(&target, text).with_context(|| format!("failed to write {target}"))?;
        debug!(%target, "wrote transformed file");
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(root: &Utf8Path) -> TransformArgs {
        TransformArgs {
            root: Some(root.to_path_buf()),
            intensity: Some(1.0),
            file_patterns: None,
            exclude_patterns: None,
            terminology: TerminologyArgs::default(),
            workers: Some(1),
            timeout_secs: None,
            output: OutputMode::Report,
            artifact_dir: root.join("out"),
            usage_file: None,
        }
    }

    fn fixture() -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/a.md"), "This is a cool idea.\n").unwrap();
        (tmp, root)
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut config = Config::default();
        let mut a = args(Utf8Path::new("."));
        a.file_patterns = Some("*.md".to_string());
        a.terminology.tier_level = Some(formalect_core::TierLevel::Enterprise);
        a.apply(&mut config);
        assert_eq!(config.intensity, 1.0);
        assert_eq!(config.file_patterns, "*.md");
        assert_eq!(config.workers, Some(1));
        assert_eq!(config.tier_level, formalect_core::TierLevel::Enterprise);
    }

    #[test]
    fn report_mode_leaves_files_alone() {
        let (_tmp, root) = fixture();
        cmd_transform(args(&root), true, true, &Config::default()).unwrap();
        assert_eq!(fs::read_to_string(root.join("docs/a.md")).unwrap(), "This is a cool idea.\n");
    }

    #[test]
    fn in_place_mode_overwrites_changed_files() {
        let (_tmp, root) = fixture();
        let mut a = args(&root);
        a.output = OutputMode::InPlace;
        cmd_transform(a, true, true, &Config::default()).unwrap();
        assert_eq!(
            fs::read_to_string(root.join("docs/a.md")).unwrap(),
            "This is a favorable conceptual construct.\n"
        );
    }

    #[test]
    fn artifact_mode_mirrors_paths_and_writes_usage() {
        let (_tmp, root) = fixture();
        let mut a = args(&root);
        a.output = OutputMode::Artifact;
        a.usage_file = Some(root.join("usage.json"));
        cmd_transform(a, true, true, &Config::default()).unwrap();

        let artifact = fs::read_to_string(root.join("out/docs/a.md")).unwrap();
        assert!(artifact.contains("favorable"));
        assert_eq!(fs::read_to_string(root.join("docs/a.md")).unwrap(), "This is a cool idea.\n");

        let usage: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(root.join("usage.json")).unwrap()).unwrap();
        assert_eq!(usage["tier"], "free");
        assert_eq!(usage["transformed_files"], 1);
    }

    #[test]
    fn artifact_dir_inside_root_is_excluded() {
        assert_eq!(
            artifact_exclusion(Utf8Path::new("."), Utf8Path::new("formalect-output")),
            Some(Utf8PathBuf::from("formalect-output"))
        );
        assert_eq!(
            artifact_exclusion(Utf8Path::new("/repo"), Utf8Path::new("/repo/out")),
            Some(Utf8PathBuf::from("out"))
        );
        assert_eq!(artifact_exclusion(Utf8Path::new("/repo"), Utf8Path::new("/tmp/out")), None);
    }

    #[test]
    fn invalid_intensity_is_an_error() {
        let (_tmp, root) = fixture();
        let mut a = args(&root);
        a.intensity = Some(2.0);
        let err = cmd_transform(a, true, true, &Config::default()).unwrap_err();
        assert!(format!("{err:#}").contains("intensity"));
    }
}
