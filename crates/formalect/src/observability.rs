//! Logging setup for the CLI.
//!
//! Human-readable logs go to stderr. When a log location can be determined,
//! JSON lines are also written to a daily-rotated file:
//!
//! 1. `FORMALECT_LOG_PATH` (explicit file; rotated in its parent directory)
//! 2. `FORMALECT_LOG_DIR`
//! 3. `log_dir` from the config
//! 4. the platform's local data directory
//!
//! `RUST_LOG` always wins over `-q`, `-v` and the configured level.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const LOG_FILE_PREFIX: &str = "formalect.jsonl";

/// Where file logs go, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Directory for rotated log files.
    pub log_dir: Option<PathBuf>,
    /// File name prefix for rotated files.
    pub file_prefix: String,
}

impl ObservabilityConfig {
    /// Resolve the log location from the environment, falling back to
    /// `config_log_dir` and then the platform data directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os("FORMALECT_LOG_PATH").map(PathBuf::from),
            std::env::var_os("FORMALECT_LOG_DIR").map(PathBuf::from),
            config_log_dir,
        )
    }

    fn resolve(
        log_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        config_log_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = log_path {
            let dir = path.parent().map(Path::to_path_buf);
            let prefix = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(LOG_FILE_PREFIX)
                .to_string();
            return Self {
                log_dir: dir.filter(|d| !d.as_os_str().is_empty()).or_else(|| Some(PathBuf::from("."))),
                file_prefix: prefix,
            };
        }

        let log_dir = log_dir.or(config_log_dir).or_else(|| {
            formalect_core::config::user_data_local_dir().map(|d| d.join("logs").into_std_path_buf())
        });
        Self {
            log_dir,
            file_prefix: LOG_FILE_PREFIX.to_string(),
        }
    }
}

/// Build the filter from `RUST_LOG`, or from the CLI flags and config level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(filter_directive(quiet, verbose, default_level))
}

fn filter_directive(quiet: bool, verbose: u8, default_level: &str) -> String {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => default_level,
            1 => "debug",
            _ => "trace",
        }
    };
    // Dependencies stay at warn unless RUST_LOG says otherwise.
    format!("warn,formalect={level},formalect_core={level}")
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// whole program.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, guard) = match config.log_dir.as_deref().map(open_log_dir) {
        Some(Ok(dir)) => {
            let appender = tracing_appender::rolling::daily(dir, &config.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        // An unwritable log directory should not stop a run.
        Some(Err(e)) => {
            eprintln!("warning: file logging disabled: {e:#}");
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(guard)
}

fn open_log_dir(dir: &Path) -> anyhow::Result<&Path> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    Ok(dir)
}
