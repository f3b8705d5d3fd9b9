//! Info command implementation

use clap::Args;
use formalect_core::config::{Config, ConfigSources};
use formalect_core::settings::DEFAULT_MAX_INPUT_BYTES;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    homepage: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            homepage: env!("CARGO_PKG_HOMEPAGE"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    intensity: f64,
    file_patterns: String,
    exclude_patterns: String,
    tier_level: String,
    custom_terminology_min_tier: String,
    advanced_min_tier: String,
    terminology_policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_terminology: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_bytes: Option<usize>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let max_input_bytes = if config.disable_input_limit {
            None
        } else {
            Some(config.max_input_bytes.unwrap_or(DEFAULT_MAX_INPUT_BYTES))
        };
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            intensity: config.intensity,
            file_patterns: config.file_patterns.clone(),
            exclude_patterns: config.exclude_patterns.clone(),
            tier_level: config.tier_level.to_string(),
            custom_terminology_min_tier: config.custom_terminology_min_tier.to_string(),
            advanced_min_tier: config.advanced_min_tier.to_string(),
            terminology_policy: config.terminology_policy.to_string(),
            custom_terminology: config.custom_terminology.as_ref().map(|p| p.to_string()),
            workers: config.workers,
            timeout_secs: config.timeout_secs,
            max_input_bytes,
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    let info = PackageInfo::new();

    debug!(json_output = global_json, "executing info command");

    let config_info = ConfigInfo::from_config(config, sources);
    let full_info = FullInfo {
        package: info,
        config: config_info,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
    } else {
        println!(
            "{} {}",
            full_info.package.name.bold(),
            full_info.package.version.green()
        );
        if !full_info.package.description.is_empty() {
            println!("{}", full_info.package.description);
        }
        if !full_info.package.license.is_empty() {
            println!("{}: {}", "License".dimmed(), full_info.package.license);
        }
        if !full_info.package.repository.is_empty() {
            println!(
                "{}: {}",
                "Repository".dimmed(),
                full_info.package.repository.cyan()
            );
        }
        if !full_info.package.homepage.is_empty() {
            println!(
                "{}: {}",
                "Homepage".dimmed(),
                full_info.package.homepage.cyan()
            );
        }

        // Configuration section
        println!();
        println!("{}", "Configuration".bold().underline());
        if let Some(ref path) = full_info.config.config_file {
            println!("{}: {}", "Config file".dimmed(), path.cyan());
        } else {
            println!("{}: {}", "Config file".dimmed(), "none loaded".yellow());
        }
        println!("{}: {}", "Log level".dimmed(), full_info.config.log_level);
        if let Some(ref dir) = full_info.config.log_dir {
            println!("{}: {}", "Log directory".dimmed(), dir);
        }

        // Run defaults
        println!();
        println!("{}", "Transformation".bold().underline());
        let cfg = &full_info.config;
        println!("{}: {:.2}", "Intensity".dimmed(), cfg.intensity);
        println!("{}: {}", "File patterns".dimmed(), cfg.file_patterns);
        println!("{}: {}", "Exclude patterns".dimmed(), cfg.exclude_patterns);
        println!("{}: {}", "Tier".dimmed(), cfg.tier_level.green());
        println!(
            "{}: {} (custom terminology), {} (advanced rewrites)",
            "Minimum tiers".dimmed(),
            cfg.custom_terminology_min_tier,
            cfg.advanced_min_tier
        );
        println!("{}: {}", "Terminology policy".dimmed(), cfg.terminology_policy);
        if let Some(ref path) = cfg.custom_terminology {
            println!("{}: {}", "Custom terminology".dimmed(), path.cyan());
        }
        print_opt("Workers", &cfg.workers);
        print_opt("Timeout (s)", &cfg.timeout_secs);
        match cfg.max_input_bytes {
            Some(max) => println!("{}: {max} bytes", "Input limit".dimmed()),
            None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
        }
    }

    Ok(())
}

/// Print an optional numeric value or "(not set)".
fn print_opt<T: std::fmt::Display>(label: &str, value: &Option<T>) {
    use owo_colors::OwoColorize;
    match value {
        Some(v) => println!("{}: {}", label.dimmed(), v),
        None => println!("{}: {}", label.dimmed(), "(not set)".dimmed()),
    }
}
