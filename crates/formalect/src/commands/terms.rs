//! Terms command: print the resolved terminology map.

use anyhow::Context;
use clap::Args;
use formalect_core::{Config, TerminologyResolver};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{TerminologyArgs, build_settings};

/// Arguments for the `terms` subcommand.
#[derive(Args, Debug, Default)]
pub struct TermsArgs {
    /// Terminology selection.
    #[command(flatten)]
    pub terminology: TerminologyArgs,

    /// Only show keys containing this text.
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Serialize)]
struct TermsOutput<'a> {
    tier: formalect_core::TierLevel,
    terms: &'a formalect_core::TerminologyMap,
    notices: &'a [formalect_core::Notice],
}

/// Resolve and print the terminology for the configured tier.
#[instrument(name = "cmd_terms", skip_all)]
pub fn cmd_terms(args: TermsArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let mut config = config.clone();
    args.terminology.apply(&mut config);
    let settings = build_settings(&config)?;

    let resolution = TerminologyResolver::from_settings(&settings)
        .resolve(settings.custom_terminology.as_deref(), settings.tier_level)
        .context("failed to resolve terminology")?;
    debug!(entries = resolution.map.len(), "terminology resolved");

    if global_json {
        let output = TermsOutput {
            tier: settings.tier_level,
            terms: &resolution.map,
            notices: &resolution.notices,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for notice in &resolution.notices {
        eprintln!("{} {}", "note:".yellow(), notice.message);
    }

    let filter = args.filter.as_deref().map(str::to_lowercase);
    let entries = resolution
        .map
        .iter()
        .filter(|(key, _)| filter.as_deref().is_none_or(|f| key.contains(f)));
    let width = resolution.map.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    for (key, entry) in entries {
        let pos = entry.pos.map(|p| format!(" ({p})")).unwrap_or_default();
        println!(
            "{:width$}  {} {}{}",
            key.bold(),
            "→".dimmed(),
            entry.replacement,
            pos.dimmed()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_defaults() {
        assert!(cmd_terms(TermsArgs::default(), false, &Config::default()).is_ok());
        assert!(cmd_terms(TermsArgs::default(), true, &Config::default()).is_ok());
    }

    #[test]
    fn missing_custom_file_is_an_error_for_paid_tiers() {
        let args = TermsArgs {
            terminology: TerminologyArgs {
                custom_terminology: Some("/nonexistent/terms.json".into()),
                tier_level: Some(formalect_core::TierLevel::Pro),
            },
            filter: None,
        };
        assert!(cmd_terms(args, true, &Config::default()).is_err());
    }

    #[test]
    fn free_tier_ignores_custom_file() {
        let args = TermsArgs {
            terminology: TerminologyArgs {
                custom_terminology: Some("/nonexistent/terms.json".into()),
                tier_level: None,
            },
            filter: Some("cool".to_string()),
        };
        assert!(cmd_terms(args, false, &Config::default()).is_ok());
    }
}
