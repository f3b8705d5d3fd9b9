//! Command implementations.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use formalect_core::{Config, Settings, TierLevel};

pub mod info;
pub mod schema;
pub mod terms;
pub mod transform;

/// Flags that pick the terminology for a run.
#[derive(Args, Debug, Default, Clone)]
pub struct TerminologyArgs {
    /// Custom terminology JSON document (pro tier and above).
    #[arg(long, value_name = "FILE")]
    pub custom_terminology: Option<Utf8PathBuf>,

    /// Subscription tier of the caller.
    #[arg(long, value_enum)]
    pub tier_level: Option<TierLevel>,
}

impl TerminologyArgs {
    /// Overlay these flags onto `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref path) = self.custom_terminology {
            config.custom_terminology = Some(path.clone());
        }
        if let Some(tier) = self.tier_level {
            config.tier_level = tier;
        }
    }
}

/// Validate `config` into run settings.
pub fn build_settings(config: &Config) -> anyhow::Result<Settings> {
    Settings::from_config(config).context("invalid settings")
}
