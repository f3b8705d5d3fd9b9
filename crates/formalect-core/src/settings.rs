//! Invocation-scoped settings for one pipeline run.
//!
//! [`Settings`] is the validated, immutable value threaded through every
//! component. It is built from a loaded [`Config`] (plus any CLI overrides
//! the caller applied to that config first).

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};

/// Default per-file input limit (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

/// Subscription tier supplied by the token validator.
///
/// Variants are ordered: `Free < Pro < Enterprise`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum TierLevel {
    /// No paid features.
    #[default]
    Free,
    /// Paid individual tier.
    Pro,
    /// Paid organisation tier.
    Enterprise,
}

impl TierLevel {
    /// Returns the tier as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }

    /// Returns `true` if this tier is at or above `threshold`.
    pub fn permits(self, threshold: Self) -> bool {
        self >= threshold
    }
}

impl fmt::Display for TierLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierLevel {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(PipelineError::configuration(format!(
                "unknown tier level `{other}` (expected free, pro or enterprise)"
            ))),
        }
    }
}

/// What to do when a permitted custom terminology document is malformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum TerminologyPolicy {
    /// Abort the run with a format error.
    #[default]
    Strict,
    /// Fall back to the default terminology and record a notice.
    Degrade,
}

impl TerminologyPolicy {
    /// Returns the policy as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Degrade => "degrade",
        }
    }
}

impl fmt::Display for TerminologyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fraction of eligible sites that get rewritten, in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Intensity(f64);

impl Intensity {
    /// No rewrites.
    pub const NONE: Self = Self(0.0);
    /// Every eligible site is rewritten.
    pub const FULL: Self = Self(1.0);

    /// Validate a raw intensity value.
    pub fn new(value: f64) -> PipelineResult<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PipelineError::configuration(format!(
                "intensity must be between 0.0 and 1.0, got {value}"
            )))
        }
    }

    /// The raw value.
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns `true` if a site with the given score in `[0, 1)` is rewritten.
    pub fn accepts(self, score: f64) -> bool {
        score < self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(0.7)
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Validated settings for a single run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Rewrite intensity.
    pub intensity: Intensity,
    /// Comma-separated include globs.
    pub file_patterns: String,
    /// Comma-separated exclude globs.
    pub exclude_patterns: String,
    /// Optional custom terminology document.
    pub custom_terminology: Option<Utf8PathBuf>,
    /// Caller's subscription tier.
    pub tier_level: TierLevel,
    /// Lowest tier allowed to supply custom terminology.
    pub custom_terminology_min_tier: TierLevel,
    /// Lowest tier that gets advanced rewrites.
    pub advanced_min_tier: TierLevel,
    /// Handling of malformed custom terminology.
    pub terminology_policy: TerminologyPolicy,
    /// Worker threads; `None` uses available parallelism.
    pub workers: Option<usize>,
    /// Run deadline after which no new files are started.
    pub timeout: Option<Duration>,
    /// Per-file size limit; `None` disables the check.
    pub max_input_bytes: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            intensity: Intensity::default(),
            file_patterns: crate::config::DEFAULT_FILE_PATTERNS.to_string(),
            exclude_patterns: crate::config::DEFAULT_EXCLUDE_PATTERNS.to_string(),
            custom_terminology: None,
            tier_level: TierLevel::Free,
            custom_terminology_min_tier: TierLevel::Pro,
            advanced_min_tier: TierLevel::Pro,
            terminology_policy: TerminologyPolicy::Strict,
            workers: None,
            timeout: None,
            max_input_bytes: Some(DEFAULT_MAX_INPUT_BYTES),
        }
    }
}

impl Settings {
    /// Build validated settings from a loaded config.
    ///
    /// Fails with [`PipelineError::Configuration`] for an out-of-range
    /// intensity, a zero worker count or an unrepresentable timeout.
    pub fn from_config(config: &Config) -> PipelineResult<Self> {
        let intensity = Intensity::new(config.intensity)?;
        let max_input_bytes = if config.disable_input_limit {
            None
        } else {
            Some(config.max_input_bytes.unwrap_or(DEFAULT_MAX_INPUT_BYTES))
        };

        let settings = Self {
            intensity,
            file_patterns: config.file_patterns.clone(),
            exclude_patterns: config.exclude_patterns.clone(),
            custom_terminology: config.custom_terminology.clone(),
            tier_level: config.tier_level,
            custom_terminology_min_tier: config.custom_terminology_min_tier,
            advanced_min_tier: config.advanced_min_tier,
            terminology_policy: config.terminology_policy,
            workers: config.workers,
            timeout: config.timeout_secs.map(Duration::from_secs),
            max_input_bytes,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Re-check invariants on settings built by hand rather than through
    /// [`Settings::from_config`].
    pub fn validate(&self) -> PipelineResult<()> {
        if self.workers == Some(0) {
            return Err(PipelineError::configuration("workers must be at least 1"));
        }
        if self.max_input_bytes == Some(0) {
            return Err(PipelineError::configuration(
                "max_input_bytes must be at least 1",
            ));
        }
        self.deadline_from(Instant::now())?;
        Ok(())
    }

    /// The instant `timeout` after `start`, if a timeout is set.
    ///
    /// A timeout too large to represent is a configuration error.
    pub fn deadline_from(&self, start: Instant) -> PipelineResult<Option<Instant>> {
        self.timeout
            .map(|timeout| {
                start.checked_add(timeout).ok_or_else(|| {
                    PipelineError::configuration(format!(
                        "timeout_secs {} is too large",
                        timeout.as_secs()
                    ))
                })
            })
            .transpose()
    }

    /// Whether the caller's tier may supply custom terminology.
    pub fn custom_terminology_permitted(&self) -> bool {
        self.tier_level.permits(self.custom_terminology_min_tier)
    }

    /// Whether advanced rewrites are enabled for the caller's tier.
    pub fn advanced_enabled(&self) -> bool {
        self.tier_level.permits(self.advanced_min_tier)
    }
}
