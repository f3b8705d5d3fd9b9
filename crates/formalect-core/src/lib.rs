//! Core library for formalect.
//!
//! Rewrites plain-text and Markdown prose into a formal, computational
//! linguistics register. The pipeline is:
//!
//! 1. [`select`] picks files under a root by include/exclude globs
//! 2. [`terminology`] builds the term map (defaults plus a tier-gated overlay)
//! 3. [`nlp`] segments, tags and rewrites each document
//! 4. [`usage`] aggregates per-file counters
//! 5. [`pipeline`] runs it all on a worker pool and returns a [`report`]
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and management
//! - [`settings`] - Validated per-run settings
//! - [`error`] - Error types and result aliases
//! - [`document`] - Documents and per-document results
//! - [`markdown`] - Regions of Markdown that are never rewritten
//! - [`dictionaries`] - Lexicons used by the tagger and lemmatizer
//! - [`schema`] - JSON Schemas for the report and usage record
//!
//! # Quick Start
//!
//! ```no_run
//! use camino::Utf8Path;
//! use formalect_core::{ConfigLoader, Pipeline, Settings};
//!
//! let (config, _sources) = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//! let settings = Settings::from_config(&config).expect("invalid settings");
//!
//! let report = Pipeline::new(settings)
//!     .run(Utf8Path::new("docs"))
//!     .expect("run failed");
//! println!("{}", report.summary);
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod dictionaries;
pub mod document;
pub mod error;
pub mod markdown;
pub mod nlp;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod select;
pub mod settings;
pub mod terminology;
pub mod usage;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use document::{Document, Substitution, TransformationResult};
pub use error::{ConfigError, ConfigResult, PipelineError, PipelineResult};
pub use nlp::{PartOfSpeech, RewriteContext, RuleTagger, Tagger, rewrite};
pub use pipeline::{NoProgress, Pipeline, Progress};
pub use report::{FileOutcome, Notice, NoticeKind, TransformationReport};
pub use schema::SchemaTarget;
pub use select::select_files;
pub use settings::{Intensity, Settings, TerminologyPolicy, TierLevel};
pub use terminology::{TermEntry, TerminologyMap, TerminologyResolver};
pub use usage::{UsageRecord, UsageTotals};
