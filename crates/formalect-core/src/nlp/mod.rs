//! Language processing for the rewriter.
//!
//! - [`segment`] splits text into sentences and words with byte spans
//! - [`tagger`] assigns lemmas and parts of speech
//! - [`lemma`] handles lemmatization, re-inflection and casing
//! - [`openers`] holds the sentence-opener and command patterns
//! - [`nominal`] maps verbs to their nominalized phrases
//! - [`rewriter`] ties them together against a terminology map

pub mod lemma;
pub mod nominal;
pub mod openers;
pub mod rewriter;
pub mod segment;
pub mod tagger;

pub use lemma::Form;
pub use rewriter::{RewriteContext, rewrite, site_score};
pub use tagger::{Analysis, InvalidTag, PartOfSpeech, RuleTagger, Tagger};
