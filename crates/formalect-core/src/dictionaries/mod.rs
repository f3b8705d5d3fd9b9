//! Word lists for segmentation, tagging and inflection.
//!
//! Provides the abbreviation set used by sentence splitting, the irregular
//! inflection tables, and the closed/open-class lexicon used by the tagger.

pub mod abbreviations;
pub mod irregular_forms;
pub mod lexicon;
