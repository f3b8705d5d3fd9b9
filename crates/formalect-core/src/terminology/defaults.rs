//! Built-in terminology.
//!
//! Keys are lemmas (`use`, not `uses`); the rewriter re-inflects tagged
//! replacements to match the text.

use crate::nlp::PartOfSpeech::{self, Adj, Adv, Noun, Verb};

/// `(key, replacement, part of speech)`.
pub const DEFAULT_TERMS: &[(&str, &str, Option<PartOfSpeech>)] = &[
    // Verbs
    ("check", "verify lexical and syntactic correctness of", Some(Verb)),
    ("continue", "proceed with subsequent modules in", Some(Verb)),
    ("create", "generate structured artifacts for", Some(Verb)),
    ("explain", "elucidate", Some(Verb)),
    ("find", "identify", Some(Verb)),
    ("fix", "resolve anomalous patterns in", Some(Verb)),
    ("give", "provide contextual metadata for", Some(Verb)),
    ("help", "facilitate", Some(Verb)),
    ("make", "construct", Some(Verb)),
    ("need", "require", Some(Verb)),
    ("organize", "implement hierarchical organization of", Some(Verb)),
    ("show", "demonstrate", Some(Verb)),
    ("start", "initiate", Some(Verb)),
    ("think", "hypothesize", Some(Verb)),
    ("update", "refactor", Some(Verb)),
    ("use", "leverage", Some(Verb)),
    // Nouns
    ("bug", "implementation defect", Some(Noun)),
    ("code", "codebase", Some(Noun)),
    ("document", "knowledge transfer schema", Some(Noun)),
    ("error", "syntactic inconsistency", Some(Noun)),
    ("example", "illustrative instance", Some(Noun)),
    ("file", "syntax tree component", Some(Noun)),
    ("folder", "directory hierarchy", Some(Noun)),
    ("idea", "conceptual construct", Some(Noun)),
    ("info", "metadata", Some(Noun)),
    ("list", "enumerated entity", Some(Noun)),
    ("part", "modular element", Some(Noun)),
    ("problem", "anomalous pattern", Some(Noun)),
    ("project", "development corpus", Some(Noun)),
    ("step", "sequential component", Some(Noun)),
    ("structure", "architectural schema", Some(Noun)),
    ("team", "collaborative unit", Some(Noun)),
    ("thing", "entity", Some(Noun)),
    ("tool", "instrumentation artifact", Some(Noun)),
    ("way", "methodology", Some(Noun)),
    // Adjectives
    ("bad", "suboptimal", Some(Adj)),
    ("big", "substantial", Some(Adj)),
    ("clear", "explicit", Some(Adj)),
    ("cool", "favorable", Some(Adj)),
    ("easy", "computationally tractable", Some(Adj)),
    ("first", "initial", Some(Adj)),
    ("good", "optimal", Some(Adj)),
    ("hard", "non-trivial", Some(Adj)),
    ("important", "critical", Some(Adj)),
    ("main", "primary", Some(Adj)),
    ("new", "subsequent", Some(Adj)),
    ("simple", "parsimonious", Some(Adj)),
    ("small", "minimal", Some(Adj)),
    // Adverbs
    ("basically", "fundamentally", Some(Adv)),
    ("often", "frequently", Some(Adv)),
    ("quickly", "expeditiously", Some(Adv)),
    ("really", "substantively", Some(Adv)),
    // Phrases
    ("focus on", "prioritize implementation of", Some(Verb)),
    ("find out", "determine through systematic analysis", Some(Verb)),
    ("go through", "traverse the lexical structure of", Some(Verb)),
    ("keep track of", "maintain referential integrity for", Some(Verb)),
    ("look at", "perform corpus traversal across", Some(Verb)),
    ("look for", "identify instances of", Some(Verb)),
    ("make sure", "ensure syntactic validity of", Some(Verb)),
    ("next step", "subsequent procedural element", Some(Noun)),
    ("pay attention to", "maintain semantic focus on", Some(Verb)),
    ("set up", "initialize the configuration parameters for", Some(Verb)),
    ("work on", "execute operations on", Some(Verb)),
    ("write down", "document in structured format", Some(Verb)),
];
