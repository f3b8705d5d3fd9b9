//! Closed- and open-class word lists for the rule tagger.
//!
//! Open-class entries are keyed by base form and list every part of speech
//! the word commonly takes. A word with more than one tag is disambiguated
//! from local context by the tagger.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::nlp::PartOfSpeech;

/// Grammatical role of a closed-class word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionClass {
    /// Articles, demonstratives and quantifiers.
    Determiner,
    /// Possessive determiners (`my`, `their`).
    Possessive,
    /// Subject pronouns.
    Pronoun,
    /// Object pronouns.
    ObjectPronoun,
    /// Prepositions.
    Preposition,
    /// Coordinating and subordinating conjunctions.
    Conjunction,
    /// Forms of `be`.
    Be,
    /// Forms of `have`.
    Have,
    /// Forms of `do`, including negated contractions.
    Do,
    /// Modal verbs, including negated contractions.
    Modal,
    /// The infinitive marker `to`.
    To,
    /// `not` and `never`.
    Negation,
    /// Interrogatives.
    Wh,
    /// Politeness markers and interjections.
    Interjection,
}

static FUNCTION_WORDS: LazyLock<HashMap<&'static str, FunctionClass>> = LazyLock::new(|| {
    use FunctionClass::*;

    let groups: &[(FunctionClass, &[&str])] = &[
        (
            Determiner,
            &[
                "the", "a", "an", "this", "that", "these", "those", "each", "every", "some",
                "any", "no", "all", "both", "another", "such", "several", "many", "few", "much",
                "more", "most", "other", "either", "neither",
            ],
        ),
        (
            Possessive,
            &["my", "your", "our", "their", "his", "her", "its", "whose"],
        ),
        (Pronoun, &["i", "we", "you", "they", "he", "she", "it"]),
        (ObjectPronoun, &["me", "us", "them", "him"]),
        (
            Preposition,
            &[
                "of", "in", "on", "at", "by", "for", "with", "about", "from", "into", "through",
                "over", "under", "between", "after", "before", "during", "without", "within",
                "across", "against", "toward", "towards", "upon", "via", "per", "around",
                "among", "behind", "beyond", "along", "onto", "inside", "outside",
            ],
        ),
        (
            Conjunction,
            &[
                "and", "or", "but", "nor", "so", "yet", "because", "if", "while", "although",
                "though", "unless", "since", "whether", "than", "as", "once",
            ],
        ),
        (
            Be,
            &[
                "am", "is", "are", "was", "were", "be", "been", "being", "isn't", "aren't",
                "wasn't", "weren't", "it's", "that's", "there's",
            ],
        ),
        (Have, &["have", "has", "had", "having", "haven't", "hasn't", "hadn't"]),
        (Do, &["do", "does", "did", "don't", "doesn't", "didn't"]),
        (
            Modal,
            &[
                "can", "could", "will", "would", "shall", "should", "may", "might", "must",
                "can't", "cannot", "couldn't", "won't", "wouldn't", "shouldn't", "mustn't",
                "let's",
            ],
        ),
        (To, &["to"]),
        (Negation, &["not", "never"]),
        (Wh, &["what", "which", "who", "whom", "how", "why", "where", "when"]),
        (Interjection, &["please", "yes", "ok", "okay", "hey", "hi", "hello", "thanks"]),
    ];

    groups
        .iter()
        .flat_map(|(class, words)| words.iter().map(move |w| (*w, *class)))
        .collect()
});

const N: &[PartOfSpeech] = &[PartOfSpeech::Noun];
const V: &[PartOfSpeech] = &[PartOfSpeech::Verb];
const ADJ: &[PartOfSpeech] = &[PartOfSpeech::Adj];
const ADV: &[PartOfSpeech] = &[PartOfSpeech::Adv];
const NV: &[PartOfSpeech] = &[PartOfSpeech::Noun, PartOfSpeech::Verb];
const AV: &[PartOfSpeech] = &[PartOfSpeech::Adj, PartOfSpeech::Verb];

const NOUNS: &[&str] = &[
    "answer", "api", "approach", "architecture", "article", "bug", "chapter", "client", "codebase",
    "component", "context", "corpus", "data", "database", "day", "dependency", "detail",
    "developer", "directory", "documentation", "engineer", "error", "example", "feature", "folder",
    "framework", "function", "goal", "guide", "hierarchy", "idea", "info", "information",
    "interface", "issue", "language", "library", "meeting", "metadata", "method", "module",
    "overview", "package", "page", "paradigm", "part", "people", "person", "pipeline", "problem",
    "project", "reason", "repository", "schema", "section", "sentence", "server", "service",
    "site", "step", "summary", "system", "table", "task", "team", "term", "text", "thing", "time",
    "token", "tool", "tutorial", "type", "user", "value", "variable", "version", "way", "week",
    "word", "year",
];

const VERBS: &[&str] = &[
    "acquire", "add", "allow", "analyse", "analyze", "ask", "become", "believe", "build", "come",
    "compare", "compile", "compute", "configure", "construct", "continue", "create", "declare",
    "decide", "define", "delete", "deploy", "describe", "determine", "develop", "disable",
    "divide", "enable", "ensure", "exclude", "execute", "explain", "explore", "find", "generate",
    "get", "give", "go", "handle", "identify", "ignore", "implement", "improve", "include",
    "initiate", "install", "keep", "know", "leverage", "maintain", "make", "mirror", "monitor",
    "organize", "parse", "pay", "perform", "prepare", "prioritize", "proceed", "provide",
    "receive", "refactor", "remove", "render", "require", "resolve", "restore", "say", "see",
    "seem", "send", "share", "show", "store", "take", "tell", "think", "transform", "traverse",
    "try", "understand", "verify", "want", "write",
];

const NOUN_VERBS: &[&str] = &[
    "access", "call", "cause", "change", "check", "code", "commit", "control", "design", "display",
    "document", "end", "experience", "export", "file", "fix", "focus", "format", "help", "import",
    "input", "list", "load", "look", "map", "match", "merge", "move", "name", "need", "note",
    "output", "plan", "point", "process", "progress", "question", "release", "report", "request",
    "result", "return", "review", "run", "save", "search", "set", "start", "structure", "support",
    "test", "track", "turn", "update", "use", "work",
];

const ADJECTIVES: &[&str] = &[
    "available", "awesome", "bad", "basic", "best", "better", "big", "common", "complex", "cool",
    "critical", "current", "different", "easy", "entire", "explicit", "expensive", "favorable",
    "final", "first", "formal", "full", "general", "good", "great", "hard", "important",
    "informal", "initial", "large", "last", "likely", "main", "new", "next", "nice", "obvious",
    "old", "optimal", "possible", "previous", "primary", "quick", "ready", "real", "right", "same",
    "simple", "small", "specific", "subsequent", "suboptimal", "sure", "useful", "whole", "worse",
    "wrong",
];

const ADJ_VERBS: &[&str] = &[
    "clean", "clear", "close", "complete", "correct", "empty", "free", "open", "separate",
];

const ADVERBS: &[&str] = &[
    "actually", "again", "already", "also", "always", "basically", "currently", "easily",
    "finally", "here", "however", "instead", "just", "maybe", "now", "often", "perhaps",
    "probably", "quickly", "quite", "rather", "really", "simply", "soon", "still", "then", "there",
    "therefore", "together", "usually", "very",
];

static OPEN_CLASS: LazyLock<HashMap<&'static str, &'static [PartOfSpeech]>> =
    LazyLock::new(|| {
        let groups: [(&[&str], &'static [PartOfSpeech]); 6] = [
            (NOUNS, N),
            (VERBS, V),
            (NOUN_VERBS, NV),
            (ADJECTIVES, ADJ),
            (ADJ_VERBS, AV),
            (ADVERBS, ADV),
        ];

        groups
            .iter()
            .flat_map(|(words, tags)| words.iter().map(move |w| (*w, *tags)))
            .collect()
    });

/// Closed-class role of a lowercase word, if it is a function word.
pub fn function_class(word: &str) -> Option<FunctionClass> {
    FUNCTION_WORDS.get(word).copied()
}

/// Candidate parts of speech for a lowercase base form.
pub fn open_class(word: &str) -> Option<&'static [PartOfSpeech]> {
    OPEN_CLASS.get(word).copied()
}

/// Returns `true` if the lowercase word is a known base form.
pub fn is_known(word: &str) -> bool {
    OPEN_CLASS.contains_key(word) || FUNCTION_WORDS.contains_key(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_words_have_classes() {
        assert_eq!(function_class("the"), Some(FunctionClass::Determiner));
        assert_eq!(function_class("should"), Some(FunctionClass::Modal));
        assert_eq!(function_class("don't"), Some(FunctionClass::Do));
        assert_eq!(function_class("idea"), None);
    }

    #[test]
    fn open_class_lists_candidates() {
        assert_eq!(open_class("cool"), Some(ADJ));
        assert_eq!(open_class("use"), Some(NV));
        assert_eq!(open_class("clear"), Some(AV));
        assert!(open_class("the").is_none());
    }

    #[test]
    fn word_lists_do_not_overlap() {
        let mut seen = std::collections::HashSet::new();
        for list in [NOUNS, VERBS, NOUN_VERBS, ADJECTIVES, ADJ_VERBS, ADVERBS] {
            for word in list {
                assert!(seen.insert(*word), "duplicate lexicon entry: {word}");
                assert!(function_class(word).is_none(), "{word} is also a function word");
            }
        }
    }
}
