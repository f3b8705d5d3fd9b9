//! Irregular inflections used by lemmatization and re-inflection.
//!
//! Each table is stored base-form first; reverse lookups are built lazily.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Irregular verbs as `(base, past, past participle)`.
pub const IRREGULAR_VERBS: &[(&str, &str, &str)] = &[
    ("be", "was", "been"),
    ("begin", "began", "begun"),
    ("break", "broke", "broken"),
    ("bring", "brought", "brought"),
    ("build", "built", "built"),
    ("buy", "bought", "bought"),
    ("choose", "chose", "chosen"),
    ("come", "came", "come"),
    ("do", "did", "done"),
    ("draw", "drew", "drawn"),
    ("drive", "drove", "driven"),
    ("fall", "fell", "fallen"),
    ("feel", "felt", "felt"),
    ("find", "found", "found"),
    ("forget", "forgot", "forgotten"),
    ("get", "got", "gotten"),
    ("give", "gave", "given"),
    ("go", "went", "gone"),
    ("grow", "grew", "grown"),
    ("have", "had", "had"),
    ("hide", "hid", "hidden"),
    ("hold", "held", "held"),
    ("keep", "kept", "kept"),
    ("know", "knew", "known"),
    ("lead", "led", "led"),
    ("leave", "left", "left"),
    ("lose", "lost", "lost"),
    ("make", "made", "made"),
    ("mean", "meant", "meant"),
    ("meet", "met", "met"),
    ("pay", "paid", "paid"),
    ("put", "put", "put"),
    ("read", "read", "read"),
    ("rewrite", "rewrote", "rewritten"),
    ("run", "ran", "run"),
    ("say", "said", "said"),
    ("see", "saw", "seen"),
    ("seek", "sought", "sought"),
    ("send", "sent", "sent"),
    ("set", "set", "set"),
    ("show", "showed", "shown"),
    ("speak", "spoke", "spoken"),
    ("spend", "spent", "spent"),
    ("split", "split", "split"),
    ("stand", "stood", "stood"),
    ("take", "took", "taken"),
    ("teach", "taught", "taught"),
    ("tell", "told", "told"),
    ("think", "thought", "thought"),
    ("throw", "threw", "thrown"),
    ("understand", "understood", "understood"),
    ("win", "won", "won"),
    ("write", "wrote", "written"),
];

/// Irregular noun plurals as `(singular, plural)`.
pub const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("analysis", "analyses"),
    ("appendix", "appendices"),
    ("child", "children"),
    ("criterion", "criteria"),
    ("foot", "feet"),
    ("hypothesis", "hypotheses"),
    ("index", "indices"),
    ("life", "lives"),
    ("man", "men"),
    ("matrix", "matrices"),
    ("mouse", "mice"),
    ("person", "people"),
    ("phenomenon", "phenomena"),
    ("thesis", "theses"),
    ("vertex", "vertices"),
    ("woman", "women"),
];

/// Nouns that do not take a plural `-s`.
pub static UNCOUNTABLE: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "advice", "data", "equipment", "feedback", "information", "knowledge", "metadata",
        "news", "research", "software", "hardware", "traffic", "documentation", "integrity",
        "granularity", "validity",
    ]
    .into_iter()
    .collect()
});

/// Words ending in `s` that are already base forms.
pub static S_FINAL_BASES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "alias", "always", "analysis", "atlas", "basis", "bias", "bonus", "bus", "canvas",
        "chaos", "corpus", "consensus", "focus", "gas", "lens", "news", "perhaps", "plus",
        "process", "series", "species", "status", "syllabus", "thesis", "thus", "virus",
        "yes", "this", "its", "his", "hers", "ours", "yours", "theirs", "us", "was", "is",
        "has", "does", "less", "unless", "across", "besides", "towards", "afterwards",
    ]
    .into_iter()
    .collect()
});

static PAST_TO_BASE: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    IRREGULAR_VERBS
        .iter()
        .map(|(base, past, _)| (*past, *base))
        .collect()
});

static PARTICIPLE_TO_BASE: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    IRREGULAR_VERBS
        .iter()
        .map(|(base, _, participle)| (*participle, *base))
        .collect()
});

static BASE_TO_FORMS: LazyLock<HashMap<&'static str, (&'static str, &'static str)>> =
    LazyLock::new(|| {
        IRREGULAR_VERBS
            .iter()
            .map(|(base, past, participle)| (*base, (*past, *participle)))
            .collect()
    });

static PLURAL_TO_SINGULAR: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    IRREGULAR_PLURALS
        .iter()
        .map(|(singular, plural)| (*plural, *singular))
        .collect()
});

static SINGULAR_TO_PLURAL: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| IRREGULAR_PLURALS.iter().copied().collect());

/// Base form of an irregular simple past (`made` → `make`).
pub fn irregular_past_base(word: &str) -> Option<&'static str> {
    PAST_TO_BASE.get(word).copied()
}

/// Base form of an irregular past participle (`written` → `write`).
pub fn irregular_participle_base(word: &str) -> Option<&'static str> {
    PARTICIPLE_TO_BASE.get(word).copied()
}

/// `(past, participle)` of an irregular verb base.
pub fn irregular_verb_forms(base: &str) -> Option<(&'static str, &'static str)> {
    BASE_TO_FORMS.get(base).copied()
}

/// Singular of an irregular plural (`children` → `child`).
pub fn irregular_singular(word: &str) -> Option<&'static str> {
    PLURAL_TO_SINGULAR.get(word).copied()
}

/// Plural of an irregular singular (`child` → `children`).
pub fn irregular_plural(word: &str) -> Option<&'static str> {
    SINGULAR_TO_PLURAL.get(word).copied()
}
