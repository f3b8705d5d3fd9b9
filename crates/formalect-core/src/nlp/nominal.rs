//! Verb nominalization (`implement` → `the implementation of`).

/// `(verb lemma, noun)`, sorted by verb.
const NOMINALIZATIONS: &[(&str, &str)] = &[
    ("analyze", "analysis"),
    ("develop", "development"),
    ("execute", "execution"),
    ("generate", "generation"),
    ("implement", "implementation"),
    ("organize", "organization"),
    ("process", "processing"),
    ("refactor", "refactoring"),
    ("structure", "structuring"),
    ("transform", "transformation"),
];

/// Noun phrase standing in for `lemma`, if it has one.
pub fn nominalize(lemma: &str) -> Option<String> {
    NOMINALIZATIONS
        .binary_search_by_key(&lemma, |(verb, _)| verb)
        .ok()
        .map(|i| format!("the {} of", NOMINALIZATIONS[i].1))
}

/// Key used for the rewrite decision hash.
pub fn nominal_key(lemma: &str) -> String {
    format!("nominal:{lemma}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        assert!(NOMINALIZATIONS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn known_verbs_become_noun_phrases() {
        assert_eq!(nominalize("implement").as_deref(), Some("the implementation of"));
        assert_eq!(nominalize("refactor").as_deref(), Some("the refactoring of"));
        assert_eq!(nominalize("check"), None);
    }
}
