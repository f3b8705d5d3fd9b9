//! Lemmatization and re-inflection.
//!
//! Reduction uses the irregular tables first, then suffix rules whose
//! candidate stems are checked against the lexicon. Inflection is the
//! inverse: it takes a base form and produces the surface form matching
//! the token that was replaced.

use crate::dictionaries::irregular_forms::{
    irregular_participle_base, irregular_past_base, irregular_plural, irregular_singular,
    irregular_verb_forms, S_FINAL_BASES, UNCOUNTABLE,
};
use crate::dictionaries::lexicon::is_known;

use super::PartOfSpeech;

/// Inflectional form of a token relative to its lemma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Form {
    /// Uninflected.
    #[default]
    Base,
    /// `-s` form: plural noun or third-person singular verb.
    S,
    /// Simple past.
    Past,
    /// Past participle.
    Participle,
    /// `-ing` form.
    Gerund,
}

/// A lemma with the form it was reduced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lemma {
    /// Lowercase base form.
    pub base: String,
    /// Inflection observed on the surface token.
    pub form: Form,
}

impl Lemma {
    fn new(base: impl Into<String>, form: Form) -> Self {
        Self {
            base: base.into(),
            form,
        }
    }
}

/// Stem endings that lost a silent `e` before `-ing`/`-ed`.
const RESTORE_E: &[&str] = &[
    "at", "ut", "iz", "yz", "ys", "ur", "ar", "ir", "or", "v", "nc", "rc", "uc", "rg", "dg", "ag",
    "id", "ud", "od", "in", "am", "um", "im", "om", "ak", "ok", "ik", "bl", "dl", "gl", "kl",
    "pl", "tl", "zl", "as", "os", "us", "rs", "ns",
];

/// Reduce a lowercase word to its lemma.
pub fn lemmatize(word: &str) -> Lemma {
    if is_known(word) || S_FINAL_BASES.contains(word) {
        return Lemma::new(word, Form::Base);
    }
    if let Some(base) = irregular_past_base(word) {
        return Lemma::new(base, Form::Past);
    }
    if let Some(base) = irregular_participle_base(word) {
        return Lemma::new(base, Form::Participle);
    }
    if let Some(base) = irregular_singular(word) {
        return Lemma::new(base, Form::S);
    }

    let len = word.len();
    if len > 4
        && let Some(stem) = word.strip_suffix("ing")
        && has_vowel(stem)
    {
        return Lemma::new(resolve_stem(stem), Form::Gerund);
    }
    if len > 3
        && let Some(stem) = word.strip_suffix("ed")
        && has_vowel(stem)
    {
        let base = match stem.strip_suffix('i') {
            Some(root) if !root.is_empty() => format!("{root}y"),
            _ => resolve_stem(stem),
        };
        return Lemma::new(base, Form::Past);
    }
    if len > 4
        && let Some(root) = word.strip_suffix("ies")
    {
        return Lemma::new(format!("{root}y"), Form::S);
    }
    if let Some(without_es) = word.strip_suffix("es") {
        let without_s = &word[..len - 1];
        let base = if is_known(without_s) {
            without_s
        } else if is_known(without_es) || takes_es(without_es) {
            without_es
        } else {
            without_s
        };
        return Lemma::new(base, Form::S);
    }
    if len > 2
        && let Some(base) = word.strip_suffix('s')
        && !base.ends_with('s')
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        return Lemma::new(base, Form::S);
    }

    Lemma::new(word, Form::Base)
}

/// Pick the base form for a stem left after removing `-ing` or `-ed`.
fn resolve_stem(stem: &str) -> String {
    if is_known(stem) {
        return stem.to_string();
    }
    let with_e = format!("{stem}e");
    if is_known(&with_e) {
        return with_e;
    }
    if let Some(undoubled) = undouble(stem) {
        if is_known(undoubled) {
            return undoubled.to_string();
        }
        if !undoubled.ends_with(['l', 's', 'z']) {
            return undoubled.to_string();
        }
    }
    if RESTORE_E.iter().any(|ending| stem.ends_with(ending)) && !has_vowel_pair_before_last(stem) {
        return with_e;
    }
    stem.to_string()
}

/// `stopp` → `stop`.
fn undouble(stem: &str) -> Option<&str> {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 3 && bytes[n - 1] == bytes[n - 2] && is_consonant(bytes[n - 1]) {
        Some(&stem[..n - 1])
    } else {
        None
    }
}

fn has_vowel_pair_before_last(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    n >= 3 && is_vowel(bytes[n - 2]) && is_vowel(bytes[n - 3])
}

fn has_vowel(stem: &str) -> bool {
    stem.bytes().any(|b| is_vowel(b) || b == b'y')
}

fn takes_es(stem: &str) -> bool {
    stem.ends_with(['s', 'x', 'z', 'o']) || stem.ends_with("ch") || stem.ends_with("sh")
}

const fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

const fn is_consonant(b: u8) -> bool {
    b.is_ascii_alphabetic() && !is_vowel(b)
}

/// Inflect a (possibly multi-word) replacement to match `form`.
///
/// Verbs inflect their first word, nouns their last. Other parts of speech
/// and untagged entries are returned unchanged.
pub fn inflect(replacement: &str, form: Form, pos: Option<PartOfSpeech>) -> String {
    let head_first = match pos {
        Some(PartOfSpeech::Verb) => true,
        Some(PartOfSpeech::Noun) if form == Form::S => false,
        _ => return replacement.to_string(),
    };
    if form == Form::Base {
        return replacement.to_string();
    }

    let (head, rest) = if head_first {
        match replacement.split_once(' ') {
            Some((head, rest)) => (head, Some(rest)),
            None => (replacement, None),
        }
    } else {
        match replacement.rsplit_once(' ') {
            Some((rest, head)) => (head, Some(rest)),
            None => (replacement, None),
        }
    };

    let inflected = if head_first {
        inflect_verb(head, form)
    } else {
        pluralize(head)
    };

    match (rest, head_first) {
        (None, _) => inflected,
        (Some(rest), true) => format!("{inflected} {rest}"),
        (Some(rest), false) => format!("{rest} {inflected}"),
    }
}

fn inflect_verb(base: &str, form: Form) -> String {
    match form {
        Form::Base => base.to_string(),
        Form::S => add_s(base),
        Form::Past => irregular_verb_forms(base).map_or_else(|| add_ed(base), |(p, _)| p.into()),
        Form::Participle => {
            irregular_verb_forms(base).map_or_else(|| add_ed(base), |(_, pp)| pp.into())
        }
        Form::Gerund => add_ing(base),
    }
}

fn pluralize(noun: &str) -> String {
    if let Some(plural) = irregular_plural(noun) {
        return plural.to_string();
    }
    if UNCOUNTABLE.contains(noun) {
        return noun.to_string();
    }
    add_s(noun)
}

fn add_s(word: &str) -> String {
    let bytes = word.as_bytes();
    let n = bytes.len();
    if n >= 2 && bytes[n - 1] == b'y' && is_consonant(bytes[n - 2]) {
        return format!("{}ies", &word[..n - 1]);
    }
    if takes_es(word) {
        return format!("{word}es");
    }
    format!("{word}s")
}

fn add_ed(word: &str) -> String {
    let bytes = word.as_bytes();
    let n = bytes.len();
    if word.ends_with('e') {
        return format!("{word}d");
    }
    if n >= 2 && bytes[n - 1] == b'y' && is_consonant(bytes[n - 2]) {
        return format!("{}ied", &word[..n - 1]);
    }
    if doubles_final(word) {
        return format!("{word}{}ed", char::from(bytes[n - 1]));
    }
    format!("{word}ed")
}

fn add_ing(word: &str) -> String {
    let bytes = word.as_bytes();
    let n = bytes.len();
    if let Some(root) = word.strip_suffix("ie") {
        return format!("{root}ying");
    }
    if word.ends_with('e') && !word.ends_with("ee") && n > 2 {
        return format!("{}ing", &word[..n - 1]);
    }
    if doubles_final(word) {
        return format!("{word}{}ing", char::from(bytes[n - 1]));
    }
    format!("{word}ing")
}

/// Short consonant-vowel-consonant words double their final consonant.
fn doubles_final(word: &str) -> bool {
    let bytes = word.as_bytes();
    let n = bytes.len();
    (3..=4).contains(&n)
        && is_consonant(bytes[0])
        && is_consonant(bytes[n - 3])
        && is_vowel(bytes[n - 2])
        && is_consonant(bytes[n - 1])
        && !matches!(bytes[n - 1], b'w' | b'x' | b'y')
}

/// Apply the casing pattern of `original` to `replacement`.
///
/// All-caps originals of two or more letters produce upper case; an
/// initial capital is carried over; anything else is left as written.
pub fn match_case(original: &str, replacement: &str) -> String {
    let mut letters = original.chars().filter(|c| c.is_alphabetic());
    let first = letters.next();
    let all_upper = first.is_some_and(char::is_uppercase)
        && original.chars().filter(|c| c.is_alphabetic()).count() >= 2
        && letters.all(char::is_uppercase);

    if all_upper {
        return replacement.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(c) => c.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    replacement.to_string()
}
