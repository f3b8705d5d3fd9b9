//! Part-of-speech tagging.
//!
//! [`Tagger`] is the seam for plugging in a statistical tagger. The built-in
//! [`RuleTagger`] combines the closed/open-class lexicon, suffix heuristics
//! and the word on either side. Words it cannot decide between are left
//! untagged rather than guessed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dictionaries::lexicon::{FunctionClass, function_class, open_class};

use super::lemma::{Form, lemmatize};

/// Universal part-of-speech tags used as terminology constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartOfSpeech {
    /// `NOUN`
    Noun,
    /// `VERB`
    Verb,
    /// `ADJ`
    Adj,
    /// `ADV`
    Adv,
}

impl PartOfSpeech {
    /// The universal tagset name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Noun => "NOUN",
            Self::Verb => "VERB",
            Self::Adj => "ADJ",
            Self::Adv => "ADV",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unrecognized part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid part-of-speech tag `{0}` (expected NOUN, VERB, ADJ or ADV)")]
pub struct InvalidTag(pub String);

impl FromStr for PartOfSpeech {
    type Err = InvalidTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "noun" => Ok(Self::Noun),
            "verb" => Ok(Self::Verb),
            "adj" | "adjective" => Ok(Self::Adj),
            "adv" | "adverb" => Ok(Self::Adv),
            _ => Err(InvalidTag(s.to_string())),
        }
    }
}

impl Serialize for PartOfSpeech {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PartOfSpeech {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Tagger output for one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// Lowercase base form.
    pub lemma: String,
    /// Tag, or `None` when the word could not be tagged confidently.
    pub pos: Option<PartOfSpeech>,
    /// Inflection of the surface word relative to `lemma`.
    pub form: Form,
}

/// Assigns lemmas and parts of speech to the words of one sentence.
pub trait Tagger: Send + Sync {
    /// Analyze `words` in order; the result has one entry per word.
    fn tag(&self, words: &[&str]) -> Vec<Analysis>;
}

/// Lexicon- and context-driven tagger.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTagger;

/// What precedes the word being tagged.
#[derive(Debug, Clone, Copy)]
enum Cue {
    Start,
    Function(FunctionClass),
    Word(Option<PartOfSpeech>),
}

impl Tagger for RuleTagger {
    fn tag(&self, words: &[&str]) -> Vec<Analysis> {
        let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let mut out = Vec::with_capacity(words.len());
        let mut cue = Cue::Start;

        for (i, lower) in lowered.iter().enumerate() {
            if let Some(class) = function_class(lower) {
                out.push(Analysis {
                    lemma: lower.clone(),
                    pos: None,
                    form: Form::Base,
                });
                // `do not use`: the negation does not change what follows.
                if class != FunctionClass::Negation {
                    cue = Cue::Function(class);
                }
                continue;
            }

            if lower.contains(['\'', '’']) {
                out.push(Analysis {
                    lemma: lower.clone(),
                    pos: None,
                    form: Form::Base,
                });
                cue = Cue::Word(None);
                continue;
            }

            let next = lowered.get(i + 1).and_then(|w| function_class(w));
            let lemma = lemmatize(lower);
            let pos = match open_class(&lemma.base) {
                Some(candidates) => {
                    let narrowed = narrow(candidates, lemma.form);
                    disambiguate(&narrowed, lemma.form, cue, next)
                }
                None => guess(lower, &lemma.base, lemma.form, cue).or_else(|| {
                    let proper = i > 0 && words[i].chars().next().is_some_and(char::is_uppercase);
                    proper.then_some(PartOfSpeech::Noun)
                }),
            };

            out.push(Analysis {
                lemma: lemma.base,
                pos,
                form: lemma.form,
            });
            cue = Cue::Word(pos);
        }

        out
    }
}

/// Drop candidates the observed inflection rules out.
///
/// An inflection no candidate can carry (`cools`, `goods`) leaves nothing,
/// so the word stays untagged.
fn narrow(candidates: &[PartOfSpeech], form: Form) -> Vec<PartOfSpeech> {
    let keep: &[PartOfSpeech] = match form {
        Form::Base => return candidates.to_vec(),
        Form::S => &[PartOfSpeech::Noun, PartOfSpeech::Verb],
        Form::Past | Form::Participle | Form::Gerund => &[PartOfSpeech::Verb],
    };
    candidates.iter().copied().filter(|p| keep.contains(p)).collect()
}

fn disambiguate(
    candidates: &[PartOfSpeech],
    form: Form,
    cue: Cue,
    next: Option<FunctionClass>,
) -> Option<PartOfSpeech> {
    if let [only] = candidates {
        return Some(*only);
    }
    let has = |p| candidates.contains(&p);
    if has(PartOfSpeech::Noun) && has(PartOfSpeech::Verb) {
        noun_or_verb(form, cue, next).or_else(|| noun_or_verb_by_next(next))
    } else if has(PartOfSpeech::Adj) && has(PartOfSpeech::Verb) {
        adj_or_verb(cue, next)
    } else {
        None
    }
}

fn noun_or_verb(form: Form, cue: Cue, next: Option<FunctionClass>) -> Option<PartOfSpeech> {
    use FunctionClass as F;
    use PartOfSpeech::{Adj, Adv, Noun, Verb};

    let inflected_verb = matches!(form, Form::Past | Form::Participle | Form::Gerund);
    match cue {
        Cue::Function(F::Determiner | F::Possessive) => Some(Noun),
        Cue::Function(
            F::Pronoun | F::ObjectPronoun | F::Modal | F::To | F::Do | F::Interjection,
        ) => Some(Verb),
        Cue::Function(F::Be) => inflected_verb.then_some(Verb),
        Cue::Function(F::Have) => Some(if inflected_verb { Verb } else { Noun }),
        Cue::Function(F::Preposition) => Some(if form == Form::Gerund { Verb } else { Noun }),
        Cue::Start if form == Form::S => Some(Noun),
        Cue::Start => noun_or_verb_by_next(next).or(Some(Verb)),
        Cue::Word(Some(Adj)) => Some(Noun),
        Cue::Word(Some(Noun)) => Some(if matches!(form, Form::S | Form::Past) {
            Verb
        } else {
            Noun
        }),
        Cue::Word(Some(Verb)) => Some(if form == Form::Gerund { Verb } else { Noun }),
        Cue::Word(Some(Adv)) => Some(Verb),
        _ => None,
    }
}

fn noun_or_verb_by_next(next: Option<FunctionClass>) -> Option<PartOfSpeech> {
    use FunctionClass as F;
    match next? {
        F::Be | F::Modal | F::Have | F::Do => Some(PartOfSpeech::Noun),
        F::Determiner | F::Possessive | F::ObjectPronoun => Some(PartOfSpeech::Verb),
        _ => None,
    }
}

fn adj_or_verb(cue: Cue, next: Option<FunctionClass>) -> Option<PartOfSpeech> {
    use FunctionClass as F;

    let object_follows = matches!(
        next,
        Some(F::Determiner | F::Possessive | F::ObjectPronoun)
    );
    match cue {
        Cue::Function(
            F::Pronoun | F::ObjectPronoun | F::Modal | F::To | F::Do | F::Interjection,
        ) => Some(PartOfSpeech::Verb),
        Cue::Start => Some(if object_follows {
            PartOfSpeech::Verb
        } else {
            PartOfSpeech::Adj
        }),
        Cue::Function(F::Determiner | F::Possessive | F::Be | F::Conjunction)
        | Cue::Word(Some(PartOfSpeech::Adv | PartOfSpeech::Adj)) => Some(PartOfSpeech::Adj),
        _ => None,
    }
}

/// Tag a word missing from the lexicon from its suffix and context.
fn guess(lower: &str, base: &str, form: Form, cue: Cue) -> Option<PartOfSpeech> {
    use FunctionClass as F;

    if matches!(form, Form::Past | Form::Participle | Form::Gerund) {
        let verbal = matches!(
            cue,
            Cue::Function(F::Pronoun | F::Be | F::Have) | Cue::Word(Some(PartOfSpeech::Noun))
        );
        return verbal.then_some(PartOfSpeech::Verb);
    }

    const NOUN_SUFFIXES: &[&str] = &[
        "tion", "sion", "ment", "ness", "ity", "ism", "ance", "ence", "ship", "hood",
    ];
    const ADJ_SUFFIXES: &[&str] = &["ous", "ful", "able", "ible", "ive", "less", "ical", "ish"];
    const VERB_SUFFIXES: &[&str] = &["ize", "ise", "ify"];

    if lower.len() > 4 && lower.ends_with("ly") && !lower.ends_with("ply") {
        return Some(PartOfSpeech::Adv);
    }
    if NOUN_SUFFIXES.iter().any(|s| base.ends_with(s)) {
        return Some(PartOfSpeech::Noun);
    }
    if form == Form::Base && ADJ_SUFFIXES.iter().any(|s| base.ends_with(s)) {
        return Some(PartOfSpeech::Adj);
    }
    if VERB_SUFFIXES.iter().any(|s| base.ends_with(s)) {
        return Some(PartOfSpeech::Verb);
    }
    None
}
