//! Sentence-opener rewrites (`I think` → `Analysis indicates`).
//!
//! Openers only match at the start of a sentence and are tried longest
//! first. Question-only openers require the sentence to end with `?`.
//! Command openers (`Check the file`) keep the imperative verb and put a
//! formal lead-in before it; they need the verb tagged as a base form.

/// How an opener's replacement is applied to the matched words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The replacement takes the place of the matched words.
    Replace,
    /// The replacement is put before the matched words, which are kept.
    Prefix,
}

/// A sentence-initial pattern and its formal replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opener {
    /// Lowercase words to match.
    pub words: &'static [&'static str],
    /// Replacement, lowercase; casing is applied by the rewriter.
    pub replacement: &'static str,
    /// Whether the matched words are replaced or kept.
    pub placement: Placement,
    /// Only match interrogative sentences.
    pub question_only: bool,
}

const fn opener(words: &'static [&'static str], replacement: &'static str) -> Opener {
    Opener {
        words,
        replacement,
        placement: Placement::Replace,
        question_only: false,
    }
}

const fn question(words: &'static [&'static str], replacement: &'static str) -> Opener {
    Opener {
        words,
        replacement,
        placement: Placement::Replace,
        question_only: true,
    }
}

const fn command(words: &'static [&'static str], replacement: &'static str) -> Opener {
    Opener {
        words,
        replacement,
        placement: Placement::Prefix,
        question_only: false,
    }
}

const ANALYSIS: &str = "analysis indicates";
const ANALYSIS_THAT: &str = "analysis indicates that";
const NECESSARY: &str = "it is necessary to";
const FEASIBLE: &str = "is it feasible to";
const APPROACH: &str = "what is the optimal approach to";
const SYSTEMATICALLY: &str = "systematically";
const METHODOLOGY: &str = "implement methodology to";

/// Known openers, longest first.
pub const OPENERS: &[Opener] = &[
    opener(&["i", "think", "that"], ANALYSIS_THAT),
    opener(&["i", "believe", "that"], ANALYSIS_THAT),
    opener(&["we", "need", "to"], NECESSARY),
    opener(&["i", "need", "to"], NECESSARY),
    opener(&["we", "want", "to"], NECESSARY),
    opener(&["i", "want", "to"], NECESSARY),
    question(&["how", "do", "i"], APPROACH),
    question(&["how", "do", "we"], APPROACH),
    question(&["how", "can", "i"], APPROACH),
    question(&["how", "can", "we"], APPROACH),
    question(&["how", "should", "i"], APPROACH),
    question(&["how", "should", "we"], APPROACH),
    opener(&["i", "think"], ANALYSIS),
    opener(&["i", "believe"], ANALYSIS),
    question(&["can", "you"], FEASIBLE),
    question(&["could", "you"], FEASIBLE),
    question(&["would", "you"], FEASIBLE),
    command(&["look", "at"], SYSTEMATICALLY),
    opener(&["please"], NECESSARY),
    command(&["check"], SYSTEMATICALLY),
    command(&["find"], SYSTEMATICALLY),
    command(&["fix"], SYSTEMATICALLY),
    command(&["update"], SYSTEMATICALLY),
    command(&["use"], METHODOLOGY),
    command(&["create"], METHODOLOGY),
    command(&["make"], METHODOLOGY),
    command(&["give"], METHODOLOGY),
];

impl Opener {
    /// Key used for the rewrite decision hash.
    pub fn key(&self) -> String {
        format!("opener:{}", self.words.join(" "))
    }

    /// Whether the first matched word must be an imperative verb.
    pub const fn is_command(&self) -> bool {
        matches!(self.placement, Placement::Prefix)
    }

    /// Replacement text for `matched`, the lowercase words it covers.
    pub fn render(&self, matched: &[String]) -> String {
        match self.placement {
            Placement::Replace => self.replacement.to_string(),
            Placement::Prefix => format!("{} {}", self.replacement, matched.join(" ")),
        }
    }
}

/// Find the opener matching the first words of a sentence.
///
/// `words` are the sentence's words in lowercase.
pub fn match_opener(words: &[String], is_question: bool) -> Option<&'static Opener> {
    OPENERS.iter().find(|o| {
        (!o.question_only || is_question)
            && words.len() > o.words.len()
            && o.words.iter().zip(words).all(|(want, got)| want == got)
    })
}
