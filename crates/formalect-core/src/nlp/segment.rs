//! Sentence and word segmentation over byte spans.
//!
//! Everything here works on byte offsets into the original text so the
//! rewriter can splice replacements in and copy every other byte through
//! untouched.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::dictionaries::abbreviations::is_abbreviation;

/// Words: letters/digits, optionally joined by apostrophes or hyphens.
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*").expect("valid regex")
});

/// Regex for URLs.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:https?://|ftp://|www\.)[^\s<>"'`)\]]+"#).expect("valid regex")
});

/// Regex for email addresses.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

/// Regex for initials (J.K., U.S.A., etc.).
static INITIALS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\.(?:[A-Z]\.)*[A-Z]?$").expect("valid regex"));

/// A word token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// Byte span in the source text.
    pub span: Range<usize>,
    /// Position of the word among all words of the document.
    pub ordinal: usize,
}

/// A sentence and the words inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// Byte span in the source text.
    pub span: Range<usize>,
    /// Words in order.
    pub words: Vec<Word>,
}

/// Byte ranges of URLs and e-mail addresses, sorted and non-overlapping.
pub fn opaque_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = URL_PATTERN
        .find_iter(text)
        .chain(EMAIL_PATTERN.find_iter(text))
        .map(|m| trim_url_tail(text, m.range()))
        .collect();
    merge_ranges(&mut ranges);
    ranges
}

/// Drop trailing sentence punctuation a URL match swallowed.
fn trim_url_tail(text: &str, range: Range<usize>) -> Range<usize> {
    let trimmed = text[range.clone()].trim_end_matches(['.', ',', ';', ':', '!', '?']);
    range.start..range.start + trimmed.len()
}

/// Sort and coalesce overlapping or touching ranges in place.
pub fn merge_ranges(ranges: &mut Vec<Range<usize>>) {
    ranges.sort_by_key(|r| (r.start, r.end));
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges.drain(..) {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    *ranges = merged;
}

/// Split text into sentences and words.
///
/// Sentence spans are contiguous and together cover the whole text; words
/// are numbered across the document in reading order.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn segment(text: &str) -> Vec<Sentence> {
    let spans = split_sentences(text);
    let mut sentences: Vec<Sentence> = spans
        .into_iter()
        .map(|span| Sentence {
            span,
            words: Vec::new(),
        })
        .collect();

    let mut current = 0;
    for (ordinal, m) in WORD_PATTERN.find_iter(text).enumerate() {
        while current + 1 < sentences.len() && m.start() >= sentences[current].span.end {
            current += 1;
        }
        if let Some(sentence) = sentences.get_mut(current) {
            sentence.words.push(Word {
                span: m.range(),
                ordinal,
            });
        }
    }

    sentences.retain(|s| !s.words.is_empty());
    sentences
}

/// Sentence spans with abbreviation, decimal, URL, and email awareness.
///
/// Blank lines and Markdown block markers at the start of a line always
/// start a new sentence.
pub fn split_sentences(text: &str) -> Vec<Range<usize>> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let opaque = opaque_ranges(text);
    let in_opaque = |pos: usize| {
        let idx = opaque.partition_point(|r| r.end <= pos);
        opaque.get(idx).is_some_and(|r| r.start <= pos)
    };

    let mut spans = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((pos, ch)) = iter.next() {
        let mut end = None;

        if ch == '\n' {
            let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
            let next_line = text[pos + 1..].split('\n').next().unwrap_or_default();
            if next_line.trim().is_empty()
                || is_block_line(next_line)
                || is_block_line(&text[line_start..pos])
            {
                end = Some(pos + 1);
            }
        } else if is_sentence_terminator(ch) && !in_opaque(pos) {
            // Let a run like `?!` or `...` end on its last character.
            if iter.peek().is_some_and(|(_, c)| is_sentence_terminator(*c)) {
                continue;
            }
            if is_sentence_boundary(text, start, pos, ch) {
                let mut stop = pos + ch.len_utf8();
                while let Some((p, c)) = iter.peek().copied()
                    && is_closing(c)
                {
                    stop = p + c.len_utf8();
                    iter.next();
                }
                end = Some(stop);
            }
        }

        if let Some(end) = end
            && end > start
        {
            spans.push(start..end);
            start = end;
        }
    }

    if start < text.len() {
        spans.push(start..text.len());
    }
    spans
}

const fn is_sentence_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

const fn is_closing(ch: char) -> bool {
    matches!(ch, '"' | '\'' | '’' | '”' | ')' | ']')
}

/// A line that opens a Markdown block: heading, quote, table row or list item.
fn is_block_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with(['#', '>', '|'])
        || ["- ", "* ", "+ "].iter().any(|m| trimmed.starts_with(m))
        || trimmed
            .split_once(". ")
            .is_some_and(|(n, _)| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

fn is_sentence_boundary(text: &str, start: usize, pos: usize, punctuation: char) -> bool {
    let after = &text[pos + punctuation.len_utf8()..];
    let char_after = after.trim_start().chars().next();

    let Some(next_char) = char_after else {
        return true;
    };

    // ! and ? are almost always boundaries
    if punctuation != '.' {
        return true;
    }

    let word_before = word_before(&text[start..pos]);

    // Ellipsis
    if text[..pos].ends_with("..") {
        return false;
    }

    if is_likely_abbreviation(word_before) || is_likely_initial(word_before) {
        return false;
    }

    // Digit after period following a digit = decimal number (e.g., "3.14")
    if next_char.is_ascii_digit()
        && !after.starts_with(char::is_whitespace)
        && word_before.chars().last().is_some_and(|c| c.is_ascii_digit())
    {
        return false;
    }

    // `file.txt`, `v1.2`: no whitespace after the period
    if !after.starts_with(char::is_whitespace) {
        return false;
    }

    // Uppercase next char = strong boundary signal
    !next_char.is_lowercase()
}

/// The run of alphanumerics and periods ending right before `pos`.
fn word_before(head: &str) -> &str {
    let trimmed = head.trim_end_matches(|c: char| c.is_whitespace());
    let start = trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '.'))
        .map_or(0, |(i, c)| i + c.len_utf8());
    &trimmed[start..]
}

fn is_likely_abbreviation(word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let word_clean = word.trim_end_matches('.');
    if is_abbreviation(word_clean) {
        return true;
    }
    // Single uppercase letter = likely initial/abbreviation
    let mut chars = word_clean.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

fn is_likely_initial(word: &str) -> bool {
    !word.is_empty() && INITIALS_PATTERN.is_match(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence_texts(text: &str) -> Vec<&str> {
        split_sentences(text)
            .into_iter()
            .map(|r| text[r].trim())
            .filter(|s| !s.is_empty())
            .collect()
    }

    #[test]
    fn basic_sentences() {
        let sentences = sentence_texts("This is a sentence. This is another sentence.");
        assert_eq!(sentences, vec!["This is a sentence.", "This is another sentence."]);
    }

    #[test]
    fn spans_cover_the_whole_text() {
        let text = "One. Two!  Three?\n\nFour";
        let spans = split_sentences(text);
        assert_eq!(spans.first().map(|r| r.start), Some(0));
        assert_eq!(spans.last().map(|r| r.end), Some(text.len()));
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn abbreviations_not_split() {
        let sentences = sentence_texts("Dr. Smith went to the store. He bought milk.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("Dr. Smith"));
    }

    #[test]
    fn initials_not_split() {
        let sentences = sentence_texts("J. K. Rowling wrote it. Then U.S. readers bought it.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn decimal_numbers_not_split() {
        let sentences = sentence_texts("The price is 3.14 dollars. That's cheap.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("3.14"));
    }

    #[test]
    fn urls_and_emails_not_split() {
        let sentences =
            sentence_texts("See https://example.com/a.b.c for details. Mail dev@example.org today.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn terminators_between_many_urls() {
        let text = "Try https://a.io/x?y=1 now! Then https://b.io/v1.2/ is next. Ask me@c.org? Yes.";
        assert_eq!(
            sentence_texts(text),
            vec![
                "Try https://a.io/x?y=1 now!",
                "Then https://b.io/v1.2/ is next.",
                "Ask me@c.org?",
                "Yes."
            ]
        );
    }

    #[test]
    fn question_and_exclamation() {
        let sentences = sentence_texts("Are you serious? I can't believe it!? This is amazing.");
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn blank_lines_and_blocks_break_sentences() {
        let sentences = sentence_texts("# Title\nSome text\n\nMore text\n- item one\n1. item two");
        assert_eq!(
            sentences,
            vec!["# Title", "Some text", "More text", "- item one", "1. item two"]
        );
    }

    #[test]
    fn empty_input() {
        assert!(split_sentences("").is_empty());
        assert!(segment("   \n").is_empty());
    }

    #[test]
    fn words_are_numbered_across_sentences() {
        let text = "Fix the bug. Don't re-run it.";
        let sentences = segment(text);
        assert_eq!(sentences.len(), 2);
        let words: Vec<(&str, usize)> = sentences
            .iter()
            .flat_map(|s| s.words.iter())
            .map(|w| (&text[w.span.clone()], w.ordinal))
            .collect();
        assert_eq!(
            words,
            vec![("Fix", 0), ("the", 1), ("bug", 2), ("Don't", 3), ("re-run", 4), ("it", 5)]
        );
    }

    #[test]
    fn opaque_ranges_exclude_trailing_period() {
        let text = "Visit www.example.com. Or mail a@b.io.";
        let ranges = opaque_ranges(text);
        let found: Vec<&str> = ranges.into_iter().map(|r| &text[r]).collect();
        assert_eq!(found, vec!["www.example.com", "a@b.io"]);
    }

    #[test]
    fn merge_coalesces_overlaps() {
        let mut ranges = vec![5..9, 0..3, 2..4, 9..10];
        merge_ranges(&mut ranges);
        assert_eq!(ranges, vec![0..4, 5..10]);
    }
}
