//! The linguistic rewriter.
//!
//! [`rewrite`] is pure: given a document's bytes and a [`RewriteContext`] it
//! returns the transformed text plus counters. Every byte outside a
//! substituted span is copied through unchanged.
//!
//! Whether an eligible site is rewritten is decided by hashing the document
//! path, the site's word position and its key with xxh3, so the same input
//! at the same intensity always produces the same output.

use std::ops::Range;

use xxhash_rust::xxh3::Xxh3;

use crate::document::{Document, Substitution, TransformationResult};
use crate::error::{PipelineError, PipelineResult};
use crate::markdown::{is_markdown_path, protected_ranges};
use crate::settings::Intensity;
use crate::terminology::{MAX_PHRASE_WORDS, TermEntry, TerminologyMap};

use super::lemma::{Form, inflect, match_case};
use super::nominal::{nominal_key, nominalize};
use super::openers::match_opener;
use super::segment::{Sentence, merge_ranges, opaque_ranges, segment};
use super::tagger::{Analysis, PartOfSpeech, Tagger};

const FIELD_SEPARATOR: u8 = 0x1f;

/// Everything the rewriter needs besides the document.
#[derive(Clone, Copy)]
pub struct RewriteContext<'a> {
    /// Resolved terminology for the run.
    pub terminology: &'a TerminologyMap,
    /// Fraction of eligible sites to rewrite.
    pub intensity: Intensity,
    /// Lemma and part-of-speech source.
    pub tagger: &'a dyn Tagger,
    /// Enable sentence-opener, command and nominalization rewrites.
    pub advanced: bool,
}

impl std::fmt::Debug for RewriteContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewriteContext")
            .field("terms", &self.terminology.len())
            .field("intensity", &self.intensity)
            .field("advanced", &self.advanced)
            .finish_non_exhaustive()
    }
}

/// Deterministic score in `[0, 1)` for one site.
pub fn site_score(path: &str, position: usize, key: &str) -> f64 {
    let mut hasher = Xxh3::new();
    hasher.update(path.as_bytes());
    hasher.update(&[FIELD_SEPARATOR]);
    hasher.update(&(position as u64).to_le_bytes());
    hasher.update(&[FIELD_SEPARATOR]);
    hasher.update(key.as_bytes());
    // Top 53 bits fit an f64 mantissa exactly.
    (hasher.digest() >> 11) as f64 / (1u64 << 53) as f64
}

/// A substitution waiting to be spliced in.
struct Edit {
    span: Range<usize>,
    replacement: String,
}

/// A terminology match at one position.
struct Match<'m> {
    words: usize,
    key: String,
    entry: &'m TermEntry,
    by_lemma: bool,
}

/// Rewrite one document.
///
/// Fails with [`PipelineError::Processing`] when the bytes are not UTF-8 or
/// contain NUL bytes.
#[tracing::instrument(skip_all, fields(path = %document.path()))]
pub fn rewrite(
    document: &Document,
    ctx: &RewriteContext<'_>,
) -> PipelineResult<TransformationResult> {
    let path = document.path();
    let processing = |reason: String| PipelineError::Processing {
        path: path.to_path_buf(),
        reason,
    };

    let text = std::str::from_utf8(document.bytes())
        .map_err(|e| processing(format!("not valid UTF-8: {e}")))?;
    if text.contains('\0') {
        return Err(processing("contains NUL bytes (binary content)".to_string()));
    }

    let mut protected = opaque_ranges(text);
    if is_markdown_path(path.as_str()) {
        protected.extend(protected_ranges(text));
        merge_ranges(&mut protected);
    }

    let mut edits = Vec::new();
    let mut eligible_sites = 0;

    for sentence in segment(text) {
        let surfaces: Vec<&str> = sentence.words.iter().map(|w| &text[w.span.clone()]).collect();
        let analyses = ctx.tagger.tag(&surfaces);
        if analyses.len() != surfaces.len() {
            return Err(processing(format!(
                "tagger returned {} analyses for {} words",
                analyses.len(),
                surfaces.len()
            )));
        }

        let scan = SentenceScan {
            text,
            path: path.as_str(),
            sentence: &sentence,
            surfaces: &surfaces,
            analyses: &analyses,
            protected: sentence
                .words
                .iter()
                .map(|w| overlaps(&protected, &w.span))
                .collect(),
        };
        eligible_sites += scan.run(ctx, &mut edits);
    }

    let mut transformed = String::with_capacity(text.len() + text.len() / 4);
    let mut substitutions = Vec::with_capacity(edits.len());
    let mut transformed_chars: i64 = 0;
    let mut cursor = 0;
    for edit in edits {
        let original = &text[edit.span.clone()];
        // An identity replacement is not a substitution.
        if edit.replacement == original {
            continue;
        }
        transformed.push_str(&text[cursor..edit.span.start]);
        transformed.push_str(&edit.replacement);
        cursor = edit.span.end;

        transformed_chars += char_count(&edit.replacement) - char_count(original);
        substitutions.push(Substitution {
            span: edit.span,
            original: original.to_string(),
            replacement: edit.replacement,
        });
    }
    transformed.push_str(&text[cursor..]);

    let changed = transformed != text;
    tracing::debug!(
        eligible_sites,
        transformed_words = substitutions.len(),
        transformed_chars,
        "document rewritten"
    );

    Ok(TransformationResult {
        path: path.to_path_buf(),
        original: text.to_string(),
        transformed,
        eligible_sites,
        transformed_words: substitutions.len(),
        transformed_chars,
        changed,
        substitutions,
    })
}

/// Per-sentence matching state.
struct SentenceScan<'s> {
    text: &'s str,
    path: &'s str,
    sentence: &'s Sentence,
    surfaces: &'s [&'s str],
    analyses: &'s [Analysis],
    protected: Vec<bool>,
}

impl SentenceScan<'_> {
    /// Collect edits for this sentence; returns the number of eligible sites.
    fn run(&self, ctx: &RewriteContext<'_>, edits: &mut Vec<Edit>) -> usize {
        let mut eligible = 0;
        let mut i = 0;
        let mut nominalized = false;

        if ctx.advanced
            && let Some(consumed) = self.opener(ctx, edits)
        {
            eligible += 1;
            i = consumed;
        }

        while i < self.surfaces.len() {
            if self.protected[i] {
                i += 1;
                continue;
            }
            let Some(found) = self.find_match(ctx.terminology, i) else {
                if ctx.advanced
                    && !nominalized
                    && let Some(accepted) = self.nominal(ctx, i, edits)
                {
                    eligible += 1;
                    nominalized = accepted;
                }
                i += 1;
                continue;
            };

            eligible += 1;
            let words = &self.sentence.words;
            let last = i + found.words - 1;
            if ctx.intensity.accepts(site_score(self.path, words[i].ordinal, &found.key)) {
                let head = head_index(i, last, found.entry.pos);
                let replacement = if found.by_lemma {
                    inflect(&found.entry.replacement, self.analyses[head].form, found.entry.pos)
                } else {
                    found.entry.replacement.clone()
                };
                edits.push(Edit {
                    span: words[i].span.start..words[last].span.end,
                    replacement: match_case(self.surfaces[i], &replacement),
                });
            }
            i = last + 1;
        }

        eligible
    }

    /// Try a sentence-initial opener.
    ///
    /// `Some` when the sentence has an eligible opener, holding the number
    /// of words the accepted rewrite covers (0 when it was declined, so the
    /// words stay open to terminology matches).
    fn opener(&self, ctx: &RewriteContext<'_>, edits: &mut Vec<Edit>) -> Option<usize> {
        let lowered: Vec<String> = self
            .surfaces
            .iter()
            .take(MAX_PHRASE_WORDS)
            .map(|s| s.to_lowercase())
            .collect();
        let is_question = self.text[self.sentence.span.clone()].trim_end().ends_with('?');
        let opener = match_opener(&lowered, is_question)?;
        let n = opener.words.len();
        if !self.usable(0, n) {
            return None;
        }
        if opener.is_command() {
            let verb = &self.analyses[0];
            if verb.pos != Some(PartOfSpeech::Verb) || verb.form != Form::Base {
                return None;
            }
        }

        let words = &self.sentence.words;
        if !ctx
            .intensity
            .accepts(site_score(self.path, words[0].ordinal, &opener.key()))
        {
            return Some(0);
        }
        edits.push(Edit {
            span: words[0].span.start..words[n - 1].span.end,
            replacement: match_case(self.surfaces[0], &opener.render(&lowered[..n])),
        });
        Some(n)
    }

    /// Try nominalizing the verb at word `i`.
    ///
    /// `Some` when the word is an eligible site, holding whether the rewrite
    /// was accepted. The verb must be a base form with words on both sides.
    fn nominal(
        &self,
        ctx: &RewriteContext<'_>,
        i: usize,
        edits: &mut Vec<Edit>,
    ) -> Option<bool> {
        if i == 0 || i + 1 >= self.surfaces.len() {
            return None;
        }
        let analysis = &self.analyses[i];
        if analysis.pos != Some(PartOfSpeech::Verb) || analysis.form != Form::Base {
            return None;
        }
        let phrase = nominalize(&analysis.lemma)?;

        let word = &self.sentence.words[i];
        let accepted = ctx
            .intensity
            .accepts(site_score(self.path, word.ordinal, &nominal_key(&analysis.lemma)));
        if accepted {
            edits.push(Edit {
                span: word.span.clone(),
                replacement: match_case(self.surfaces[i], &phrase),
            });
        }
        Some(accepted)
    }

    /// Longest terminology match starting at word `i` whose part of speech
    /// agrees with the tagger.
    fn find_match<'m>(&self, terminology: &'m TerminologyMap, i: usize) -> Option<Match<'m>> {
        let remaining = self.surfaces.len() - i;
        for n in (1..=MAX_PHRASE_WORDS.min(remaining)).rev() {
            if !self.usable(i, n) {
                continue;
            }
            let lemma_key = self.analyses[i..i + n]
                .iter()
                .map(|a| a.lemma.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let surface_key = self.surfaces[i..i + n]
                .iter()
                .map(|s| s.to_lowercase())
                .collect::<Vec<_>>()
                .join(" ");

            let candidates = [(lemma_key, true), (surface_key, false)];
            for (key, by_lemma) in candidates {
                let Some(entry) = terminology.get(&key) else {
                    continue;
                };
                let head = head_index(i, i + n - 1, entry.pos);
                if entry.pos.is_none_or(|pos| self.analyses[head].pos == Some(pos)) {
                    return Some(Match {
                        words: n,
                        key,
                        entry,
                        by_lemma,
                    });
                }
            }
        }
        None
    }

    /// Words `i..i + n` are unprotected and separated only by whitespace.
    fn usable(&self, i: usize, n: usize) -> bool {
        if self.protected[i..i + n].iter().any(|p| *p) {
            return false;
        }
        let words = &self.sentence.words[i..i + n];
        words
            .windows(2)
            .all(|pair| self.text[pair[0].span.end..pair[1].span.start].chars().all(char::is_whitespace))
    }
}

/// The word that carries inflection: last for nouns, first otherwise.
fn head_index(first: usize, last: usize, pos: Option<PartOfSpeech>) -> usize {
    if pos == Some(PartOfSpeech::Noun) { last } else { first }
}

fn overlaps(ranges: &[Range<usize>], span: &Range<usize>) -> bool {
    let idx = ranges.partition_point(|r| r.end <= span.start);
    ranges.get(idx).is_some_and(|r| r.start < span.end)
}

fn char_count(s: &str) -> i64 {
    i64::try_from(s.chars().count()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::RuleTagger;
    use crate::terminology::TermEntry;

    fn terms(entries: &[(&str, &str, Option<PartOfSpeech>)]) -> TerminologyMap {
        let mut map = TerminologyMap::new();
        for (key, replacement, pos) in entries {
            map.insert(key, TermEntry::new(*replacement, *pos));
        }
        map
    }

    fn run(path: &str, text: &str, map: &TerminologyMap, intensity: f64) -> TransformationResult {
        run_with(path, text, map, intensity, false)
    }

    fn run_with(
        path: &str,
        text: &str,
        map: &TerminologyMap,
        intensity: f64,
        advanced: bool,
    ) -> TransformationResult {
        let ctx = RewriteContext {
            terminology: map,
            intensity: Intensity::new(intensity).unwrap(),
            tagger: &RuleTagger,
            advanced,
        };
        rewrite(&Document::new(path, text), &ctx).unwrap()
    }

    #[test]
    fn cool_idea_becomes_favorable() {
        let map = terms(&[("cool", "favorable", Some(PartOfSpeech::Adj))]);
        let result = run("a.txt", "This is a cool idea.", &map, 1.0);
        assert_eq!(result.transformed, "This is a favorable idea.");
        assert_eq!(result.transformed_words, 1);
        assert_eq!(result.transformed_chars, 5);
        assert!(result.changed);
        assert_eq!(result.substitutions[0].span, 10..14);
    }

    #[test]
    fn zero_intensity_changes_nothing() {
        let map = TerminologyMap::defaults();
        let text = "We use the code to fix a bug. The first step is important.";
        let result = run("a.md", text, &map, 0.0);
        assert_eq!(result.transformed, text);
        assert_eq!(result.transformed_words, 0);
        assert!(result.eligible_sites > 0);
        assert!(!result.changed);
    }

    #[test]
    fn full_intensity_rewrites_every_eligible_site_deterministically() {
        let map = TerminologyMap::defaults();
        let text = "We use the code to fix a bug.\n\nThe first step is important.\n";
        let first = run("a.md", text, &map, 1.0);
        let second = run("a.md", text, &map, 1.0);
        assert_eq!(first.transformed_words, first.eligible_sites);
        assert_eq!(first.transformed, second.transformed);
        assert_eq!(
            first.transformed,
            "We leverage the codebase to resolve anomalous patterns in a implementation defect.\n\n\
             The initial sequential component is critical.\n"
        );
    }

    #[test]
    fn partial_intensity_is_bounded_by_eligible_sites() {
        let map = TerminologyMap::defaults();
        let text = "Use the tool. Check the file. Fix the bug. Find the problem. Update the list.";
        for intensity in [0.25, 0.5, 0.75] {
            let result = run("notes.txt", text, &map, intensity);
            assert!(result.transformed_words <= result.eligible_sites);
        }
    }

    #[test]
    fn pos_constraint_filters_sites() {
        let map = terms(&[("use", "leverage", Some(PartOfSpeech::Verb))]);
        let result = run("a.txt", "The use of tools is common.", &map, 1.0);
        assert_eq!(result.eligible_sites, 0);
        assert_eq!(result.transformed, "The use of tools is common.");
    }

    #[test]
    fn adjective_entries_skip_inflected_homographs() {
        let map = TerminologyMap::defaults();
        for text in ["The fan cools the room.", "The goods arrived today."] {
            let result = run("a.txt", text, &map, 1.0);
            assert_eq!(result.transformed, text);
            assert_eq!(result.eligible_sites, 0);
        }
        let result = run("a.txt", "The firsts were good.", &map, 1.0);
        assert_eq!(result.transformed, "The firsts were optimal.");
    }

    #[test]
    fn identity_replacements_are_not_counted() {
        let map = terms(&[("cool", "cool", None), ("idea", "concept", None)]);
        let result = run("a.txt", "Cool, a cool idea.", &map, 1.0);
        assert_eq!(result.transformed, "Cool, a cool concept.");
        assert_eq!(result.eligible_sites, 3);
        assert_eq!(result.transformed_words, 1);
        assert_eq!(result.substitutions.len(), 1);

        let noop = run("a.txt", "A cool day.", &map, 1.0);
        assert_eq!(noop.transformed_words, 0);
        assert!(!noop.changed);
    }

    #[test]
    fn unconstrained_entries_match_any_tag() {
        let map = terms(&[("use", "application", None)]);
        let result = run("a.txt", "The use of tools.", &map, 1.0);
        assert_eq!(result.transformed, "The application of tools.");
    }

    #[test]
    fn replacements_are_reinflected_and_recased() {
        let map = TerminologyMap::defaults();
        let result = run("a.txt", "The team uses tools. Bugs happen.", &map, 1.0);
        assert_eq!(
            result.transformed,
            "The collaborative unit leverages instrumentation artifacts. \
             Implementation defects happen."
        );
    }

    #[test]
    fn phrases_match_on_lemmas_longest_first() {
        let map = TerminologyMap::defaults();
        let result = run("a.txt", "We are looking for the next steps.", &map, 1.0);
        assert_eq!(
            result.transformed,
            "We are identifying instances of the subsequent procedural elements."
        );
    }

    #[test]
    fn surface_match_is_not_reinflected() {
        let map = terms(&[("files", "corpora", Some(PartOfSpeech::Noun))]);
        let result = run("a.txt", "Open the files now.", &map, 1.0);
        assert_eq!(result.transformed, "Open the corpora now.");
    }

    #[test]
    fn upper_case_is_preserved() {
        let map = terms(&[("bug", "defect", None)]);
        let result = run("a.txt", "BUG found.", &map, 1.0);
        assert_eq!(result.transformed, "DEFECT found.");
    }

    #[test]
    fn markdown_code_and_links_are_protected() {
        let map = terms(&[("code", "codebase", None), ("docs", "documentation", None)]);
        let text = "Read the code.\n\n```\ncode here\n```\n\nSee `code` and [docs](https://x.io/code).\n";
        let result = run("README.md", text, &map, 1.0);
        assert_eq!(
            result.transformed,
            "Read the codebase.\n\n```\ncode here\n```\n\nSee `code` and [documentation](https://x.io/code).\n"
        );
    }

    #[test]
    fn urls_are_protected_in_plain_text() {
        let map = terms(&[("example", "instance", None)]);
        let result = run("a.txt", "An example: https://example.com/example", &map, 1.0);
        assert_eq!(result.transformed, "An instance: https://example.com/example");
    }

    #[test]
    fn whitespace_and_line_endings_are_preserved() {
        let map = terms(&[("good", "optimal", None)]);
        let text = "  good\r\n\tgood  \r\n";
        let result = run("a.txt", text, &map, 1.0);
        assert_eq!(result.transformed, "  optimal\r\n\toptimal  \r\n");
    }

    #[test]
    fn negative_char_delta_is_signed() {
        let map = terms(&[("information", "info", None)]);
        let result = run("a.txt", "More information.", &map, 1.0);
        assert_eq!(result.transformed_chars, -7);
    }

    #[test]
    fn openers_require_advanced_mode() {
        let map = TerminologyMap::new();
        let text = "I think this works. Can you check it?";
        let plain = run_with("a.txt", text, &map, 1.0, false);
        assert_eq!(plain.transformed, text);

        let advanced = run_with("a.txt", text, &map, 1.0, true);
        assert_eq!(
            advanced.transformed,
            "Analysis indicates this works. Is it feasible to check it?"
        );
        assert_eq!(advanced.eligible_sites, 2);
    }

    #[test]
    fn command_openers_prefix_imperative_verbs() {
        let map = TerminologyMap::new();
        let text = "Check the file. Fix is simple. Look at the code.";
        let result = run_with("a.txt", text, &map, 1.0, true);
        assert_eq!(
            result.transformed,
            "Systematically check the file. Fix is simple. Systematically look at the code."
        );
        assert_eq!(result.eligible_sites, 2);

        let defaults = TerminologyMap::defaults();
        let result = run_with("a.txt", "Use the tool.", &defaults, 1.0, true);
        assert_eq!(
            result.transformed,
            "Implement methodology to use the instrumentation artifact."
        );
        let plain = run_with("a.txt", "Use the tool.", &defaults, 1.0, false);
        assert_eq!(plain.transformed, "Leverage the instrumentation artifact.");
    }

    #[test]
    fn nominalization_rewrites_one_verb_per_sentence() {
        let map = TerminologyMap::new();
        let text = "We implement the parser and refactor the tests.";
        let result = run_with("a.txt", text, &map, 1.0, true);
        assert_eq!(
            result.transformed,
            "We the implementation of the parser and refactor the tests."
        );
        assert_eq!(result.eligible_sites, 1);

        assert_eq!(run_with("a.txt", text, &map, 1.0, false).transformed, text);
    }

    #[test]
    fn nominalization_needs_a_base_form_inside_the_sentence() {
        let map = TerminologyMap::new();
        for text in ["They implemented the parser.", "Teams often implement."] {
            let result = run_with("a.txt", text, &map, 1.0, true);
            assert_eq!(result.transformed, text);
        }
    }

    #[test]
    fn invalid_utf8_is_processing_error() {
        let map = TerminologyMap::new();
        let ctx = RewriteContext {
            terminology: &map,
            intensity: Intensity::FULL,
            tagger: &RuleTagger,
            advanced: false,
        };
        let err = rewrite(&Document::new("bin.txt", vec![0xff, 0xfe, 0x00]), &ctx).unwrap_err();
        assert!(matches!(err, PipelineError::Processing { .. }));

        let err = rewrite(&Document::new("nul.txt", b"text\0more".to_vec()), &ctx).unwrap_err();
        assert!(err.to_string().contains("NUL"));
    }

    #[test]
    fn score_is_stable_and_in_range() {
        let a = site_score("docs/a.md", 3, "use");
        assert_eq!(a, site_score("docs/a.md", 3, "use"));
        assert!((0.0..1.0).contains(&a));
        assert_ne!(a, site_score("docs/a.md", 4, "use"));
    }

    #[test]
    fn empty_document() {
        let result = run("a.txt", "", &TerminologyMap::defaults(), 1.0);
        assert_eq!(result.transformed, "");
        assert_eq!(result.eligible_sites, 0);
    }
}
