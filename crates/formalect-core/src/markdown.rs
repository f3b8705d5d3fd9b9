//! Markdown regions that must never be rewritten.
//!
//! Uses pulldown-cmark's offset iterator so protected regions come back as
//! byte ranges into the original text. Prose inside headings, lists, quotes,
//! emphasis and link text stays rewritable.

use std::ops::Range;

use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TagEnd};

use crate::nlp::segment::merge_ranges;

/// Byte ranges of code, HTML, images, link destinations and front matter.
///
/// The result is sorted and non-overlapping.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn protected_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();

    let body_start = frontmatter_len(text);
    if body_start > 0 {
        ranges.push(0..body_start);
    }
    let body = &text[body_start..];

    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(body, options).into_offset_iter();

    // (link range, end of the last text seen inside it)
    let mut open_links: Vec<(Range<usize>, usize)> = Vec::new();

    for (event, range) in parser {
        let range = range.start + body_start..range.end + body_start;
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::Image { .. } | Tag::HtmlBlock) => {
                ranges.push(range);
            }
            Event::Code(_) | Event::Html(_) | Event::InlineHtml(_) => ranges.push(range),
            Event::Start(Tag::Link { link_type, .. }) => {
                if matches!(link_type, LinkType::Autolink | LinkType::Email) {
                    ranges.push(range.clone());
                }
                let text_start = range.start;
                open_links.push((range, text_start));
            }
            Event::Text(_) | Event::SoftBreak | Event::HardBreak => {
                if let Some((_, last_text_end)) = open_links.last_mut() {
                    *last_text_end = (*last_text_end).max(range.end);
                }
            }
            Event::End(TagEnd::Link) => {
                if let Some((link, last_text_end)) = open_links.pop() {
                    // `](destination "title")` or `][ref]`
                    if last_text_end < link.end {
                        ranges.push(last_text_end..link.end);
                    }
                    if let Some((_, outer_end)) = open_links.last_mut() {
                        *outer_end = (*outer_end).max(link.end);
                    }
                }
            }
            _ => {}
        }
    }

    merge_ranges(&mut ranges);
    ranges
}

/// Byte length of a leading YAML front matter block, including the closing
/// `---` line, or 0 when there is none.
fn frontmatter_len(text: &str) -> usize {
    let Some(after_opening) = text.strip_prefix("---") else {
        return 0;
    };
    let Some(first_newline) = after_opening.find('\n') else {
        return 0;
    };
    if !after_opening[..first_newline].trim().is_empty() {
        return 0;
    }

    // Find the closing `---`
    let Some(close_pos) = after_opening.find("\n---") else {
        return 0;
    };
    let closing_line_start = 3 + close_pos + 1;
    let rest = &text[closing_line_start..];
    let line_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
    closing_line_start + line_len
}

/// Returns `true` for paths rendered as Markdown.
pub fn is_markdown_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".md") || lower.ends_with(".markdown")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protected(text: &str) -> Vec<&str> {
        protected_ranges(text)
            .into_iter()
            .map(|r| &text[r])
            .collect()
    }

    #[test]
    fn fenced_code_is_protected() {
        let input = "Some text.\n\n```rust\nlet code = 1;\n```\n\nMore text.";
        let found = protected(input);
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("let code = 1;"));
        assert!(!found[0].contains("Some text"));
    }

    #[test]
    fn indented_code_is_protected() {
        let input = "Intro.\n\n    use the code\n\nOutro.";
        let found = protected(input);
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("use the code"));
    }

    #[test]
    fn inline_code_is_protected() {
        let found = protected("Use `fix()` to fix things.");
        assert_eq!(found, vec!["`fix()`"]);
    }

    #[test]
    fn frontmatter_is_protected() {
        let input = "---\ntitle: A good file\n---\n\nSome text.";
        let found = protected(input);
        assert_eq!(found, vec!["---\ntitle: A good file\n---\n"]);
    }

    #[test]
    fn thematic_break_is_not_frontmatter() {
        assert_eq!(frontmatter_len("--- not yaml\ntext\n---\n"), 0);
        assert_eq!(frontmatter_len("Just text"), 0);
    }

    #[test]
    fn link_destination_is_protected_but_text_is_not() {
        let input = "Check [the good docs](https://example.com/good \"good\") now.";
        let found = protected(input);
        assert_eq!(found, vec!["](https://example.com/good \"good\")"]);
    }

    #[test]
    fn autolinks_and_images_are_protected() {
        let input = "See <https://example.com> and ![a good image](img.png).";
        let found = protected(input);
        assert_eq!(found, vec!["<https://example.com>", "![a good image](img.png)"]);
    }

    #[test]
    fn html_is_protected() {
        let input = "Text with <span class=\"good\">inline</span> html.\n\n<div>\nblock\n</div>\n";
        let found = protected(input);
        assert!(found.iter().any(|s| s.contains("<span")));
        assert!(found.iter().any(|s| s.contains("<div>")));
    }

    #[test]
    fn plain_prose_has_no_protected_ranges() {
        assert!(protected_ranges("# Title\n\nJust a good sentence.\n").is_empty());
        assert!(protected_ranges("").is_empty());
    }

    #[test]
    fn markdown_paths() {
        assert!(is_markdown_path("docs/README.md"));
        assert!(is_markdown_path("notes.MARKDOWN"));
        assert!(!is_markdown_path("notes.txt"));
    }
}
