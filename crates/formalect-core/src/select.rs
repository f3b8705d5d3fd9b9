//! File selection.
//!
//! Resolves comma-separated include/exclude glob lists into the ordered set
//! of candidate documents under a root directory. Patterns are matched
//! against root-relative paths with `/` separators, and `*` may cross
//! directory boundaries (`*.md` matches `docs/guide.md`).

use std::collections::BTreeSet;

use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::error::{PipelineError, PipelineResult};

/// A compiled comma-separated glob list.
#[derive(Debug, Clone)]
pub struct PatternList {
    patterns: Vec<String>,
    set: GlobSet,
}

impl PatternList {
    /// Parse and compile a comma-separated list of globs.
    ///
    /// Blank items are ignored. A malformed pattern fails with
    /// [`PipelineError::Configuration`] naming the pattern.
    pub fn parse(list: &str) -> PipelineResult<Self> {
        let patterns: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                PipelineError::configuration(format!("invalid glob pattern `{pattern}`: {e}"))
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| {
            PipelineError::configuration(format!("failed to compile glob patterns: {e}"))
        })?;

        Ok(Self { patterns, set })
    }

    /// The individual patterns, in the order given.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns `true` if no patterns were given.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns `true` if the relative path matches any pattern.
    pub fn is_match(&self, relative: &str) -> bool {
        self.set.is_match(relative)
    }
}

/// Select files under `root` matching `include` and not `exclude`.
///
/// Returned paths are relative to `root`, deduplicated, and sorted by their
/// string form so runs over an unchanged tree process files in the same
/// order.
#[tracing::instrument(skip_all, fields(root = %root))]
pub fn select_files(
    root: &Utf8Path,
    include: &str,
    exclude: &str,
) -> PipelineResult<Vec<Utf8PathBuf>> {
    let include = PatternList::parse(include)?;
    let exclude = PatternList::parse(exclude)?;

    if !root.is_dir() {
        return Err(PipelineError::NotFound {
            path: root.to_path_buf(),
        });
    }

    if include.is_empty() {
        tracing::warn!("no include patterns given, nothing to select");
        return Ok(Vec::new());
    }

    let mut selected = BTreeSet::new();

    for entry in WalkDir::new(root.as_std_path()).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root.as_std_path()) else {
            continue;
        };
        let Some(relative) = Utf8Path::from_path(relative) else {
            tracing::warn!(path = %entry.path().display(), "skipping non-UTF-8 path");
            continue;
        };
        let key = normalize(relative);

        if include.is_match(&key) && !exclude.is_match(&key) {
            selected.insert(key);
        }
    }

    tracing::debug!(count = selected.len(), "files selected");
    Ok(selected.into_iter().map(Utf8PathBuf::from).collect())
}

/// Forward-slash form of a relative path.
fn normalize(relative: &Utf8Path) -> String {
    relative
        .components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree(files: &[&str]) -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "content").unwrap();
        }
        (tmp, root)
    }

    fn names(paths: &[Utf8PathBuf]) -> Vec<&str> {
        paths.iter().map(|p| p.as_str()).collect()
    }

    #[test]
    fn exclude_wins_over_include() {
        let (_tmp, root) = tree(&["README.md", "drafts/x.md", "docs/guide.md"]);
        let files = select_files(&root, "*.md", "drafts/**").unwrap();
        assert_eq!(names(&files), vec!["README.md", "docs/guide.md"]);
    }

    #[test]
    fn star_crosses_directories() {
        let (_tmp, root) = tree(&["a/b/c/deep.txt", "top.txt", "image.png"]);
        let files = select_files(&root, "*.txt", "").unwrap();
        assert_eq!(names(&files), vec!["a/b/c/deep.txt", "top.txt"]);
    }

    #[test]
    fn output_is_sorted_and_deduplicated() {
        let (_tmp, root) = tree(&["b.md", "a.md", "c/z.md", "c/a.md"]);
        // Both patterns match every file; each still appears once.
        let files = select_files(&root, "*.md, **/*.md", "").unwrap();
        assert_eq!(names(&files), vec!["a.md", "b.md", "c/a.md", "c/z.md"]);
    }

    #[test]
    fn default_excludes_skip_vendored_trees() {
        let (_tmp, root) = tree(&["node_modules/pkg/README.md", "vendor/x.md", "notes.md"]);
        let files =
            select_files(&root, crate::config::DEFAULT_FILE_PATTERNS, crate::config::DEFAULT_EXCLUDE_PATTERNS)
                .unwrap();
        assert_eq!(names(&files), vec!["notes.md"]);
    }

    #[test]
    fn malformed_pattern_is_configuration_error() {
        let (_tmp, root) = tree(&["a.md"]);
        let err = select_files(&root, "[unclosed", "").unwrap_err();
        match err {
            PipelineError::Configuration { message } => assert!(message.contains("[unclosed")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_exclude_is_configuration_error() {
        let (_tmp, root) = tree(&["a.md"]);
        let err = select_files(&root, "*.md", "docs/{a,b").unwrap_err();
        assert!(matches!(err, PipelineError::Configuration { .. }));
    }

    #[test]
    fn missing_root_is_not_found() {
        let err = select_files(Utf8Path::new("/definitely/not/here"), "*.md", "").unwrap_err();
        assert!(matches!(err, PipelineError::NotFound { .. }));
    }

    #[test]
    fn empty_include_selects_nothing() {
        let (_tmp, root) = tree(&["a.md"]);
        assert!(select_files(&root, " , ", "").unwrap().is_empty());
    }

    #[test]
    fn pattern_list_trims_items() {
        let list = PatternList::parse(" *.md ,, *.txt ").unwrap();
        assert_eq!(list.patterns(), ["*.md", "*.txt"]);
        assert!(list.is_match("x.txt"));
    }
}
