//! Documents and per-document transformation results.

use std::fs;
use std::io::Read;
use std::ops::Range;

use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};

/// A file's path (relative to the run root) and raw contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: Utf8PathBuf,
    bytes: Vec<u8>,
}

impl Document {
    /// Wrap already-loaded bytes.
    pub fn new(path: impl Into<Utf8PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
        }
    }

    /// Read `relative` under `root`, refusing files larger than `max_bytes`.
    ///
    /// Failures are [`PipelineError::Processing`] so the caller can record
    /// them against the file and move on.
    pub fn read(root: &Utf8Path, relative: &Utf8Path, max_bytes: Option<usize>) -> PipelineResult<Self> {
        let full = root.join(relative);
        let processing = |reason: String| PipelineError::Processing {
            path: relative.to_path_buf(),
            reason,
        };

        let file = fs::File::open(&full).map_err(|e| processing(format!("cannot open: {e}")))?;
        let mut bytes = Vec::new();
        match max_bytes {
            Some(max) => {
                let limit = u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1);
                file.take(limit)
                    .read_to_end(&mut bytes)
                    .map_err(|e| processing(format!("cannot read: {e}")))?;
                if bytes.len() > max {
                    return Err(processing(format!(
                        "file exceeds the {max}-byte input limit"
                    )));
                }
            }
            None => {
                let mut file = file;
                file.read_to_end(&mut bytes)
                    .map_err(|e| processing(format!("cannot read: {e}")))?;
            }
        }

        Ok(Self::new(relative, bytes))
    }

    /// Path relative to the run root.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Raw contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// One applied replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Substitution {
    /// Byte span in the original text.
    pub span: Range<usize>,
    /// Original surface text of the span.
    pub original: String,
    /// Text written in its place.
    pub replacement: String,
}

/// Outcome of rewriting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct TransformationResult {
    /// Path relative to the run root.
    #[schemars(with = "String")]
    pub path: Utf8PathBuf,
    /// Text before rewriting.
    #[serde(skip)]
    pub original: String,
    /// Text after rewriting.
    #[serde(skip)]
    pub transformed: String,
    /// Sites eligible for a rewrite.
    pub eligible_sites: usize,
    /// Sites actually rewritten.
    pub transformed_words: usize,
    /// Net change in character count.
    pub transformed_chars: i64,
    /// Whether the text differs from the original.
    pub changed: bool,
    /// Applied replacements in document order.
    pub substitutions: Vec<Substitution>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn read_loads_relative_path() {
        let tmp = TempDir::new().unwrap();
        let root = root(&tmp);
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/a.md"), "hello").unwrap();

        let doc = Document::read(&root, Utf8Path::new("docs/a.md"), Some(10)).unwrap();
        assert_eq!(doc.path(), "docs/a.md");
        assert_eq!(doc.bytes(), b"hello");
    }

    #[test]
    fn oversize_file_is_processing_error() {
        let tmp = TempDir::new().unwrap();
        let root = root(&tmp);
        fs::write(root.join("big.txt"), "0123456789").unwrap();

        let err = Document::read(&root, Utf8Path::new("big.txt"), Some(5)).unwrap_err();
        match err {
            PipelineError::Processing { path, reason } => {
                assert_eq!(path, "big.txt");
                assert!(reason.contains("5-byte"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(Document::read(&root, Utf8Path::new("big.txt"), None).is_ok());
        assert!(Document::read(&root, Utf8Path::new("big.txt"), Some(10)).is_ok());
    }

    #[test]
    fn missing_file_is_processing_error() {
        let tmp = TempDir::new().unwrap();
        let err = Document::read(&root(&tmp), Utf8Path::new("gone.md"), None).unwrap_err();
        assert!(matches!(err, PipelineError::Processing { .. }));
    }
}
