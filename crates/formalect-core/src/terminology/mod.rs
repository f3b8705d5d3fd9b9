//! Terminology resolution.
//!
//! A [`TerminologyMap`] maps normalized keys (one word or a phrase of up to
//! [`MAX_PHRASE_WORDS`] words) to replacements. [`TerminologyResolver`]
//! builds the map for one run: the built-in defaults, overlaid with a
//! caller-supplied JSON document when the caller's tier allows it.
//!
//! Custom documents look like:
//!
//! ```json
//! {
//!   "cool": { "replacement": "favorable", "pos": "ADJ" },
//!   "look into": "investigate"
//! }
//! ```

mod defaults;

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::fs;
use std::io::ErrorKind;

use camino::Utf8Path;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::nlp::PartOfSpeech;
use crate::report::Notice;
use crate::settings::{Settings, TerminologyPolicy, TierLevel};

pub use defaults::DEFAULT_TERMS;

/// Longest phrase a key may contain, in words.
pub const MAX_PHRASE_WORDS: usize = 4;

/// A replacement and its optional part-of-speech constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    /// Text substituted for a matching site.
    pub replacement: String,
    /// Only sites tagged with this part of speech match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<PartOfSpeech>,
}

impl TermEntry {
    /// Create an entry.
    pub fn new(replacement: impl Into<String>, pos: Option<PartOfSpeech>) -> Self {
        Self {
            replacement: replacement.into(),
            pos,
        }
    }
}

/// Lowercase a key and collapse its whitespace to single spaces.
pub fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered mapping from normalized key to [`TermEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TerminologyMap {
    entries: BTreeMap<String, TermEntry>,
}

impl TerminologyMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in default terminology.
    pub fn defaults() -> Self {
        let mut map = Self::new();
        for (key, replacement, pos) in DEFAULT_TERMS {
            map.insert(key, TermEntry::new(*replacement, *pos));
        }
        map
    }

    /// Insert an entry under the normalized form of `key`, replacing any
    /// existing entry.
    pub fn insert(&mut self, key: &str, entry: TermEntry) -> Option<TermEntry> {
        self.entries.insert(normalize_key(key), entry)
    }

    /// Look up an already-normalized key.
    pub fn get(&self, key: &str) -> Option<&TermEntry> {
        self.entries.get(key)
    }

    /// Overlay `other` onto `self`; entries from `other` win.
    pub fn overlay(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, TermEntry> {
        self.entries.iter()
    }

    /// Parse a custom terminology document.
    ///
    /// Fails with [`PipelineError::Format`] on malformed JSON, an empty key
    /// or replacement, an over-long phrase, an unknown tag, or two keys that
    /// normalize to the same value.
    pub fn from_json(path: &Utf8Path, json: &str) -> PipelineResult<Self> {
        let format_error = |message: String| PipelineError::Format {
            path: path.to_path_buf(),
            message,
        };

        let document: RawDocument =
            serde_json::from_str(json).map_err(|e| format_error(e.to_string()))?;

        let mut map = Self::new();
        for (raw_key, raw_entry) in document.0 {
            let key = normalize_key(&raw_key);
            if key.is_empty() {
                return Err(format_error("empty term key".to_string()));
            }
            if key.split(' ').count() > MAX_PHRASE_WORDS {
                return Err(format_error(format!(
                    "term `{key}` has more than {MAX_PHRASE_WORDS} words"
                )));
            }

            let (replacement, pos) = match raw_entry {
                RawEntry::Short(replacement) => (replacement, None),
                RawEntry::Full { replacement, pos } => (replacement, pos),
            };
            let replacement = replacement.trim().to_string();
            if replacement.is_empty() {
                return Err(format_error(format!("term `{key}` has an empty replacement")));
            }
            let pos = pos
                .as_deref()
                .map(str::parse::<PartOfSpeech>)
                .transpose()
                .map_err(|e| format_error(format!("term `{key}`: {e}")))?;

            if map.entries.contains_key(&key) {
                return Err(format_error(format!("duplicate term `{key}`")));
            }
            map.entries.insert(key, TermEntry::new(replacement, pos));
        }
        Ok(map)
    }
}

impl<'a> IntoIterator for &'a TerminologyMap {
    type Item = (&'a String, &'a TermEntry);
    type IntoIter = btree_map::Iter<'a, String, TermEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A custom document's entries in file order, duplicates included.
struct RawDocument(Vec<(String, RawEntry)>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Short(String),
    Full {
        replacement: String,
        #[serde(default)]
        pos: Option<String>,
    },
}

impl<'de> Deserialize<'de> for RawDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = RawDocument;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping terms to replacements")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, RawEntry>()? {
                    entries.push((key, value));
                }
                Ok(RawDocument(entries))
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

/// The resolved map and any notices raised while building it.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Terminology for the run.
    pub map: TerminologyMap,
    /// Tier-gate or degradation notices.
    pub notices: Vec<Notice>,
}

/// Builds the terminology map for a run.
#[derive(Debug, Clone, Copy)]
pub struct TerminologyResolver {
    min_tier: TierLevel,
    policy: TerminologyPolicy,
}

impl TerminologyResolver {
    /// Resolver with an explicit tier threshold and malformed-document policy.
    pub const fn new(min_tier: TierLevel, policy: TerminologyPolicy) -> Self {
        Self { min_tier, policy }
    }

    /// Resolver configured from run settings.
    pub const fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.custom_terminology_min_tier, settings.terminology_policy)
    }

    /// Resolve the terminology map for `tier`.
    ///
    /// - no custom path: the defaults
    /// - tier below the threshold: the defaults plus a tier-gate notice; the
    ///   custom file is not read
    /// - missing custom file: [`PipelineError::NotFound`]
    /// - malformed custom file: [`PipelineError::Format`], or the defaults
    ///   plus a degradation notice under [`TerminologyPolicy::Degrade`]
    #[tracing::instrument(skip(self), fields(min_tier = %self.min_tier))]
    pub fn resolve(
        &self,
        custom_path: Option<&Utf8Path>,
        tier: TierLevel,
    ) -> PipelineResult<Resolution> {
        let mut map = TerminologyMap::defaults();
        let mut notices = Vec::new();

        let Some(path) = custom_path else {
            return Ok(Resolution { map, notices });
        };

        if !tier.permits(self.min_tier) {
            tracing::warn!(%path, "custom terminology ignored for this tier");
            notices.push(Notice::tier_gate(format!(
                "Custom terminology `{path}` was ignored: it requires the {} tier or above \
                 (current tier: {tier}).",
                self.min_tier
            )));
            return Ok(Resolution { map, notices });
        }

        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PipelineError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(PipelineError::Format {
                    path: path.to_path_buf(),
                    message: format!("cannot read: {e}"),
                });
            }
        };

        match TerminologyMap::from_json(path, &json) {
            Ok(custom) => {
                tracing::debug!(entries = custom.len(), "custom terminology loaded");
                map.overlay(custom);
            }
            Err(e) if self.policy == TerminologyPolicy::Degrade => {
                tracing::warn!(error = %e, "falling back to default terminology");
                notices.push(Notice::terminology_degraded(format!(
                    "Custom terminology could not be used; defaults applied instead ({e})."
                )));
            }
            Err(e) => return Err(e),
        }

        Ok(Resolution { map, notices })
    }
}
