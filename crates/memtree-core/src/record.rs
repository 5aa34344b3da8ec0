//! Memory record files: YAML front matter plus a free-text body.
//!
//! On disk a memory looks like:
//!
//! ```text
//! ---
//! created_at: 2026-01-15T10:30:00Z
//! updated_at: 2026-01-15T10:30:00Z
//! tags: [rust, indexing]
//! source: session
//! ---
//! The body text of the memory.
//! ```
//!
//! The indexing engine treats record files as opaque blobs from which only
//! `updated_at` and a token estimate are needed; [`probe`] extracts those
//! leniently without failing on malformed metadata.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File extension for memory record files.
pub const RECORD_EXTENSION: &str = "md";

const FRONT_MATTER_FENCE: &str = "---";

/// Metadata block of a memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
    /// When the memory was first written.
    pub created_at: DateTime<Utc>,
    /// When the memory was last written.
    pub updated_at: DateTime<Utc>,
    /// Free-form tag set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Where the memory came from (e.g. "session", "import").
    pub source: String,
    /// Optional expiry; expired memories are still indexed until removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Optional citation list (URLs or memory paths).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
}

impl RecordMeta {
    /// Fresh metadata with both timestamps set to now.
    pub fn now(source: impl Into<String>) -> Self {
        let ts = Utc::now();
        Self {
            created_at: ts,
            updated_at: ts,
            tags: Vec::new(),
            source: source.into(),
            expires_at: None,
            citations: None,
        }
    }
}

/// A memory record: metadata plus body text.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRecord {
    pub meta: RecordMeta,
    pub body: String,
}

impl MemoryRecord {
    pub fn new(meta: RecordMeta, body: impl Into<String>) -> Self {
        Self {
            meta,
            body: body.into(),
        }
    }

    /// Serialize to the on-disk front-matter format.
    pub fn encode(&self) -> Result<String> {
        let meta = serde_yaml::to_string(&self.meta).map_err(|e| Error::Serialize {
            path: Path::new("<record>").to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(format!(
            "{}\n{}{}\n{}",
            FRONT_MATTER_FENCE, meta, FRONT_MATTER_FENCE, self.body
        ))
    }

    /// Parse a record from its on-disk text. Strict: malformed front matter
    /// is an error. `path` is used for error context only.
    pub fn decode(text: &str, path: &Path) -> Result<Self> {
        let (meta_text, body) = split_front_matter(text).ok_or_else(|| Error::Record {
            path: path.to_path_buf(),
            message: "missing front matter fences".into(),
        })?;

        let meta: RecordMeta = serde_yaml::from_str(meta_text).map_err(|e| Error::Record {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self {
            meta,
            body: body.to_string(),
        })
    }
}

/// Estimate the token count of a text: roughly one token per four characters,
/// rounded up. Deliberately cheap; indexes only need a stable approximation.
pub fn token_estimate(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

/// Lenient extraction of what indexing needs from raw record text: a token
/// estimate over the whole file and, if the front matter parses, `updated_at`.
pub fn probe(text: &str) -> (u64, Option<DateTime<Utc>>) {
    let estimate = token_estimate(text);

    let updated_at = split_front_matter(text)
        .and_then(|(meta_text, _)| serde_yaml::from_str::<RecordMeta>(meta_text).ok())
        .map(|meta| meta.updated_at);

    (estimate, updated_at)
}

/// Split `---` fenced front matter from the body. Returns (meta, body).
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix(FRONT_MATTER_FENCE)?;
    let rest = rest.strip_prefix('\n')?;

    // The closing fence must sit on its own line.
    let (meta, body) = if let Some(end) = rest.find("\n---\n") {
        (&rest[..end + 1], &rest[end + 5..])
    } else if let Some(stripped) = rest.strip_suffix("\n---") {
        (&rest[..stripped.len() + 1], "")
    } else {
        return None;
    };

    Some((meta, body))
}
