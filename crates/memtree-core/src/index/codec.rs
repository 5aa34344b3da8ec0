//! Text codec for category index files.
//!
//! Decoding is two-stage so callers can distinguish unparseable text from
//! schema violations: the raw YAML parse failing yields [`Error::IndexParse`],
//! while structurally valid YAML that fails validation (unknown shape, bad
//! path strings, missing fields) yields [`Error::IndexValidation`].

use std::path::Path;

use crate::error::{Error, Result};
use crate::index::types::CategoryIndex;

/// File name of the per-category sidecar index.
pub const INDEX_FILE_NAME: &str = "index.yaml";

/// Decode an index file's text. `path` is used for error context only.
pub fn decode(text: &str, path: &Path) -> Result<CategoryIndex> {
    // Stage 1: is it YAML at all?
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| Error::IndexParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // Stage 2: does it have the index schema? Path strings re-validate
    // through the path model here; counts are unsigned by construction.
    let index: CategoryIndex =
        serde_yaml::from_value(value).map_err(|e| Error::IndexValidation {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(index)
}

/// Encode an index to its on-disk text.
pub fn encode(index: &CategoryIndex, path: &Path) -> Result<String> {
    serde_yaml::to_string(index).map_err(|e| Error::Serialize {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
