//! Path value types for categories and memories.
//!
//! Every component downstream of this module accepts only parsed path values,
//! never raw strings, so malformed input is rejected at the boundary:
//!
//! - [`CategoryPath`]: ordered sequence of slug segments; empty = store root
//! - [`MemoryPath`]: owning category plus the memory's own slug
//!
//! Slug grammar: non-empty, lowercase ASCII alphanumerics with internal single
//! hyphens. No leading, trailing, or doubled hyphens.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Validate a single path segment against the slug grammar.
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(Error::invalid_path(slug, "empty segment"));
    }

    for (i, c) in slug.chars().enumerate() {
        if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
            return Err(Error::invalid_path(
                slug,
                format!("invalid character '{}' at position {}", c, i),
            ));
        }
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(Error::invalid_path(
            slug,
            "segment cannot start or end with a hyphen",
        ));
    }

    if slug.contains("--") {
        return Err(Error::invalid_path(
            slug,
            "segment cannot contain consecutive hyphens",
        ));
    }

    Ok(())
}

/// Normalize arbitrary text into a slug.
///
/// Lowercases, collapses runs of non-alphanumeric characters into single
/// hyphens, and trims edge hyphens. Returns `None` when nothing survives.
/// Used by the reconciliation walk to map on-disk file names onto paths.
pub fn slugify(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if out.is_empty() { None } else { Some(out) }
}

/// A category in the hierarchical namespace tree.
///
/// An ordered, possibly-empty sequence of slug segments. The empty sequence is
/// the store root. Immutable; equality and ordering are by string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryPath {
    segments: Vec<String>,
}

impl CategoryPath {
    /// The root category (empty path).
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parse a `/`-joined category path. The empty string parses to root.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in s.split('/') {
            validate_slug(segment)
                .map_err(|_| Error::invalid_path(s, format!("bad segment '{}'", segment)))?;
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    /// Build a path from pre-validated segments.
    pub fn from_segments(segments: Vec<String>) -> Result<Self> {
        for segment in &segments {
            validate_slug(segment)?;
        }
        Ok(Self { segments })
    }

    /// Whether this is the store root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments (root is 0).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The path's segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Parent category: the path minus its last segment. Root's parent is root.
    pub fn parent(&self) -> CategoryPath {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    /// Append one validated slug segment.
    pub fn join(&self, slug: &str) -> Result<CategoryPath> {
        validate_slug(slug)?;
        let mut segments = self.segments.clone();
        segments.push(slug.to_string());
        Ok(Self { segments })
    }

    /// Prefix of this path with the given depth. Panics if deeper than self.
    pub fn truncate(&self, depth: usize) -> CategoryPath {
        assert!(depth <= self.depth(), "truncate beyond path depth");
        Self {
            segments: self.segments[..depth].to_vec(),
        }
    }

    /// Iterate the non-root prefixes of this path, shallowest first.
    ///
    /// For `a/b/c` yields `a`, `a/b`, `a/b/c`. Root yields nothing.
    pub fn ancestors(&self) -> impl Iterator<Item = CategoryPath> + '_ {
        (1..=self.depth()).map(|depth| self.truncate(depth))
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl Serialize for CategoryPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CategoryPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CategoryPath::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A memory's identity: its owning category plus a terminal slug.
///
/// String form is `category/slug`, or just `slug` for root-category memories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoryPath {
    category: CategoryPath,
    slug: String,
}

impl MemoryPath {
    /// Build from a category and a validated slug.
    pub fn new(category: CategoryPath, slug: &str) -> Result<Self> {
        validate_slug(slug)?;
        Ok(Self {
            category,
            slug: slug.to_string(),
        })
    }

    /// Parse a full memory path. The last segment is the memory slug; the
    /// rest is the owning category.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::invalid_path(s, "memory path cannot be empty"));
        }

        let (category_str, slug) = match s.rsplit_once('/') {
            Some((cat, slug)) => (cat, slug),
            None => ("", s),
        };

        let category = CategoryPath::parse(category_str)
            .map_err(|_| Error::invalid_path(s, "bad category segment"))?;
        validate_slug(slug).map_err(|_| Error::invalid_path(s, format!("bad slug '{}'", slug)))?;

        Ok(Self {
            category,
            slug: slug.to_string(),
        })
    }

    /// The owning category.
    pub fn category(&self) -> &CategoryPath {
        &self.category
    }

    /// The memory's own identifier.
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl fmt::Display for MemoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.category.is_root() {
            write!(f, "{}", self.slug)
        } else {
            write!(f, "{}/{}", self.category, self.slug)
        }
    }
}

impl Serialize for MemoryPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MemoryPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        MemoryPath::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("notes").is_ok());
        assert!(validate_slug("rust-2024").is_ok());
        assert!(validate_slug("a").is_ok());

        assert!(validate_slug("").is_err());
        assert!(validate_slug("Notes").is_err());
        assert!(validate_slug("has_underscore").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("trailing-").is_err());
        assert!(validate_slug("double--hyphen").is_err());
        assert!(validate_slug("spa ce").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), Some("hello-world".into()));
        assert_eq!(slugify("rust_2024.notes"), Some("rust-2024-notes".into()));
        assert_eq!(slugify("--already--"), Some("already".into()));
        assert_eq!(slugify("___"), None);
        assert_eq!(slugify(""), None);
    }

    #[test]
    fn test_category_path_roundtrip() {
        for s in ["", "alpha", "alpha/beta", "a/b/c-d"] {
            let path = CategoryPath::parse(s).unwrap();
            assert_eq!(path.to_string(), s);
        }
    }

    #[test]
    fn test_category_path_rejects_bad_segments() {
        assert!(CategoryPath::parse("/leading").is_err());
        assert!(CategoryPath::parse("trailing/").is_err());
        assert!(CategoryPath::parse("a//b").is_err());
        assert!(CategoryPath::parse("a/B").is_err());
    }

    #[test]
    fn test_parent_and_depth() {
        let path = CategoryPath::parse("a/b/c").unwrap();
        assert_eq!(path.depth(), 3);
        assert_eq!(path.parent().to_string(), "a/b");
        assert_eq!(path.parent().parent().to_string(), "a");
        assert!(path.parent().parent().parent().is_root());
        // Root's parent is root
        assert!(CategoryPath::root().parent().is_root());
    }

    #[test]
    fn test_ancestors() {
        let path = CategoryPath::parse("a/b/c").unwrap();
        let chain: Vec<String> = path.ancestors().map(|p| p.to_string()).collect();
        assert_eq!(chain, vec!["a", "a/b", "a/b/c"]);
        assert_eq!(CategoryPath::root().ancestors().count(), 0);
    }

    #[test]
    fn test_memory_path_parse() {
        let root_memory = MemoryPath::parse("standalone").unwrap();
        assert!(root_memory.category().is_root());
        assert_eq!(root_memory.slug(), "standalone");
        assert_eq!(root_memory.to_string(), "standalone");

        let nested = MemoryPath::parse("alpha/beta/note-1").unwrap();
        assert_eq!(nested.category().to_string(), "alpha/beta");
        assert_eq!(nested.slug(), "note-1");
        assert_eq!(nested.to_string(), "alpha/beta/note-1");
    }

    #[test]
    fn test_memory_path_rejects_malformed() {
        assert!(MemoryPath::parse("").is_err());
        assert!(MemoryPath::parse("alpha/").is_err());
        assert!(MemoryPath::parse("/slug").is_err());
        assert!(MemoryPath::parse("alpha/Bad").is_err());
    }

    #[test]
    fn test_ordering_is_by_string_form() {
        let mut paths = vec![
            CategoryPath::parse("b").unwrap(),
            CategoryPath::parse("a/z").unwrap(),
            CategoryPath::parse("a").unwrap(),
        ];
        paths.sort();
        let strings: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        assert_eq!(strings, vec!["a", "a/z", "b"]);
    }
}
