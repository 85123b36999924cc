//! Structured category paths.
//!
//! A category is identified externally by its ancestors' short names joined with `|`
//! (`"complaint|service_complaint"`). Internally the path is kept as the sequence of
//! short names and the joined string is derived from it.

use std::fmt;

use crate::constants::PATH_SEPARATOR;

/// Sequence of short names from the root category down to this one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryPath {
    segments: Vec<String>,
}

impl CategoryPath {
    /// Path of a root category.
    pub fn root(name: &str) -> Self {
        CategoryPath { segments: vec![name.to_string()] }
    }

    /// Path of a direct child of `self`.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(name.to_string());
        CategoryPath { segments }
    }

    /// Split a joined path. Empty input yields `None`.
    pub fn parse(joined: &str) -> Option<Self> {
        if joined.is_empty() {
            return None;
        }
        Some(CategoryPath {
            segments: joined.split(PATH_SEPARATOR).map(str::to_string).collect(),
        })
    }

    /// Joined lookup form, e.g. `"parent|child"`.
    pub fn joined(&self) -> String {
        let mut buf = [0u8; 4];
        self.segments.join(PATH_SEPARATOR.encode_utf8(&mut buf))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment.
    pub fn short_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.len() <= 1
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(CategoryPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// True when a joined path names a root category (contains no separator).
#[inline]
pub fn is_root_path(joined: &str) -> bool {
    !joined.contains(PATH_SEPARATOR)
}
