//! Dotted field paths into the nested form-state tree.
//!
//! A path such as `directComparisonCalculations.2.offeringPrice` addresses
//! one scalar leaf or one array element. Numeric segments are array
//! indices. Wildcards are never valid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Location of a single value in the form-state tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(String);

impl FieldPath {
    /// Parse and validate a dotted path.
    pub fn parse(raw: impl Into<String>) -> Result<Self, EngineError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(EngineError::InvalidPath {
                path: raw,
                reason: "path is empty".to_string(),
            });
        }
        for segment in raw.split('.') {
            if segment.is_empty() {
                return Err(EngineError::InvalidPath {
                    path: raw.clone(),
                    reason: "path contains an empty segment".to_string(),
                });
            }
            if segment.contains('*') {
                return Err(EngineError::InvalidPath {
                    path: raw.clone(),
                    reason: format!("wildcard segment '{}' is not addressable", segment),
                });
            }
        }
        Ok(FieldPath(raw))
    }

    /// Build a path from already-trusted segments.
    ///
    /// Registry functions use this: their segments are string literals
    /// and integer indices, which cannot produce an invalid path.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(".");
        FieldPath(joined)
    }

    /// Append one segment, returning a new path.
    pub fn child(&self, segment: impl fmt::Display) -> Self {
        FieldPath(format!("{}.{}", self.0, segment))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = PathSegment<'_>> {
        self.0.split('.').map(PathSegment::classify)
    }

    /// True when `self` equals `other` or lies underneath it.
    pub fn starts_with(&self, other: &FieldPath) -> bool {
        self.0 == other.0
            || (self.0.starts_with(&other.0) && self.0.as_bytes().get(other.0.len()) == Some(&b'.'))
    }

    /// The path after element `removed` of `array` is deleted: indices
    /// above it move down by one. Paths outside `array`, or under an
    /// element below `removed`, come back unchanged.
    pub fn shifted_after_removal(&self, array: &FieldPath, removed: usize) -> FieldPath {
        if self.0.len() <= array.0.len() || !self.starts_with(array) {
            return self.clone();
        }
        let rest = &self.0[array.0.len() + 1..];
        let (head, tail) = match rest.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (rest, None),
        };
        match PathSegment::classify(head) {
            PathSegment::Index(i) if i > removed => {
                let moved = array.child(i - 1);
                match tail {
                    Some(tail) => moved.child(tail),
                    None => moved,
                }
            }
            _ => self.clone(),
        }
    }
}

/// A single segment of a [`FieldPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Key(&'a str),
    Index(usize),
}

impl<'a> PathSegment<'a> {
    fn classify(raw: &'a str) -> Self {
        match raw.parse::<usize>() {
            Ok(i) if raw.bytes().all(|b| b.is_ascii_digit()) => PathSegment::Index(i),
            _ => PathSegment::Key(raw),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FieldPath::parse(value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}

impl std::str::FromStr for FieldPath {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}
