//! Version-to-timestamp lookup for ordering changelog sections.

use std::collections::HashMap;

use crate::error::{ChronicleError, Result};
use crate::tag::Tag;

/// Maps a version token to the creation time of its tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampIndex {
    dates: HashMap<String, i64>,
}

impl TimestampIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a version's timestamp, replacing any earlier entry.
    pub fn insert(&mut self, version: impl Into<String>, date: i64) {
        self.dates.insert(version.into(), date);
    }

    pub fn get(&self, version: &str) -> Option<i64> {
        self.dates.get(version).copied()
    }

    /// Returns the timestamp for `version`.
    ///
    /// ## Errors
    ///
    /// Returns [`ChronicleError::EmptyTagRegistry`] when the index holds no
    /// tags at all, and [`ChronicleError::UnknownVersion`] when it holds tags
    /// but not this one.
    pub fn lookup(&self, version: &str) -> Result<i64> {
        if self.dates.is_empty() {
            return Err(ChronicleError::EmptyTagRegistry);
        }
        self.get(version)
            .ok_or_else(|| ChronicleError::UnknownVersion(version.to_string()))
    }

    pub fn contains(&self, version: &str) -> bool {
        self.dates.contains_key(version)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl<'a> FromIterator<&'a Tag> for TimestampIndex {
    fn from_iter<I: IntoIterator<Item = &'a Tag>>(iter: I) -> Self {
        let mut index = Self::new();
        for tag in iter {
            index.insert(tag.version.as_str(), tag.date);
        }
        index
    }
}
