//! Release tags and the registry that orders them.
//!
//! Tags arrive from version control as a listing of `<version>|<date>` lines,
//! newest first. A [`TagRegistry`] holds them in descending date order and is
//! the source of both the generator's tag range and the [`TimestampIndex`]
//! used to reorder changelog sections.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::{ChronicleError, Result};
use crate::timestamp::TimestampIndex;

/// Separator between the version and the date in a tag listing line.
const FIELD_SEPARATOR: char = '|';

/// A single release tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    /// Free-form tag name, e.g. `v2.0.0-rc.0`.
    pub version: String,
    /// Tag creation time in seconds since the Unix epoch.
    pub date: i64,
}

impl Tag {
    /// Creates a tag from a version name and a timestamp.
    ///
    /// ## Examples
    ///
    /// ```
    /// use chronicle_lib::Tag;
    ///
    /// let tag = Tag::new("v1.0.0", 1_513_036_800);
    /// assert_eq!(tag.version, "v1.0.0");
    /// ```
    pub fn new(version: impl Into<String>, date: i64) -> Self {
        Self {
            version: version.into(),
            date,
        }
    }
}

/// Parses one `<version>|<date>` line into a [`Tag`].
///
/// The line is split once on `|`. The date field is a base-10 integer and may
/// be followed by a timezone offset (`git`'s `%(taggerdate:raw)` format), which
/// is ignored.
///
/// ## Errors
///
/// Returns [`ChronicleError::MalformedTagLine`] if there is no separator, the
/// version is empty, or the date does not start with an integer.
///
/// ## Examples
///
/// ```
/// use chronicle_lib::{parse_tag_line, Tag};
///
/// assert_eq!(parse_tag_line("v3.0.0|1").unwrap(), Tag::new("v3.0.0", 1));
/// assert_eq!(
///     parse_tag_line("v1.0.0|1513036800 +0100").unwrap(),
///     Tag::new("v1.0.0", 1_513_036_800)
/// );
/// ```
pub fn parse_tag_line(line: &str) -> Result<Tag> {
    let malformed = |reason: &str| ChronicleError::MalformedTagLine {
        line: line.to_string(),
        reason: reason.to_string(),
    };

    let (version, date) = line
        .split_once(FIELD_SEPARATOR)
        .ok_or_else(|| malformed("missing '|' separator"))?;

    if version.is_empty() {
        return Err(malformed("empty version"));
    }

    let date = date
        .split_whitespace()
        .next()
        .ok_or_else(|| malformed("missing date"))?
        .parse::<i64>()
        .map_err(|e| malformed(&format!("date is not an integer ({e})")))?;

    Ok(Tag::new(version, date))
}

/// Parses a full tag listing, one tag per line.
///
/// Lines are trimmed and blank lines are skipped. An empty listing yields an
/// empty vector.
///
/// ## Errors
///
/// Returns the first [`ChronicleError::MalformedTagLine`] encountered.
pub fn parse_tag_listing(raw: &str) -> Result<Vec<Tag>> {
    let tags = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_tag_line)
        .collect::<Result<Vec<_>>>()?;

    debug!(count = tags.len(), "parsed tag listing");
    Ok(tags)
}

/// Returns the first tag whose version does not contain `latest_version`.
///
/// Tags are scanned in the order given, so with a newest-first listing this
/// skips the latest release and its prereleases. The test is a substring test,
/// not equality: `v1.0` is considered contained in `v1.0.0`.
///
/// ## Examples
///
/// ```
/// use chronicle_lib::{previous_stable_tag, Tag};
///
/// let tags = vec![
///     Tag::new("v2.0.0", 2),
///     Tag::new("v2.0.0-rc.0", 1),
///     Tag::new("v1.0.0", 0),
/// ];
/// assert_eq!(previous_stable_tag("v2.0.0", &tags), Some(&Tag::new("v1.0.0", 0)));
/// ```
pub fn previous_stable_tag<'a>(latest_version: &str, tags: &'a [Tag]) -> Option<&'a Tag> {
    tags.iter().find(|tag| !tag.version.contains(latest_version))
}

/// Builds a version-to-timestamp index from a sequence of tags.
///
/// Later tags with the same version overwrite earlier ones.
pub fn build_timestamp_index<'a>(tags: impl IntoIterator<Item = &'a Tag>) -> TimestampIndex {
    tags.into_iter().collect()
}

/// Release tags of a repository ordered newest first.
///
/// Versions are unique within a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRegistry {
    tags: Vec<Tag>,
}

impl TagRegistry {
    /// Creates a registry, sorting tags descending by date.
    ///
    /// The sort is stable, so tags sharing a timestamp keep their listing order.
    ///
    /// ## Errors
    ///
    /// Returns [`ChronicleError::DuplicateTag`] if a version appears twice.
    pub fn new(mut tags: Vec<Tag>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(tags.len());
        for tag in &tags {
            if !seen.insert(tag.version.as_str()) {
                return Err(ChronicleError::DuplicateTag(tag.version.clone()));
            }
        }

        tags.sort_by(|a, b| b.date.cmp(&a.date));
        trace!(count = tags.len(), "built tag registry");
        Ok(Self { tags })
    }

    /// Parses a raw tag listing straight into a registry.
    ///
    /// ## Errors
    ///
    /// Fails on malformed lines or duplicate versions.
    pub fn from_listing(raw: &str) -> Result<Self> {
        Self::new(parse_tag_listing(raw)?)
    }

    /// The most recent tag.
    pub fn latest(&self) -> Option<&Tag> {
        self.tags.first()
    }

    /// The oldest tag.
    pub fn oldest(&self) -> Option<&Tag> {
        self.tags.last()
    }

    /// The newest tag that is not the latest release or one of its prereleases.
    pub fn previous_stable(&self) -> Option<&Tag> {
        let latest = self.latest()?;
        previous_stable_tag(&latest.version, &self.tags)
    }

    /// Looks up a tag by its exact version name.
    pub fn find(&self, version: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.version == version)
    }

    pub fn timestamp_index(&self) -> TimestampIndex {
        build_timestamp_index(&self.tags)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<'a> IntoIterator for &'a TagRegistry {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release_tags() -> Vec<Tag> {
        vec![
            Tag::new("v2.0.0", 2),
            Tag::new("v2.0.0-rc.0", 1),
            Tag::new("v1.0.0", 0),
        ]
    }

    #[test]
    fn parse_tag_line_splits_version_and_date() {
        let tag = parse_tag_line("v3.0.0|1").unwrap();
        assert_eq!(tag, Tag::new("v3.0.0", 1));
    }

    #[test]
    fn parse_tag_line_ignores_timezone_offset() {
        let tag = parse_tag_line("v1.0.0-rc.0|1513036800 -0500").unwrap();
        assert_eq!(tag, Tag::new("v1.0.0-rc.0", 1_513_036_800));
    }

    #[test]
    fn parse_tag_line_splits_only_once() {
        let err = parse_tag_line("v1.0.0|12|34").unwrap_err();
        assert!(matches!(err, ChronicleError::MalformedTagLine { .. }));
    }

    #[test]
    fn parse_tag_line_rejects_missing_separator() {
        let err = parse_tag_line("v1.0.0").unwrap_err();
        match err {
            ChronicleError::MalformedTagLine { line, reason } => {
                assert_eq!(line, "v1.0.0");
                assert!(reason.contains("separator"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_tag_line_rejects_non_numeric_date() {
        assert!(matches!(
            parse_tag_line("v1.0.0|yesterday"),
            Err(ChronicleError::MalformedTagLine { .. })
        ));
    }

    #[test]
    fn parse_tag_line_rejects_lightweight_tag_without_date() {
        assert!(matches!(
            parse_tag_line("v1.0.0|"),
            Err(ChronicleError::MalformedTagLine { .. })
        ));
    }

    #[test]
    fn parse_tag_line_rejects_empty_version() {
        assert!(matches!(
            parse_tag_line("|12"),
            Err(ChronicleError::MalformedTagLine { .. })
        ));
    }

    #[test]
    fn parse_tag_listing_trims_and_skips_blank_lines() {
        let listing = "
            v2.0.0|3
            v2.0.0-rc.0|2

            v1.0.0|1
        ";
        let tags = parse_tag_listing(listing).unwrap();
        assert_eq!(
            tags,
            vec![
                Tag::new("v2.0.0", 3),
                Tag::new("v2.0.0-rc.0", 2),
                Tag::new("v1.0.0", 1),
            ]
        );
    }

    #[test]
    fn parse_tag_listing_of_empty_input_is_empty() {
        assert!(parse_tag_listing("").unwrap().is_empty());
        assert!(parse_tag_listing("  \n\n ").unwrap().is_empty());
    }

    #[test]
    fn previous_stable_tag_skips_prereleases_of_latest() {
        let tags = release_tags();
        assert_eq!(
            previous_stable_tag("v2.0.0", &tags),
            Some(&Tag::new("v1.0.0", 0))
        );
    }

    #[test]
    fn previous_stable_tag_uses_substring_matching() {
        // `v1.0` is a substring of `v1.0.0`, so both are skipped.
        let tags = vec![
            Tag::new("v1.0", 3),
            Tag::new("v1.0.0", 2),
            Tag::new("v0.9.0", 1),
        ];
        assert_eq!(
            previous_stable_tag("v1.0", &tags),
            Some(&Tag::new("v0.9.0", 1))
        );
    }

    #[test]
    fn previous_stable_tag_is_none_when_all_match() {
        let tags = vec![Tag::new("v1.0.0", 1), Tag::new("v1.0.0-rc.0", 0)];
        assert_eq!(previous_stable_tag("v1.0.0", &tags), None);
    }

    #[test]
    fn build_timestamp_index_maps_each_version() {
        let index = build_timestamp_index(&release_tags());
        assert_eq!(index.len(), 3);
        assert_eq!(index.get("v2.0.0"), Some(2));
        assert_eq!(index.get("v2.0.0-rc.0"), Some(1));
        assert_eq!(index.get("v1.0.0"), Some(0));
    }

    #[test]
    fn build_timestamp_index_last_write_wins() {
        let tags = vec![Tag::new("v1.0.0", 1), Tag::new("v1.0.0", 9)];
        let index = build_timestamp_index(&tags);
        assert_eq!(index.get("v1.0.0"), Some(9));
    }

    #[test]
    fn registry_sorts_newest_first() {
        let registry = TagRegistry::new(vec![
            Tag::new("v1.0.0", 0),
            Tag::new("v2.0.0", 2),
            Tag::new("v2.0.0-rc.0", 1),
        ])
        .unwrap();
        let versions: Vec<_> = registry.iter().map(|t| t.version.as_str()).collect();
        assert_eq!(versions, ["v2.0.0", "v2.0.0-rc.0", "v1.0.0"]);
        assert_eq!(registry.latest().unwrap().version, "v2.0.0");
        assert_eq!(registry.oldest().unwrap().version, "v1.0.0");
    }

    #[test]
    fn registry_keeps_listing_order_for_equal_dates() {
        let registry =
            TagRegistry::new(vec![Tag::new("v1.1.0", 5), Tag::new("v1.0.0", 5)]).unwrap();
        assert_eq!(registry.latest().unwrap().version, "v1.1.0");
    }

    #[test]
    fn registry_rejects_duplicate_versions() {
        let err = TagRegistry::new(vec![Tag::new("v1.0.0", 1), Tag::new("v1.0.0", 2)]).unwrap_err();
        assert!(matches!(err, ChronicleError::DuplicateTag(v) if v == "v1.0.0"));
    }

    #[test]
    fn registry_previous_stable_and_find() {
        let registry = TagRegistry::new(release_tags()).unwrap();
        assert_eq!(registry.previous_stable(), Some(&Tag::new("v1.0.0", 0)));
        assert_eq!(registry.find("v2.0.0-rc.0"), Some(&Tag::new("v2.0.0-rc.0", 1)));
        assert_eq!(registry.find("v9.9.9"), None);
    }

    #[test]
    fn empty_registry_has_no_latest() {
        let registry = TagRegistry::from_listing("\n").unwrap();
        assert!(registry.is_empty());
        assert!(registry.latest().is_none());
        assert!(registry.previous_stable().is_none());
    }
}
