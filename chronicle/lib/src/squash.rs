//! Squashing raw generator output into a curated changelog.
//!
//! The full squash runs as an explicit pipeline:
//!
//! 1. [`split_sections`] - cut the document on the section marker
//! 2. [`retain_released`] - drop the Unreleased section
//! 3. [`dedupe_by_stable_key`] - keep the first section per stable version
//! 4. [`sort_by_timestamp`] - order newest first by tag date
//! 5. [`join_sections`] - reassemble with the leading marker
//!
//! Every step is a plain function over sections, so each can be exercised on
//! its own.
//!
//! ## Examples
//!
//! ```
//! use chronicle_lib::{squash, Tag, TagRegistry};
//!
//! let tags = TagRegistry::new(vec![
//!     Tag::new("v2.0.0", 3),
//!     Tag::new("v2.0.0-rc.0", 2),
//!     Tag::new("v1.0.0", 1),
//! ])?;
//! let raw = "\n## Unreleased\n- wip\n## v2.0.0-rc.0\n- rc\n## v1.0.0\n- init";
//!
//! let changelog = squash(&tags, raw)?;
//! assert_eq!(changelog, "\n## v2.0.0-rc.0\n- rc\n## v1.0.0\n- init");
//! # Ok::<(), chronicle_lib::ChronicleError>(())
//! ```

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::classify;
use crate::error::Result;
use crate::section::{Section, join_sections, split_sections};
use crate::tag::{Tag, build_timestamp_index};
use crate::timestamp::TimestampIndex;

/// Upper bound on sections kept by [`squash_unreleased`].
pub const MAX_UNRELEASED_SECTIONS: usize = 2;

/// Drops sections whose header marks them as Unreleased.
pub fn retain_released<'a>(sections: Vec<Section<'a>>) -> Vec<Section<'a>> {
    sections
        .into_iter()
        .filter(|section| classify::is_released(section.header()))
        .collect()
}

/// Keeps the first section seen for each stable version key.
///
/// A single left-to-right scan, so when a prerelease precedes its stable
/// release in the input the prerelease is the one that survives.
pub fn dedupe_by_stable_key<'a>(sections: Vec<Section<'a>>) -> Vec<Section<'a>> {
    let mut seen = HashSet::with_capacity(sections.len());
    sections
        .into_iter()
        .filter(|section| {
            let key = section.stable_key();
            let first = seen.insert(key);
            if !first {
                trace!(key, header = section.header(), "dropping duplicate section");
            }
            first
        })
        .collect()
}

/// Orders sections newest first by the date of their own version tag.
///
/// Sections are looked up by version token, not stable key, so a surviving
/// prerelease is placed by its own tag date. The sort is stable.
///
/// ## Errors
///
/// Returns [`ChronicleError::UnknownVersion`](crate::ChronicleError::UnknownVersion)
/// for a section whose version is not in `index`, or
/// [`ChronicleError::EmptyTagRegistry`](crate::ChronicleError::EmptyTagRegistry)
/// when there are sections but no tags.
pub fn sort_by_timestamp<'a>(
    sections: Vec<Section<'a>>,
    index: &TimestampIndex,
) -> Result<Vec<Section<'a>>> {
    let mut dated = sections
        .into_iter()
        .map(|section| Ok((index.lookup(section.version_token())?, section)))
        .collect::<Result<Vec<_>>>()?;

    dated.sort_by(|(a, _), (b, _)| b.cmp(a));
    Ok(dated.into_iter().map(|(_, section)| section).collect())
}

/// Produces a changelog with one section per stable version, newest first.
///
/// Unreleased changes are removed, prereleases collapse onto the first
/// section seen for their stable version, and the survivors are reordered by
/// tag date. Squashing the output again with the same tags returns it
/// unchanged.
///
/// ## Errors
///
/// Fails if a surviving section's version is not among `tags`.
pub fn squash<'t>(tags: impl IntoIterator<Item = &'t Tag>, document: &str) -> Result<String> {
    let index = build_timestamp_index(tags);

    let sections = split_sections(document);
    let total = sections.len();
    let released = retain_released(sections);
    let released_count = released.len();
    let unique = dedupe_by_stable_key(released);
    let unique_count = unique.len();
    let ordered = sort_by_timestamp(unique, &index)?;

    debug!(
        total,
        released = released_count,
        kept = unique_count,
        "squashed changelog"
    );
    Ok(join_sections(&ordered))
}

/// Keeps only the newest Unreleased and prerelease sections.
///
/// Stable sections are dropped and at most [`MAX_UNRELEASED_SECTIONS`]
/// survive, in document order.
///
/// ## Examples
///
/// ```
/// use chronicle_lib::squash_unreleased;
///
/// let raw = "\n## Unreleased\n- wip\n## v1.0.0\n- init";
/// assert_eq!(squash_unreleased(raw), "\n## Unreleased\n- wip");
/// ```
pub fn squash_unreleased(document: &str) -> String {
    let kept: Vec<_> = split_sections(document)
        .into_iter()
        .filter(|section| classify::is_prerelease(section.header()))
        .take(MAX_UNRELEASED_SECTIONS)
        .collect();

    debug!(kept = kept.len(), "squashed unreleased changelog");
    join_sections(&kept)
}

/// The first section of a document, with the leading marker.
pub fn latest_section(document: &str) -> String {
    let sections = split_sections(document);
    join_sections(sections.first().map(std::slice::from_ref).unwrap_or_default())
}
