//! Ties tag listing, changelog generation, and squashing together.

use tracing::{debug, info, instrument};

use crate::collaborators::{ChangelogGenerator, TagSource};
use crate::error::{ChronicleError, Result};
use crate::squash::{latest_section, squash, squash_unreleased};
use crate::tag::{Tag, TagRegistry};

/// Which changelog to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangelogMode {
    /// Entire history, one section per stable version.
    #[default]
    Full,
    /// Only the latest release, generated since the previous stable tag.
    Recent,
    /// Untagged changes plus the newest prerelease.
    Unreleased,
}

/// Explicit tag range endpoints, by version name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeOverride {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl RangeOverride {
    pub fn from_version(mut self, version: impl Into<String>) -> Self {
        self.from = Some(version.into());
        self
    }

    pub fn to_version(mut self, version: impl Into<String>) -> Self {
        self.to = Some(version.into());
        self
    }
}

/// Produces curated changelogs from a tag source and a generator.
///
/// ## Examples
///
/// ```no_run
/// use chronicle_lib::{ChangelogMode, Chronicle, CommandGenerator, GitTagSource};
///
/// # async fn example() -> chronicle_lib::Result<()> {
/// let chronicle = Chronicle::new(GitTagSource::default(), CommandGenerator::default());
/// let changelog = chronicle.changelog(ChangelogMode::Full).await?;
/// println!("{changelog}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Chronicle<S, G> {
    tags: S,
    generator: G,
}

impl<S: TagSource, G: ChangelogGenerator> Chronicle<S, G> {
    pub fn new(tags: S, generator: G) -> Self {
        Self { tags, generator }
    }

    /// Fetches and parses the repository's tags.
    ///
    /// ## Errors
    ///
    /// Propagates tag source failures and malformed or duplicate tags.
    pub async fn registry(&self) -> Result<TagRegistry> {
        let raw = self.tags.list_tags().await?;
        TagRegistry::from_listing(&raw)
    }

    /// Produces the changelog for `mode` over the default tag range.
    ///
    /// ## Errors
    ///
    /// Fails when there are no tags, when a collaborator fails, or when a
    /// section names a version with no tag.
    pub async fn changelog(&self, mode: ChangelogMode) -> Result<String> {
        self.changelog_with_range(mode, &RangeOverride::default())
            .await
    }

    /// Like [`changelog`](Self::changelog), with explicit range endpoints.
    ///
    /// ## Errors
    ///
    /// Also fails with [`ChronicleError::UnknownVersion`] when an override
    /// names a version that is not tagged.
    #[instrument(skip(self))]
    pub async fn changelog_with_range(
        &self,
        mode: ChangelogMode,
        range: &RangeOverride,
    ) -> Result<String> {
        let registry = self.registry().await?;
        if registry.is_empty() {
            return Err(ChronicleError::EmptyTagRegistry);
        }

        let (from, to) = tag_range(&registry, mode, range)?;
        info!(
            from = from.map(|t| t.version.as_str()),
            to = to.map(|t| t.version.as_str()),
            tags = registry.len(),
            "generating changelog"
        );

        let raw = self.generator.generate(from, to).await?;
        debug!(bytes = raw.len(), "generator finished");

        match mode {
            ChangelogMode::Full => squash(&registry, &raw),
            ChangelogMode::Recent => Ok(latest_section(&raw)),
            ChangelogMode::Unreleased => Ok(squash_unreleased(&raw)),
        }
    }
}

/// Picks the generator's `(from, to)` tags for a mode.
///
/// - `Full`: oldest tag to the latest change
/// - `Recent`: previous stable tag to the latest tag
/// - `Unreleased`: previous stable tag to the latest change
///
/// Overrides replace either endpoint.
///
/// ## Errors
///
/// Returns [`ChronicleError::UnknownVersion`] for an override not in the registry.
pub fn tag_range<'a>(
    registry: &'a TagRegistry,
    mode: ChangelogMode,
    range: &RangeOverride,
) -> Result<(Option<&'a Tag>, Option<&'a Tag>)> {
    let (default_from, default_to) = match mode {
        ChangelogMode::Full => (registry.oldest(), None),
        ChangelogMode::Recent => (registry.previous_stable(), registry.latest()),
        ChangelogMode::Unreleased => (registry.previous_stable(), None),
    };

    let resolve = |version: &Option<String>, fallback: Option<&'a Tag>| match version {
        Some(version) => registry
            .find(version)
            .map(Some)
            .ok_or_else(|| ChronicleError::UnknownVersion(version.clone())),
        None => Ok(fallback),
    };

    Ok((resolve(&range.from, default_from)?, resolve(&range.to, default_to)?))
}
