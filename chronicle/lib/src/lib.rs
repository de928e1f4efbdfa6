//! Chronicle library for curating generated changelogs.
//!
//! A changelog generator emits one `## <version>` section per tag, including
//! every prerelease and an "Unreleased" bucket, in whatever order it walked
//! history. This library turns that into a changelog with one section per
//! stable version ordered by tag date.
//!
//! ## Core Types
//!
//! - [`Tag`] / [`TagRegistry`] - release tags ordered newest first
//! - [`TimestampIndex`] - version to tag date lookup
//! - [`Section`] - one header and body block of a changelog
//! - [`Classification`] - unreleased, prerelease, or stable
//!
//! ## Squashing
//!
//! - [`squash`] - drop Unreleased, collapse prereleases, reorder by date
//! - [`squash_unreleased`] - keep only the newest unreleased/prerelease sections
//! - [`latest_section`] - the first section of a document
//!
//! ## Orchestration
//!
//! - [`Chronicle`] - fetch tags, run the generator, squash the result
//! - [`TagSource`] / [`ChangelogGenerator`] - the external tools, with
//!   [`GitTagSource`] and [`CommandGenerator`] as the shell-backed defaults
//! - [`ChronicleConfig`] - optional `chronicle.toml` settings

pub mod classify;
pub mod collaborators;
pub mod config;
mod error;
pub mod orchestrator;
pub mod section;
pub mod squash;
pub mod tag;
pub mod timestamp;

pub use classify::{
    Classification, classify, is_prerelease, is_released, is_unreleased, stable_key,
    version_token,
};
pub use collaborators::{ChangelogGenerator, CommandGenerator, GitTagSource, TagSource};
pub use config::{CONFIG_FILE_NAME, ChronicleConfig, GeneratorConfig, GitConfig};
pub use error::{ChronicleError, Result};
pub use orchestrator::{ChangelogMode, Chronicle, RangeOverride, tag_range};
pub use section::{SECTION_MARKER, Section, join_sections, split_sections};
pub use squash::{
    MAX_UNRELEASED_SECTIONS, dedupe_by_stable_key, latest_section, retain_released,
    sort_by_timestamp, squash, squash_unreleased,
};
pub use tag::{
    Tag, TagRegistry, build_timestamp_index, parse_tag_line, parse_tag_listing,
    previous_stable_tag,
};
pub use timestamp::TimestampIndex;
