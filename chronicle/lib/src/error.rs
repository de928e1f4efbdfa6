//! Error types for the chronicle library.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors that can occur while fetching tags, generating a changelog,
/// or squashing its sections.
#[derive(Debug, thiserror::Error)]
pub enum ChronicleError {
    /// An external command could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An external command ran but exited unsuccessfully.
    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// An external command wrote something other than UTF-8 to stdout.
    #[error("`{program}` produced output that is not valid UTF-8")]
    InvalidUtf8 { program: String },

    /// A line of the tag listing did not have the `<version>|<date>` shape.
    #[error("malformed tag line {line:?}: {reason}")]
    MalformedTagLine { line: String, reason: String },

    /// The same version appeared twice in a tag listing.
    #[error("duplicate tag in registry: {0}")]
    DuplicateTag(String),

    /// A section's version was not found among the repository's tags.
    #[error("unknown version in timestamp index: {0}")]
    UnknownVersion(String),

    /// There were no tags to order sections or build a range against.
    #[error("tag registry is empty")]
    EmptyTagRegistry,

    /// The configuration file could not be parsed.
    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// IO error while reading configuration or input.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for chronicle operations.
pub type Result<T> = std::result::Result<T, ChronicleError>;
