//! Configuration for the external tools chronicle drives.
//!
//! Settings live in an optional `chronicle.toml`. Every field has a default,
//! so an absent file (or an empty one) gives the stock `git` and
//! `npx lerna-changelog` setup.
//!
//! ```toml
//! [git]
//! program = "git"
//!
//! [generator]
//! program = "npx"
//! args = ["lerna-changelog"]
//! from_flag = "--tag-from"
//! to_flag = "--tag-to"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChronicleError, Result};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "chronicle.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChronicleConfig {
    pub git: GitConfig,
    pub generator: GeneratorConfig,
}

/// How to invoke version control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub program: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

/// How to invoke the changelog generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Executable to run.
    pub program: String,
    /// Arguments placed before the tag range flags.
    pub args: Vec<String>,
    /// Flag preceding the starting tag.
    pub from_flag: String,
    /// Flag preceding the ending tag.
    pub to_flag: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: vec!["lerna-changelog".to_string()],
            from_flag: "--tag-from".to_string(),
            to_flag: "--tag-to".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn from_flag(mut self, flag: impl Into<String>) -> Self {
        self.from_flag = flag.into();
        self
    }

    pub fn to_flag(mut self, flag: impl Into<String>) -> Self {
        self.to_flag = flag.into();
        self
    }
}

impl ChronicleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration from TOML text.
    ///
    /// ## Errors
    ///
    /// Returns [`ChronicleError::Config`] if the text is not valid TOML for
    /// this schema. `origin` is only used in the error.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| ChronicleError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Reads configuration from a file that must exist.
    ///
    /// ## Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_toml(&text, path)
    }

    /// Loads `chronicle.toml` from `dir` if present, defaults otherwise.
    ///
    /// ## Errors
    ///
    /// Fails only if the file exists but cannot be read or parsed.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path: PathBuf = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            debug!(dir = %dir.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    pub fn git_program(mut self, program: impl Into<String>) -> Self {
        self.git.program = program.into();
        self
    }
}
