//! External tools that feed the squasher: version control for tags and a
//! changelog generator for the raw document.
//!
//! Both sit behind traits so callers (and tests) can swap in their own
//! sources. The provided implementations shell out with `tokio::process`.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::config::{GeneratorConfig, GitConfig};
use crate::error::{ChronicleError, Result};
use crate::tag::Tag;

/// `git for-each-ref` arguments producing a newest-first `<tag>|<date>` listing.
const TAG_LISTING_ARGS: &[&str] = &[
    "for-each-ref",
    "--sort=-taggerdate",
    "--format=%(tag)|%(taggerdate:raw)",
    "refs/tags",
];

/// Provides the raw tag listing for a repository.
pub trait TagSource {
    /// Returns newline-separated `<version>|<unix-seconds>` lines, newest first.
    fn list_tags(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Produces a raw changelog document for a range of tags.
pub trait ChangelogGenerator {
    /// Generates the changelog between `from` and `to`.
    ///
    /// `None` for `from` means from the beginning of history and `None` for
    /// `to` means up to the latest change.
    fn generate(
        &self,
        from: Option<&Tag>,
        to: Option<&Tag>,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Lists annotated tags with `git for-each-ref`.
#[derive(Debug, Clone)]
pub struct GitTagSource {
    program: String,
    repo_dir: Option<PathBuf>,
}

impl GitTagSource {
    pub fn new(config: &GitConfig) -> Self {
        Self {
            program: config.program.clone(),
            repo_dir: None,
        }
    }

    /// Runs git inside `dir` instead of the current directory.
    pub fn repo_dir(mut self, dir: PathBuf) -> Self {
        self.repo_dir = Some(dir);
        self
    }
}

impl Default for GitTagSource {
    fn default() -> Self {
        Self::new(&GitConfig::default())
    }
}

impl TagSource for GitTagSource {
    #[instrument(skip(self), fields(program = %self.program))]
    async fn list_tags(&self) -> Result<String> {
        let args: Vec<String> = TAG_LISTING_ARGS.iter().map(|a| a.to_string()).collect();
        run_command(&self.program, &args, self.repo_dir.as_ref()).await
    }
}

/// Runs a changelog generator command such as `npx lerna-changelog`.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    config: GeneratorConfig,
    working_dir: Option<PathBuf>,
}

impl CommandGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            working_dir: None,
        }
    }

    pub fn working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    /// The full argument list for a tag range, configured args first.
    ///
    /// ## Examples
    ///
    /// ```
    /// use chronicle_lib::{CommandGenerator, GeneratorConfig, Tag};
    ///
    /// let generator = CommandGenerator::new(GeneratorConfig::default());
    /// let from = Tag::new("v1.0.0", 1);
    /// assert_eq!(
    ///     generator.args_for(Some(&from), None),
    ///     ["lerna-changelog", "--tag-from", "v1.0.0"]
    /// );
    /// ```
    pub fn args_for(&self, from: Option<&Tag>, to: Option<&Tag>) -> Vec<String> {
        let mut args = self.config.args.clone();
        if let Some(tag) = from {
            args.push(self.config.from_flag.clone());
            args.push(tag.version.clone());
        }
        if let Some(tag) = to {
            args.push(self.config.to_flag.clone());
            args.push(tag.version.clone());
        }
        args
    }
}

impl Default for CommandGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl ChangelogGenerator for CommandGenerator {
    #[instrument(
        skip(self, from, to),
        fields(
            program = %self.config.program,
            from = from.map(|t| t.version.as_str()),
            to = to.map(|t| t.version.as_str()),
        )
    )]
    async fn generate(&self, from: Option<&Tag>, to: Option<&Tag>) -> Result<String> {
        let args = self.args_for(from, to);
        run_command(&self.config.program, &args, self.working_dir.as_ref()).await
    }
}

/// Runs `program` with `args` and returns its stdout.
///
/// ## Errors
///
/// Fails if the program cannot be spawned, exits unsuccessfully, or writes
/// non-UTF-8 output.
async fn run_command(program: &str, args: &[String], dir: Option<&PathBuf>) -> Result<String> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = dir {
        command.current_dir(dir);
    }

    debug!(program, ?args, "running command");
    let output = command
        .output()
        .await
        .map_err(|source| ChronicleError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(program, status = %output.status, "command failed");
        return Err(ChronicleError::CommandFailed {
            program: program.to_string(),
            status: output.status,
            stderr,
        });
    }

    String::from_utf8(output.stdout).map_err(|_| ChronicleError::InvalidUtf8 {
        program: program.to_string(),
    })
}
