//! Chronicle CLI - curated changelogs from tagged history

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chronicle_lib::{
    ChangelogMode, Chronicle, ChronicleConfig, CommandGenerator, GitTagSource, RangeOverride,
    TagRegistry, squash, squash_unreleased,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chronicle", version)]
#[command(about = "Curate generated changelogs into one section per release", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Config file [default: chronicle.toml in the repository, if present]
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Repository to read tags from and run the generator in
    #[arg(short = 'C', long = "repo", value_name = "DIR", global = true)]
    repo: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full history, one section per stable version, newest first
    Full {
        /// Start the changelog at this tag instead of the oldest one
        #[arg(long, value_name = "TAG")]
        from: Option<String>,

        /// End the changelog at this tag instead of the latest change
        #[arg(long, value_name = "TAG")]
        to: Option<String>,
    },

    /// Only the latest release
    Recent,

    /// Untagged changes and the newest prerelease
    Unreleased,

    /// Squash an already generated changelog without running any tools
    Squash {
        /// Tag listing with one `<version>|<unix-seconds>` line per tag
        #[arg(long, value_name = "FILE", required_unless_present = "unreleased")]
        tags: Option<PathBuf>,

        /// Keep only Unreleased and prerelease sections instead
        #[arg(long)]
        unreleased: bool,

        /// Changelog to squash (use "-" or omit to read from stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },
}

/// Logs go to stderr so stdout carries only the changelog.
fn init_tracing(verbose: u8, json: bool) {
    // RUST_LOG overrides -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "warn,chronicle_lib=info",
            2 => "warn,chronicle_lib=debug",
            _ => "debug,chronicle_lib=trace",
        })
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(io::stderr))
            .init();
    }
}

fn load_config(explicit: Option<&Path>, repo: &Path) -> chronicle_lib::Result<ChronicleConfig> {
    match explicit {
        Some(path) => ChronicleConfig::load(path),
        None => ChronicleConfig::discover(repo),
    }
}

fn read_input(input: Option<&Path>) -> io::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

async fn run(cli: Cli) -> chronicle_lib::Result<String> {
    let repo = cli.repo.unwrap_or_else(|| PathBuf::from("."));

    let (mode, range) = match cli.command {
        Commands::Squash {
            tags,
            unreleased,
            input,
        } => {
            let document = read_input(input.as_deref())?;
            return match tags {
                _ if unreleased => Ok(squash_unreleased(&document)),
                Some(tags) => {
                    let registry = TagRegistry::from_listing(&std::fs::read_to_string(tags)?)?;
                    squash(&registry, &document)
                }
                None => Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "--tags is required unless --unreleased is given",
                )
                .into()),
            };
        }
        Commands::Full { from, to } => (ChangelogMode::Full, RangeOverride { from, to }),
        Commands::Recent => (ChangelogMode::Recent, RangeOverride::default()),
        Commands::Unreleased => (ChangelogMode::Unreleased, RangeOverride::default()),
    };

    let config = load_config(cli.config.as_deref(), &repo)?;
    let chronicle = Chronicle::new(
        GitTagSource::new(&config.git).repo_dir(repo.clone()),
        CommandGenerator::new(config.generator).working_dir(repo),
    );

    chronicle.changelog_with_range(mode, &range).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.log_json);

    tracing::debug!("Chronicle CLI starting");

    match run(cli).await {
        Ok(changelog) => print!("{changelog}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
