use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use hearth_config::ConfigLoader;

mod query;
mod startup;
mod sync;

/// Hearth - workspace orchestrator for projects, skills, and framework sync
#[derive(Parser)]
#[command(name = "hearth", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Workspace root (defaults to the current directory)
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Path to hearth.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the workspace, classify its state, and emit the startup report
    Startup {
        /// Ask for the menu even when a single project is in progress
        #[arg(long)]
        menu: bool,
    },
    /// Show one project's resolved metadata and file paths
    Project {
        /// Project id (e.g. "05")
        id: String,
    },
    /// Show one skill's resolved metadata and file paths
    Skill {
        /// Skill name (user-scoped wins over system-scoped)
        name: String,
    },
    /// List all projects
    ListProjects {
        /// Full records instead of minimal fields
        #[arg(long)]
        full: bool,
    },
    /// List all skills (after user-over-system merge)
    ListSkills {
        /// Full records instead of minimal fields
        #[arg(long)]
        full: bool,
    },
    /// Check upstream for framework updates (fetches refs only)
    CheckUpdate,
    /// Sync whitelisted framework files from upstream, with backup
    Sync {
        /// Report what would change without touching anything
        #[arg(long)]
        dry_run: bool,
        /// Proceed even with uncommitted local changes on whitelist paths
        #[arg(long)]
        force: bool,
    },
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    pub fn run(self) -> hearth_core::Result<()> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref(), &self.root)?;
        let config = config_loader.get();

        // Resolve log level: --verbose > --quiet > --log-level > config default
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level.as_deref().unwrap_or(config.logging.level.as_str())
        };

        // Logs go to stderr; stdout carries exactly one JSON object
        if config.logging.format == "json" {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
                )
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
                )
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }

        let service = hearth_runtime::WorkspaceService::new(&self.root, config);

        match self.command {
            Commands::Startup { menu } => startup::cmd_startup(&service, menu),
            Commands::Project { id } => query::cmd_project(&service, &id),
            Commands::Skill { name } => query::cmd_skill(&service, &name),
            Commands::ListProjects { full } => query::cmd_list_projects(&service, full),
            Commands::ListSkills { full } => query::cmd_list_skills(&service, full),
            Commands::CheckUpdate => sync::cmd_check_update(&service),
            Commands::Sync { dry_run, force } => sync::cmd_sync(&service, dry_run, force),
            Commands::Completions { shell } => Self::cmd_completions(shell),
        }
    }

    fn cmd_completions(shell: Shell) -> hearth_core::Result<()> {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "hearth", &mut std::io::stdout());
        Ok(())
    }
}

/// Print one value as pretty JSON on stdout.
pub(crate) fn emit<T: serde::Serialize>(value: &T) -> hearth_core::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sync_flags_parse() {
        let cli = Cli::try_parse_from(["hearth", "sync", "--dry-run", "--force"]).unwrap();
        match cli.command {
            Commands::Sync { dry_run, force } => {
                assert!(dry_run);
                assert!(force);
            }
            _ => panic!("expected sync subcommand"),
        }
    }

    #[test]
    fn root_flag_is_global() {
        let cli = Cli::try_parse_from(["hearth", "startup", "--root", "/ws"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("/ws"));
    }
}
