//! Command-line interface.
//!
//! The CLI is the "shell" around the expansion core: it owns obtaining the
//! input text (a file or a stdin span), opening the vault, and writing the
//! result back out. Two commands exist:
//!
//! - `graft expand` — expand embed markers in a file or stdin span
//! - `graft list` — list the embed references a file contains
//!
//! Diagnostics (unresolved references, section fallbacks, depth limits) go
//! to stderr through `tracing`; stdout carries only the expanded text or
//! listing. `--verbose` turns on debug-level diagnostics, `--quiet` turns
//! them all off, and `RUST_LOG` is honored in between.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod expand;
pub mod list;

pub use expand::ExpandCommand;
pub use list::ListCommand;

#[derive(Parser, Debug)]
#[command(name = "graft", version, about = "Expand embedded note references in markdown text")]
pub struct Cli {
    /// Enable debug diagnostics on stderr
    #[arg(long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all diagnostics
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Expand(ExpandCommand),
    List(ListCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        match self.command {
            Commands::Expand(cmd) => cmd.execute().await,
            Commands::List(cmd) => cmd.execute().await,
        }
    }
}

/// Install the stderr diagnostics subscriber.
///
/// Verbosity flags take precedence over `RUST_LOG`; the default shows
/// warnings (section fallbacks, depth limits) only.
fn init_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("graft=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_expand() {
        let cli = Cli::parse_from(["graft", "expand", "note.md", "--vault", "."]);
        assert!(matches!(cli.command, Commands::Expand(_)));
    }

    #[test]
    fn test_cli_parses_list_with_format() {
        let cli = Cli::parse_from(["graft", "list", "note.md", "--format", "json"]);
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let parsed =
            Cli::try_parse_from(["graft", "--verbose", "--quiet", "list", "note.md"]);
        assert!(parsed.is_err());
    }
}
