pub mod check;
pub mod completions;
pub mod summary;

use clap::{Parser, Subcommand};

/// tiledforge - Tiled map inspector
#[derive(Parser, Debug)]
#[command(name = "tiledforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a map's settings and layer tree
    Summary(summary::SummaryArgs),

    /// Load maps and report problems
    Check(check::CheckArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_flags() {
        let cli = Cli::try_parse_from(["tiledforge", "check", "maps", "extra.tmx", "--deny-warnings"]).unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.paths.len(), 2);
                assert!(args.deny_warnings);
                assert!(args.config.is_none());
            }
            other => panic!("expected check, got {:?}", other),
        }
    }

    #[test]
    fn test_summary_requires_file() {
        assert!(Cli::try_parse_from(["tiledforge", "summary"]).is_err());
    }
}
