use clap::Parser;
use miette::Result;
use tiledforge::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary(args) => tiledforge::cli::summary::run(args)?,
        Commands::Check(args) => tiledforge::cli::check::run(args)?,
        Commands::Completions(args) => tiledforge::cli::completions::run(args)?,
    }

    Ok(())
}
