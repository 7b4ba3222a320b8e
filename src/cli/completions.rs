//! Shell completions generation.

use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::Shell;

use crate::error::{Result, TmxError};
use crate::output::{display_path, Printer};

const BIN_NAME: &str = "tiledforge";

/// Generate shell completions
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script into this directory instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = super::Cli::command();

    match args.output {
        None => clap_complete::generate(args.shell, &mut cmd, BIN_NAME, &mut std::io::stdout()),
        Some(dir) => {
            let path = clap_complete::generate_to(args.shell, &mut cmd, BIN_NAME, &dir).map_err(|e| TmxError::Io {
                path: dir.clone(),
                message: format!("Failed to write completions: {}", e),
            })?;
            Printer::new().success("Generated", &display_path(&path));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_to_directory() {
        let dir = tempdir().unwrap();
        run(CompletionsArgs {
            shell: Shell::Bash,
            output: Some(dir.path().to_path_buf()),
        })
        .unwrap();

        let script = std::fs::read_to_string(dir.path().join("tiledforge.bash")).unwrap();
        assert!(script.contains("summary"));
        assert!(script.contains("check"));
    }
}
