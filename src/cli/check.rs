//! Check command implementation.
//!
//! Loads every map found under the given paths and reports diagnostics.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::{Config, LoadOptions};
use crate::diagnostics::print_diagnostics;
use crate::discovery::discover_maps;
use crate::error::{Result, TmxError};
use crate::map::Map;
use crate::output::{display_path, plural, Printer};

/// Load maps and report problems without producing output
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Map files or directories to check
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Fail when any warning is reported
    #[arg(long)]
    pub deny_warnings: bool,

    /// Configuration file (defaults to ./tiledforge.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Outcome of checking a set of maps.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub checked: usize,
    pub failed: usize,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let printer = Printer::new();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir().map_err(|e| TmxError::Io {
                path: PathBuf::from("."),
                message: format!("Failed to read current directory: {}", e),
            })?;
            Config::discover(&cwd)?
        }
    };

    let maps = discover_maps(&args.paths, &config);
    if maps.is_empty() {
        printer.warning("Skipped", "no .tmx files found");
        return Ok(());
    }

    let deny_warnings = args.deny_warnings || config.deny_warnings;
    let report = check_maps(&maps, &config.load_options(), deny_warnings, &printer);

    if report.failed > 0 {
        return Err(TmxError::Check {
            message: format!("{} of {} failed", report.failed, plural(report.checked, "map", "maps")),
        });
    }

    printer.success("Finished", &format!("{} checked", plural(report.checked, "map", "maps")));
    Ok(())
}

/// Load each map and print its diagnostics.
///
/// A map fails when it cannot be loaded, when it reports errors, or when it
/// reports warnings and `deny_warnings` is set.
pub fn check_maps(maps: &[PathBuf], options: &LoadOptions, deny_warnings: bool, printer: &Printer) -> CheckReport {
    let mut report = CheckReport::default();

    for path in maps {
        report.checked += 1;
        if !check_map(path, options, deny_warnings, printer) {
            report.failed += 1;
        }
    }

    report
}

fn check_map(path: &Path, options: &LoadOptions, deny_warnings: bool, printer: &Printer) -> bool {
    let label = display_path(path);
    printer.status("Checking", &label);
    match Map::load(path, options) {
        Ok(loaded) => {
            print_diagnostics(&label, &loaded.diagnostics, printer);
            let diagnostics = &loaded.diagnostics;
            !(diagnostics.has_errors() || (deny_warnings && diagnostics.has_warnings()))
        }
        Err(e) => {
            printer.error("Failed", &format!("{}: {}", label, e));
            false
        }
    }
}
