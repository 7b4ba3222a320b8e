//! Load diagnostics.
//!
//! Data-quality problems found while building a map (unknown elements,
//! malformed colours, undecodable tile data) never abort a load. They are
//! recorded here and reported by the caller.

mod diagnostic;

pub use diagnostic::{Diagnostic, Diagnostics, Severity};

use crate::output::{plural, Printer};

/// Print diagnostics to stderr, followed by a one-line tally.
pub fn print_diagnostics(label: &str, diagnostics: &Diagnostics, printer: &Printer) {
    for d in diagnostics.iter() {
        let tag = printer.severity(d.severity);
        eprintln!("  {}[{}]: {}", tag, d.code, d.message);
        if let Some(help) = &d.help {
            eprintln!("    {} {}", printer.dim("help:"), help);
        }
    }

    let errors = diagnostics.error_count();
    let warnings = diagnostics.warning_count();

    if errors > 0 {
        printer.error(
            "Failed",
            &format!(
                "{} ({}, {})",
                label,
                plural(errors, "error", "errors"),
                plural(warnings, "warning", "warnings")
            ),
        );
    } else if warnings > 0 {
        printer.warning(
            "Loaded",
            &format!("{} ({})", label, plural(warnings, "warning", "warnings")),
        );
    } else {
        printer.success("Loaded", label);
    }
}
