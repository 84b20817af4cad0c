//! User-facing summaries of fetch and import.

use std::io::{self, Write};

use crate::fetch::FetchOutcome;
use crate::import::ImportOutcome;
use crate::tree::PACKAGE_MANIFEST;

/// Print the failure and success counts of a deploy, then the source root.
///
/// With `verbose`, each problem is listed as `fullName: message` (or the bare
/// message) and each success with its status and id. The manifest itself is
/// counted but never listed.
pub fn write_import_report(
    out: &mut impl Write,
    outcome: &ImportOutcome,
    verbose: bool,
) -> io::Result<()> {
    let result = &outcome.result;

    writeln!(out, "\nFailures - {}", result.problems.len())?;
    if verbose {
        for problem in &result.problems {
            if problem.full_name.is_empty() {
                writeln!(out, "{}", problem.problem)?;
            } else {
                writeln!(out, "{}: {}", problem.full_name, problem.problem)?;
            }
        }
    }

    writeln!(out, "\nSuccesses - {}", result.successes.len())?;
    if verbose {
        for success in result
            .successes
            .iter()
            .filter(|s| s.full_name != PACKAGE_MANIFEST)
        {
            writeln!(
                out,
                "{}\n\tstatus: {}\n\tid={}",
                success.full_name,
                success.status(),
                success.id
            )?;
        }
    }

    writeln!(out, "Imported from {}", outcome.root.display())
}

/// Print extraction problems, if any, then the destination root.
pub fn write_fetch_report(out: &mut impl Write, outcome: &FetchOutcome) -> io::Result<()> {
    if let Some(expansion) = &outcome.expansion {
        for problem in &expansion.problems {
            writeln!(out, "{}", problem)?;
        }
    }
    writeln!(out, "Exported to {}", outcome.root.display())
}
