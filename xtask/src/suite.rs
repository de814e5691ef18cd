//! Test runner
//!
//! Runs every test file once and compares the interpreter's output and exit
//! code with the file's header. Files with a malformed header are skipped.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::discover::Sample;
use crate::header::TestHeader;
use crate::interpreter::{self, RunOutput};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, Default)]
pub struct SuiteOptions {
    /// Print expected and actual output of failed tests
    pub verbose: bool,
    /// Compare output only
    pub ignore_status: bool,
}

/// Counts of one suite run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub ran: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Whether a run satisfied a header
pub fn passes(header: &TestHeader, actual: &RunOutput, ignore_status: bool) -> bool {
    actual.lines == header.expected_output && (ignore_status || actual.status == header.expected_status)
}

pub fn run_suite(interpreter: &Path, samples: &[Sample], options: SuiteOptions, out: &mut impl Write) -> Result<Summary> {
    let mut summary = Summary::default();

    for sample in samples {
        let parsed = fs::read_to_string(&sample.path)
            .map_err(|e| e.to_string())
            .and_then(|source| TestHeader::parse(&source).map_err(|e| e.to_string()));
        let header = match parsed {
            Ok(header) => header,
            Err(reason) => {
                writeln!(out, "Unable to parse test file \"{}\" ({}). Skipping...", sample.path.display(), reason)?;
                summary.skipped += 1;
                continue;
            }
        };
        summary.ran += 1;

        let actual = interpreter::run(interpreter, &sample.path)?;
        if passes(&header, &actual, options.ignore_status) {
            writeln!(out, "Test {:.<50}{} PASSED{}", sample.name, GREEN, RESET)?;
        } else {
            summary.failed += 1;
            report_failure(out, &sample.name, &header, &actual, options.verbose)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Ran {} tests, of which {} failed.", summary.ran, summary.failed)?;
    Ok(summary)
}

fn report_failure(
    out: &mut impl Write,
    name: &str,
    header: &TestHeader,
    actual: &RunOutput,
    verbose: bool,
) -> std::io::Result<()> {
    if verbose {
        writeln!(out)?;
    }
    writeln!(out, "Test {:.<50}{} FAILED{}", name, RED, RESET)?;
    if !verbose {
        return Ok(());
    }

    writeln!(out, "-- Expected output:")?;
    for line in &header.expected_output {
        writeln!(out, "    {}", line)?;
    }
    writeln!(out, "-- Actual output:")?;
    for line in &actual.lines {
        writeln!(out, "    {}", line)?;
    }
    writeln!(out, "-- Expected return value:")?;
    writeln!(out, "    {}", header.expected_status)?;
    writeln!(out, "-- Actual return value:")?;
    writeln!(out, "    {}", actual.status)?;
    writeln!(out)
}
