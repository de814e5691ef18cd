//! Interpreter invocation
//!
//! The interpreter is run as `<interpreter> <source path>`, one process at a
//! time, waiting for each to exit.

use std::path::Path;
use std::process::{Command, ExitStatus};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

/// What one interpreter run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Non-blank stdout then stderr lines, trimmed
    pub lines: Vec<String>,
    pub status: i32,
    pub elapsed: Duration,
}

pub fn run(interpreter: &Path, source: &Path) -> Result<RunOutput> {
    let start = Instant::now();
    let output = Command::new(interpreter)
        .arg(source)
        .output()
        .with_context(|| format!("failed to run {}", interpreter.display()))?;
    let elapsed = start.elapsed();

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(RunOutput {
        lines: significant_lines(&combined),
        status: exit_code(output.status),
        elapsed,
    })
}

/// Trimmed lines with blank lines dropped
pub fn significant_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Exit code, or the negated signal number for a process killed by a signal
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significant_lines() {
        assert_eq!(significant_lines("  4\n\n7  \r\n \n"), vec!["4", "7"]);
        assert!(significant_lines("").is_empty());
    }

    #[test]
    fn test_missing_interpreter_is_an_error() {
        let result = run(Path::new("/definitely/not/an/interpreter"), Path::new("a.lox"));
        assert!(result.is_err());
    }
}
