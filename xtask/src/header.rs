//! Test headers
//!
//! A test file opens with `//` comment lines. Every line but the last holds
//! one expected output line; the last holds the expected exit code:
//!
//! ```text
//! // 4
//! // 7
//! // 0
//! print 4;
//! print 7;
//! ```

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HeaderError {
    #[error("file has no header comment")]
    Missing,

    #[error("header line {line} is empty")]
    EmptyLine { line: usize },

    #[error("last header line {0:?} is not an exit code")]
    ExitCode(String),
}

/// Expected behaviour of one test file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestHeader {
    pub expected_output: Vec<String>,
    pub expected_status: i32,
}

fn output_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^//(.+)$").unwrap())
}

fn status_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^// *(\d+)$").unwrap())
}

impl TestHeader {
    pub fn parse(source: &str) -> Result<Self, HeaderError> {
        let header: Vec<&str> = source.lines().take_while(|line| line.starts_with("//")).collect();
        let (status_line, output_lines) = header.split_last().ok_or(HeaderError::Missing)?;

        let expected_output = output_lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                output_pattern()
                    .captures(line)
                    .map(|caps| caps[1].trim().to_string())
                    .ok_or(HeaderError::EmptyLine { line: index + 1 })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let expected_status = status_pattern()
            .captures(status_line)
            .and_then(|caps| caps[1].parse().ok())
            .ok_or_else(|| HeaderError::ExitCode(status_line.to_string()))?;

        Ok(Self {
            expected_output,
            expected_status,
        })
    }
}
