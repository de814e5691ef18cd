//! Sample file discovery

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use walkdir::WalkDir;

/// Extension of Lox sample files
pub const SAMPLE_EXTENSION: &str = "lox";

/// A sample file and its name relative to the search root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub path: PathBuf,
    pub name: String,
}

/// Collect `*.lox` files under `root`, sorted by relative path
///
/// With `exclude` the files whose relative path matches `pattern` are
/// dropped, otherwise only matching files are kept. An empty pattern matches
/// everything.
pub fn gather(root: &Path, pattern: &str, exclude: bool) -> Result<Vec<Sample>> {
    let regex = Regex::new(pattern).with_context(|| format!("invalid filter pattern {:?}", pattern))?;
    let mut samples = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some(SAMPLE_EXTENSION) {
            continue;
        }

        let name = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();
        if regex.is_match(&name) == exclude {
            continue;
        }

        samples.push(Sample {
            path: path.to_path_buf(),
            name,
        });
    }

    samples.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(samples)
}
