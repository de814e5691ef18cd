//! Benchmark runner
//!
//! Runs every benchmark file a fixed number of times and reports wall-clock
//! statistics in seconds.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Result};

use crate::discover::Sample;
use crate::interpreter;

/// Summary statistics of a set of durations, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub min: f64,
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

impl Stats {
    /// `None` for an empty sample set
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };
        let variance = sorted.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;

        Some(Self {
            min: sorted[0],
            mean,
            median,
            max: sorted[n - 1],
            std_dev: variance.sqrt(),
        })
    }
}

/// Timings of one benchmark file
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub name: String,
    /// Seconds per iteration, in run order
    pub durations: Vec<f64>,
    pub stats: Stats,
}

pub fn run_benchmarks(
    interpreter: &Path,
    samples: &[Sample],
    iterations: usize,
    verbose: bool,
    out: &mut impl Write,
) -> Result<Vec<BenchReport>> {
    if iterations == 0 {
        bail!("at least one iteration is required");
    }

    let mut reports = Vec::with_capacity(samples.len());

    for sample in samples {
        writeln!(out, "Running benchmark file '{}'...", sample.name)?;
        let mut durations = Vec::with_capacity(iterations);

        for i in 0..iterations {
            if verbose {
                write!(out, "  - Iteration {} of {}:", i + 1, iterations)?;
                out.flush()?;
            }
            let seconds = interpreter::run(interpreter, &sample.path)?.elapsed.as_secs_f64();
            durations.push(seconds);
            if verbose {
                writeln!(out, " {:>4.3} s", seconds)?;
            }
        }

        let Some(stats) = Stats::from_samples(&durations) else {
            bail!("no timings recorded for {}", sample.name);
        };
        writeln!(out, "Results:")?;
        writeln!(out, "* Min. = {:>4.3} s", stats.min)?;
        writeln!(out, "* Mean = {:>4.3} s", stats.mean)?;
        writeln!(out, "* Med. = {:>4.3} s", stats.median)?;
        writeln!(out, "* Max. = {:>4.3} s", stats.max)?;
        writeln!(out, "* Std. = {:>4.3} s", stats.std_dev)?;

        reports.push(BenchReport {
            name: sample.name.clone(),
            durations,
            stats,
        });
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_stats_odd_count() {
        let stats = Stats::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0, 3.0]).unwrap();
        assert!(close(stats.min, 2.0));
        assert!(close(stats.max, 9.0));
        assert!(close(stats.median, 4.0));
        assert!(close(stats.mean, 43.0 / 9.0));
    }

    #[test]
    fn test_stats_population_std_dev() {
        let stats = Stats::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!(close(stats.mean, 5.0));
        assert!(close(stats.median, 4.5));
        assert!(close(stats.std_dev, 2.0));
    }

    #[test]
    fn test_stats_empty_and_single() {
        assert!(Stats::from_samples(&[]).is_none());
        let stats = Stats::from_samples(&[0.25]).unwrap();
        assert_eq!(stats.min, 0.25);
        assert_eq!(stats.median, 0.25);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let mut out = Vec::new();
        assert!(run_benchmarks(Path::new("lox"), &[], 0, false, &mut out).is_err());
    }
}
