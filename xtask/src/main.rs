mod bench;
mod discover;
mod header;
mod interpreter;
mod suite;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use suite::SuiteOptions;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Test and benchmark harnesses for Lox interpreters")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run test files and check their output and exit code
    Test {
        /// Path to the interpreter under test
        interpreter: PathBuf,
        /// Regex to filter tests with
        #[arg(default_value = "")]
        pattern: String,
        /// Display detail in failed tests
        #[arg(short, long)]
        verbose: bool,
        /// Ignore interpreter return value
        #[arg(short, long)]
        ignore_retval: bool,
        /// Exclude tests matching the regex
        #[arg(short = 'x', long)]
        exclude: bool,
        /// Directory searched for test files
        #[arg(long, default_value = "tests/lox")]
        dir: PathBuf,
    },
    /// Time the interpreter over benchmark files
    Bench {
        /// Path to the interpreter to benchmark
        interpreter: PathBuf,
        /// Regex to filter benchmarks with
        #[arg(default_value = "")]
        pattern: String,
        /// Print every iteration
        #[arg(short, long)]
        verbose: bool,
        /// Exclude benchmarks matching the regex
        #[arg(short = 'x', long)]
        exclude: bool,
        /// Runs per benchmark file
        #[arg(short = 'n', long, default_value_t = 100)]
        iterations: usize,
        /// Directory searched for benchmark files
        #[arg(long, default_value = "benchmarks")]
        dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns the process exit code
fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Test {
            interpreter,
            pattern,
            verbose,
            ignore_retval,
            exclude,
            dir,
        } => {
            let samples = discover::gather(&dir, &pattern, exclude)?;
            let options = SuiteOptions {
                verbose,
                ignore_status: ignore_retval,
            };
            let summary = suite::run_suite(&interpreter, &samples, options, &mut stdout)?;
            Ok(summary.failed.min(255) as i32)
        }

        Commands::Bench {
            interpreter,
            pattern,
            verbose,
            exclude,
            iterations,
            dir,
        } => {
            let samples = discover::gather(&dir, &pattern, exclude)?;
            bench::run_benchmarks(&interpreter, &samples, iterations, verbose, &mut stdout)?;
            Ok(0)
        }
    }
}
