//! Syntax Tree Generator CLI
//!
//! Generates one module per node family into an output directory.
//!
//! Usage:
//!   generate-ast src/ast
//!   generate-ast src/ast --schema schemas/lox.json --policy shared
//!   generate-ast src/ast --check

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lox_astgen::{lox_registry, Generator, GeneratorConfig, OwnershipPolicy, SchemaRegistry};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "generate-ast")]
#[command(about = "Generate syntax tree node families from their schemas")]
struct Cli {
    /// Directory receiving one module per family
    output_dir: PathBuf,

    /// JSON schema document to generate instead of the built-in Lox families
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Configuration file layered over the default locations
    #[arg(short, long)]
    config: Option<String>,

    /// Ownership policy for tree references without a family or field policy
    #[arg(short, long)]
    policy: Option<OwnershipPolicy>,

    /// Compare with the files on disk instead of writing
    #[arg(long)]
    check: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `false` when `--check` found drifted artifacts
fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = GeneratorConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    if let Some(policy) = cli.policy {
        config.generator.policy = policy;
    }

    let registry = match &cli.schema {
        Some(path) => SchemaRegistry::load(path).with_context(|| format!("loading schema {}", path.display()))?,
        None => lox_registry()?,
    };

    let generator = Generator::new(&registry, config)?;

    if cli.check {
        let drifts = generator.check(&cli.output_dir)?;
        if drifts.is_empty() {
            println!("✅ {} artifacts up to date", registry.families().len());
            return Ok(true);
        }
        for drift in &drifts {
            match &drift.actual {
                Some(actual) => println!(
                    "⚠️  {} is out of date ({} on disk, {} generated)",
                    drift.file_name,
                    actual.short(),
                    drift.expected.short()
                ),
                None => println!("⚠️  {} is missing", drift.file_name),
            }
            print!("{}", drift.diff);
        }
        return Ok(false);
    }

    for artifact in generator.write(&cli.output_dir)? {
        println!(
            "📝 {} -> {}",
            artifact.family,
            artifact.path_in(&cli.output_dir).display()
        );
    }
    Ok(true)
}
