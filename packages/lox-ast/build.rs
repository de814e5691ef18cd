//! Generates the `Expr` and `Stmt` modules into `OUT_DIR`.
//!
//! Uses the default generator configuration so local `astgen.toml` files do
//! not change what the crate compiles.

use std::path::PathBuf;

use anyhow::Context;
use lox_astgen::{lox_registry, Generator, GeneratorConfig};

fn main() -> anyhow::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").context("OUT_DIR not set")?);
    let registry = lox_registry()?;
    let generator = Generator::new(&registry, GeneratorConfig::default())?;
    generator.write(&out_dir)?;
    Ok(())
}
