//! Configuration management for the generator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (astgen.toml)
//! - Environment variables (ASTGEN__*)
//!
//! ## Example config file (astgen.toml):
//! ```toml
//! [generator]
//! policy = "exclusive"
//! module_root = "super"
//! template = "templates/family.rs.j2"
//!
//! [families]
//! Stmt = "shared"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::schema::OwnershipPolicy;

/// Main configuration for a generation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Generator settings
    #[serde(default)]
    pub generator: GeneratorSettings,

    /// Per-family ownership policy, keyed by family name
    #[serde(default)]
    pub families: BTreeMap<String, OwnershipPolicy>,
}

/// Generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Ownership policy for tree references with no explicit declaration
    #[serde(default)]
    pub policy: OwnershipPolicy,

    /// Template overriding the embedded default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Path prefix under which sibling family modules are reachable
    #[serde(default = "default_module_root")]
    pub module_root: String,
}

fn default_module_root() -> String {
    "super".to_string()
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            policy: OwnershipPolicy::default(),
            template: None,
            module_root: default_module_root(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a required file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["astgen.toml", ".astgen.toml", "config/astgen.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "lox", "astgen") {
            let xdg_config = config_dir.config_dir().join("astgen.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("ASTGEN")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Run-level policy for a family: its own entry, else the global policy
    ///
    /// Family keys match case-insensitively since config sources may fold case.
    /// An exact key wins; otherwise the first matching key in sorted order.
    pub fn policy_for(&self, family: &str) -> OwnershipPolicy {
        self.families
            .get(family)
            .or_else(|| {
                self.families
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(family))
                    .map(|(_, policy)| policy)
            })
            .copied()
            .unwrap_or(self.generator.policy)
    }
}
