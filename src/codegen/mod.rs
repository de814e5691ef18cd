//! Code Generation
//!
//! Drives one synchronous pass over the registry:
//! - families in registration order
//! - fields of each node type in declaration order (resolve)
//! - one type definition per node type (emit)
//! - one artifact per family (render), written only after all families render
//!
//! The first error aborts the run; nothing is written for a failed run.

pub mod emit;
pub mod names;
pub mod resolve;

use std::path::Path;

use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::registry::SchemaRegistry;
use crate::render::{self, Artifact, Bindings, Drift, MiniJinjaRenderer, Render, RenderBinding};
use crate::schema::{OwnershipPolicy, SchemaFamily};

use emit::{emit, TypeDefinition, NULL_CHILD_ERROR};
use resolve::{FieldKind, ResolvedField, Resolver};

/// A family with every node type resolved and emitted
#[derive(Debug, Clone)]
pub struct FamilyDefinitions {
    pub family: String,
    pub type_definitions: Vec<TypeDefinition>,
    /// Support imports, in first-use order
    pub imports: Vec<String>,
    /// Cross-family imports, one per referenced included family
    pub includes: Vec<String>,
}

impl FamilyDefinitions {
    pub fn bindings(&self) -> Bindings {
        Bindings::new(&self.family, self.type_definitions.clone(), self.includes.clone())
            .with_imports(self.imports.clone())
    }
}

/// Generator for every family of a registry
pub struct Generator<'a, R = MiniJinjaRenderer> {
    registry: &'a SchemaRegistry,
    config: GeneratorConfig,
    binding: RenderBinding<R>,
}

impl<'a> Generator<'a, MiniJinjaRenderer> {
    /// Generator using the configured template, or the embedded default
    pub fn new(registry: &'a SchemaRegistry, config: GeneratorConfig) -> Result<Self> {
        let binding = match &config.generator.template {
            Some(path) => RenderBinding::from_template_path(path)?,
            None => RenderBinding::with_default_template()?,
        };
        Ok(Self::with_binding(registry, config, binding))
    }
}

impl<'a, R: Render> Generator<'a, R> {
    pub fn with_binding(registry: &'a SchemaRegistry, config: GeneratorConfig, binding: RenderBinding<R>) -> Self {
        Self {
            registry,
            config,
            binding,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Resolve and emit every node type of `family`
    pub fn define(&self, family: &SchemaFamily) -> Result<FamilyDefinitions> {
        let policy = self.config.policy_for(family.name());
        let resolver = Resolver::new(self.registry, family);

        let mut type_definitions = Vec::with_capacity(family.node_types().len());
        let mut all_fields: Vec<ResolvedField> = Vec::new();

        for node_type in family.node_types() {
            let resolved = resolver.resolve(node_type, policy)?;
            debug!(
                family = family.name(),
                node_type = %node_type.name,
                fields = resolved.len(),
                %policy,
                "resolved node type"
            );
            type_definitions.push(emit(node_type, &resolved, family.name()));
            all_fields.extend(resolved);
        }

        Ok(FamilyDefinitions {
            family: family.name().to_string(),
            type_definitions,
            imports: self.support_imports(&all_fields),
            includes: self.include_imports(family, &all_fields),
        })
    }

    /// Render every family in memory, in registration order
    pub fn generate(&self) -> Result<Vec<Artifact>> {
        let mut artifacts = Vec::with_capacity(self.registry.families().len());
        for family in self.registry.families() {
            let definitions = self.define(family)?;
            artifacts.push(self.binding.render_family(family, &definitions.bindings())?);
        }
        Ok(artifacts)
    }

    /// Generate and write every artifact into `output_dir`
    pub fn write(&self, output_dir: &Path) -> Result<Vec<Artifact>> {
        let artifacts = self.generate()?;
        render::persist(&artifacts, output_dir)?;
        info!(
            count = artifacts.len(),
            output_dir = %output_dir.display(),
            "generation complete"
        );
        Ok(artifacts)
    }

    /// Generate without writing and report artifacts that differ on disk
    pub fn check(&self, output_dir: &Path) -> Result<Vec<Drift>> {
        let artifacts = self.generate()?;
        render::check(&artifacts, output_dir)
    }

    fn support_imports(&self, fields: &[ResolvedField]) -> Vec<String> {
        let mut imports: Vec<String> = Vec::new();
        let mut push = |import: String| {
            if !imports.contains(&import) {
                imports.push(import);
            }
        };

        if fields.iter().any(|f| f.policy() == Some(OwnershipPolicy::Shared)) {
            push("std::rc::Rc".to_string());
        }
        if fields.iter().any(ResolvedField::is_checked) {
            push(format!("{}::{}", self.config.generator.module_root, NULL_CHILD_ERROR));
        }
        for field in fields {
            if let FieldKind::Value { import: Some(path) } = &field.kind {
                push(path.clone());
            }
        }

        imports
    }

    fn include_imports(&self, family: &SchemaFamily, fields: &[ResolvedField]) -> Vec<String> {
        let mut includes = Vec::new();

        for include in family.includes() {
            let mut referenced: Vec<&str> = Vec::new();
            for field in fields {
                if let FieldKind::Tree { target, .. } = &field.kind {
                    if target.family() == include && !referenced.contains(&target.type_name()) {
                        referenced.push(target.type_name());
                    }
                }
            }

            if referenced.is_empty() {
                debug!(family = family.name(), include = %include, "include is never referenced");
                continue;
            }

            let module = format!("{}::{}", self.config.generator.module_root, names::to_snake_case(include));
            includes.push(match referenced.as_slice() {
                [single] => format!("{}::{}", module, single),
                many => format!("{}::{{{}}}", module, many.join(", ")),
            });
        }

        includes
    }
}
