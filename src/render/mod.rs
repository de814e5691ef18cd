//! Render Binding
//!
//! Hands resolved type definitions to a render capability and persists the
//! result. The capability is the narrow [`Render`] trait: template source and
//! bindings in, text out. Artifacts are only written once every family has
//! rendered, so a failing run leaves the output directory untouched.

pub mod jinja;

pub use jinja::MiniJinjaRenderer;

use std::fs;
use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir};
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use tracing::{info, warn};

use crate::checksum::Checksum;
use crate::codegen::emit::TypeDefinition;
use crate::codegen::names::{artifact_file_name, to_snake_case};
use crate::error::{AstGenError, Result};
use crate::schema::SchemaFamily;

static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Embedded template used when no template path is configured
pub const DEFAULT_TEMPLATE: &str = "family.rs.j2";

/// Text templating capability
pub trait Render {
    fn render(&self, template_source: &str, bindings: &Bindings) -> Result<String>;
}

/// Values exposed to the template for one family
#[derive(Debug, Clone, Serialize)]
pub struct Bindings {
    pub base_name: String,
    pub visitor_name: String,
    /// Parameter name used by visitor methods
    pub visitor_param: String,
    /// Support imports (pointer types, runtime error, value types)
    pub imports: Vec<String>,
    /// Imports of node types from included families
    pub includes: Vec<String>,
    pub type_definitions: Vec<TypeDefinition>,
}

impl Bindings {
    pub fn new(base_name: &str, type_definitions: Vec<TypeDefinition>, includes: Vec<String>) -> Self {
        Self {
            base_name: base_name.to_string(),
            visitor_name: format!("{}Visitor", base_name),
            visitor_param: to_snake_case(base_name),
            imports: Vec::new(),
            includes,
            type_definitions,
        }
    }

    pub fn with_imports(mut self, imports: Vec<String>) -> Self {
        self.imports = imports;
        self
    }
}

/// One rendered family, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub family: String,
    pub file_name: String,
    pub contents: String,
    pub checksum: Checksum,
}

impl Artifact {
    pub fn new(family: &str, contents: String) -> Self {
        let checksum = Checksum::of(&contents);
        Self {
            family: family.to_string(),
            file_name: artifact_file_name(family),
            contents,
            checksum,
        }
    }

    pub fn path_in(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.file_name)
    }

    /// Hidden sibling the artifact is staged in before it replaces `path_in`
    fn staging_path_in(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!(".{}.tmp", self.file_name))
    }

    fn stage(&self, output_dir: &Path) -> Result<PathBuf> {
        let staged = self.staging_path_in(output_dir);
        fs::write(&staged, &self.contents)?;
        Ok(staged)
    }

    fn commit(&self, staged: &Path, output_dir: &Path) -> Result<PathBuf> {
        let path = self.path_in(output_dir);
        let previous = fs::read_to_string(&path).ok().map(|c| Checksum::of(&c));
        fs::rename(staged, &path)?;

        let unchanged = previous.as_ref() == Some(&self.checksum);
        info!(
            family = %self.family,
            path = %path.display(),
            checksum = self.checksum.short(),
            unchanged,
            "wrote artifact"
        );
        Ok(path)
    }
}

/// An artifact whose file on disk differs from what would be generated
#[derive(Debug, Clone)]
pub struct Drift {
    pub file_name: String,
    pub expected: Checksum,
    /// Checksum on disk, `None` when the file is missing
    pub actual: Option<Checksum>,
    /// Line diff from the file on disk to the generated text
    pub diff: String,
}

/// Binds a renderer to a template source
pub struct RenderBinding<R = MiniJinjaRenderer> {
    renderer: R,
    template_source: String,
}

impl RenderBinding<MiniJinjaRenderer> {
    /// The embedded default template with the minijinja renderer
    pub fn with_default_template() -> Result<Self> {
        let source = TEMPLATES
            .get_file(DEFAULT_TEMPLATE)
            .and_then(|file| file.contents_utf8())
            .ok_or_else(|| {
                AstGenError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("embedded template {} is missing", DEFAULT_TEMPLATE),
                ))
            })?;
        Ok(Self::new(MiniJinjaRenderer::new(), source.to_string()))
    }

    /// A template read from disk with the minijinja renderer
    ///
    /// A missing or unreadable template is fatal.
    pub fn from_template_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = fs::read_to_string(path.as_ref())?;
        Ok(Self::new(MiniJinjaRenderer::new(), source))
    }
}

impl<R: Render> RenderBinding<R> {
    pub fn new(renderer: R, template_source: String) -> Self {
        Self {
            renderer,
            template_source,
        }
    }

    pub fn template_source(&self) -> &str {
        &self.template_source
    }

    /// Render one family into an artifact named after it
    pub fn render_family(&self, family: &SchemaFamily, bindings: &Bindings) -> Result<Artifact> {
        let contents = self.renderer.render(&self.template_source, bindings)?;
        let artifact = Artifact::new(family.name(), contents);
        info!(
            family = family.name(),
            node_types = bindings.type_definitions.len(),
            checksum = artifact.checksum.short(),
            "rendered family"
        );
        Ok(artifact)
    }
}

/// Write every artifact into `output_dir`, creating it if needed
///
/// Every artifact is staged next to its target first. Targets are only
/// replaced once all of them staged, so a failed write leaves the previous
/// files in place.
pub fn persist(artifacts: &[Artifact], output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let mut staged = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        match artifact.stage(output_dir) {
            Ok(path) => staged.push(path),
            Err(e) => {
                discard(&staged);
                return Err(e);
            }
        }
    }

    let mut written = Vec::with_capacity(artifacts.len());
    for (index, artifact) in artifacts.iter().enumerate() {
        match artifact.commit(&staged[index], output_dir) {
            Ok(path) => written.push(path),
            Err(e) => {
                discard(&staged[index..]);
                return Err(e);
            }
        }
    }
    Ok(written)
}

fn discard(staged: &[PathBuf]) {
    for path in staged {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "could not remove staged artifact");
        }
    }
}

/// Compare artifacts against the files in `output_dir` without writing
pub fn check(artifacts: &[Artifact], output_dir: &Path) -> Result<Vec<Drift>> {
    let mut drifts = Vec::new();

    for artifact in artifacts {
        let path = artifact.path_in(output_dir);
        let on_disk = match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        if on_disk.as_deref().is_some_and(|c| artifact.checksum.verify(c)) {
            continue;
        }

        warn!(path = %path.display(), "artifact out of date");
        drifts.push(Drift {
            file_name: artifact.file_name.clone(),
            expected: artifact.checksum.clone(),
            actual: on_disk.as_deref().map(Checksum::of),
            diff: line_diff(on_disk.as_deref().unwrap_or(""), &artifact.contents),
        });
    }

    Ok(drifts)
}

fn line_diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut output = String::new();

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => continue,
        };
        output.push(sign);
        output.push_str(change.value());
        if !change.value().ends_with('\n') {
            output.push('\n');
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use tempfile::tempdir;

    struct EchoRenderer;

    impl Render for EchoRenderer {
        fn render(&self, template_source: &str, bindings: &Bindings) -> Result<String> {
            Ok(template_source.replace("BASE", &bindings.base_name))
        }
    }

    fn family() -> SchemaFamily {
        let mut registry = SchemaRegistry::new();
        let family = registry.define_family("Expr", vec![], &[]).unwrap().clone();
        family
    }

    #[test]
    fn test_default_template_is_embedded() {
        let binding = RenderBinding::with_default_template().unwrap();
        assert!(binding.template_source().contains("{{ visitor_name }}"));
    }

    #[test]
    fn test_missing_template_is_io_error() {
        let dir = tempdir().unwrap();
        let result = RenderBinding::from_template_path(dir.path().join("missing.j2"));
        assert!(matches!(result, Err(AstGenError::Io(_))));
    }

    #[test]
    fn test_render_family_names_artifact() {
        let binding = RenderBinding::new(EchoRenderer, "trait BASE {}\n".to_string());
        let bindings = Bindings::new("Expr", vec![], vec![]);
        let artifact = binding.render_family(&family(), &bindings).unwrap();

        assert_eq!(artifact.file_name, "expr.rs");
        assert_eq!(artifact.contents, "trait Expr {}\n");
        assert!(artifact.checksum.verify("trait Expr {}\n"));
    }

    #[test]
    fn test_persist_overwrites() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("expr.rs"), "stale").unwrap();

        let artifact = Artifact::new("Expr", "fresh\n".to_string());
        let paths = persist(&[artifact], dir.path()).unwrap();

        assert_eq!(paths, vec![dir.path().join("expr.rs")]);
        assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "fresh\n");
        assert!(!dir.path().join(".expr.rs.tmp").exists());
    }

    #[test]
    fn test_failed_persist_keeps_previous_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("expr.rs"), "stale").unwrap();
        // A directory in the staging slot makes the second artifact fail.
        fs::create_dir(dir.path().join(".stmt.rs.tmp")).unwrap();

        let artifacts = [
            Artifact::new("Expr", "fresh\n".to_string()),
            Artifact::new("Stmt", "fresh\n".to_string()),
        ];
        assert!(matches!(persist(&artifacts, dir.path()), Err(AstGenError::Io(_))));

        assert_eq!(fs::read_to_string(dir.path().join("expr.rs")).unwrap(), "stale");
        assert!(!dir.path().join(".expr.rs.tmp").exists());
        assert!(!dir.path().join("stmt.rs").exists());
    }

    #[test]
    fn test_check_reports_drift() {
        let dir = tempdir().unwrap();
        let current = Artifact::new("Expr", "a\nb\n".to_string());
        let missing = Artifact::new("Stmt", "c\n".to_string());
        fs::write(dir.path().join("expr.rs"), "a\nb\n").unwrap();

        let drifts = check(&[current.clone(), missing], dir.path()).unwrap();
        assert_eq!(drifts.len(), 1);
        assert_eq!(drifts[0].file_name, "stmt.rs");
        assert!(drifts[0].actual.is_none());
        assert_eq!(drifts[0].diff, "+c\n");

        fs::write(dir.path().join("expr.rs"), "a\nx\n").unwrap();
        let drifts = check(&[current], dir.path()).unwrap();
        assert_eq!(drifts.len(), 1);
        assert_eq!(drifts[0].diff, "-x\n+b\n");
    }
}
