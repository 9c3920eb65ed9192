//! Incremental builder: tasks, import resolution, digest-gated writes.
//!
//! Tasks run strictly sequentially in declared order. Each task renders its
//! unit, resolves one import per dependency (display name, output file,
//! relative path), digests the post-header content with SHA-256, and skips
//! the write when an existing file already embeds the same digest — so
//! unchanged units keep their modification times and only the header's
//! timestamp would ever differ.

use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use heck::ToKebabCase;
use sha2::{Digest, Sha256};

use crate::error::Error;
use crate::generator::{
    TsUnit, UnitKind, build_enum, build_interface_from_record, build_interface_from_serializer,
};
use crate::registry::TypeRegistry;
use crate::schema::{RefKind, TypeDecl};

const FILE_EXTENSION: &str = ".ts";
const ENUM_INFIX: &str = ".enum";
const DIGEST_PREFIX: &str = "// Digest: ";

/// Per-task output options.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Override the unit's display name.
    pub alias: Option<String>,
    /// Override the global build directory for this task.
    pub build_dir: Option<PathBuf>,
    /// Force enum member names upper-case instead of upper-camel-case.
    pub enforce_uppercase: bool,
}

/// One named generation task: a target declaration plus output options.
#[derive(Debug, Clone)]
pub struct BuildTask {
    pub decl: TypeDecl,
    pub options: BuildOptions,
}

impl BuildTask {
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.options.alias = Some(alias.into());
        self
    }

    pub fn build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.build_dir = Some(dir.into());
        self
    }

    pub fn enforce_uppercase(mut self) -> Self {
        self.options.enforce_uppercase = true;
        self
    }
}

/// Shortcut factory for a build task with default options.
///
/// # Example
///
/// ```
/// use tsgen::{EnumDecl, build};
///
/// let task = build(EnumDecl::new("PermissionFlag", "app::models").member("EE", 1))
///     .enforce_uppercase();
/// assert!(task.options.enforce_uppercase);
/// ```
pub fn build(decl: impl Into<TypeDecl>) -> BuildTask {
    BuildTask {
        decl: decl.into(),
        options: BuildOptions::default(),
    }
}

/// Builder configuration: the default output directory and the task list.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    pub build_dir: PathBuf,
    pub tasks: Vec<BuildTask>,
}

/// Builds all configured tasks into the output tree.
///
/// The registry must be fully populated before construction; the builder
/// treats it as read-only.
///
/// # Example
///
/// ```no_run
/// use tsgen::{
///     BuilderConfig, EnumDecl, TypeRegistry, TypeScriptBuilder, build,
/// };
///
/// let config = BuilderConfig {
///     build_dir: "frontend/src/app/types".into(),
///     tasks: vec![build(
///         EnumDecl::new("PermissionFlag", "app::models").member("EE", 1),
///     )],
/// };
/// TypeScriptBuilder::new(config, TypeRegistry::new())
///     .build_all()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct TypeScriptBuilder {
    config: BuilderConfig,
    registry: TypeRegistry,
}

impl TypeScriptBuilder {
    pub fn new(config: BuilderConfig, registry: TypeRegistry) -> Self {
        Self { config, registry }
    }

    /// Process every task in declared order.
    ///
    /// The first failing task aborts the run; files already written stay.
    pub fn build_all(&self) -> Result<(), Error> {
        for task in &self.config.tasks {
            self.build_task(task)?;
        }
        Ok(())
    }

    fn build_task(&self, task: &BuildTask) -> Result<(), Error> {
        let alias = task.options.alias.as_deref();
        let unit = match &task.decl {
            TypeDecl::Serializer(decl) => {
                build_interface_from_serializer(decl, &self.registry, alias)?
            }
            TypeDecl::Enum(decl) => build_enum(decl, alias, task.options.enforce_uppercase),
            TypeDecl::Record(decl) => build_interface_from_record(decl, &self.registry, alias),
        };

        let directory = task
            .options
            .build_dir
            .as_deref()
            .unwrap_or(&self.config.build_dir);
        fs::create_dir_all(directory)?;
        let path = directory.join(file_name(&unit.name, unit.kind == UnitKind::Enum));

        let content = self.render_content(&unit, &path);
        let digest = format!("{:x}", Sha256::digest(content.as_bytes()));

        if let Ok(existing) = fs::read_to_string(&path) {
            if embedded_digest(&existing) == Some(digest.as_str()) {
                tracing::debug!(path = %path.display(), "skipped {} (unchanged)", unit.name);
                return Ok(());
            }
        }

        let header = format!(
            "//\n// Generated by {} {}\n// Source: {}\n// Generated on: {}\n{DIGEST_PREFIX}{}\n\n",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            unit.source,
            Utc::now().to_rfc3339(),
            digest,
        );
        fs::write(&path, format!("{header}{content}"))?;
        tracing::info!(path = %path.display(), "wrote {}", unit.name);
        Ok(())
    }

    /// Import block plus body — exactly the bytes the digest covers.
    fn render_content(&self, unit: &TsUnit, unit_path: &Path) -> String {
        let mut imports: Vec<(String, PathBuf)> = unit
            .dependencies
            .iter()
            .map(|dependency| {
                let display = self.registry.display_name(dependency);
                let dep_path = self
                    .dependency_dir(&dependency.name)
                    .join(file_name(&display, dependency.kind == RefKind::Enum));
                (display, dep_path)
            })
            .collect();
        imports.sort();

        let mut content = String::new();
        for (display, dep_path) in &imports {
            let relative = relative_import_path(unit_path, dep_path);
            content.push_str(&format!("import {{ {display} }} from '{relative}';\n"));
        }
        if !imports.is_empty() {
            content.push('\n');
        }
        content.push_str(&unit.body);
        content.push('\n');
        content
    }

    /// A dependency's output directory: its own task's override when it has
    /// a task, else the global default.
    fn dependency_dir(&self, name: &str) -> &Path {
        self.config
            .tasks
            .iter()
            .find(|task| task.decl.name() == name)
            .and_then(|task| task.options.build_dir.as_deref())
            .unwrap_or(&self.config.build_dir)
    }
}

/// kebab-case filename, `.enum` infix for enum units.
fn file_name(display_name: &str, is_enum: bool) -> String {
    let infix = if is_enum { ENUM_INFIX } else { "" };
    format!("{}{infix}{FILE_EXTENSION}", display_name.to_kebab_case())
}

/// Extract the digest embedded in an existing output file's header.
///
/// Hand-edited or legacy files without a digest line return `None`, which
/// forces a rewrite.
fn embedded_digest(existing: &str) -> Option<&str> {
    existing
        .lines()
        .take(8)
        .find_map(|line| line.strip_prefix(DIGEST_PREFIX))
        .map(str::trim)
}

/// Relative path from one output file to another, in import form.
///
/// Pure segment arithmetic, no IO: find the common prefix, climb out of the
/// remaining directories of `from` with `../` (or stay with `./`), then
/// descend into the remainder of `to`.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use tsgen::relative_import_path;
///
/// assert_eq!(
///     relative_import_path(Path::new("/var/tmp/g/foo.ts"), Path::new("/var/tmp/g/bar.ts")),
///     "./bar.ts",
/// );
/// ```
pub fn relative_import_path(from: &Path, to: &Path) -> String {
    let from_segments = segments(from);
    let to_segments = segments(to);

    let mut divergence = 0;
    // The file names themselves never count as common.
    let limit = from_segments.len().saturating_sub(1).min(to_segments.len().saturating_sub(1));
    while divergence < limit && from_segments[divergence] == to_segments[divergence] {
        divergence += 1;
    }

    let levels = from_segments.len().saturating_sub(divergence + 1);
    let prefix = if levels == 0 {
        "./".to_string()
    } else {
        "../".repeat(levels)
    };
    format!("{prefix}{}", to_segments[divergence..].join("/"))
}

fn segments(path: &Path) -> Vec<&str> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(segment) => segment.to_str(),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EnumDecl, FieldKind, SerializerDecl};
    use pretty_assertions::assert_eq;

    fn tasks() -> Vec<BuildTask> {
        let parent = SerializerDecl::new("ParentSerializer", "app::serializers")
            .field("question_text", FieldKind::Char)
            .field("pub_date", FieldKind::DateTime);
        let child = SerializerDecl::new("ChildSerializer", "app::serializers")
            .field("id", FieldKind::Integer)
            .field("parent", FieldKind::Nested("ParentSerializer".into()))
            .field("parents", FieldKind::NestedList("ParentSerializer".into()));
        let flags = EnumDecl::new("PermissionFlag", "app::models")
            .member("EE", 1)
            .member("EW", 2)
            .member("ER", 4);
        vec![
            build(parent),
            build(child),
            build(flags).enforce_uppercase(),
        ]
    }

    fn builder(dir: &Path) -> TypeScriptBuilder {
        TypeScriptBuilder::new(
            BuilderConfig {
                build_dir: dir.to_path_buf(),
                tasks: tasks(),
            },
            TypeRegistry::new(),
        )
    }

    fn skip_header(content: &str) -> String {
        content.lines().skip(6).collect::<Vec<_>>().join("\n")
    }

    // ── Relative path arithmetic ──────────────────────────────────────

    #[test]
    fn test_relative_path_across_trees() {
        assert_eq!(
            relative_import_path(
                Path::new("/var/tmp/g/foo/bar.ts"),
                Path::new("/var/tmp/cache/g/bar/foo.ts"),
            ),
            "../../cache/g/bar/foo.ts",
        );
    }

    #[test]
    fn test_relative_path_into_subdirectory() {
        assert_eq!(
            relative_import_path(
                Path::new("/var/tmp/g/foo.ts"),
                Path::new("/var/tmp/g/foo/bar/foobar.ts"),
            ),
            "./foo/bar/foobar.ts",
        );
    }

    #[test]
    fn test_relative_path_same_directory() {
        assert_eq!(
            relative_import_path(Path::new("/var/tmp/g/foo.ts"), Path::new("/var/tmp/g/bar.ts")),
            "./bar.ts",
        );
    }

    // ── File layout ───────────────────────────────────────────────────

    #[test]
    fn test_file_names() {
        assert_eq!(file_name("FoobarChild", false), "foobar-child.ts");
        assert_eq!(file_name("PermissionFlag", true), "permission-flag.enum.ts");
        assert_eq!(file_name("Path", false), "path.ts");
    }

    #[test]
    fn test_build_all_writes_every_task() {
        let dir = tempfile::tempdir().unwrap();
        builder(dir.path()).build_all().unwrap();

        let names: Vec<String> = {
            let mut names: Vec<String> = fs::read_dir(dir.path())
                .unwrap()
                .map(|entry| entry.unwrap().file_name().into_string().unwrap())
                .collect();
            names.sort();
            names
        };
        assert_eq!(
            names,
            vec!["child.ts", "parent.ts", "permission-flag.enum.ts"]
        );
    }

    #[test]
    fn test_output_header_and_imports() {
        let dir = tempfile::tempdir().unwrap();
        builder(dir.path()).build_all().unwrap();

        let content = fs::read_to_string(dir.path().join("child.ts")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "//");
        assert!(lines[1].starts_with("// Generated by tsgen "));
        assert_eq!(lines[2], "// Source: app::serializers::ChildSerializer");
        assert!(lines[3].starts_with("// Generated on: "));
        assert!(lines[4].starts_with(DIGEST_PREFIX));
        assert_eq!(lines[4].len(), DIGEST_PREFIX.len() + 64);
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "import { Parent } from './parent.ts';");
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "export interface Child {");
    }

    #[test]
    fn test_digest_covers_post_header_bytes() {
        let dir = tempfile::tempdir().unwrap();
        builder(dir.path()).build_all().unwrap();

        let content = fs::read_to_string(dir.path().join("parent.ts")).unwrap();
        let embedded = embedded_digest(&content).unwrap().to_string();
        let post_header: String = content
            .splitn(7, '\n')
            .nth(6)
            .unwrap()
            .to_string();
        let recomputed = format!("{:x}", Sha256::digest(post_header.as_bytes()));
        assert_eq!(embedded, recomputed);
    }

    #[test]
    fn test_second_run_skips_unchanged_output() {
        let dir = tempfile::tempdir().unwrap();
        builder(dir.path()).build_all().unwrap();
        let first = fs::read_to_string(dir.path().join("parent.ts")).unwrap();

        builder(dir.path()).build_all().unwrap();
        let second = fs::read_to_string(dir.path().join("parent.ts")).unwrap();

        // A rewrite would refresh the header timestamp; byte-identical
        // content proves the digest check skipped the write.
        assert_eq!(first, second);
    }

    #[test]
    fn test_changed_declaration_forces_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        builder(dir.path()).build_all().unwrap();
        let before = fs::read_to_string(dir.path().join("parent.ts")).unwrap();

        let mut changed = tasks();
        if let TypeDecl::Serializer(decl) = &mut changed[0].decl {
            decl.fields.push(crate::schema::SerializerField {
                name: "closed".into(),
                kind: FieldKind::Boolean,
            });
        }
        TypeScriptBuilder::new(
            BuilderConfig {
                build_dir: dir.path().to_path_buf(),
                tasks: changed,
            },
            TypeRegistry::new(),
        )
        .build_all()
        .unwrap();

        let after = fs::read_to_string(dir.path().join("parent.ts")).unwrap();
        assert_ne!(before, after);
        assert!(after.contains("closed: boolean;"));
    }

    #[test]
    fn test_missing_digest_triggers_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        builder(dir.path()).build_all().unwrap();

        let path = dir.path().join("parent.ts");
        fs::write(&path, "export interface Parent {}\n").unwrap();
        builder(dir.path()).build_all().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(embedded_digest(&content).is_some());
        assert!(content.contains("questionText: string;"));
    }

    #[test]
    fn test_per_task_directory_override_affects_imports() {
        let dir = tempfile::tempdir().unwrap();
        let parent = SerializerDecl::new("ParentSerializer", "app::serializers")
            .field("question_text", FieldKind::Char);
        let child = SerializerDecl::new("ChildSerializer", "app::serializers")
            .field("parent", FieldKind::Nested("ParentSerializer".into()));
        let config = BuilderConfig {
            build_dir: dir.path().to_path_buf(),
            tasks: vec![
                build(parent).build_dir(dir.path().join("shared")),
                build(child),
            ],
        };
        TypeScriptBuilder::new(config, TypeRegistry::new())
            .build_all()
            .unwrap();

        assert!(dir.path().join("shared/parent.ts").exists());
        let content = fs::read_to_string(dir.path().join("child.ts")).unwrap();
        assert!(content.contains("import { Parent } from './shared/parent.ts';"));
    }

    #[test]
    fn test_alias_applies_to_filename_and_body() {
        let dir = tempfile::tempdir().unwrap();
        let child = SerializerDecl::new("ChildSerializer", "app::serializers")
            .field("id", FieldKind::Integer);
        let config = BuilderConfig {
            build_dir: dir.path().to_path_buf(),
            tasks: vec![build(child).alias("FoobarChild")],
        };
        TypeScriptBuilder::new(config, TypeRegistry::new())
            .build_all()
            .unwrap();

        let content = fs::read_to_string(dir.path().join("foobar-child.ts")).unwrap();
        assert_eq!(
            skip_header(&content),
            "export interface FoobarChild {\n  id: number;\n}"
        );
    }

    #[test]
    fn test_registry_alias_renames_dependency_imports() {
        let dir = tempfile::tempdir().unwrap();
        // The registry renames cross-references; the matching task alias
        // keeps the renamed unit's own file in step.
        let mut registry = TypeRegistry::new();
        registry.register("ParentSerializer", "FoobarParent");
        let parent = SerializerDecl::new("ParentSerializer", "app::serializers")
            .field("question_text", FieldKind::Char);
        let child = SerializerDecl::new("ChildSerializer", "app::serializers")
            .field("parent", FieldKind::Nested("ParentSerializer".into()));
        let config = BuilderConfig {
            build_dir: dir.path().to_path_buf(),
            tasks: vec![build(parent).alias("FoobarParent"), build(child)],
        };
        TypeScriptBuilder::new(config, registry).build_all().unwrap();

        assert!(dir.path().join("foobar-parent.ts").exists());
        let content = fs::read_to_string(dir.path().join("child.ts")).unwrap();
        assert!(content.contains("import { FoobarParent } from './foobar-parent.ts';"));
        assert!(content.contains("parent: FoobarParent;"));
    }

    #[test]
    fn test_untyped_field_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let group = SerializerDecl::new("GroupSerializer", "app::serializers")
            .field("members", FieldKind::ManyRelated);
        let config = BuilderConfig {
            build_dir: dir.path().to_path_buf(),
            tasks: vec![build(group)],
        };
        let err = TypeScriptBuilder::new(config, TypeRegistry::new())
            .build_all()
            .unwrap_err();
        assert!(matches!(err, Error::UntypedField { .. }));
        assert!(!dir.path().join("group.ts").exists());
    }

    #[test]
    fn test_embedded_digest_parsing() {
        assert_eq!(
            embedded_digest("//\n// Digest: abc123\n\nbody\n"),
            Some("abc123")
        );
        assert_eq!(embedded_digest("export interface Foo {}\n"), None);
    }
}
