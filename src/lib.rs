//! # tsgen
//!
//! TypeScript definition generator for declarative schema types. Given
//! server-side data-shape declarations — records, enums, serializers —
//! this crate produces `export interface` / `export enum` blocks, resolves
//! cross-references into relative import statements, and writes them to a
//! content-addressed output tree that skips unchanged files.
//!
//! ## Features
//!
//! - Two-pass type translation: a work-stack tokenizer flattens arbitrarily
//!   nested generics (sequences, mappings, unions, literal-sets, annotated
//!   wrappers) and a rebuilder synthesizes the TypeScript expression
//! - Nullable unions collapse to the optional-suffix form (`boolean?`)
//! - Dependency tracking per unit, turned into sorted import statements
//!   with relative paths between output locations
//! - SHA-256 content digests embedded in each file header; rebuilds with
//!   identical output are skipped, preserving modification times
//! - Caller-owned [`TypeRegistry`] for display-name overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use tsgen::{FieldKind, SerializerDecl, TypeRegistry, build_interface_from_serializer};
//!
//! let decl = SerializerDecl::new("PathSerializer", "app::serializers")
//!     .field("name", FieldKind::Char)
//!     .field("suffixes", FieldKind::List(Box::new(FieldKind::Char)))
//!     .field("is_directory", FieldKind::Boolean);
//!
//! let unit = build_interface_from_serializer(&decl, &TypeRegistry::new(), None).unwrap();
//! assert_eq!(
//!     unit.body,
//!     "export interface Path {\n  name: string;\n  suffixes: string[];\n  isDirectory: boolean;\n}"
//! );
//! ```
//!
//! ### Building an output tree
//!
//! ```no_run
//! use tsgen::{BuilderConfig, EnumDecl, TypeRegistry, TypeScriptBuilder, build};
//!
//! let config = BuilderConfig {
//!     build_dir: "frontend/src/app/types".into(),
//!     tasks: vec![
//!         build(EnumDecl::new("PermissionFlag", "app::models").member("EE", 1))
//!             .enforce_uppercase(),
//!     ],
//! };
//! TypeScriptBuilder::new(config, TypeRegistry::new()).build_all().unwrap();
//! ```
//!
//! ## Type Mappings
//!
//! | Declared type | TypeScript |
//! |---------------|-----------|
//! | `Int`, `Float` | `number` |
//! | `Str` | `string` |
//! | `Bool` | `boolean` |
//! | `Date`, `DateTime` | `Date` |
//! | `Any` | `any` |
//! | `Sequence<T>`, `Tuple<T, …>` | `Array<T>` |
//! | `Mapping<K, V>` | `{[key: K]: V}` |
//! | `Union<T, None>` | `T?` |
//! | `Union<T, U>` | `T \| U` |
//! | `Literal('a', 'b')` | `'a' \| 'b'` |
//! | bare `list`/`tuple` | `any[]` |
//! | bare `dict` | `object` |
//! | user reference | registry-resolved name + import |
//!
//! Unsupported shapes degrade to `any`/`object` rather than erroring; the
//! one hard stop is a multi-select relation field without an explicit type
//! hint, which fails the build instead of guessing.

mod builder;
mod error;
mod generator;
pub mod registry;
mod schema;
mod translate;

pub use builder::{
    BuildOptions, BuildTask, BuilderConfig, TypeScriptBuilder, build, relative_import_path,
};
pub use error::Error;
pub use generator::{
    TsUnit, UnitKind, build_enum, build_interface_from_record, build_interface_from_serializer,
};
pub use registry::TypeRegistry;
pub use schema::{
    EnumDecl, EnumValue, FieldKind, LiteralValue, Origin, RecordDecl, RefKind, SchemaType,
    SerializerDecl, SerializerField, TypeDecl, TypeRef, strip_serializer_suffix,
};
pub use translate::{Token, build_type, rebuild, tokenize};
