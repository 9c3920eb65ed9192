//! Code unit assembly: enums and interfaces from declarations.
//!
//! Each builder produces a [`TsUnit`] — the rendered body text plus the
//! dependency set the incremental builder later turns into import
//! statements.

use heck::{ToLowerCamelCase, ToUpperCamelCase};

use crate::error::Error;
use crate::registry::TypeRegistry;
use crate::schema::{
    EnumDecl, EnumValue, FieldKind, RecordDecl, RefKind, SerializerDecl, TypeRef,
    strip_serializer_suffix,
};
use crate::translate::build_type;

const UNION_SEPARATOR: &str = " | ";

/// The kind of a generated code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Interface,
    Enum,
}

/// One generated type definition and its dependency set.
#[derive(Debug, Clone, PartialEq)]
pub struct TsUnit {
    /// Display name, after any alias override.
    pub name: String,
    pub kind: UnitKind,
    /// Fully-qualified name of the owning declaration.
    pub source: String,
    /// The `export interface`/`export enum` block.
    pub body: String,
    /// Referenced user-defined types, first-seen order.
    pub dependencies: Vec<TypeRef>,
}

/// Build a TypeScript enum from a declared enum.
///
/// Numeric members render the raw numeral, text members are quoted. Member
/// names are upper-camel-cased unless `enforce_uppercase` forces them
/// upper-case wholesale.
///
/// # Example
///
/// ```
/// use tsgen::{EnumDecl, build_enum};
///
/// let decl = EnumDecl::new("ButtonType", "app::models")
///     .member("PRIMARY", "primary")
///     .member("DISABLED_PRIMARY", "primary disabled");
/// let unit = build_enum(&decl, None, false);
/// assert!(unit.body.contains("DisabledPrimary = 'primary disabled'"));
/// ```
pub fn build_enum(decl: &EnumDecl, alias: Option<&str>, enforce_uppercase: bool) -> TsUnit {
    let mut members = Vec::new();
    for (member_name, value) in &decl.members {
        let name = if enforce_uppercase {
            member_name.to_uppercase()
        } else {
            member_name.to_upper_camel_case()
        };
        let value = match value {
            EnumValue::Int(value) => value.to_string(),
            EnumValue::Str(value) => format!("'{value}'"),
        };
        members.push(format!("  {name} = {value}"));
    }
    let name = alias.unwrap_or(&decl.name).to_string();
    let body = format!("export enum {name} {{\n{}\n}}", members.join(",\n"));
    TsUnit {
        name,
        kind: UnitKind::Enum,
        source: decl.qualified_name(),
        body,
        dependencies: Vec::new(),
    }
}

/// Build a TypeScript interface from a declared record.
///
/// Each member's declared type runs through the tokenize/rebuild
/// translator; member names convert to lower camel case.
pub fn build_interface_from_record(
    decl: &RecordDecl,
    registry: &TypeRegistry,
    alias: Option<&str>,
) -> TsUnit {
    let mut lines = Vec::new();
    let mut dependencies: Vec<TypeRef> = Vec::new();
    for (field_name, field_type) in &decl.fields {
        let (field_text, field_deps) = build_type(field_type, registry);
        merge_dependencies(&mut dependencies, field_deps);
        lines.push(format!(
            "  {}: {field_text};",
            field_name.to_lower_camel_case()
        ));
    }
    let name = alias.unwrap_or(&decl.name).to_string();
    TsUnit {
        body: interface_body(&name, &lines),
        name,
        kind: UnitKind::Interface,
        source: decl.qualified_name(),
        dependencies,
    }
}

/// Build a TypeScript interface from a declared serializer.
///
/// Fields resolve through the closed [`FieldKind`] dispatch: scalar kinds
/// map via a fixed table, nested serializers and enum bindings become
/// dependencies, composite wrappers unwrap to their innermost child. A
/// `ManyRelated` field aborts with [`Error::UntypedField`] rather than
/// emitting a wrong guess.
///
/// The unit name defaults to the declaration name with its `Serializer`
/// suffix stripped.
pub fn build_interface_from_serializer(
    decl: &SerializerDecl,
    registry: &TypeRegistry,
    alias: Option<&str>,
) -> Result<TsUnit, Error> {
    let mut lines = Vec::new();
    let mut dependencies: Vec<TypeRef> = Vec::new();
    for field in &decl.fields {
        let (field_text, field_deps) =
            resolve_field(&field.kind, registry).ok_or_else(|| Error::UntypedField {
                serializer: decl.name.clone(),
                field: field.name.clone(),
            })?;
        merge_dependencies(&mut dependencies, field_deps);
        lines.push(format!(
            "  {}: {field_text};",
            field.name.to_lower_camel_case()
        ));
    }
    let name = alias
        .unwrap_or_else(|| strip_serializer_suffix(&decl.name))
        .to_string();
    Ok(TsUnit {
        body: interface_body(&name, &lines),
        name,
        kind: UnitKind::Interface,
        source: decl.qualified_name(),
        dependencies,
    })
}

fn interface_body(name: &str, lines: &[String]) -> String {
    format!("export interface {name} {{\n{}\n}}", lines.join("\n"))
}

fn merge_dependencies(into: &mut Vec<TypeRef>, from: Vec<TypeRef>) {
    for dependency in from {
        if !into.contains(&dependency) {
            into.push(dependency);
        }
    }
}

enum Wrapper {
    List,
    Map,
}

/// Resolve one serializer field to its TypeScript text and dependencies.
///
/// `None` means the field has no explicit type hint (`ManyRelated`).
fn resolve_field(kind: &FieldKind, registry: &TypeRegistry) -> Option<(String, Vec<TypeRef>)> {
    // Peel composite wrappers, innermost child last.
    let mut wrappers = Vec::new();
    let mut leaf = kind;
    loop {
        match leaf {
            FieldKind::List(child) => {
                wrappers.push(Wrapper::List);
                leaf = child;
            }
            FieldKind::Map(child) => {
                wrappers.push(Wrapper::Map);
                leaf = child;
            }
            _ => break,
        }
    }

    let mut dependencies: Vec<TypeRef> = Vec::new();
    let mut text = match leaf {
        FieldKind::ManyRelated => return None,
        FieldKind::Choice(values) => values
            .iter()
            .map(|value| value.ts_literal())
            .collect::<Vec<_>>()
            .join(UNION_SEPARATOR),
        FieldKind::Enum(name) => {
            let reference = TypeRef::new(name.clone(), RefKind::Enum);
            let display = registry.display_name(&reference);
            dependencies.push(reference);
            display
        }
        FieldKind::Nested(name) => {
            let reference = TypeRef::new(name.clone(), RefKind::Serializer);
            let display = registry.display_name(&reference);
            dependencies.push(reference);
            display
        }
        FieldKind::NestedList(name) => {
            let reference = TypeRef::new(name.clone(), RefKind::Serializer);
            let display = registry.display_name(&reference);
            dependencies.push(reference);
            format!("{display}[]")
        }
        // Handled by the wrapper loop above.
        FieldKind::List(_) | FieldKind::Map(_) => unreachable!("wrappers are peeled"),
        scalar => scalar_type(scalar).to_string(),
    };

    // Wrap back outward, innermost first.
    for wrapper in wrappers.iter().rev() {
        text = match wrapper {
            Wrapper::List => format!("{text}[]"),
            Wrapper::Map => format!("{{[index: string]: {text}}}"),
        };
    }

    Some((text, dependencies))
}

/// The fixed scalar field-kind table.
fn scalar_type(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Boolean => "boolean",
        FieldKind::Char
        | FieldKind::Decimal
        | FieldKind::Email
        | FieldKind::FilePath
        | FieldKind::IpAddress
        | FieldKind::Regex
        | FieldKind::Slug
        | FieldKind::Time
        | FieldKind::Url
        | FieldKind::Uuid => "string",
        FieldKind::Date | FieldKind::DateTime => "Date",
        FieldKind::Float | FieldKind::Integer => "number",
        FieldKind::Json | FieldKind::Method | FieldKind::ReadOnly => "any",
        FieldKind::MultipleChoice => "any[]",
        FieldKind::NullBoolean => "boolean?",
        FieldKind::HStore => "{[index: string]: string?}",
        // Non-scalar kinds are dispatched before this table is consulted.
        _ => "any",
    }
}
