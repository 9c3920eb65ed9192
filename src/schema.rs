//! Declarative schema model consumed by the generator.
//!
//! Declarations describe server-side data shapes: plain records, enums, and
//! serializers. They carry only what the generator needs — member names,
//! declared types, nested references — and nothing about validation or
//! persistence. Everything here is a closed tagged variant, so adding a new
//! field kind or type shape is a compile-time-checked extension point.

/// The generic container kind of a composite type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Sequence,
    Tuple,
    Mapping,
    Union,
    Literal,
}

/// A literal value inside a literal-set type or a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl LiteralValue {
    /// Render the TypeScript literal form: string values are quoted,
    /// numerals and booleans render bare.
    pub fn ts_literal(&self) -> String {
        match self {
            LiteralValue::Str(value) => format!("'{value}'"),
            LiteralValue::Int(value) => value.to_string(),
            LiteralValue::Bool(value) => value.to_string(),
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::Str(value.to_string())
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Int(value)
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::Int(value.into())
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Bool(value)
    }
}

/// Which kind of declaration a [`TypeRef`] points at.
///
/// The kind drives naming conventions downstream: serializer references have
/// their `Serializer` suffix stripped, enum references get an `.enum` infix
/// in their output filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Record,
    Enum,
    Serializer,
}

/// A reference to another user-defined type (a future generated unit).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: String,
    pub kind: RefKind,
}

impl TypeRef {
    pub fn new(name: impl Into<String>, kind: RefKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A source-language type expression.
///
/// May be a primitive, a user-defined reference, or a composite generic
/// (sequence, mapping, union, literal-set, annotated wrapper). The bare
/// collection variants model argument-less `list`/`tuple`/`dict`
/// declarations, which degrade to permissive fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    // Primitives
    Int,
    Float,
    Str,
    Bool,
    Date,
    DateTime,
    /// The "no value" type; one branch of an optional union.
    None,
    Any,

    // Argument-less collections
    BareList,
    BareTuple,
    BareDict,

    // Reference to another declared record or enum
    Ref(TypeRef),

    // Composites
    Sequence(Vec<SchemaType>),
    Tuple(Vec<SchemaType>),
    Mapping(Vec<SchemaType>),
    Union(Vec<SchemaType>),
    Literal(Vec<LiteralValue>),
    Annotated(Box<SchemaType>),
}

impl SchemaType {
    /// Reference to a declared record type.
    pub fn record(name: impl Into<String>) -> Self {
        SchemaType::Ref(TypeRef::new(name, RefKind::Record))
    }

    /// Reference to a declared enum type.
    pub fn enumeration(name: impl Into<String>) -> Self {
        SchemaType::Ref(TypeRef::new(name, RefKind::Enum))
    }

    /// `T | None` — the optional form of `inner`.
    pub fn optional(inner: SchemaType) -> Self {
        SchemaType::Union(vec![inner, SchemaType::None])
    }

    /// Whether this type has a generic origin to expand.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            SchemaType::Sequence(_)
                | SchemaType::Tuple(_)
                | SchemaType::Mapping(_)
                | SchemaType::Union(_)
                | SchemaType::Literal(_)
                | SchemaType::Annotated(_)
        )
    }
}

/// `FooSerializer` -> `Foo`; names without the suffix pass through.
pub fn strip_serializer_suffix(name: &str) -> &str {
    name.strip_suffix("Serializer").unwrap_or(name)
}

/// One member value of an [`EnumDecl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumValue {
    Int(i64),
    Str(String),
}

impl From<i64> for EnumValue {
    fn from(value: i64) -> Self {
        EnumValue::Int(value)
    }
}

impl From<i32> for EnumValue {
    fn from(value: i32) -> Self {
        EnumValue::Int(value.into())
    }
}

impl From<&str> for EnumValue {
    fn from(value: &str) -> Self {
        EnumValue::Str(value.to_string())
    }
}

/// A declared enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    pub name: String,
    /// Module path of the declaration, used for the `Source:` header line.
    pub module: String,
    /// Members in declaration order.
    pub members: Vec<(String, EnumValue)>,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            members: Vec::new(),
        }
    }

    pub fn member(mut self, name: impl Into<String>, value: impl Into<EnumValue>) -> Self {
        self.members.push((name.into(), value.into()));
        self
    }

    pub fn qualified_name(&self) -> String {
        qualified(&self.module, &self.name)
    }
}

/// A declared record type: named members with [`SchemaType`] declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDecl {
    pub name: String,
    pub module: String,
    /// Members in declaration order.
    pub fields: Vec<(String, SchemaType)>,
}

impl RecordDecl {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: SchemaType) -> Self {
        self.fields.push((name.into(), ty));
        self
    }

    pub fn qualified_name(&self) -> String {
        qualified(&self.module, &self.name)
    }
}

/// The runtime kind of a serializer field.
///
/// Scalar kinds map through a fixed table to TypeScript primitives. `List`
/// and `Map` wrap an inner kind; `Nested`/`NestedList` reference another
/// serializer declaration by name; `Enum` binds an explicit enum
/// declaration; `Choice` carries its declared values inline. `ManyRelated`
/// has no explicit type hint and always fails the build.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Boolean,
    Char,
    Date,
    DateTime,
    Decimal,
    Email,
    FilePath,
    Float,
    HStore,
    Integer,
    IpAddress,
    Json,
    Method,
    MultipleChoice,
    NullBoolean,
    ReadOnly,
    Regex,
    Slug,
    Time,
    Url,
    Uuid,

    /// Enumerated choices declared inline, without an enum binding.
    Choice(Vec<LiteralValue>),
    /// Field bound to a declared enum type.
    Enum(String),
    /// Nested single-record serializer.
    Nested(String),
    /// Nested list-of-records serializer (`many`).
    NestedList(String),
    /// List wrapper around a child field.
    List(Box<FieldKind>),
    /// Mapping wrapper around a child field, string-indexed.
    Map(Box<FieldKind>),
    /// Multi-select relation without an explicit type hint.
    ManyRelated,
}

/// One named field of a [`SerializerDecl`].
#[derive(Debug, Clone, PartialEq)]
pub struct SerializerField {
    pub name: String,
    pub kind: FieldKind,
}

/// A declared serializer: an ordered list of named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializerDecl {
    pub name: String,
    pub module: String,
    /// Fields in declaration order.
    pub fields: Vec<SerializerField>,
}

impl SerializerDecl {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(SerializerField {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn qualified_name(&self) -> String {
        qualified(&self.module, &self.name)
    }
}

/// Any declaration the builder can target.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    Record(RecordDecl),
    Enum(EnumDecl),
    Serializer(SerializerDecl),
}

impl TypeDecl {
    /// The intrinsic declaration name.
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Record(decl) => &decl.name,
            TypeDecl::Enum(decl) => &decl.name,
            TypeDecl::Serializer(decl) => &decl.name,
        }
    }

    pub fn qualified_name(&self) -> String {
        match self {
            TypeDecl::Record(decl) => decl.qualified_name(),
            TypeDecl::Enum(decl) => decl.qualified_name(),
            TypeDecl::Serializer(decl) => decl.qualified_name(),
        }
    }
}

impl From<RecordDecl> for TypeDecl {
    fn from(decl: RecordDecl) -> Self {
        TypeDecl::Record(decl)
    }
}

impl From<EnumDecl> for TypeDecl {
    fn from(decl: EnumDecl) -> Self {
        TypeDecl::Enum(decl)
    }
}

impl From<SerializerDecl> for TypeDecl {
    fn from(decl: SerializerDecl) -> Self {
        TypeDecl::Serializer(decl)
    }
}

fn qualified(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{module}::{name}")
    }
}
