//! The two-pass type translator: tokenize, then rebuild.
//!
//! A declared type is first flattened into a linear token stream (prefix
//! form: origin, open bracket, arguments, close bracket), then rebuilt into
//! a TypeScript type expression plus the set of user-defined types it
//! referenced. Both passes run on explicit stacks, so nesting depth is
//! unbounded without touching the host call stack, and each pass is
//! testable in isolation.
//!
//! Unsupported shapes never error here — they degrade to `any`/`object`
//! approximations to keep the generator usable against evolving field
//! types.

use crate::registry::TypeRegistry;
use crate::schema::{LiteralValue, Origin, SchemaType, TypeRef};

const UNION_SEPARATOR: &str = " | ";

const TS_NULLABLE: &str = "?";
const TS_ANY: &str = "any";
const TS_STRING: &str = "string";
const TS_NUMBER: &str = "number";
const TS_BOOLEAN: &str = "boolean";
const TS_DATE: &str = "Date";
const TS_ANY_ARRAY: &str = "any[]";
const TS_OBJECT: &str = "object";

/// One element of a flattened type stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A non-composite type: primitive, bare collection, or user reference.
    Atom(SchemaType),
    /// Composite-origin marker, always followed by `Open`.
    Origin(Origin),
    Open,
    Close,
    /// A value inside a literal-set.
    Value(LiteralValue),
    /// Pre-rendered fallback text (argument-less mappings).
    Text(&'static str),
}

enum Frame<'a> {
    Visit(&'a SchemaType),
    Value(&'a LiteralValue),
    Close,
}

/// Flatten a declared type into a token stream.
///
/// Non-composite types produce a single-token stream. Composites linearize
/// depth-first, left-to-right: `[origin, Open, args…, Close]`. Annotated
/// wrappers unwrap to their primary argument, discarding metadata. Bare
/// `list`/`tuple` nested inside a composite expand to `list<any>`; a bare
/// nested `dict` falls back to the literal `object` text.
///
/// # Example
///
/// ```
/// use tsgen::{SchemaType, Token, tokenize};
/// use tsgen::Origin;
///
/// let tokens = tokenize(&SchemaType::Sequence(vec![SchemaType::Str]));
/// assert_eq!(tokens, vec![
///     Token::Origin(Origin::Sequence),
///     Token::Open,
///     Token::Atom(SchemaType::Str),
///     Token::Close,
/// ]);
/// ```
pub fn tokenize(ty: &SchemaType) -> Vec<Token> {
    // Non-generic fallback: the type itself is the whole stream.
    if !ty.is_composite() {
        return vec![Token::Atom(ty.clone())];
    }

    let mut tokens = Vec::new();
    let mut stack = vec![Frame::Visit(ty)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Close => tokens.push(Token::Close),
            Frame::Value(value) => tokens.push(Token::Value(value.clone())),
            Frame::Visit(current) => match current {
                SchemaType::Annotated(inner) => stack.push(Frame::Visit(inner)),
                SchemaType::Sequence(args) => {
                    push_composite(Origin::Sequence, args, &mut tokens, &mut stack);
                }
                SchemaType::Tuple(args) => {
                    push_composite(Origin::Tuple, args, &mut tokens, &mut stack);
                }
                SchemaType::Mapping(args) => {
                    push_composite(Origin::Mapping, args, &mut tokens, &mut stack);
                }
                SchemaType::Union(args) => {
                    push_composite(Origin::Union, args, &mut tokens, &mut stack);
                }
                SchemaType::Literal(values) => {
                    tokens.push(Token::Origin(Origin::Literal));
                    tokens.push(Token::Open);
                    stack.push(Frame::Close);
                    for value in values.iter().rev() {
                        stack.push(Frame::Value(value));
                    }
                }
                // An argument-less collection nested in a composite is
                // treated as `list<any>`.
                SchemaType::BareList => {
                    tokens.extend([
                        Token::Origin(Origin::Sequence),
                        Token::Open,
                        Token::Atom(SchemaType::Any),
                        Token::Close,
                    ]);
                }
                SchemaType::BareTuple => {
                    tokens.extend([
                        Token::Origin(Origin::Tuple),
                        Token::Open,
                        Token::Atom(SchemaType::Any),
                        Token::Close,
                    ]);
                }
                SchemaType::BareDict => tokens.push(Token::Text(TS_OBJECT)),
                leaf => tokens.push(Token::Atom(leaf.clone())),
            },
        }
    }

    tokens
}

fn push_composite<'a>(
    origin: Origin,
    args: &'a [SchemaType],
    tokens: &mut Vec<Token>,
    stack: &mut Vec<Frame<'a>>,
) {
    tokens.push(Token::Origin(origin));
    tokens.push(Token::Open);
    stack.push(Frame::Close);
    // Reverse push so arguments are visited left-to-right.
    for arg in args.iter().rev() {
        stack.push(Frame::Visit(arg));
    }
}

/// Rebuild a TypeScript type expression from a token stream.
///
/// Returns the expression text and the user-defined types it referenced,
/// deduplicated in first-seen order. Every `Ref` token is a dependency;
/// primitives and built-in composites never are.
pub fn rebuild(tokens: &[Token], registry: &TypeRegistry) -> (String, Vec<TypeRef>) {
    let mut dependencies: Vec<TypeRef> = Vec::new();

    // Single-token fallback.
    if let [token] = tokens {
        let text = match token {
            Token::Atom(ty) => atom_text(ty, registry, &mut dependencies),
            Token::Value(value) => value.ts_literal(),
            Token::Text(text) => (*text).to_string(),
            Token::Origin(_) | Token::Open | Token::Close => TS_ANY.to_string(),
        };
        return (text, dependencies);
    }

    let mut origin_stack: Vec<Origin> = Vec::new();
    let mut children_stack: Vec<Vec<String>> = Vec::new();
    let mut result = String::new();

    for token in tokens {
        match token {
            Token::Origin(origin) => origin_stack.push(*origin),
            Token::Open => children_stack.push(Vec::new()),
            Token::Close => {
                let origin = match origin_stack.pop() {
                    Some(origin) => origin,
                    None => continue,
                };
                let children = match children_stack.pop() {
                    Some(children) => children,
                    None => continue,
                };
                // Deduplicate children, stable first-seen order.
                let mut deduped: Vec<String> = Vec::new();
                for child in children {
                    if !deduped.contains(&child) {
                        deduped.push(child);
                    }
                }
                let text = compose(origin, &deduped);
                match children_stack.last_mut() {
                    Some(outer) => outer.push(text),
                    None => result = text,
                }
            }
            Token::Atom(ty) => {
                let text = atom_text(ty, registry, &mut dependencies);
                if let Some(children) = children_stack.last_mut() {
                    children.push(text);
                }
            }
            Token::Value(value) => {
                if let Some(children) = children_stack.last_mut() {
                    children.push(value.ts_literal());
                }
            }
            Token::Text(text) => {
                if let Some(children) = children_stack.last_mut() {
                    children.push((*text).to_string());
                }
            }
        }
    }

    (result, dependencies)
}

/// Tokenize and rebuild in one step.
///
/// # Example
///
/// ```
/// use tsgen::{SchemaType, TypeRegistry, build_type};
///
/// let registry = TypeRegistry::new();
/// let (text, deps) = build_type(&SchemaType::Int, &registry);
/// assert_eq!(text, "number");
/// assert!(deps.is_empty());
/// ```
pub fn build_type(ty: &SchemaType, registry: &TypeRegistry) -> (String, Vec<TypeRef>) {
    let tokens = tokenize(ty);
    rebuild(&tokens, registry)
}

/// Resolve a leaf type to its TypeScript text, recording user references.
fn atom_text(
    ty: &SchemaType,
    registry: &TypeRegistry,
    dependencies: &mut Vec<TypeRef>,
) -> String {
    let text = match ty {
        SchemaType::Int | SchemaType::Float => TS_NUMBER,
        SchemaType::Str => TS_STRING,
        SchemaType::Bool => TS_BOOLEAN,
        SchemaType::Date | SchemaType::DateTime => TS_DATE,
        SchemaType::None => TS_NULLABLE,
        SchemaType::Any => TS_ANY,
        SchemaType::BareList | SchemaType::BareTuple => TS_ANY_ARRAY,
        SchemaType::BareDict => TS_OBJECT,
        SchemaType::Ref(reference) => {
            if !dependencies.contains(reference) {
                dependencies.push(reference.clone());
            }
            return registry.display_name(reference);
        }
        // Composites never appear as atoms; permissive fallback.
        _ => TS_ANY,
    };
    text.to_string()
}

/// Synthesize a composite's textual form from its deduplicated children.
fn compose(origin: Origin, children: &[String]) -> String {
    match origin {
        Origin::Union => {
            // A two-branch union with a nullable marker collapses to the
            // optional-suffix form.
            if children.len() == 2 && children.iter().any(|child| child == TS_NULLABLE) {
                if let Some(other) = children.iter().find(|child| *child != TS_NULLABLE) {
                    return format!("{other}{TS_NULLABLE}");
                }
            }
            children.join(UNION_SEPARATOR)
        }
        Origin::Sequence | Origin::Tuple => match children.first() {
            Some(first) => format!("Array<{first}>"),
            None => TS_ANY_ARRAY.to_string(),
        },
        Origin::Mapping => match children {
            [key, value] => format!("{{[key: {key}]: {value}}}"),
            // dict[K, K] dedups to one child; reuse it for both positions.
            [only] => format!("{{[key: {only}]: {only}}}"),
            _ => TS_OBJECT.to_string(),
        },
        Origin::Literal => children.join(UNION_SEPARATOR),
    }
}
