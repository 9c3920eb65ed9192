//! Build-time errors.

use thiserror::Error;

/// Errors raised while assembling or writing TypeScript definitions.
///
/// Silent wrongness in a generated type contract is worse than a loud stop,
/// so untypable fields abort their task instead of guessing.
#[derive(Debug, Error)]
pub enum Error {
    /// A multi-select relation field has no explicit type hint.
    #[error("field `{field}` on `{serializer}` has no explicit type hint")]
    UntypedField { serializer: String, field: String },

    /// Directory creation or file IO failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
