//! Descriptor error types

use crate::kind::{FieldKind, ScalarKind};
use thiserror::Error;

/// Malformed or conflicting schema definitions
///
/// These are programming-time defects: a schema that fails to define should
/// abort registration rather than be patched up at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The same field name appears twice in one field list
    #[error("Schema '{schema}': field '{field}' is declared more than once")]
    DuplicateField { schema: String, field: String },

    /// A derived field reuses a base field name with a different kind
    #[error("Schema '{schema}': field '{field}' is {derived} but the base schema declares {base}")]
    KindMismatch {
        schema: String,
        field: String,
        base: FieldKind,
        derived: FieldKind,
    },

    /// Constant fields are baked into the schema and need a value
    #[error("Schema '{schema}': constant field '{field}' has no default")]
    MissingConstantDefault { schema: String, field: String },

    /// Header bytes are emitted by the encoder, never declared as fields
    #[error("Schema '{schema}': '{field}' is a reserved header field name")]
    ReservedName { schema: String, field: String },

    /// Default value has the wrong shape or does not fit the field width
    #[error("Schema '{schema}': default for '{field}' does not fit {kind}")]
    InvalidDefault {
        schema: String,
        field: String,
        kind: FieldKind,
    },

    /// Override of a field that the schema does not have
    #[error("Schema '{schema}' has no field '{field}'")]
    UnknownField { schema: String, field: String },
}

/// Caller-supplied values that do not match the schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value bound to a name the schema does not declare
    #[error("Descriptor '{schema}' has no field '{field}'")]
    UnknownField { schema: String, field: String },

    /// Attempt to set a field whose value is fixed by the schema
    #[error("Field '{field}' of descriptor '{schema}' is constant and cannot be set")]
    ConstantField { schema: String, field: String },

    /// Scalar supplied for a list field or vice versa
    #[error("Field '{field}' of descriptor '{schema}' expects {kind}")]
    ShapeMismatch {
        schema: String,
        field: String,
        kind: FieldKind,
    },
}

/// A length or value that does not fit its encoded width
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverflowError {
    /// bLength is a single byte
    #[error("Descriptor '{schema}' is {length} bytes long (max 255)")]
    Length { schema: String, length: usize },

    /// Field value larger than its declared width
    #[error("Value {value:#x} of field '{field}' does not fit {kind}")]
    Value {
        field: String,
        value: u32,
        kind: ScalarKind,
    },
}

/// Encoding failures
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Configurable field without a caller value or schema default
    #[error("Field '{field}' of descriptor '{schema}' has no value")]
    Unbound { schema: String, field: String },

    /// Bound value shape does not match the field kind
    #[error("Field '{field}' of descriptor '{schema}' holds a value of the wrong shape for {kind}")]
    ShapeMismatch {
        schema: String,
        field: String,
        kind: FieldKind,
    },

    /// Length prefix or field value overflow
    #[error(transparent)]
    Overflow(#[from] OverflowError),

    /// Output sink failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Numeric code absent from a code registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unknown {registry} code: {code}")]
pub struct UnknownCodeError {
    /// Registry that was searched
    pub registry: &'static str,
    /// Code that was looked up
    pub code: i32,
}

/// Any error raised by the descriptor subsystem
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Overflow(#[from] OverflowError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    UnknownCode(#[from] UnknownCodeError),
}

/// Type alias for descriptor results
pub type Result<T> = std::result::Result<T, DescriptorError>;
