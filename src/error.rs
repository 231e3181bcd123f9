//! Error types for blocktable
//!
//! Provides a unified error type for all operations. Errors are grouped by
//! kind: schema errors (bad identifiers, bad definitions), field errors
//! (values that fail validation) and storage errors (block addressing).

use std::fmt;

use thiserror::Error;

/// Result type alias using TableError
pub type Result<T> = std::result::Result<T, TableError>;

/// Unified error type for blocktable operations
#[derive(Debug, Error)]
pub enum TableError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Schema Errors
    // -------------------------------------------------------------------------
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    // -------------------------------------------------------------------------
    // Field Errors
    // -------------------------------------------------------------------------
    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Cannot decode field '{field}': {reason}")]
    Decode { field: String, reason: String },

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Block index {index} out of range (size {size})")]
    BlockOutOfRange { index: u64, size: u64 },

    #[error("Block has {actual} bytes, expected {expected}")]
    BlockSize { expected: usize, actual: usize },

    #[error("Invalid block range [{from}, {to}) for size {size}")]
    InvalidRange { from: u64, to: u64, size: u64 },

    #[error("Blocks are not sorted: block {index} is less than its predecessor")]
    Unsorted { index: u64 },

    #[error("Block width must be greater than zero")]
    InvalidBlockWidth,
}

impl TableError {
    /// True for errors raised by the record layer (ids, definitions)
    pub fn is_schema_error(&self) -> bool {
        matches!(self, TableError::Schema(_))
    }

    /// True for errors raised while validating a field value
    pub fn is_field_error(&self) -> bool {
        matches!(self, TableError::Field(_))
    }

    /// The validation failure kind, if this is a field error
    pub fn field_error_kind(&self) -> Option<&FieldErrorKind> {
        match self {
            TableError::Field(e) => Some(&e.kind),
            _ => None,
        }
    }
}

/// Errors raised by the record layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Identifier does not address a stored record
    #[error("Invalid id {id} (store holds {size} records)")]
    InvalidId { id: u64, size: u64 },

    #[error("Record already has an id ({0})")]
    AlreadyInserted(u64),

    #[error("Schema '{0}' has no 'id' field; add `id: UInt64` with default 0")]
    MissingIdField(String),

    #[error("Field 'id' of schema '{0}' must be UInt64 with default 0")]
    InvalidIdField(String),

    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("Record of schema '{actual}' used with table of schema '{expected}'")]
    SchemaMismatch { expected: String, actual: String },
}

/// A value rejected by a field's validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{field}': {kind}")]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

/// Why a value failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// No value given where one is required
    Missing,
    /// Text longer than the field's declared length
    TooLong { max: usize, actual: usize },
    /// Byte block not exactly the field's declared length
    InvalidLength { expected: usize, actual: usize },
    /// Value variant does not match the field type
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    /// Schema has no field with this name
    NoSuchField,
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldErrorKind::Missing => write!(f, "value is missing"),
            FieldErrorKind::TooLong { max, actual } => {
                write!(f, "value too long ({} bytes, max {})", actual, max)
            }
            FieldErrorKind::InvalidLength { expected, actual } => {
                write!(f, "invalid length ({} bytes, expected {})", actual, expected)
            }
            FieldErrorKind::TypeMismatch { expected, actual } => {
                write!(f, "expected {} value, got {}", expected, actual)
            }
            FieldErrorKind::NoSuchField => write!(f, "no such field"),
        }
    }
}
