//! Field codecs
//!
//! A `FieldCodec` validates a value and converts it to and from a span of
//! exactly `width()` bytes. All multi-byte numbers (integers, floats) are
//! written big-endian so files are portable across architectures.

use bytes::{Buf, BufMut};

use crate::error::FieldErrorKind;

use super::Value;

/// Padding byte appended to short text values
pub const TEXT_PAD: u8 = 0x00;

/// Storage type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// UTF-8 text of at most `n` bytes, zero padded
    Text(usize),
    /// Exactly `n` raw bytes
    Bytes(usize),
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Bool,
    Float32,
    Float64,
}

impl FieldType {
    /// Encoded size in bytes
    pub fn width(&self) -> usize {
        match *self {
            FieldType::Text(n) | FieldType::Bytes(n) => n,
            FieldType::UInt8 | FieldType::Int8 | FieldType::Bool => 1,
            FieldType::UInt16 | FieldType::Int16 => 2,
            FieldType::UInt32 | FieldType::Int32 | FieldType::Float32 => 4,
            FieldType::UInt64 | FieldType::Int64 | FieldType::Float64 => 8,
        }
    }

    /// Name of the value variant this type stores
    pub fn value_name(&self) -> &'static str {
        match self {
            FieldType::Text(_) => "text",
            FieldType::Bytes(_) => "bytes",
            FieldType::UInt8 => "u8",
            FieldType::UInt16 => "u16",
            FieldType::UInt32 => "u32",
            FieldType::UInt64 => "u64",
            FieldType::Int8 => "i8",
            FieldType::Int16 => "i16",
            FieldType::Int32 => "i32",
            FieldType::Int64 => "i64",
            FieldType::Bool => "bool",
            FieldType::Float32 => "f32",
            FieldType::Float64 => "f64",
        }
    }

    /// Zero value of this type
    pub fn zero(&self) -> Value {
        match *self {
            FieldType::Text(_) => Value::Text(String::new()),
            FieldType::Bytes(n) => Value::Bytes(vec![0; n]),
            FieldType::UInt8 => Value::U8(0),
            FieldType::UInt16 => Value::U16(0),
            FieldType::UInt32 => Value::U32(0),
            FieldType::UInt64 => Value::U64(0),
            FieldType::Int8 => Value::I8(0),
            FieldType::Int16 => Value::I16(0),
            FieldType::Int32 => Value::I32(0),
            FieldType::Int64 => Value::I64(0),
            FieldType::Bool => Value::Bool(false),
            FieldType::Float32 => Value::F32(0.0),
            FieldType::Float64 => Value::F64(0.0),
        }
    }

    fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (FieldType::Text(_), Value::Text(_))
                | (FieldType::Bytes(_), Value::Bytes(_))
                | (FieldType::UInt8, Value::U8(_))
                | (FieldType::UInt16, Value::U16(_))
                | (FieldType::UInt32, Value::U32(_))
                | (FieldType::UInt64, Value::U64(_))
                | (FieldType::Int8, Value::I8(_))
                | (FieldType::Int16, Value::I16(_))
                | (FieldType::Int32, Value::I32(_))
                | (FieldType::Int64, Value::I64(_))
                | (FieldType::Bool, Value::Bool(_))
                | (FieldType::Float32, Value::F32(_))
                | (FieldType::Float64, Value::F64(_))
        )
    }
}

/// Fixed-width codec for one field: its type plus a default value
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCodec {
    ty: FieldType,
    default: Value,
}

impl FieldCodec {
    /// Codec with the type's zero value as default
    pub fn new(ty: FieldType) -> Self {
        Self {
            default: ty.zero(),
            ty,
        }
    }

    pub fn text(len: usize) -> Self {
        Self::new(FieldType::Text(len))
    }

    pub fn bytes(len: usize) -> Self {
        Self::new(FieldType::Bytes(len))
    }

    pub fn uint8() -> Self {
        Self::new(FieldType::UInt8)
    }

    pub fn uint16() -> Self {
        Self::new(FieldType::UInt16)
    }

    pub fn uint32() -> Self {
        Self::new(FieldType::UInt32)
    }

    pub fn uint64() -> Self {
        Self::new(FieldType::UInt64)
    }

    pub fn int8() -> Self {
        Self::new(FieldType::Int8)
    }

    pub fn int16() -> Self {
        Self::new(FieldType::Int16)
    }

    pub fn int32() -> Self {
        Self::new(FieldType::Int32)
    }

    pub fn int64() -> Self {
        Self::new(FieldType::Int64)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Bool)
    }

    pub fn float32() -> Self {
        Self::new(FieldType::Float32)
    }

    pub fn float64() -> Self {
        Self::new(FieldType::Float64)
    }

    /// Replace the default value.
    ///
    /// The default is checked against `validate` when the schema is built.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Encoded size in bytes
    pub fn width(&self) -> usize {
        self.ty.width()
    }

    /// Check that a value can be stored in this field
    ///
    /// - absent values fail with `Missing`
    /// - values of another variant fail with `TypeMismatch`
    /// - text longer than the field fails with `TooLong`
    /// - bytes of any other length fail with `InvalidLength`
    pub fn validate(&self, value: Option<&Value>) -> Result<(), FieldErrorKind> {
        let value = value.ok_or(FieldErrorKind::Missing)?;

        if !self.ty.matches(value) {
            return Err(FieldErrorKind::TypeMismatch {
                expected: self.ty.value_name(),
                actual: value.type_name(),
            });
        }

        match (self.ty, value) {
            (FieldType::Text(max), Value::Text(s)) if s.len() > max => {
                Err(FieldErrorKind::TooLong {
                    max,
                    actual: s.len(),
                })
            }
            (FieldType::Bytes(expected), Value::Bytes(b)) if b.len() != expected => {
                Err(FieldErrorKind::InvalidLength {
                    expected,
                    actual: b.len(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Append exactly `width()` bytes for `value` to `dst`
    pub fn encode<B: BufMut>(&self, value: &Value, dst: &mut B) -> Result<(), FieldErrorKind> {
        self.validate(Some(value))?;

        match value {
            Value::Text(s) => {
                dst.put_slice(s.as_bytes());
                dst.put_bytes(TEXT_PAD, self.width() - s.len());
            }
            Value::Bytes(b) => dst.put_slice(b),
            Value::U8(v) => dst.put_u8(*v),
            Value::U16(v) => dst.put_u16(*v),
            Value::U32(v) => dst.put_u32(*v),
            Value::U64(v) => dst.put_u64(*v),
            Value::I8(v) => dst.put_i8(*v),
            Value::I16(v) => dst.put_i16(*v),
            Value::I32(v) => dst.put_i32(*v),
            Value::I64(v) => dst.put_i64(*v),
            Value::Bool(v) => dst.put_u8(u8::from(*v)),
            Value::F32(v) => dst.put_f32(*v),
            Value::F64(v) => dst.put_f64(*v),
        }

        Ok(())
    }

    /// Encode into a fresh buffer
    pub fn encode_to_vec(&self, value: &Value) -> Result<Vec<u8>, FieldErrorKind> {
        let mut buf = Vec::with_capacity(self.width());
        self.encode(value, &mut buf)?;
        Ok(buf)
    }

    /// Read a value back from a span of exactly `width()` bytes.
    ///
    /// Text has its trailing padding stripped. On failure the returned
    /// string describes the problem.
    pub fn decode(&self, span: &[u8]) -> Result<Value, String> {
        if span.len() != self.width() {
            return Err(format!(
                "span has {} bytes, expected {}",
                span.len(),
                self.width()
            ));
        }

        let mut src = span;
        let value = match self.ty {
            FieldType::Text(_) => {
                let end = span
                    .iter()
                    .rposition(|&b| b != TEXT_PAD)
                    .map_or(0, |pos| pos + 1);
                let text = std::str::from_utf8(&span[..end])
                    .map_err(|e| format!("invalid UTF-8: {}", e))?;
                Value::Text(text.to_string())
            }
            FieldType::Bytes(_) => Value::Bytes(span.to_vec()),
            FieldType::UInt8 => Value::U8(src.get_u8()),
            FieldType::UInt16 => Value::U16(src.get_u16()),
            FieldType::UInt32 => Value::U32(src.get_u32()),
            FieldType::UInt64 => Value::U64(src.get_u64()),
            FieldType::Int8 => Value::I8(src.get_i8()),
            FieldType::Int16 => Value::I16(src.get_i16()),
            FieldType::Int32 => Value::I32(src.get_i32()),
            FieldType::Int64 => Value::I64(src.get_i64()),
            FieldType::Bool => Value::Bool(src.get_u8() != 0),
            FieldType::Float32 => Value::F32(src.get_f32()),
            FieldType::Float64 => Value::F64(src.get_f64()),
        };

        Ok(value)
    }

    /// Human-readable form of a value (text and bytes quoted)
    pub fn display(&self, value: &Value) -> String {
        value.to_string()
    }
}
