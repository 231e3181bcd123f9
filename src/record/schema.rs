//! Record schemas
//!
//! A schema is the ordered list of named field codecs that defines one block
//! layout. It is built once with `SchemaBuilder` and shared behind an `Arc`
//! by every record and table that uses it.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{FieldError, Result, SchemaError};
use crate::field::{FieldCodec, FieldType, Value};

/// Name of the mandatory identifier field
pub const ID_FIELD: &str = "id";

/// One named field and its position in the block
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    name: String,
    codec: FieldCodec,
    /// Byte offset within the block
    offset: usize,
}

impl FieldDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codec(&self) -> &FieldCodec {
        &self.codec
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte range of this field within a block
    pub fn span(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.codec.width()
    }
}

/// Fixed layout of one record type
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDef>,
    block_width: usize,
    id_position: usize,
}

impl Schema {
    /// Start defining a schema
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Type name, used when displaying records
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.position(name).map(|pos| &self.fields[pos])
    }

    /// Declaration index of a field
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Sum of all field widths
    pub fn block_width(&self) -> usize {
        self.block_width
    }

    pub(crate) fn id_position(&self) -> usize {
        self.id_position
    }
}

/// Builder for Schema
pub struct SchemaBuilder {
    name: String,
    fields: Vec<(String, FieldCodec)>,
}

impl SchemaBuilder {
    /// Add a field after the ones already declared
    pub fn field(mut self, name: impl Into<String>, codec: FieldCodec) -> Self {
        self.fields.push((name.into(), codec));
        self
    }

    /// Add the mandatory `id: UInt64` field with default 0
    pub fn id(self) -> Self {
        self.field(ID_FIELD, FieldCodec::uint64())
    }

    /// Check the definition and compute the block layout
    ///
    /// Fails if:
    /// - there is no `id` field, or it is not `UInt64` with default 0
    /// - a field name is used twice
    /// - a field's default does not pass its own validation
    pub fn build(self) -> Result<Arc<Schema>> {
        let mut seen = HashSet::new();
        for (name, codec) in &self.fields {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateField(name.clone()).into());
            }
            codec
                .validate(Some(codec.default_value()))
                .map_err(|kind| FieldError::new(name.as_str(), kind))?;
        }

        let id_position = self
            .fields
            .iter()
            .position(|(name, _)| name == ID_FIELD)
            .ok_or_else(|| SchemaError::MissingIdField(self.name.clone()))?;

        let id_codec = &self.fields[id_position].1;
        if id_codec.field_type() != FieldType::UInt64 || *id_codec.default_value() != Value::U64(0)
        {
            return Err(SchemaError::InvalidIdField(self.name.clone()).into());
        }

        let mut offset = 0;
        let fields = self
            .fields
            .into_iter()
            .map(|(name, codec)| {
                let def = FieldDef {
                    name,
                    offset,
                    codec,
                };
                offset += def.codec.width();
                def
            })
            .collect();

        Ok(Arc::new(Schema {
            name: self.name,
            fields,
            block_width: offset,
            id_position,
        }))
    }
}
