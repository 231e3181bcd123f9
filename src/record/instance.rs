//! Records
//!
//! A record is one instance of a schema: a value for every field, always
//! valid. All writes go through `set`/`set_opt`, which validate before
//! committing, so a failed assignment leaves the record untouched.

use std::fmt;
use std::sync::Arc;

use crate::error::{FieldError, FieldErrorKind, Result, TableError};
use crate::field::Value;

use super::Schema;

/// A fully populated instance of a schema
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<Schema>,
    /// One value per field, in schema order
    values: Vec<Value>,
}

impl Record {
    /// A record holding every field's default (id = 0)
    pub fn new(schema: &Arc<Schema>) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|f| f.codec().default_value().clone())
            .collect();

        Self {
            schema: Arc::clone(schema),
            values,
        }
    }

    /// A record with the given values; unnamed fields take their default
    pub fn with_values<I, N, V>(schema: &Arc<Schema>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<Value>,
    {
        let mut record = Self::new(schema);
        for (name, value) in values {
            record.set(name.as_ref(), value)?;
        }
        Ok(record)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Identifier of the record, 0 until inserted
    pub fn id(&self) -> u64 {
        self.values[self.schema.id_position()]
            .as_u64()
            .unwrap_or_default()
    }

    pub(crate) fn set_id(&mut self, id: u64) {
        let pos = self.schema.id_position();
        self.values[pos] = Value::U64(id);
    }

    /// Current value of a field
    pub fn get(&self, name: &str) -> Result<&Value> {
        let pos = self.position(name)?;
        Ok(&self.values[pos])
    }

    /// Validate and assign a field value
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.set_opt(name, Some(value.into()))
    }

    /// Validate and assign a possibly absent value.
    ///
    /// `None` always fails with `Missing`; fields cannot be unset.
    pub fn set_opt(&mut self, name: &str, value: Option<Value>) -> Result<()> {
        let pos = self.position(name)?;
        self.schema.fields()[pos]
            .codec()
            .validate(value.as_ref())
            .map_err(|kind| FieldError::new(name, kind))?;

        if let Some(value) = value {
            self.values[pos] = value;
        }
        Ok(())
    }

    /// `(name, value)` pairs in schema order
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name())
            .zip(self.values.iter())
    }

    /// Serialize into one block of `schema.block_width()` bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut block = Vec::with_capacity(self.schema.block_width());
        for (field, value) in self.schema.fields().iter().zip(&self.values) {
            field
                .codec()
                .encode(value, &mut block)
                .map_err(|kind| FieldError::new(field.name(), kind))?;
        }
        Ok(block)
    }

    /// Deserialize a block written by `encode` with the same schema
    pub fn decode(schema: &Arc<Schema>, block: &[u8]) -> Result<Self> {
        if block.len() != schema.block_width() {
            return Err(TableError::BlockSize {
                expected: schema.block_width(),
                actual: block.len(),
            });
        }

        let values = schema
            .fields()
            .iter()
            .map(|field| {
                field
                    .codec()
                    .decode(&block[field.span()])
                    .map_err(|reason| TableError::Decode {
                        field: field.name().to_string(),
                        reason,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            schema: Arc::clone(schema),
            values,
        })
    }

    /// True if both records use the same layout
    pub(crate) fn same_schema(&self, schema: &Arc<Schema>) -> bool {
        Arc::ptr_eq(&self.schema, schema) || *self.schema == **schema
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.schema
            .position(name)
            .ok_or_else(|| FieldError::new(name, FieldErrorKind::NoSuchField).into())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.same_schema(&other.schema) && self.values == other.values
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.schema.name())?;
        for (i, (field, value)) in self.schema.fields().iter().zip(&self.values).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", field.name(), field.codec().display(value))?;
        }
        write!(f, ")")
    }
}
