//! Tables
//!
//! A table is a schema bound to one block store. It owns the store and
//! implements the CRUD protocol: the record with identifier `id` lives in
//! block `id - 1`, and identifiers are handed out densely on insert.

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, SchemaError};
use crate::storage::{BlockIter, BlockStore};

use super::{Record, Schema};

/// A schema bound to its backing file
pub struct Table {
    schema: Arc<Schema>,
    store: BlockStore,
}

impl Table {
    /// Bind a schema to a file with default config
    pub fn bind(schema: Arc<Schema>, path: &Path) -> Result<Self> {
        Self::open(schema, path, &Config::default())
    }

    /// Bind a schema to a file, creating it if absent
    pub fn open(schema: Arc<Schema>, path: &Path, config: &Config) -> Result<Self> {
        let store = BlockStore::open_with_config(path, schema.block_width(), config)?;
        tracing::debug!(
            "Bound schema '{}' ({} fields) to {}",
            schema.name(),
            schema.fields().len(),
            path.display()
        );
        Ok(Self { schema, store })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Underlying block store
    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    /// Number of stored records
    pub fn size(&self) -> Result<u64> {
        self.store.size()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty()
    }

    /// A fresh record of this table's schema, all defaults
    pub fn new_record(&self) -> Record {
        Record::new(&self.schema)
    }

    /// Store a new record and assign its identifier
    ///
    /// The record must have `id == 0`. The next index is reserved first, so
    /// the block is written once with its final id. If the write fails the
    /// record's id is reset to 0.
    pub fn insert(&mut self, record: &mut Record) -> Result<u64> {
        self.check_schema(record)?;
        if record.id() != 0 {
            return Err(SchemaError::AlreadyInserted(record.id()).into());
        }

        // `&mut self` keeps the store from growing between size() and append
        let reserved = self.store.size()?;
        record.set_id(reserved + 1);

        let written = record
            .encode()
            .and_then(|block| self.store.append(&block));

        match written {
            Ok(_) => {
                tracing::trace!("Inserted {} into '{}'", record.id(), self.schema.name());
                Ok(record.id())
            }
            Err(e) => {
                record.set_id(0);
                Err(e)
            }
        }
    }

    /// Overwrite the stored block of an inserted record
    pub fn update(&mut self, record: &Record) -> Result<()> {
        self.check_schema(record)?;
        let idx = self.index_of(record.id())?;
        self.store.update(&record.encode()?, idx)
    }

    /// Read the record with identifier `id`
    pub fn get(&self, id: u64) -> Result<Record> {
        let idx = self.index_of(id)?;
        tracing::trace!("Reading {} from '{}'", id, self.schema.name());
        Record::decode(&self.schema, &self.store.get(idx)?)
    }

    /// Block index of identifier `id`; valid for `1 <= id <= size()`
    pub fn index_of(&self, id: u64) -> Result<u64> {
        let size = self.store.size()?;
        if id == 0 || id > size {
            return Err(SchemaError::InvalidId { id, size }.into());
        }
        Ok(id - 1)
    }

    /// Iterate over every stored record in id order
    pub fn all(&self) -> Result<Records<'_>> {
        Ok(Records::new(&self.schema, self.store.iter()?))
    }

    /// Iterate over records whose key lies in `[from, to)`
    ///
    /// Records must already be stored in non-decreasing order of `key_of`;
    /// nothing is sorted or checked here (see `Config::verify_sorted`).
    pub fn between<K, F>(&self, from: &K, to: &K, mut key_of: F) -> Result<Records<'_>>
    where
        K: PartialOrd,
        F: FnMut(&Record) -> K,
    {
        let schema = &self.schema;
        let mut block_key = |block: &[u8]| Record::decode(schema, block).map(|r| key_of(&r));

        let idx_from = self.store.find_sorted(from, &mut block_key)?;
        // An inverted key range selects nothing
        let idx_to = self.store.find_sorted(to, &mut block_key)?.max(idx_from);
        tracing::trace!("Range [{}, {}) of '{}'", idx_from, idx_to, schema.name());

        Ok(Records::new(
            &self.schema,
            self.store.iter_between(idx_from, idx_to)?,
        ))
    }

    fn check_schema(&self, record: &Record) -> Result<()> {
        if !record.same_schema(&self.schema) {
            return Err(SchemaError::SchemaMismatch {
                expected: self.schema.name().to_string(),
                actual: record.schema().name().to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Lazily decoded records over a range of blocks
pub struct Records<'a> {
    schema: &'a Arc<Schema>,
    blocks: BlockIter<'a>,
}

impl<'a> Records<'a> {
    fn new(schema: &'a Arc<Schema>, blocks: BlockIter<'a>) -> Self {
        Self { schema, blocks }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.blocks
            .next()
            .map(|block| block.and_then(|b| Record::decode(self.schema, &b)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.blocks.size_hint()
    }
}
