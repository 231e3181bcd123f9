//! Block Store
//!
//! Fixed-width block addressing on top of a single read/write file handle.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, SyncStrategy};
use crate::error::{Result, TableError};

use super::BlockIter;

/// A file of back-to-back blocks, all exactly `block_width` bytes
///
/// ## Access:
/// - Reads take `&self` and seek through `&File`
/// - Writes take `&mut self`
/// - The block count is read from file metadata on every call; nothing is cached
pub struct BlockStore {
    /// Backing file path
    path: PathBuf,
    /// Read/write handle, held for the lifetime of the store
    file: File,
    /// Size of every block in bytes
    block_width: usize,
    /// Sync and search options
    config: Config,
}

impl BlockStore {
    /// Open or create a block store with default config
    pub fn open(path: &Path, block_width: usize) -> Result<Self> {
        Self::open_with_config(path, block_width, &Config::default())
    }

    /// Open or create a block store
    ///
    /// The file is created empty if it does not exist. An existing file is
    /// used as-is; opening it with a different width than it was written with
    /// silently misinterprets its contents.
    pub fn open_with_config(path: &Path, block_width: usize, config: &Config) -> Result<Self> {
        if block_width == 0 {
            return Err(TableError::InvalidBlockWidth);
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let len = file.metadata()?.len();
        let trailing = len % block_width as u64;
        if trailing != 0 {
            tracing::warn!(
                "{}: {} trailing bytes do not form a whole block of {} and are ignored",
                path.display(),
                trailing,
                block_width
            );
        }

        tracing::debug!(
            "Opened block store {} (width={}, blocks={})",
            path.display(),
            block_width,
            len / block_width as u64
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            block_width,
            config: config.clone(),
        })
    }

    /// Number of whole blocks in the file
    pub fn size(&self) -> Result<u64> {
        let len = self.file.metadata()?.len();
        Ok(len / self.block_width as u64)
    }

    /// True if the file holds no blocks
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.size()? == 0)
    }

    /// Read the block at `idx`
    pub fn get(&self, idx: u64) -> Result<Vec<u8>> {
        self.check_index(idx)?;
        tracing::trace!("Reading block {} from {}", idx, self.path.display());
        self.read_block(idx)
    }

    /// Write a block after the last one and return its index
    pub fn append(&mut self, block: &[u8]) -> Result<u64> {
        self.check_width(block)?;
        let idx = self.size()?;
        self.write_block(idx, block)?;
        tracing::trace!("Appended block {} to {}", idx, self.path.display());
        Ok(idx)
    }

    /// Overwrite the block at `idx`
    pub fn update(&mut self, block: &[u8], idx: u64) -> Result<()> {
        self.check_width(block)?;
        self.check_index(idx)?;
        self.write_block(idx, block)?;
        tracing::trace!("Updated block {} in {}", idx, self.path.display());
        Ok(())
    }

    /// Iterate over every block in index order
    pub fn iter(&self) -> Result<BlockIter<'_>> {
        let size = self.size()?;
        Ok(BlockIter::new(self, 0, size))
    }

    /// Iterate over blocks in `[idx_from, idx_to)`
    pub fn iter_between(&self, idx_from: u64, idx_to: u64) -> Result<BlockIter<'_>> {
        let size = self.size()?;
        if idx_from > idx_to || idx_to > size {
            return Err(TableError::InvalidRange {
                from: idx_from,
                to: idx_to,
                size,
            });
        }
        Ok(BlockIter::new(self, idx_from, idx_to))
    }

    /// Lower-bound binary search
    ///
    /// Returns the smallest index whose key is `>= value`, or `size()` if
    /// there is none. Blocks must already be in non-decreasing key order;
    /// otherwise the result is meaningless. With `Config::verify_sorted`
    /// the order is checked first and `Unsorted` is returned on violation.
    pub fn find_sorted<K, F>(&self, value: &K, mut key_of: F) -> Result<u64>
    where
        K: PartialOrd,
        F: FnMut(&[u8]) -> Result<K>,
    {
        if self.config.verify_sorted {
            self.verify_sorted(&mut key_of)?;
        }

        let mut lo = 0u64;
        let mut hi = self.size()?;

        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let key = key_of(&self.read_block(mid)?)?;
            if key < *value {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        Ok(lo)
    }

    /// Check that blocks are in non-decreasing key order (full scan)
    pub fn verify_sorted<K, F>(&self, mut key_of: F) -> Result<()>
    where
        K: PartialOrd,
        F: FnMut(&[u8]) -> Result<K>,
    {
        let mut prev: Option<K> = None;
        for (index, block) in self.iter()?.enumerate() {
            let key = key_of(&block?)?;
            if let Some(prev) = &prev {
                if key < *prev {
                    return Err(TableError::Unsorted {
                        index: index as u64,
                    });
                }
            }
            prev = Some(key);
        }
        Ok(())
    }

    /// Flush written data to disk
    pub fn sync(&self) -> Result<()> {
        self.file.sync_data()?;
        Ok(())
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the block width in bytes
    pub fn block_width(&self) -> usize {
        self.block_width
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Read a block without bounds checking (caller has checked `idx`)
    pub(super) fn read_block(&self, idx: u64) -> Result<Vec<u8>> {
        let mut file = &self.file;
        file.seek(SeekFrom::Start(self.offset_of(idx)))?;
        let mut block = vec![0u8; self.block_width];
        file.read_exact(&mut block)?;
        Ok(block)
    }

    fn write_block(&mut self, idx: u64, block: &[u8]) -> Result<()> {
        let offset = self.offset_of(idx);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(block)?;
        if self.config.sync_strategy == SyncStrategy::EveryWrite {
            self.file.sync_data()?;
        }
        Ok(())
    }

    fn offset_of(&self, idx: u64) -> u64 {
        idx * self.block_width as u64
    }

    fn check_index(&self, idx: u64) -> Result<()> {
        let size = self.size()?;
        if idx >= size {
            return Err(TableError::BlockOutOfRange { index: idx, size });
        }
        Ok(())
    }

    fn check_width(&self, block: &[u8]) -> Result<()> {
        if block.len() != self.block_width {
            return Err(TableError::BlockSize {
                expected: self.block_width,
                actual: block.len(),
            });
        }
        Ok(())
    }
}
