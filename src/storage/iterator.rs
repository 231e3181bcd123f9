//! Block Iterator
//!
//! Sequential iteration over a range of blocks. Each block is read when it
//! is reached, so the iterator sees the file as it is at that moment.

use crate::error::Result;

use super::BlockStore;

/// Iterator over blocks `[next, end)` of a store, in index order
pub struct BlockIter<'a> {
    store: &'a BlockStore,
    /// Index of the next block to read
    next: u64,
    /// Stop before this index
    end: u64,
}

impl<'a> BlockIter<'a> {
    pub(super) fn new(store: &'a BlockStore, start: u64, end: u64) -> Self {
        Self {
            store,
            next: start,
            end,
        }
    }
}

impl<'a> Iterator for BlockIter<'a> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }

        let result = self.store.read_block(self.next);
        match result {
            Ok(_) => self.next += 1,
            // Stop after the first failed read
            Err(_) => self.next = self.end,
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (0, Some(remaining))
    }
}
