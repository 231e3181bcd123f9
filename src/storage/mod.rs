//! Storage Module
//!
//! A flat file treated as a zero-indexed array of fixed-size blocks.
//!
//! ## Responsibilities
//! - Append whole blocks and overwrite them in place
//! - Point reads and range iteration by block index
//! - Lower-bound binary search over blocks already sorted by a key
//!
//! ## File Format
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬─────┐
//! │   Block 0    │   Block 1    │   Block 2    │ ... │
//! │ [0, w)       │ [w, 2w)      │ [2w, 3w)     │     │
//! └──────────────┴──────────────┴──────────────┴─────┘
//! ```
//! No header, no magic, no checksums. The block width `w` is supplied by the
//! caller every time the file is opened and must never change for a file.

mod block_store;
mod iterator;

pub use block_store::BlockStore;
pub use iterator::BlockIter;
