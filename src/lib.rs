//! # blocktable
//!
//! A minimal embedded record store:
//! - Typed, fixed-width field codecs with validation
//! - One record per fixed-size block of a flat file
//! - Dense identifiers: record `id` lives in block `id - 1`
//! - Range queries over records already stored in key order
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Table                               │
//! │          insert / get / update / all / between              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Schema    │          │ BlockStore  │
//!   │  + Record   │          │ (flat file) │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │ FieldCodec  │
//!   │  + Value    │
//!   └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use blocktable::{FieldCodec, Schema, Table};
//!
//! # fn main() -> blocktable::Result<()> {
//! let schema = Schema::builder("Person")
//!     .id()
//!     .field("name", FieldCodec::text(32))
//!     .field("age", FieldCodec::uint32())
//!     .build()?;
//!
//! let mut people = Table::bind(schema, "person.tbl".as_ref())?;
//!
//! let mut alex = people.new_record();
//! alex.set("name", "alex")?;
//! alex.set("age", 32u32)?;
//! let id = people.insert(&mut alex)?;
//!
//! let mut stored = people.get(id)?;
//! stored.set("age", 33u32)?;
//! people.update(&stored)?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod field;
pub mod storage;
pub mod record;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FieldError, FieldErrorKind, Result, SchemaError, TableError};
pub use config::{Config, SyncStrategy};
pub use field::{FieldCodec, FieldType, Value};
pub use storage::BlockStore;
pub use record::{Record, Records, Schema, Table};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of blocktable
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
