//! Record Module
//!
//! Schemas, records and the table protocol built on the block store.
//!
//! ## Block Layout
//! ```text
//! Schema Person { id: UInt64, name: Text(32), age: UInt32 }  → width 44
//!
//! ┌──────────────┬──────────────────────────────┬──────────┐
//! │ id (8, BE)   │ name (32, zero padded)       │ age (4)  │
//! └──────────────┴──────────────────────────────┴──────────┘
//!   block index = id - 1
//! ```

mod instance;
mod schema;
mod table;

pub use instance::Record;
pub use schema::{FieldDef, Schema, SchemaBuilder, ID_FIELD};
pub use table::{Records, Table};
