//! Field Module
//!
//! Typed values and the fixed-width codecs that store them.
//!
//! ## Encodings
//! ```text
//! ┌───────────────────────┬───────┬──────────────────────────────────┐
//! │ Type                  │ Width │ Layout                           │
//! ├───────────────────────┼───────┼──────────────────────────────────┤
//! │ Text(n)               │ n     │ UTF-8, zero padded to n          │
//! │ Bytes(n)              │ n     │ raw, exact length                │
//! │ UInt8..64, Int8..64   │ 1-8   │ big-endian                       │
//! │ Bool                  │ 1     │ 0x00 / 0x01                      │
//! │ Float32, Float64      │ 4 / 8 │ IEEE-754, big-endian             │
//! └───────────────────────┴───────┴──────────────────────────────────┘
//! ```

mod codec;
mod value;

pub use codec::{FieldCodec, FieldType, TEXT_PAD};
pub use value::Value;
