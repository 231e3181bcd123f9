//! Shared helpers for integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use blocktable::{FieldCodec, Schema};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once; honours RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Temp directory plus a file path inside it
pub fn setup_temp_file(name: &str) -> (TempDir, PathBuf) {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    (temp_dir, path)
}

/// Person { id: UInt64, name: Text(32), age: UInt32 }
pub fn person_schema() -> Arc<Schema> {
    Schema::builder("Person")
        .id()
        .field("name", FieldCodec::text(32))
        .field("age", FieldCodec::uint32())
        .build()
        .unwrap()
}
