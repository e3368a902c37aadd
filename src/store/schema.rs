//! SQLite schema for the capsule store.
//!
//! The collection is persisted the way the surrounding app reads it: one
//! JSON-serialized array under a single well-known key, read and written
//! whole. A key/value table keeps that contract while SQLite provides the
//! atomic whole-value get/set the lifecycle operations rely on.

/// Storage key holding the serialized capsule collection.
pub const CAPSULES_KEY: &str = "capsules";

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;
