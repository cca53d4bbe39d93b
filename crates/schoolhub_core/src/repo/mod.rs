//! Durable key-value storage contracts and implementations.
//!
//! # Responsibility
//! - Define the opaque key-value contract the session router persists through.
//! - Keep SQLite details inside the core persistence boundary.
//!
//! # Invariants
//! - Keys are non-empty.
//! - Writes to an existing key replace the previous value (last write wins).

pub mod kv_repo;
