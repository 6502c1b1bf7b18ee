//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value storage contract and its SQLite backend.
//! - Define the whole-collection note repository on top of it.
//!
//! # Invariants
//! - Repository writes must enforce `Note::validate()` before persistence.
//! - Collection reads never surface storage errors to callers.

pub mod kv_store;
pub mod note_repo;
