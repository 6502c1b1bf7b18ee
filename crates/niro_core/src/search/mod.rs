//! Note list search entry points.
//!
//! # Responsibility
//! - Filter and order the in-memory collection for display.

pub mod query;
