//! Persistence backends.
//!
//! # Responsibility
//! - Define the local key-value and remote document-store contracts.
//! - Provide SQLite, in-memory and in-process remote implementations.
//!
//! # Invariants
//! - Both stores receive whole values: the full page array locally, one
//!   full page document per remote write.

pub mod local;
pub mod memory_remote;
pub mod remote;
