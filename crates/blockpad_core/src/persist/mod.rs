//! Save scheduling and write-path coordination.
//!
//! # Responsibility
//! - Debounce content edits per page; save structural edits at once.
//! - Route every save to the remote store first and the local store always.
//!
//! # Invariants
//! - One pending debounced save per page id.
//! - A failed save never loses the in-memory page state.

pub mod coordinator;
pub mod debounce;
