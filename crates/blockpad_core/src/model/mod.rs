//! Block/page domain model.
//!
//! # Responsibility
//! - Define blocks, pages and the workspace that owns them.
//! - Enforce structural invariants on every mutation.
//!
//! # Invariants
//! - A page always holds at least one block.
//! - Blocks belong to exactly one page; ids are never reused.

pub mod block;
pub mod id;
pub mod page;
pub mod seed;
pub mod text;
pub mod workspace;
