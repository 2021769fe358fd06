//! Identifier generation for pages and blocks.
//!
//! # Invariants
//! - Identifiers are UUIDv7: unique, opaque, and ordered by creation time.
//! - An identifier is never reused once handed out.

use uuid::Uuid;

/// Stable page identifier.
pub type PageId = Uuid;

/// Stable block identifier, unique across all pages.
pub type BlockId = Uuid;

/// Generates a fresh time-ordered identifier.
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}
