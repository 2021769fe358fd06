//! Editing engine.
//!
//! # Responsibility
//! - Translate input events into page mutations.
//! - Own the focus-intent protocol: every handled event says which block and
//!   offset receive focus next.
//!
//! # See also
//! - `session` for how outcomes are persisted.

pub mod engine;
pub mod focus;
pub mod palette;
pub mod shortcuts;
