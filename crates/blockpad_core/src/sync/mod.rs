//! Remote snapshot intake.
//!
//! # Responsibility
//! - Drain the remote subscription and detect readiness timeouts.
//! - Merge snapshots into the workspace without disrupting active editing.
//!
//! # Invariants
//! - Snapshots replace page state wholesale; only pages with an unsaved
//!   local edit keep their in-memory version.
//! - Render suppression never skips the state replacement itself.

pub mod listener;
pub mod reconcile;
pub mod suppression;
