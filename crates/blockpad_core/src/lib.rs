//! Core domain logic for Blockpad, a block-based page editor.
//! This crate is the single source of truth for editing and sync invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod notice;
pub mod persist;
pub mod session;
pub mod store;
pub mod sync;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SessionConfig;
pub use editor::engine::{apply_input, BlockAction, ChangeKind, EditOutcome, EditorInput};
pub use editor::focus::FocusIntent;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::block::{Block, BlockBody, BlockKind, TableGrid};
pub use model::id::{BlockId, PageId};
pub use model::page::{Page, PageError, PageResult, SplitOutcome};
pub use model::workspace::{Workspace, WorkspaceError};
pub use notice::{Notice, NoticeLevel};
pub use persist::coordinator::SyncMode;
pub use session::{Session, SessionError, SessionEvent, SessionResult};
pub use store::local::{LocalStore, LocalStoreError, MemoryLocalStore, SqliteLocalStore};
pub use store::memory_remote::MemoryRemoteStore;
pub use store::remote::{PageDocument, RemoteError, RemoteEvent, RemoteStore, Subscription};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
