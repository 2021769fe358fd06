//! Persistence coordinator: debounced, remote-first saves with local
//! fallback.
//!
//! # Responsibility
//! - Own the per-page debounce queue for content edits.
//! - Write whole page documents remotely and the whole page set locally.
//! - Degrade to local-only operation when the remote side fails.
//!
//! # Invariants
//! - The local store is rewritten after every save attempt, whatever the
//!   remote outcome.
//! - Persistence failures never propagate as errors to editing callers; they
//!   are reported through `SaveReport`/`DeleteReport` notices.
//! - In `SyncMode::LocalOnly` no remote call is made.

use crate::config::SessionConfig;
use crate::model::id::PageId;
use crate::model::page::Page;
use crate::notice::Notice;
use crate::persist::debounce::DebounceQueue;
use crate::store::local::{load_pages, save_pages, LocalLoad, LocalStore};
use crate::store::remote::{RemoteError, RemoteResult, RemoteStore, Subscription};
use log::{info, warn};

/// Which backend is the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Remote store first, local store as secondary copy.
    Remote,
    /// Local store only, until the process restarts.
    LocalOnly,
}

impl SyncMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::LocalOnly => "local_only",
        }
    }
}

/// Outcome of the remote half of a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteWrite {
    Written,
    Failed(RemoteError),
    /// Not attempted (local-only mode, or nothing to write).
    Skipped,
}

impl RemoteWrite {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Written => "written",
            Self::Failed(_) => "failed",
            Self::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub page_id: PageId,
    pub remote: RemoteWrite,
    pub local_ok: bool,
}

impl SaveReport {
    /// Notice to surface for this save, if any.
    pub fn notice(&self) -> Option<Notice> {
        match (&self.remote, self.local_ok) {
            (RemoteWrite::Failed(_), true) => Some(Notice::warning(
                "Couldn't reach the server. Changes are saved on this device.",
            )),
            (RemoteWrite::Written, false) => Some(Notice::warning(
                "Saved online, but this device's copy could not be updated.",
            )),
            (RemoteWrite::Failed(_) | RemoteWrite::Skipped, false) => {
                Some(Notice::error("Changes could not be saved."))
            }
            (RemoteWrite::Written | RemoteWrite::Skipped, true) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    pub page_id: PageId,
    pub remote: RemoteWrite,
    pub local_ok: bool,
}

impl DeleteReport {
    /// Remote delete failures are only logged; a local failure is surfaced.
    pub fn notice(&self) -> Option<Notice> {
        if self.local_ok {
            None
        } else {
            Some(Notice::error("The deletion could not be saved on this device."))
        }
    }
}

pub struct PersistenceCoordinator<R: RemoteStore, L: LocalStore> {
    remote: R,
    local: L,
    collection: String,
    local_key: String,
    mode: SyncMode,
    pending: DebounceQueue<PageId>,
}

impl<R: RemoteStore, L: LocalStore> PersistenceCoordinator<R, L> {
    pub fn new(remote: R, local: L, config: &SessionConfig) -> Self {
        Self {
            remote,
            local,
            collection: config.collection.clone(),
            local_key: config.local_key.clone(),
            mode: SyncMode::Remote,
            pending: DebounceQueue::new(config.save_debounce_ms),
        }
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Switches to local-only operation; returns `false` if already there.
    pub fn enter_local_only(&mut self) -> bool {
        if self.mode == SyncMode::LocalOnly {
            return false;
        }
        warn!("event=sync_mode module=persist status=degraded mode=local_only");
        self.mode = SyncMode::LocalOnly;
        true
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    /// Releases the stores; pending debounced saves are dropped.
    pub fn into_parts(self) -> (R, L) {
        (self.remote, self.local)
    }

    /// Subscribes to the remote collection.
    pub fn subscribe(&self) -> RemoteResult<Subscription> {
        self.remote.subscribe(&self.collection)
    }

    /// (Re)starts the debounce window for `page_id`.
    pub fn schedule_save(&mut self, page_id: PageId, now_ms: i64) -> i64 {
        self.pending.schedule(page_id, now_ms)
    }

    pub fn has_pending(&self, page_id: PageId) -> bool {
        self.pending.is_pending(page_id)
    }

    pub fn next_deadline(&self) -> Option<i64> {
        self.pending.next_deadline()
    }

    /// Pages whose debounce window has elapsed.
    pub fn take_due(&mut self, now_ms: i64) -> Vec<PageId> {
        self.pending.take_due(now_ms)
    }

    /// Every page with a pending save, for flushing at shutdown.
    pub fn take_all_pending(&mut self) -> Vec<PageId> {
        self.pending.take_all()
    }

    /// Saves one page now: remote document write, then full local rewrite.
    ///
    /// Any pending debounced save for the page is folded into this one.
    pub fn save_page(&mut self, page_id: PageId, pages: &[Page]) -> SaveReport {
        self.pending.cancel(page_id);

        let page = pages.iter().find(|page| page.id == page_id);
        let remote = match (self.mode, page) {
            (SyncMode::Remote, Some(page)) => {
                match self
                    .remote
                    .put(&self.collection, &page_id.to_string(), page)
                {
                    Ok(()) => RemoteWrite::Written,
                    Err(err) => {
                        warn!(
                            "event=page_save module=persist status=error stage=remote page_id={} error={}",
                            page_id, err
                        );
                        RemoteWrite::Failed(err)
                    }
                }
            }
            _ => RemoteWrite::Skipped,
        };

        let local_ok = self.write_local(pages);
        info!(
            "event=page_save module=persist status={} page_id={} mode={} remote={} local_ok={} blocks={}",
            if local_ok || remote == RemoteWrite::Written { "ok" } else { "error" },
            page_id,
            self.mode.as_str(),
            remote.as_str(),
            local_ok,
            page.map_or(0, |page| page.blocks.len())
        );

        SaveReport {
            page_id,
            remote,
            local_ok,
        }
    }

    /// Deletes a page document remotely and rewrites the local store from
    /// the remaining pages. Remote failures are not rolled back.
    pub fn delete_page(&mut self, page_id: PageId, remaining: &[Page]) -> DeleteReport {
        self.pending.cancel(page_id);

        let remote = match self.mode {
            SyncMode::Remote => match self.remote.delete(&self.collection, &page_id.to_string()) {
                Ok(()) => RemoteWrite::Written,
                Err(err) => {
                    warn!(
                        "event=page_delete module=persist status=error stage=remote page_id={} error={}",
                        page_id, err
                    );
                    RemoteWrite::Failed(err)
                }
            },
            SyncMode::LocalOnly => RemoteWrite::Skipped,
        };

        let local_ok = self.write_local(remaining);
        info!(
            "event=page_delete module=persist status=ok page_id={} remote={} local_ok={}",
            page_id,
            remote.as_str(),
            local_ok
        );

        DeleteReport {
            page_id,
            remote,
            local_ok,
        }
    }

    /// Publishes every page to the remote store (used when the remote side
    /// comes up empty while local pages exist).
    pub fn publish_all(&mut self, pages: &[Page]) -> Vec<SaveReport> {
        pages
            .iter()
            .map(|page| page.id)
            .collect::<Vec<_>>()
            .into_iter()
            .map(|page_id| self.save_page(page_id, pages))
            .collect()
    }

    /// Rewrites the local store with the full page set.
    pub fn write_local(&self, pages: &[Page]) -> bool {
        match save_pages(&self.local, &self.local_key, pages) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=local_save module=persist status=error pages={} error={}",
                    pages.len(),
                    err
                );
                false
            }
        }
    }

    pub fn load_local(&self) -> LocalLoad {
        load_pages(&self.local, &self.local_key)
    }
}
