//! Editing session: the single owner of workspace state.
//!
//! # Responsibility
//! - Apply page, block and editor operations to the in-memory workspace.
//! - Schedule saves (debounced for content, immediate for structure).
//! - Drive the remote listener and local fallback from `tick`.
//! - Queue render requests, focus intents and notices for presentation.
//!
//! # Invariants
//! - Every rejected operation leaves state unchanged and queues a notice.
//! - Every mutation that changes persisted meaning advances `updated_at`
//!   and results in a save; focus changes never do.
//! - Work only happens inside calls on this object; there is no background
//!   thread. Time comes from the injected `Clock`.

use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::editor::engine::{
    apply_input, delete_and_refocus, ChangeKind, EditOutcome, EditorInput,
};
use crate::editor::focus::FocusIntent;
use crate::model::block::{BlockBody, BlockKind};
use crate::model::id::{BlockId, PageId};
use crate::model::page::{Page, PageError, PageResult, SplitOutcome};
use crate::model::seed::welcome_page;
use crate::model::workspace::{Workspace, WorkspaceError};
use crate::notice::Notice;
use crate::persist::coordinator::{PersistenceCoordinator, SyncMode};
use crate::store::local::{LocalLoad, LocalStore};
use crate::store::remote::{PageDocument, RemoteError, RemoteStore};
use crate::sync::listener::{ListenerEvent, SnapshotListener};
use crate::sync::reconcile::{reconcile, ReconcileOutcome, RenderDecision};
use crate::sync::suppression::EditSuppression;
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Rejected session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Page(PageError),
    Workspace(WorkspaceError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Page(err) => write!(f, "{err}"),
            Self::Workspace(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Page(err) => Some(err),
            Self::Workspace(err) => Some(err),
        }
    }
}

impl From<PageError> for SessionError {
    fn from(value: PageError) -> Self {
        Self::Page(value)
    }
}

impl From<WorkspaceError> for SessionError {
    fn from(value: WorkspaceError) -> Self {
        Self::Workspace(value)
    }
}

/// Output for the presentation layer, drained with [`Session::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    RenderPage(PageId),
    RenderPageList,
    Notice(Notice),
    Focus(FocusIntent),
}

pub struct Session<R: RemoteStore, L: LocalStore> {
    config: SessionConfig,
    clock: Box<dyn Clock>,
    workspace: Workspace,
    suppression: EditSuppression,
    persistence: PersistenceCoordinator<R, L>,
    listener: Option<SnapshotListener>,
    events: VecDeque<SessionEvent>,
}

impl<R: RemoteStore, L: LocalStore> Session<R, L> {
    /// Starts a session: subscribes to the remote collection and applies
    /// whatever the subscription has already delivered.
    ///
    /// A rejected subscription puts the session straight into local-only
    /// mode backed by the local store.
    pub fn start(config: SessionConfig, clock: Box<dyn Clock>, remote: R, local: L) -> Self {
        let now_ms = clock.now_ms();
        let persistence = PersistenceCoordinator::new(remote, local, &config);
        let mut session = Self {
            suppression: EditSuppression::new(config.edit_grace_ms),
            workspace: Workspace::new(),
            listener: None,
            events: VecDeque::new(),
            persistence,
            clock,
            config,
        };

        match session.persistence.subscribe() {
            Ok(subscription) => {
                session.listener = Some(SnapshotListener::new(
                    subscription,
                    now_ms,
                    session.config.remote_ready_timeout_ms,
                ));
                info!(
                    "event=session_start module=session status=ok collection={}",
                    session.config.collection
                );
                session.poll_remote(now_ms);
            }
            Err(err) => {
                warn!("event=session_start module=session status=degraded error={err}");
                session.handle_listener_failure(err, now_ms);
            }
        }
        session
    }

    /// Processes remote events, the readiness deadline and due saves.
    pub fn tick(&mut self) {
        let now_ms = self.now_ms();
        self.poll_remote(now_ms);
        for page_id in self.persistence.take_due(now_ms) {
            if self.workspace.contains(page_id) {
                self.save_now(page_id);
            }
        }
    }

    /// Flushes pending saves, unsubscribes and hands the stores back.
    pub fn shutdown(mut self) -> (R, L) {
        let pending = self.persistence.take_all_pending();
        let flushed = pending.len();
        for page_id in pending {
            if self.workspace.contains(page_id) {
                self.save_now(page_id);
            }
        }
        if let Some(mut listener) = self.listener.take() {
            listener.stop();
        }
        info!("event=session_shutdown module=session status=ok flushed_saves={flushed}");
        self.persistence.into_parts()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn page(&self, page_id: PageId) -> Option<&Page> {
        self.workspace.page(page_id)
    }

    pub fn selected_page(&self) -> Option<&Page> {
        self.workspace.selected_page()
    }

    pub fn mode(&self) -> SyncMode {
        self.persistence.mode()
    }

    /// Whether the remote feed is still subscribed.
    pub fn is_listening(&self) -> bool {
        self.listener
            .as_ref()
            .is_some_and(SnapshotListener::is_active)
    }

    pub fn has_pending_save(&self, page_id: PageId) -> bool {
        self.persistence.has_pending(page_id)
    }

    /// Earliest pending debounce deadline, for hosts that sleep until then.
    pub fn next_save_deadline(&self) -> Option<i64> {
        self.persistence.next_deadline()
    }

    pub fn is_editing(&self) -> bool {
        self.suppression.is_editing(self.now_ms())
    }

    pub fn remote(&self) -> &R {
        self.persistence.remote()
    }

    pub fn local(&self) -> &L {
        self.persistence.local()
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    /// Creates an "Untitled" page with one empty text block and selects it.
    pub fn create_page(&mut self) -> PageId {
        let now_ms = self.now_ms();
        let page = Page::new(self.workspace.next_icon(), now_ms);
        let first_block = page.blocks.first().map(|block| block.id);
        let page_id = self.workspace.add_page(page);
        info!("event=page_create module=session status=ok page_id={page_id}");

        self.save_now(page_id);
        self.emit(SessionEvent::RenderPageList);
        self.emit(SessionEvent::RenderPage(page_id));
        if let Some(block_id) = first_block {
            self.focus_intent(FocusIntent::start(block_id));
        }
        page_id
    }

    /// Deletes a page; refused for the last remaining page.
    pub fn delete_page(&mut self, page_id: PageId) -> SessionResult<()> {
        let removed = match self.workspace.remove_page(page_id) {
            Ok(removed) => removed,
            Err(err) => return self.reject(err),
        };
        if self
            .suppression
            .focused_block()
            .is_some_and(|block_id| removed.contains_block(block_id))
        {
            self.suppression.clear();
        }

        let report = self
            .persistence
            .delete_page(page_id, self.workspace.pages());
        if let Some(notice) = report.notice() {
            self.notify(notice);
        }
        self.emit(SessionEvent::RenderPageList);
        self.render_selected();
        Ok(())
    }

    pub fn select_page(&mut self, page_id: PageId) -> SessionResult<()> {
        if let Err(err) = self.workspace.select(page_id) {
            return self.reject(err);
        }
        self.suppression.clear();
        self.emit(SessionEvent::RenderPageList);
        self.emit(SessionEvent::RenderPage(page_id));
        Ok(())
    }

    /// Renames a page; a blank title becomes "Untitled". Saved debounced.
    pub fn rename_page(&mut self, page_id: PageId, title: &str) -> SessionResult<()> {
        if let Err(err) = self.workspace.rename_page(page_id, title) {
            return self.reject(err);
        }
        self.commit(page_id, ChangeKind::Content);
        self.emit(SessionEvent::RenderPageList);
        Ok(())
    }

    pub fn set_page_icon(&mut self, page_id: PageId, icon: &str) -> SessionResult<()> {
        if let Err(err) = self.workspace.set_icon(page_id, icon) {
            return self.reject(err);
        }
        self.commit(page_id, ChangeKind::Structural);
        self.emit(SessionEvent::RenderPageList);
        self.emit(SessionEvent::RenderPage(page_id));
        Ok(())
    }

    /// Inserts a block of `kind` after `after` (or at the end) and focuses it.
    pub fn insert_block_after(
        &mut self,
        page_id: PageId,
        after: Option<BlockId>,
        kind: BlockKind,
        content: &str,
    ) -> SessionResult<BlockId> {
        let block_id = self.mutate_page(page_id, |page| {
            let block = page.insert_block_after(after, BlockBody::with_text(kind, content))?;
            Ok((block.id, ChangeKind::Structural))
        })?;
        self.focus_intent(FocusIntent::start(block_id));
        Ok(block_id)
    }

    /// Splits a block at a char offset (the Enter key).
    pub fn split_block(&mut self, block_id: BlockId, cursor: usize) -> SessionResult<SplitOutcome> {
        let outcome = self.mutate_block(block_id, |page| {
            Ok((page.split_block(block_id, cursor)?, ChangeKind::Structural))
        })?;
        let focus = match outcome {
            SplitOutcome::Split { new_block } => new_block,
            SplitOutcome::ExitedList => block_id,
        };
        self.focus_intent(FocusIntent::start(focus));
        Ok(outcome)
    }

    /// Deletes a block and returns the block that receives focus.
    pub fn delete_block(&mut self, block_id: BlockId) -> SessionResult<BlockId> {
        let (target, focus) = self.mutate_block(block_id, |page| {
            Ok((delete_and_refocus(page, block_id)?, ChangeKind::Structural))
        })?;
        if let Some(focus) = focus {
            self.focus_intent(focus);
        }
        Ok(target)
    }

    pub fn duplicate_block(&mut self, block_id: BlockId) -> SessionResult<BlockId> {
        let copy = self.mutate_block(block_id, |page| {
            Ok((page.duplicate_block(block_id)?, ChangeKind::Structural))
        })?;
        self.focus_intent(FocusIntent::start(copy));
        Ok(copy)
    }

    /// Changes a block's kind; returns `false` when it already had `kind`.
    pub fn change_type(&mut self, block_id: BlockId, kind: BlockKind) -> SessionResult<bool> {
        self.mutate_block(block_id, |page| {
            let changed = page.change_type(block_id, kind)?;
            let change = if changed {
                ChangeKind::Structural
            } else {
                ChangeKind::None
            };
            Ok((changed, change))
        })
    }

    /// Moves `from` to the slot held by `to`; both must be on one page.
    pub fn reorder(&mut self, from: BlockId, to: BlockId) -> SessionResult<usize> {
        self.mutate_block(from, |page| {
            let index = page.reorder(from, to)?;
            let change = if from == to {
                ChangeKind::None
            } else {
                ChangeKind::Structural
            };
            Ok((index, change))
        })
    }

    pub fn toggle_checked(&mut self, block_id: BlockId) -> SessionResult<bool> {
        self.mutate_block(block_id, |page| {
            Ok((page.toggle_checked(block_id)?, ChangeKind::Structural))
        })
    }

    /// Replaces a block's text; saved after the debounce window.
    pub fn set_content(&mut self, block_id: BlockId, content: &str) -> SessionResult<()> {
        self.mutate_block(block_id, |page| {
            page.set_content(block_id, content)?;
            Ok(((), ChangeKind::Content))
        })
    }

    /// Creates the default grid of a table block on first render.
    pub fn materialize_table(&mut self, block_id: BlockId) -> SessionResult<bool> {
        self.mutate_block(block_id, |page| {
            let created = page.materialize_table(block_id)?;
            let change = if created {
                ChangeKind::Content
            } else {
                ChangeKind::None
            };
            Ok((created, change))
        })
    }

    pub fn add_row(&mut self, block_id: BlockId) -> SessionResult<()> {
        self.mutate_table(block_id, Page::add_row)
    }

    pub fn add_column(&mut self, block_id: BlockId) -> SessionResult<()> {
        self.mutate_table(block_id, Page::add_column)
    }

    /// Removes the last row; refused at one row.
    pub fn remove_row(&mut self, block_id: BlockId) -> SessionResult<()> {
        self.mutate_table(block_id, Page::remove_row)
    }

    /// Removes the last column; refused at one column.
    pub fn remove_column(&mut self, block_id: BlockId) -> SessionResult<()> {
        self.mutate_table(block_id, Page::remove_column)
    }

    pub fn set_cell(
        &mut self,
        block_id: BlockId,
        row: usize,
        column: usize,
        value: &str,
    ) -> SessionResult<()> {
        self.mutate_block(block_id, |page| {
            page.set_cell(block_id, row, column, value)?;
            Ok(((), ChangeKind::Content))
        })
    }

    /// Routes one raw input event through the editing engine.
    ///
    /// An unhandled outcome means the input layer should apply its default
    /// behavior (plain caret movement, character deletion).
    pub fn handle_input(&mut self, input: EditorInput) -> SessionResult<EditOutcome> {
        let outcome = self.mutate_block(input.block_id(), |page| {
            let outcome = apply_input(page, input)?;
            Ok((outcome, outcome.change))
        })?;
        if let Some(focus) = outcome.focus {
            self.focus_intent(focus);
        }
        Ok(outcome)
    }

    /// Records that `block_id` holds input focus.
    pub fn focus(&mut self, block_id: BlockId) {
        self.suppression.focus(block_id);
    }

    /// Records focus loss; the grace window starts now.
    pub fn blur(&mut self) {
        let now_ms = self.now_ms();
        self.suppression.blur(now_ms);
    }

    fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    fn emit(&mut self, event: SessionEvent) {
        self.events.push_back(event);
    }

    fn notify(&mut self, notice: Notice) {
        self.emit(SessionEvent::Notice(notice));
    }

    fn focus_intent(&mut self, focus: FocusIntent) {
        self.suppression.focus(focus.block_id);
        self.emit(SessionEvent::Focus(focus));
    }

    fn render_selected(&mut self) {
        if let Some(page_id) = self.workspace.selected_page_id() {
            self.emit(SessionEvent::RenderPage(page_id));
        }
    }

    fn reject<T>(&mut self, err: impl Into<SessionError>) -> SessionResult<T> {
        let err = err.into();
        warn!("event=mutation module=session status=refused reason=\"{err}\"");
        self.notify(Notice::warning(err.to_string()));
        Err(err)
    }

    fn mutate_block<T, F>(&mut self, block_id: BlockId, op: F) -> SessionResult<T>
    where
        F: FnOnce(&mut Page) -> PageResult<(T, ChangeKind)>,
    {
        match self.workspace.page_of_block(block_id) {
            Some(page_id) => self.mutate_page(page_id, op),
            None => self.reject(PageError::BlockNotFound(block_id)),
        }
    }

    fn mutate_table(
        &mut self,
        block_id: BlockId,
        op: fn(&mut Page, BlockId) -> PageResult<()>,
    ) -> SessionResult<()> {
        self.mutate_block(block_id, |page| {
            op(page, block_id)?;
            Ok(((), ChangeKind::Structural))
        })
    }

    fn mutate_page<T, F>(&mut self, page_id: PageId, op: F) -> SessionResult<T>
    where
        F: FnOnce(&mut Page) -> PageResult<(T, ChangeKind)>,
    {
        let result = match self.workspace.page_mut(page_id) {
            Some(page) => op(page),
            None => return self.reject(WorkspaceError::PageNotFound(page_id)),
        };
        match result {
            Ok((value, change)) => {
                self.commit(page_id, change);
                if change == ChangeKind::Structural {
                    self.emit(SessionEvent::RenderPage(page_id));
                }
                Ok(value)
            }
            Err(err) => self.reject(err),
        }
    }

    /// Stamps the page and routes it to the matching save path.
    fn commit(&mut self, page_id: PageId, change: ChangeKind) {
        let now_ms = self.now_ms();
        if change == ChangeKind::None {
            return;
        }
        if let Some(page) = self.workspace.page_mut(page_id) {
            page.touch(now_ms);
        }
        match change {
            ChangeKind::Content => {
                let deadline = self.persistence.schedule_save(page_id, now_ms);
                debug!(
                    "event=save_schedule module=session status=ok page_id={page_id} deadline_ms={deadline}"
                );
            }
            ChangeKind::Structural => self.save_now(page_id),
            ChangeKind::None => {}
        }
    }

    fn save_now(&mut self, page_id: PageId) {
        let report = self.persistence.save_page(page_id, self.workspace.pages());
        if let Some(notice) = report.notice() {
            self.notify(notice);
        }
    }

    fn poll_remote(&mut self, now_ms: i64) {
        let events = match self.listener.as_mut() {
            Some(listener) => listener.poll(now_ms),
            None => return,
        };
        for event in events {
            match event {
                ListenerEvent::Snapshot(documents) => self.apply_snapshot(documents, now_ms),
                ListenerEvent::Failed(err) => {
                    self.listener = None;
                    self.handle_listener_failure(err, now_ms);
                }
                ListenerEvent::ReadinessTimeout => {
                    if self.workspace.is_empty() {
                        self.load_local_fallback(now_ms);
                        self.notify(Notice::info(
                            "Still connecting. Showing the copy saved on this device.",
                        ));
                    }
                }
            }
        }
    }

    fn apply_snapshot(&mut self, documents: Vec<PageDocument>, now_ms: i64) {
        let editing = self.suppression.is_editing(now_ms);
        let persistence = &self.persistence;
        let outcome = reconcile(
            &mut self.workspace,
            documents,
            |page_id| persistence.has_pending(page_id),
            editing,
        );

        match outcome {
            ReconcileOutcome::EmptySnapshot => self.handle_empty_snapshot(now_ms),
            ReconcileOutcome::Applied { render, .. } => {
                let focus_lost = self.suppression.focused_block().is_some_and(|block_id| {
                    self.workspace.page_of_block(block_id).is_none()
                });
                if focus_lost {
                    self.suppression.clear();
                }
                self.emit(SessionEvent::RenderPageList);
                if render == RenderDecision::Render || focus_lost {
                    self.render_selected();
                }
            }
        }
    }

    /// The remote collection is empty: seed it from memory, the local copy,
    /// or the welcome page, in that order.
    fn handle_empty_snapshot(&mut self, now_ms: i64) {
        if self.workspace.is_empty() {
            match self.persistence.load_local() {
                LocalLoad::Pages(pages) => {
                    info!(
                        "event=workspace_bootstrap module=session status=ok source=local pages={}",
                        pages.len()
                    );
                    self.workspace.replace_pages(pages);
                }
                LocalLoad::Empty | LocalLoad::Malformed => {
                    info!("event=workspace_bootstrap module=session status=ok source=welcome");
                    self.workspace.add_page(welcome_page(now_ms));
                }
            }
        }

        let notice = self
            .persistence
            .publish_all(self.workspace.pages())
            .iter()
            .find_map(|report| report.notice());
        if let Some(notice) = notice {
            self.notify(notice);
        }
        self.emit(SessionEvent::RenderPageList);
        self.render_selected();
    }

    /// Loads the local copy without touching the remote side; an empty or
    /// unreadable copy yields the welcome page.
    fn load_local_fallback(&mut self, now_ms: i64) {
        match self.persistence.load_local() {
            LocalLoad::Pages(pages) => {
                info!(
                    "event=workspace_load module=session status=ok source=local pages={}",
                    pages.len()
                );
                self.workspace.replace_pages(pages);
            }
            load @ (LocalLoad::Empty | LocalLoad::Malformed) => {
                info!(
                    "event=workspace_load module=session status=ok source=welcome malformed_local={}",
                    load == LocalLoad::Malformed
                );
                self.workspace.add_page(welcome_page(now_ms));
                if !self.persistence.write_local(self.workspace.pages()) {
                    self.notify(Notice::error("Changes could not be saved on this device."));
                }
            }
        }
        self.emit(SessionEvent::RenderPageList);
        self.render_selected();
    }

    fn handle_listener_failure(&mut self, err: RemoteError, now_ms: i64) {
        warn!("event=remote_listen module=session status=error fallback=local_only error={err}");
        self.persistence.enter_local_only();
        if self.workspace.is_empty() {
            self.load_local_fallback(now_ms);
        } else if !self.persistence.write_local(self.workspace.pages()) {
            self.notify(Notice::error("Changes could not be saved on this device."));
        }
        self.notify(Notice::warning(
            "Sync is unavailable. Working from this device until restart.",
        ));
    }
}

impl<R: RemoteStore, L: LocalStore> std::fmt::Debug for Session<R, L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("pages", &self.workspace.len())
            .field("selected", &self.workspace.selected_page_id())
            .field("mode", &self.persistence.mode())
            .field("listening", &self.is_listening())
            .field("queued_events", &self.events.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, SessionError, SessionEvent};
    use crate::clock::ManualClock;
    use crate::config::SessionConfig;
    use crate::model::block::BlockKind;
    use crate::model::page::PageError;
    use crate::notice::NoticeLevel;
    use crate::store::local::MemoryLocalStore;
    use crate::store::memory_remote::MemoryRemoteStore;

    fn session(clock: &ManualClock) -> Session<MemoryRemoteStore, MemoryLocalStore> {
        Session::start(
            SessionConfig::default(),
            Box::new(clock.clone()),
            MemoryRemoteStore::new(),
            MemoryLocalStore::new(),
        )
    }

    #[test]
    fn start_against_empty_remote_seeds_welcome_page() {
        let clock = ManualClock::new(1_000);
        let session = session(&clock);
        assert_eq!(session.workspace().len(), 1);
        let page = session.selected_page().unwrap();
        assert_eq!(page.blocks.len(), 12);
        assert_eq!(session.remote().documents("pages").len(), 1);
    }

    #[test]
    fn rejected_mutation_queues_warning_notice() {
        let clock = ManualClock::new(1_000);
        let mut session = session(&clock);
        let page_id = session.create_page();
        session.drain_events();

        let only_block = session.page(page_id).unwrap().blocks[0].id;
        let err = session.delete_block(only_block).unwrap_err();
        assert_eq!(err, SessionError::Page(PageError::LastBlock(only_block)));
        assert_eq!(session.page(page_id).unwrap().blocks.len(), 1);

        let events = session.drain_events();
        assert!(events.iter().any(|event| matches!(
            event,
            SessionEvent::Notice(notice) if notice.level == NoticeLevel::Warning
        )));
    }

    #[test]
    fn content_edit_waits_for_debounce_window() {
        let clock = ManualClock::new(1_000);
        let mut session = session(&clock);
        let page_id = session.create_page();
        let block_id = session.page(page_id).unwrap().blocks[0].id;
        let writes = session.remote().write_count();

        session.set_content(block_id, "draft").unwrap();
        clock.advance(300);
        session.set_content(block_id, "draft two").unwrap();
        clock.advance(300);
        session.tick();
        assert_eq!(session.remote().write_count(), writes);
        assert!(session.has_pending_save(page_id));

        clock.advance(200);
        session.tick();
        assert_eq!(session.remote().write_count(), writes + 1);
        let stored = session
            .remote()
            .document("pages", &page_id.to_string())
            .unwrap();
        assert_eq!(stored.blocks[0].text(), Some("draft two"));
    }

    #[test]
    fn structural_edit_saves_immediately() {
        let clock = ManualClock::new(1_000);
        let mut session = session(&clock);
        let page_id = session.create_page();
        let writes = session.remote().write_count();

        session
            .insert_block_after(page_id, None, BlockKind::Checkbox, "todo")
            .unwrap();
        assert_eq!(session.remote().write_count(), writes + 1);
        assert_eq!(
            session
                .remote()
                .document("pages", &page_id.to_string())
                .unwrap()
                .blocks
                .len(),
            2
        );
    }

    #[test]
    fn shutdown_flushes_pending_saves_and_unsubscribes() {
        let clock = ManualClock::new(1_000);
        let mut session = session(&clock);
        let page_id = session.create_page();
        let block_id = session.page(page_id).unwrap().blocks[0].id;
        session.set_content(block_id, "unsaved").unwrap();

        let (remote, _local) = session.shutdown();
        assert_eq!(remote.subscriber_count(), 0);
        let stored = remote.document("pages", &page_id.to_string()).unwrap();
        assert_eq!(stored.blocks[0].text(), Some("unsaved"));
    }
}
