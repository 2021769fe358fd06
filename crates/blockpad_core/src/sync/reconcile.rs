//! Snapshot reconciliation into the in-memory workspace.

use crate::model::id::PageId;
use crate::model::workspace::Workspace;
use crate::store::remote::PageDocument;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDecision {
    Render,
    /// State was replaced, but the editor is in active use.
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The snapshot carried no documents; the workspace was left untouched.
    EmptySnapshot,
    Applied {
        selection_changed: bool,
        render: RenderDecision,
        /// Pages whose unsaved local version was kept over the snapshot's.
        retained_local: usize,
    },
}

/// Replaces the workspace's pages with `snapshot`.
///
/// Pages sort by `created_at`; a selection pointing at a vanished page moves
/// to the first page. Pages for which `has_unsaved_edit` holds keep their
/// in-memory version (even when absent from the snapshot), since the pending
/// save will overwrite the remote copy.
pub fn reconcile(
    workspace: &mut Workspace,
    snapshot: Vec<PageDocument>,
    has_unsaved_edit: impl Fn(PageId) -> bool,
    actively_editing: bool,
) -> ReconcileOutcome {
    if snapshot.is_empty() {
        return ReconcileOutcome::EmptySnapshot;
    }

    let mut retained_local = 0;
    let mut pages = snapshot
        .into_iter()
        .map(|mut incoming| {
            if has_unsaved_edit(incoming.id) {
                if let Some(local) = workspace.page(incoming.id) {
                    retained_local += 1;
                    return local.clone();
                }
            }
            incoming.normalize();
            incoming
        })
        .collect::<Vec<_>>();

    // A page whose first save is still pending is not remote yet.
    let unsent = workspace
        .pages()
        .iter()
        .filter(|local| has_unsaved_edit(local.id))
        .filter(|local| !pages.iter().any(|page| page.id == local.id))
        .cloned()
        .collect::<Vec<_>>();
    retained_local += unsent.len();
    pages.extend(unsent);

    let page_count = pages.len();
    let selection_changed = workspace.replace_pages(pages);
    let render = if actively_editing {
        RenderDecision::Suppressed
    } else {
        RenderDecision::Render
    };
    debug!(
        "event=snapshot_apply module=sync status=ok pages={} retained_local={} selection_changed={} render_suppressed={}",
        page_count,
        retained_local,
        selection_changed,
        render == RenderDecision::Suppressed
    );

    ReconcileOutcome::Applied {
        selection_changed,
        render,
        retained_local,
    }
}
