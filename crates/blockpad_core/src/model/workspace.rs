//! Workspace: the set of pages in one session.
//!
//! # Invariants
//! - Pages are kept in creation order; snapshots re-sort by `created_at`.
//! - The selected page id, when set, refers to a page in the workspace.
//! - The last remaining page cannot be deleted.

use crate::model::id::{BlockId, PageId};
use crate::model::page::{Page, DEFAULT_PAGE_TITLE, PAGE_ICONS};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected workspace-level operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    PageNotFound(PageId),
    /// Deleting would leave the workspace without pages.
    LastPage(PageId),
    /// Icon is not part of the fixed palette.
    InvalidIcon(String),
}

impl Display for WorkspaceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageNotFound(id) => write!(f, "page not found: {id}"),
            Self::LastPage(_) => write!(f, "the last page cannot be deleted"),
            Self::InvalidIcon(icon) => write!(f, "icon `{icon}` is not in the palette"),
        }
    }
}

impl Error for WorkspaceError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workspace {
    pages: Vec<Page>,
    selected: Option<PageId>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|page| page.id == id)
    }

    pub fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|page| page.id == id)
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.page(id).is_some()
    }

    pub fn selected_page_id(&self) -> Option<PageId> {
        self.selected
    }

    pub fn selected_page(&self) -> Option<&Page> {
        self.selected.and_then(|id| self.page(id))
    }

    /// Returns the id of the page owning `block_id`.
    pub fn page_of_block(&self, block_id: BlockId) -> Option<PageId> {
        self.pages
            .iter()
            .find(|page| page.contains_block(block_id))
            .map(|page| page.id)
    }

    pub fn select(&mut self, id: PageId) -> Result<(), WorkspaceError> {
        if !self.contains(id) {
            return Err(WorkspaceError::PageNotFound(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    /// Icon for the next created page, cycling through the palette.
    pub fn next_icon(&self) -> &'static str {
        PAGE_ICONS[self.pages.len() % PAGE_ICONS.len()]
    }

    /// Appends a page and selects it.
    pub fn add_page(&mut self, page: Page) -> PageId {
        let id = page.id;
        self.pages.push(page);
        self.selected = Some(id);
        id
    }

    /// Removes a page; the selection moves to the first page if it pointed
    /// at the removed one.
    pub fn remove_page(&mut self, id: PageId) -> Result<Page, WorkspaceError> {
        let index = self
            .pages
            .iter()
            .position(|page| page.id == id)
            .ok_or(WorkspaceError::PageNotFound(id))?;
        if self.pages.len() <= 1 {
            return Err(WorkspaceError::LastPage(id));
        }
        let removed = self.pages.remove(index);
        if self.selected == Some(id) {
            self.selected = self.pages.first().map(|page| page.id);
        }
        Ok(removed)
    }

    pub fn rename_page(&mut self, id: PageId, title: &str) -> Result<(), WorkspaceError> {
        let page = self.page_mut(id).ok_or(WorkspaceError::PageNotFound(id))?;
        let trimmed = title.trim();
        page.title = if trimmed.is_empty() {
            DEFAULT_PAGE_TITLE.to_string()
        } else {
            trimmed.to_string()
        };
        Ok(())
    }

    pub fn set_icon(&mut self, id: PageId, icon: &str) -> Result<(), WorkspaceError> {
        if !PAGE_ICONS.contains(&icon) {
            return Err(WorkspaceError::InvalidIcon(icon.to_string()));
        }
        let page = self.page_mut(id).ok_or(WorkspaceError::PageNotFound(id))?;
        page.icon = icon.to_string();
        Ok(())
    }

    /// Replaces all pages, ordered by `created_at` (ties by id).
    ///
    /// Keeps the selection when it still exists, otherwise selects the first
    /// page. Returns `true` when the selection changed.
    pub fn replace_pages(&mut self, mut pages: Vec<Page>) -> bool {
        pages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        let previous = self.selected;
        self.pages = pages;
        let keep = previous.filter(|id| self.contains(*id));
        self.selected = keep.or_else(|| self.pages.first().map(|page| page.id));
        self.selected != previous
    }
}
