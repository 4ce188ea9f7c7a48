//! Query scope
//!
//! Every read restricts to one project + one collection + a lifecycle view,
//! optionally narrowed to a locale. Soft-deleted entries are invisible to
//! every view.

use crate::schema::{CollectionId, ProjectId};
use crate::store::{ContentEntry, EntryStatus};

/// Which lifecycle states a read admits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleView {
    /// Published entries only (default)
    #[default]
    Published,
    /// Draft entries only
    OnlyDraft,
    /// No lifecycle restriction
    WithDraft,
}

impl LifecycleView {
    /// Returns true when the view admits the status
    pub fn admits(&self, status: EntryStatus) -> bool {
        match self {
            LifecycleView::Published => status == EntryStatus::Published,
            LifecycleView::OnlyDraft => status == EntryStatus::Draft,
            LifecycleView::WithDraft => true,
        }
    }
}

/// Base restriction applied before filters
#[derive(Debug, Clone)]
pub struct QueryScope {
    pub project_id: ProjectId,
    pub collection_id: CollectionId,
    pub view: LifecycleView,
    pub locale: Option<String>,
}

impl QueryScope {
    /// Creates a scope with the default published view and no locale filter
    pub fn new(project_id: ProjectId, collection_id: CollectionId) -> Self {
        Self {
            project_id,
            collection_id,
            view: LifecycleView::default(),
            locale: None,
        }
    }

    /// Sets the lifecycle view, builder-style
    pub fn with_view(mut self, view: LifecycleView) -> Self {
        self.view = view;
        self
    }

    /// Narrows to one locale, builder-style
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Returns true when the entry falls inside this scope
    pub fn admits(&self, entry: &ContentEntry) -> bool {
        entry.project_id == self.project_id
            && entry.collection_id == self.collection_id
            && !entry.is_deleted()
            && self.view.admits(entry.status)
            && self
                .locale
                .as_ref()
                .map(|l| entry.locale == *l)
                .unwrap_or(true)
    }
}
