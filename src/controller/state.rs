use crate::model::FeedFilter;
use crate::view::MonthGroup;

/// Where the controller is in its request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingInitial,
    FetchingMore,
    AutoLoading,
    /// Idle, with the last fetch having failed.
    Error,
}

/// Immutable snapshot observed by the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub is_loading: bool,
    /// Set for manual and automatic pagination fetches alike.
    pub is_fetching_more: bool,
    pub is_auto_loading: bool,
    pub end_reached: bool,
    pub error: Option<String>,
    pub search_query: String,
    pub filter: FeedFilter,
    pub groups: Vec<MonthGroup>,
}

impl ViewState {
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::LoadingInitial
        } else if self.is_auto_loading {
            Phase::AutoLoading
        } else if self.is_fetching_more {
            Phase::FetchingMore
        } else if self.error.is_some() {
            Phase::Error
        } else {
            Phase::Idle
        }
    }

    /// Number of filtered items across all groups.
    pub fn visible_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Nothing to show and the last fetch failed: replace the list by a retry prompt.
    pub fn shows_retry_prompt(&self) -> bool {
        self.is_empty() && self.error.is_some()
    }

    /// Content is visible and the last fetch failed: append a retry affordance.
    pub fn shows_inline_retry(&self) -> bool {
        !self.is_empty() && self.error.is_some()
    }
}

/// One-shot notification for transient UI feedback. Carries the same text as
/// [`ViewState::error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    ShowMessage { message: String },
}
