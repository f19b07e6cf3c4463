//! Feed controller.
//!
//! A reducer over [`ViewState`]: every entry point mutates the state and hands
//! back at most one [`PageRequest`] the caller has to perform. The result is
//! fed back through [`FeedController::on_page_loaded`], which may in turn ask
//! for the next page when the auto-load heuristic fires. Driving that loop is
//! left to [`FeedSession`](crate::session::FeedSession).

use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::display::Normalizer;
use crate::feed::Feed;
use crate::model::{FeedFilter, Page};
use crate::view::build_groups;

mod state;
pub use state::{FeedEvent, Phase, ViewState};

mod error;
pub use error::FetchError;

/// Imperative inputs of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    LoadMore,
    SetSearchQuery(String),
    SetFilter(FeedFilter),
    Retry,
}

/// Why a page is being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// First page after a refresh; replaces the feed.
    Initial,
    /// Explicit load-more.
    More,
    /// Issued by the auto-load heuristic.
    Auto,
}

/// A page fetch the caller must perform and report back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub kind: RequestKind,
    /// Refresh count at issue time; results of older generations are dropped.
    generation: u64,
}

pub struct FeedController {
    config: FeedConfig,
    normalizer: Normalizer,
    feed: Feed,
    state: ViewState,
    generation: u64,
    events: Vec<FeedEvent>,
}

/// Public API
impl FeedController {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            normalizer: Normalizer::new(&config),
            feed: Feed::new(config.duplicates),
            config,
            state: ViewState::default(),
            generation: 0,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Drain the one-shot events raised since the last call.
    pub fn take_events(&mut self) -> Vec<FeedEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn handle(&mut self, command: Command) -> Option<PageRequest> {
        match command {
            Command::Refresh => Some(self.refresh()),
            Command::LoadMore => self.load_more(),
            Command::SetSearchQuery(query) => self.set_search_query(query),
            Command::SetFilter(filter) => self.set_filter(filter),
            Command::Retry => self.retry(),
        }
    }

    /// Start over from page 1. Always accepted: anything still in flight
    /// becomes stale and its result is ignored.
    pub fn refresh(&mut self) -> PageRequest {
        self.generation += 1;
        self.feed.reset();
        self.state.is_loading = true;
        self.state.is_fetching_more = false;
        self.state.is_auto_loading = false;
        self.state.end_reached = false;
        self.state.error = None;
        self.state.groups.clear();
        debug!(generation = self.generation, "refreshing feed");
        self.request(1, RequestKind::Initial)
    }

    /// Request the next page, unless a fetch is already running or the end
    /// of the feed was reached.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        let state = &self.state;
        if state.is_loading || state.is_fetching_more || state.is_auto_loading || state.end_reached
        {
            debug!(phase = ?state.phase(), end_reached = state.end_reached, "load more ignored");
            return None;
        }
        if self.feed.is_end_reached() {
            self.state.end_reached = true;
            return None;
        }

        self.state.is_fetching_more = true;
        self.state.error = None;
        Some(self.request(self.feed.next_page(), RequestKind::More))
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) -> Option<PageRequest> {
        self.state.search_query = query.into();
        self.recompute()
    }

    pub fn set_filter(&mut self, filter: FeedFilter) -> Option<PageRequest> {
        if self.state.filter == filter {
            return None;
        }
        self.state.filter = filter;
        self.recompute()
    }

    /// Start over when nothing was loaded yet, otherwise continue paginating.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if self.feed.is_empty() {
            Some(self.refresh())
        } else {
            self.load_more()
        }
    }

    /// Apply the outcome of `request`. Returns the next page to fetch when the
    /// auto-load heuristic asks for one.
    pub fn on_page_loaded(
        &mut self,
        request: PageRequest,
        result: Result<Page, FetchError>,
    ) -> Option<PageRequest> {
        if request.generation != self.generation {
            debug!(page = request.page, kind = ?request.kind, "discarding stale page");
            return None;
        }

        match result {
            Ok(page) => self.apply_page(request, page),
            Err(e) => {
                self.apply_failure(request, e);
                None
            }
        }
    }
}

/// Private API
impl FeedController {
    fn request(&self, page: u32, kind: RequestKind) -> PageRequest {
        PageRequest {
            page,
            kind,
            generation: self.generation,
        }
    }

    fn apply_page(&mut self, request: PageRequest, page: Page) -> Option<PageRequest> {
        let received = page.records.len();
        let server_has_next = page.has_next_page();
        let added = match request.kind {
            RequestKind::Initial => self.feed.replace(request.page, page),
            RequestKind::More | RequestKind::Auto => self.feed.append(request.page, page),
        };
        info!(
            page = request.page,
            kind = ?request.kind,
            received,
            added,
            total_pages = self.feed.total_pages(),
            server_has_next,
            "page applied"
        );

        self.state.is_loading = false;
        self.state.is_fetching_more = false;
        self.state.is_auto_loading = false;
        self.state.end_reached = self.feed.is_end_reached();
        self.state.error = None;

        self.recompute()
    }

    /// Accumulated records are kept; only the in-flight flags are cleared.
    fn apply_failure(&mut self, request: PageRequest, error: FetchError) {
        let message = error
            .user_message()
            .map(str::to_string)
            .unwrap_or_else(|| self.config.fallback_error.clone());
        warn!(
            page = request.page,
            kind = ?request.kind,
            reason = %error,
            kept = self.feed.len(),
            "page fetch failed"
        );

        self.state.is_loading = false;
        self.state.is_fetching_more = false;
        self.state.is_auto_loading = false;
        self.state.error = Some(message.clone());
        self.events.push(FeedEvent::ShowMessage { message });
    }

    /// Rebuild the groups, then decide whether the view is starved enough to
    /// pull another page.
    fn recompute(&mut self) -> Option<PageRequest> {
        self.state.groups = build_groups(
            self.feed.records(),
            self.state.filter,
            &self.state.search_query,
            &self.normalizer,
        );
        self.auto_load()
    }

    fn auto_load(&mut self) -> Option<PageRequest> {
        let state = &self.state;
        let visible = state.visible_count();
        let target = self.config.auto_load_target(self.feed.last_page_size());

        let idle = !state.is_auto_loading && !state.is_loading && !state.is_fetching_more;
        let more_available =
            !state.end_reached && self.feed.current_page() > 0 && self.feed.has_more();
        let starved = target > 0 && visible < target;

        if !(self.config.auto_load && idle && more_available && state.error.is_none() && starved)
        {
            return None;
        }

        let next = self.feed.next_page();
        debug!(visible, target, page = next, "auto-loading next page");
        self.state.is_auto_loading = true;
        self.state.is_fetching_more = true;
        Some(self.request(next, RequestKind::Auto))
    }
}
