//! Single-writer driver around [`FeedController`].
//!
//! The session owns the controller and performs the page fetches it asks for,
//! one at a time. Readers observe immutable [`ViewState`] snapshots through a
//! `watch` channel and one-shot [`FeedEvent`]s through a `broadcast` channel.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

use crate::config::FeedConfig;
use crate::controller::{Command, FeedController, FeedEvent, FetchError, PageRequest, ViewState};
use crate::fetch::PageFetcher;
use crate::model::{FeedFilter, Page};

type InFlight = Pin<Box<dyn Future<Output = (PageRequest, Result<Page, FetchError>)> + Send>>;

const EVENT_CAPACITY: usize = 16;

pub struct FeedSession<F> {
    controller: FeedController,
    fetcher: Arc<F>,
    state_tx: watch::Sender<ViewState>,
    events_tx: broadcast::Sender<FeedEvent>,
}

impl<F> FeedSession<F>
where
    F: PageFetcher + Send + Sync + 'static,
{
    pub fn new(fetcher: F, config: FeedConfig) -> Self {
        let controller = FeedController::new(config);
        let (state_tx, _) = watch::channel(controller.state().clone());
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            controller,
            fetcher: Arc::new(fetcher),
            state_tx,
            events_tx,
        }
    }

    /// Latest state, as seen by the writer.
    pub fn state(&self) -> &ViewState {
        self.controller.state()
    }

    pub fn controller(&self) -> &FeedController {
        &self.controller
    }

    /// Snapshots published after every change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state_tx.subscribe()
    }

    /// Events raised after this call.
    pub fn events(&self) -> broadcast::Receiver<FeedEvent> {
        self.events_tx.subscribe()
    }

    pub async fn refresh(&mut self) {
        self.apply(Command::Refresh).await;
    }

    pub async fn load_more(&mut self) {
        self.apply(Command::LoadMore).await;
    }

    pub async fn set_search_query(&mut self, query: impl Into<String>) {
        self.apply(Command::SetSearchQuery(query.into())).await;
    }

    pub async fn set_filter(&mut self, filter: FeedFilter) {
        self.apply(Command::SetFilter(filter)).await;
    }

    pub async fn retry(&mut self) {
        self.apply(Command::Retry).await;
    }

    /// Apply one command and perform every fetch it leads to, auto-loads
    /// included, before returning.
    pub async fn apply(&mut self, command: Command) {
        let mut next = self.controller.handle(command);
        self.publish();

        // bounded: each round either ends the feed or advances the page
        while let Some(request) = next {
            let result = self.fetcher.fetch_page(request.page).await;
            next = self.controller.on_page_loaded(request, result);
            self.publish();
        }
    }

    /// Process commands as they arrive, keeping at most one fetch in flight.
    ///
    /// Commands are reduced immediately even while a fetch is running: the
    /// controller refuses overlapping pagination, and a refresh replaces the
    /// fetch in flight. Once the stream ends, the pending fetch chain is
    /// finished before returning.
    pub async fn run(&mut self, mut commands: impl Stream<Item = Command> + Unpin) {
        let mut in_flight: Option<InFlight> = None;
        let mut open = true;
        self.publish();

        while open || in_flight.is_some() {
            tokio::select! {
                biased;

                (request, result) = async {
                    match in_flight.as_mut() {
                        Some(fetch) => fetch.await,
                        None => std::future::pending().await,
                    }
                }, if in_flight.is_some() => {
                    in_flight = self
                        .controller
                        .on_page_loaded(request, result)
                        .map(|next| self.start_fetch(next));
                    self.publish();
                }

                command = commands.next(), if open => match command {
                    Some(command) => {
                        if let Some(request) = self.controller.handle(command) {
                            if in_flight.is_some() {
                                debug!(page = request.page, kind = ?request.kind, "replacing fetch in flight");
                            }
                            in_flight = Some(self.start_fetch(request));
                        }
                        self.publish();
                    }
                    None => open = false,
                }
            }
        }
    }

    fn start_fetch(&self, request: PageRequest) -> InFlight {
        let fetcher = Arc::clone(&self.fetcher);
        Box::pin(async move {
            let result = fetcher.fetch_page(request.page).await;
            (request, result)
        })
    }

    fn publish(&mut self) {
        self.state_tx.send_replace(self.controller.state().clone());
        for event in self.controller.take_events() {
            // nobody listening is fine
            let _ = self.events_tx.send(event);
        }
    }
}
