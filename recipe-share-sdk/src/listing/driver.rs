//! Listing page runtime
//!
//! [`ListingPage::mount`] wires the pieces together and spawns one task that
//! owns the [`ListingController`]. The task selects over store changes, UI
//! commands, the debounce deadline and in-flight fetches, and publishes a
//! [`ListingSnapshot`] after every step.

use crate::catalog::RecipeCatalog;
use crate::config::DEFAULT_LISTING_DEBOUNCE;
use crate::error::SdkResult;
use crate::listing::accumulator::MergeMode;
use crate::listing::controller::{
    FetchRequest, IssuedFetch, ListingController, ListingEffect, ListingEvent, ListingPhase,
};
use crate::listing::debounce::Debouncer;
use crate::listing::options::{FilterOptionLoader, FilterOptions};
use crate::listing::seed::seed_from_location;
use crate::listing::store::{FilterSnapshot, FilterStore};
use crate::notify::{Notifier, NullNotifier};
use crate::resources::recipes::ListingResponse;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use recipe_share_core::{FilterCriteria, PaginationState, RecipeSummary, SessionContext};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use url::Url;

/// What the presentation layer renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingSnapshot {
    pub recipes: Vec<RecipeSummary>,
    pub pagination: Option<PaginationState>,
    pub current_page: u32,
    pub phase: ListingPhase,
    pub is_loading: bool,
    pub is_filtering: bool,
    pub is_loading_more: bool,
    pub criteria: FilterCriteria,
    pub has_active_filters: bool,
    /// Store revision the driver has caught up with
    pub revision: u64,
    /// No request waiting in the debouncer and none in flight
    pub settled: bool,
    pub handled_commands: u64,
    pub completed_fetches: u64,
}

impl ListingSnapshot {
    pub fn has_more(&self) -> bool {
        self.pagination.map(|p| p.has_more).unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingCommand {
    LoadMore,
    Refresh,
    ClearFilters,
}

/// Builder for a mounted listing page
pub struct ListingPage<C: ?Sized> {
    catalog: Arc<C>,
    notifier: Arc<dyn Notifier>,
    session: SessionContext,
    debounce: Duration,
}

impl<C: RecipeCatalog + ?Sized + 'static> ListingPage<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            notifier: Arc::new(NullNotifier),
            session: SessionContext::anonymous(),
            debounce: DEFAULT_LISTING_DEBOUNCE,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_session(mut self, session: SessionContext) -> Self {
        self.session = session;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Start the page. Must be called inside a Tokio runtime.
    ///
    /// Filters are imported from `location` once, and its query is stripped.
    /// The first page is requested after the debounce window.
    pub fn mount(self, location: Option<&mut Url>) -> ListingHandle {
        let seed = location.and_then(seed_from_location);
        let address_has_allergy_ids = seed.as_ref().map(|s| s.has_allergy_ids).unwrap_or(false);

        let store = FilterStore::default();
        if let Some(seed) = seed {
            store.replace(seed.criteria);
        }

        let (options_tx, options_rx) = watch::channel(FilterOptions::default());
        let loader = FilterOptionLoader::new(Arc::clone(&self.catalog), Arc::clone(&self.notifier));
        let loader_store = store.clone();
        let session = self.session.clone();
        tokio::spawn(async move {
            loader
                .load(&options_tx, &loader_store, &session, address_has_allergy_ids)
                .await;
        });

        let criteria_rx = store.subscribe();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let FilterSnapshot { criteria, revision } = store.snapshot();

        let controller = ListingController::new(criteria);
        let mut debouncer = Debouncer::new(self.debounce);
        debouncer.push(controller.initial_request());
        let (snapshots_tx, snapshots_rx) =
            watch::channel(capture(&controller, revision, false, 0, 0));

        let driver = ListingDriver {
            catalog: self.catalog,
            notifier: self.notifier,
            controller,
            debouncer,
            in_flight: FuturesUnordered::new(),
            revision,
            handled_commands: 0,
            completed_fetches: 0,
            snapshots: snapshots_tx,
        };

        info!(revision, "Mounted recipe listing");
        let task = tokio::spawn(driver.run(criteria_rx, commands_rx));

        ListingHandle {
            store,
            commands: commands_tx,
            sent_commands: AtomicU64::new(0),
            snapshots: snapshots_rx,
            options: options_rx,
            task,
        }
    }
}

/// Front-end side of a mounted listing
pub struct ListingHandle {
    store: FilterStore,
    commands: mpsc::UnboundedSender<ListingCommand>,
    sent_commands: AtomicU64,
    snapshots: watch::Receiver<ListingSnapshot>,
    options: watch::Receiver<FilterOptions>,
    task: JoinHandle<()>,
}

impl ListingHandle {
    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    pub fn snapshot(&self) -> ListingSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListingSnapshot> {
        self.snapshots.clone()
    }

    pub fn options(&self) -> FilterOptions {
        self.options.borrow().clone()
    }

    pub fn subscribe_options(&self) -> watch::Receiver<FilterOptions> {
        self.options.clone()
    }

    /// Ask for the next page. Returns false when the last response said
    /// there is none, or while another listing request is in flight.
    pub fn load_more(&self) -> bool {
        let accepted = {
            let snapshot = self.snapshots.borrow();
            snapshot.has_more() && matches!(snapshot.phase, ListingPhase::Idle | ListingPhase::Error)
        };
        if !accepted {
            return false;
        }
        self.send(ListingCommand::LoadMore)
    }

    /// Refetch page 1 while keeping the current list on screen
    pub fn refresh(&self) -> bool {
        self.send(ListingCommand::Refresh)
    }

    /// Reset every filter and the paging state
    pub fn clear_filters(&self) -> u64 {
        let revision = self.store.clear();
        self.send(ListingCommand::ClearFilters);
        revision
    }

    /// Wait until the driver has seen every store change and command issued
    /// so far, and nothing is pending or in flight.
    pub async fn settled(&self) -> ListingSnapshot {
        let revision = self.store.revision();
        let sent = self.sent_commands.load(Ordering::SeqCst);
        let mut rx = self.snapshots.clone();
        let result = rx
            .wait_for(|s| s.settled && s.revision >= revision && s.handled_commands >= sent)
            .await
            .map(|s| (*s).clone());
        match result {
            Ok(snapshot) => snapshot,
            Err(_) => self.snapshot(),
        }
    }

    /// Stop the driver and wait for it to exit
    pub async fn shutdown(self) {
        let ListingHandle { commands, task, .. } = self;
        drop(commands);
        if let Err(e) = task.await {
            debug!(error = %e, "Listing driver ended abnormally");
        }
    }

    fn send(&self, command: ListingCommand) -> bool {
        if self.commands.send(command).is_err() {
            return false;
        }
        self.sent_commands.fetch_add(1, Ordering::SeqCst);
        true
    }
}

type Completion = (u64, SdkResult<ListingResponse>);

struct ListingDriver<C: ?Sized> {
    catalog: Arc<C>,
    notifier: Arc<dyn Notifier>,
    controller: ListingController,
    debouncer: Debouncer<FetchRequest>,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
    revision: u64,
    handled_commands: u64,
    completed_fetches: u64,
    snapshots: watch::Sender<ListingSnapshot>,
}

impl<C: RecipeCatalog + ?Sized + 'static> ListingDriver<C> {
    async fn run(
        mut self,
        mut criteria_rx: watch::Receiver<FilterSnapshot>,
        mut commands: mpsc::UnboundedReceiver<ListingCommand>,
    ) {
        loop {
            let deadline = self.debouncer.deadline();
            let wake_at = deadline.unwrap_or_else(Instant::now);

            tokio::select! {
                changed = criteria_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let FilterSnapshot { criteria, revision } = criteria_rx.borrow_and_update().clone();
                    self.revision = revision;
                    self.step(ListingEvent::CriteriaChanged(criteria));
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    self.handled_commands += 1;
                    let event = match command {
                        ListingCommand::LoadMore => ListingEvent::PageRequested,
                        ListingCommand::Refresh => ListingEvent::RefreshRequested,
                        ListingCommand::ClearFilters => ListingEvent::FiltersCleared,
                    };
                    self.step(event);
                }
                _ = tokio::time::sleep_until(wake_at), if deadline.is_some() => {
                    if let Some(request) = self.debouncer.take_due(Instant::now()) {
                        self.step(ListingEvent::DebounceElapsed(request));
                    }
                }
                Some((seq, result)) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.completed_fetches += 1;
                    let event = match result {
                        Ok(response) => ListingEvent::ResponseReceived { seq, response },
                        Err(error) => ListingEvent::ResponseFailed { seq, error },
                    };
                    self.step(event);
                }
            }

            self.snapshots.send_replace(self.snapshot());
        }
        debug!("Listing driver stopped");
    }

    fn step(&mut self, event: ListingEvent) {
        match self.controller.handle(event) {
            Some(ListingEffect::Schedule(request)) => self.schedule(request),
            Some(ListingEffect::Fetch(issued)) => self.spawn_fetch(issued),
            Some(ListingEffect::Notify(notification)) => self.notifier.notify(notification),
            Some(ListingEffect::Discarded { .. }) | None => {}
        }
    }

    fn schedule(&mut self, mut request: FetchRequest) {
        // A pending page-1 request outranks a load-more for stale criteria,
        // and a refresh does not downgrade a pending fresh query.
        let (pending_replace, pending_fresh) = self
            .debouncer
            .peek()
            .map(|pending| (pending.mode == MergeMode::Replace, pending.fresh))
            .unwrap_or((false, false));
        if request.mode == MergeMode::Append && pending_replace {
            debug!("Ignoring load-more while a new query is pending");
            return;
        }
        request.fresh |= pending_fresh;
        self.debouncer.push(request);
    }

    fn spawn_fetch(&mut self, issued: IssuedFetch) {
        let catalog = Arc::clone(&self.catalog);
        let IssuedFetch { seq, query } = issued;
        self.in_flight.push(
            async move {
                let result = catalog.list_recipes(&query).await;
                (seq, result)
            }
            .boxed(),
        );
    }

    fn snapshot(&self) -> ListingSnapshot {
        capture(
            &self.controller,
            self.revision,
            !self.debouncer.is_pending() && self.in_flight.is_empty(),
            self.handled_commands,
            self.completed_fetches,
        )
    }
}

fn capture(
    controller: &ListingController,
    revision: u64,
    settled: bool,
    handled_commands: u64,
    completed_fetches: u64,
) -> ListingSnapshot {
    ListingSnapshot {
        recipes: controller.recipes().to_vec(),
        pagination: controller.pagination().copied(),
        current_page: controller.current_page(),
        phase: controller.phase(),
        is_loading: controller.is_loading(),
        is_filtering: controller.is_filtering(),
        is_loading_more: controller.is_loading_more(),
        criteria: controller.criteria().clone(),
        has_active_filters: controller.criteria().has_active_filters(),
        revision,
        settled,
        handled_commands,
        completed_fetches,
    }
}
