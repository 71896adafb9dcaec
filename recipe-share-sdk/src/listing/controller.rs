//! Listing state machine
//!
//! [`ListingController`] owns the shown results and the loading phase. It
//! performs no I/O: every input is a [`ListingEvent`] and every side effect
//! it wants is returned as a [`ListingEffect`] for the driver to carry out.

use crate::error::SdkError;
use crate::listing::accumulator::{MergeMode, ResultAccumulator};
use crate::listing::query::ListingQuery;
use crate::notify::{Notification, RECIPES_FETCH_FAILED};
use crate::resources::recipes::ListingResponse;
use recipe_share_core::{FilterCriteria, PaginationState, RecipeSummary};
use serde::Serialize;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingPhase {
    Idle,
    /// First load or a fresh query; the list is about to be replaced
    Loading,
    /// Refetching page 1 while the current list stays visible
    Filtering,
    /// Fetching the next page to append
    LoadingMore,
    /// The latest request failed; the list is what it was before
    Error,
}

/// A listing request waiting for the debouncer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub criteria: FilterCriteria,
    pub page: u32,
    pub mode: MergeMode,
    pub fresh: bool,
}

impl FetchRequest {
    /// Page 1 of new criteria
    pub fn fresh(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            page: 1,
            mode: MergeMode::Replace,
            fresh: true,
        }
    }

    /// Page 1 again, keeping the current list on screen meanwhile
    pub fn refresh(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            page: 1,
            mode: MergeMode::Replace,
            fresh: false,
        }
    }

    pub fn next_page(criteria: FilterCriteria, page: u32) -> Self {
        Self {
            criteria,
            page,
            mode: MergeMode::Append,
            fresh: false,
        }
    }

    pub fn query(&self) -> ListingQuery {
        ListingQuery::from_criteria(&self.criteria, self.page)
    }
}

/// A request that has been sent, tagged with its sequence number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedFetch {
    pub seq: u64,
    pub query: ListingQuery,
}

#[derive(Debug)]
pub enum ListingEvent {
    CriteriaChanged(FilterCriteria),
    PageRequested,
    RefreshRequested,
    FiltersCleared,
    DebounceElapsed(FetchRequest),
    ResponseReceived { seq: u64, response: ListingResponse },
    ResponseFailed { seq: u64, error: SdkError },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListingEffect {
    /// Hand the request to the debouncer
    Schedule(FetchRequest),
    /// Send the request now
    Fetch(IssuedFetch),
    Notify(Notification),
    /// A response arrived for a request that is no longer the latest
    Discarded { seq: u64 },
}

#[derive(Debug, Clone)]
pub struct ListingController {
    criteria: FilterCriteria,
    results: ResultAccumulator,
    current_page: u32,
    phase: ListingPhase,
    initial_load: bool,
    next_seq: u64,
    latest: Option<(u64, FetchRequest)>,
}

impl ListingController {
    /// A controller for the given starting criteria, in the `Loading` phase
    /// until the first response arrives.
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            results: ResultAccumulator::new(),
            current_page: 1,
            phase: ListingPhase::Loading,
            initial_load: true,
            next_seq: 0,
            latest: None,
        }
    }

    /// The request that loads the first page at mount
    pub fn initial_request(&self) -> FetchRequest {
        FetchRequest::fresh(self.criteria.clone())
    }

    pub fn handle(&mut self, event: ListingEvent) -> Option<ListingEffect> {
        match event {
            ListingEvent::CriteriaChanged(criteria) => {
                self.criteria = criteria;
                Some(ListingEffect::Schedule(FetchRequest::fresh(
                    self.criteria.clone(),
                )))
            }
            ListingEvent::PageRequested => {
                // The pagination belongs to the list on screen, which an
                // in-flight request is about to replace or extend.
                if let Some(seq) = self.awaiting() {
                    debug!(seq, "Ignoring load-more while a listing request is in flight");
                    return None;
                }
                self.load_more_request().map(ListingEffect::Schedule)
            }
            ListingEvent::RefreshRequested => {
                let request = if self.awaiting_fresh() {
                    FetchRequest::fresh(self.criteria.clone())
                } else {
                    FetchRequest::refresh(self.criteria.clone())
                };
                Some(ListingEffect::Schedule(request))
            }
            ListingEvent::FiltersCleared => {
                self.reset_pagination();
                None
            }
            ListingEvent::DebounceElapsed(request) => Some(ListingEffect::Fetch(self.dispatch(request))),
            ListingEvent::ResponseReceived { seq, response } => self.apply_response(seq, response),
            ListingEvent::ResponseFailed { seq, error } => self.apply_failure(seq, error),
        }
    }

    /// The next page, if the last response said there is one
    pub fn load_more_request(&self) -> Option<FetchRequest> {
        let next = self.results.pagination()?.next_page()?;
        Some(FetchRequest::next_page(self.criteria.clone(), next))
    }

    pub fn reset_pagination(&mut self) {
        self.current_page = 1;
        self.results.reset_pagination();
    }

    fn dispatch(&mut self, request: FetchRequest) -> IssuedFetch {
        self.next_seq += 1;
        let seq = self.next_seq;

        self.phase = if self.initial_load || request.fresh {
            self.current_page = 1;
            ListingPhase::Loading
        } else if request.page > 1 {
            ListingPhase::LoadingMore
        } else {
            ListingPhase::Filtering
        };

        let issued = IssuedFetch {
            seq,
            query: request.query(),
        };
        debug!(seq, page = request.page, phase = ?self.phase, "Dispatching listing request");
        self.latest = Some((seq, request));
        issued
    }

    fn take_latest(&mut self, seq: u64) -> Option<FetchRequest> {
        match &self.latest {
            Some((latest, _)) if *latest == seq => self.latest.take().map(|(_, request)| request),
            _ => None,
        }
    }

    fn apply_response(&mut self, seq: u64, response: ListingResponse) -> Option<ListingEffect> {
        let Some(request) = self.take_latest(seq) else {
            debug!(seq, "Discarding stale listing response");
            return Some(ListingEffect::Discarded { seq });
        };

        self.current_page = response
            .pagination
            .map(|p| p.current_page)
            .unwrap_or(request.page);
        self.results.merge(request.mode, response);
        self.initial_load = false;
        self.phase = ListingPhase::Idle;
        None
    }

    fn apply_failure(&mut self, seq: u64, error: SdkError) -> Option<ListingEffect> {
        if self.take_latest(seq).is_none() {
            debug!(seq, error = %error, "Discarding stale listing failure");
            return Some(ListingEffect::Discarded { seq });
        }

        error!(seq, error = %error, "Error fetching recipes");
        self.initial_load = false;
        self.phase = ListingPhase::Error;
        Some(ListingEffect::Notify(Notification::error(RECIPES_FETCH_FAILED)))
    }

    pub fn phase(&self) -> ListingPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ListingPhase::Loading
    }

    pub fn is_filtering(&self) -> bool {
        matches!(self.phase, ListingPhase::Filtering | ListingPhase::LoadingMore)
    }

    pub fn is_loading_more(&self) -> bool {
        self.phase == ListingPhase::LoadingMore
    }

    pub fn recipes(&self) -> &[RecipeSummary] {
        self.results.recipes()
    }

    pub fn pagination(&self) -> Option<&PaginationState> {
        self.results.pagination()
    }

    pub fn has_more(&self) -> bool {
        self.results.has_more()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Sequence number of the request whose response is still awaited
    pub fn awaiting(&self) -> Option<u64> {
        self.latest.as_ref().map(|(seq, _)| *seq)
    }

    fn awaiting_fresh(&self) -> bool {
        matches!(&self.latest, Some((_, request)) if request.fresh)
    }
}
