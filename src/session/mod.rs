//! Per-operator search session orchestration.
//!
//! Single logical flow: the debounce gate and the facet selection are
//! mutated only by the input loop, so the session is single-writer by
//! construction. Retrieval requests are issued with a monotonically
//! increasing sequence number; a response is applied only when it belongs
//! to the latest issued request, so superseded in-flight results are
//! discarded on arrival rather than queued.

pub mod debounce;
pub mod facets;

pub use debounce::{DebounceGate, GateEvent, GateState};
pub use facets::FacetSelection;

use crate::config::SearchConfig;
use crate::gateway::{FacetBucket, RetrievalError, RetrievalGateway, RetrievalResponse};
use crate::query::{QueryBuilder, QueryIntent, RetrievalRequest};
use crate::schema::{FacetGroup, IndexSchema};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// One presented page of results with its facet counts
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultPage {
    pub records: Vec<crate::models::PaymentRecord>,
    pub total_pages: u32,
    pub facets: BTreeMap<FacetGroup, Vec<FacetBucket>>,
}

impl From<RetrievalResponse> for ResultPage {
    fn from(response: RetrievalResponse) -> Self {
        let mut facets = BTreeMap::new();
        for group in FacetGroup::ALL {
            let buckets = response.buckets(group);
            if !buckets.is_empty() {
                facets.insert(group, buckets.to_vec());
            }
        }

        Self {
            records: response.payments,
            total_pages: response.total_pages,
            facets,
        }
    }
}

/// What the presenter should currently show.
///
/// `Unavailable` (retrieval failed) is deliberately distinct from a `Ready`
/// page with zero records ("no matches"); a failure is never cached as a
/// valid empty response.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionView {
    /// Nothing to show; no query has produced results
    #[default]
    Empty,

    /// A request is in flight
    Loading,

    /// The latest response
    Ready(ResultPage),

    /// The latest request failed; results unavailable
    Unavailable,
}

impl SessionView {
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionView::Ready(_))
    }
}

/// A request the caller must run against a gateway, tagged with the
/// sequence number that guards against stale application
#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuery {
    pub seq: u64,
    pub request: RetrievalRequest,
}

/// What a session mutation asks of the caller
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Nothing to do
    None,

    /// Run this request and feed the outcome to `apply_response`
    Issue(PendingQuery),
}

/// The session state machine tying together gate, selection, pagination,
/// and response application
pub struct SearchSession {
    schema: Arc<IndexSchema>,
    gate: DebounceGate,
    selection: FacetSelection,
    page: u32,
    page_size: usize,
    next_seq: u64,
    current_seq: Option<u64>,
    view: SessionView,
}

impl SearchSession {
    pub fn new(schema: Arc<IndexSchema>, config: &SearchConfig) -> Self {
        Self {
            schema,
            gate: DebounceGate::new(config.debounce_delay(), config.min_term_len),
            selection: FacetSelection::new(),
            page: 1,
            page_size: config.page_size,
            next_seq: 0,
            current_seq: None,
            view: SessionView::Empty,
        }
    }

    pub fn view(&self) -> &SessionView {
        &self.view
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn selection(&self) -> &FacetSelection {
        &self.selection
    }

    pub fn gate_state(&self) -> &GateState {
        self.gate.state()
    }

    /// Record a keystroke in the search box. A new search context starts at
    /// page 1; the request itself waits on the debounce deadline.
    pub fn keystroke(&mut self, term: &str, now: Instant) {
        self.page = 1;
        self.gate.keystroke(term, now);
    }

    /// Drive the debounce gate. Returns the request to issue, if any.
    pub fn tick(&mut self, now: Instant) -> SessionAction {
        match self.gate.poll(now) {
            GateEvent::Admit { term } => self.issue(term),
            GateEvent::Suppress { cleared } => {
                if !cleared {
                    // The admitted term was already empty: whatever is shown
                    // already reflects it, and reissuing would duplicate the
                    // latest request byte for byte.
                    SessionAction::None
                } else if !self.selection.is_empty() {
                    // Facets still constrain: show filtered-but-unsearched
                    // results under the suppressed term.
                    self.issue(String::new())
                } else {
                    debug!("short term with no facets, clearing results locally");
                    self.view = SessionView::Empty;
                    // Invalidate any in-flight request so a late arrival
                    // cannot resurrect the cleared view.
                    self.current_seq = None;
                    SessionAction::None
                }
            }
            GateEvent::None => SessionAction::None,
        }
    }

    /// Toggle a facet value. Discrete user action: bypasses the debounce,
    /// resets to page 1, and issues immediately with the admitted term.
    pub fn toggle_facet(&mut self, group: FacetGroup, value: impl Into<String>) -> SessionAction {
        self.selection.toggle(group, value);
        self.page = 1;
        let term = self.gate.force_admit();
        self.issue(term)
    }

    /// Move to another page of the current result set. No-ops outside the
    /// known page range or when nothing is presented yet. After a failure
    /// the page range is unknown, so repaging retries from the first page.
    pub fn set_page(&mut self, page: u32) -> SessionAction {
        let total_pages = match &self.view {
            SessionView::Ready(result) => result.total_pages,
            SessionView::Unavailable => {
                self.page = 1;
                let term = self.gate.force_admit();
                return self.issue(term);
            }
            _ => return SessionAction::None,
        };
        if page < 1 || page > total_pages || page == self.page {
            return SessionAction::None;
        }

        self.page = page;
        let term = self.gate.force_admit();
        self.issue(term)
    }

    /// Apply the outcome of a previously issued request. Responses for
    /// superseded sequence numbers are discarded.
    pub fn apply_response(
        &mut self,
        seq: u64,
        result: Result<RetrievalResponse, RetrievalError>,
    ) {
        if self.current_seq != Some(seq) {
            debug!(seq, current = ?self.current_seq, "discarding stale retrieval response");
            return;
        }
        self.current_seq = None;

        match result {
            Ok(response) => {
                self.view = SessionView::Ready(ResultPage::from(response));
            }
            Err(err) => {
                warn!(seq, error = %err, "retrieval failed, results unavailable");
                self.view = SessionView::Unavailable;
            }
        }
    }

    /// Run an action against a gateway and apply the outcome
    pub async fn dispatch<G: RetrievalGateway>(&mut self, gateway: &G, action: SessionAction) {
        if let SessionAction::Issue(pending) = action {
            let result = gateway.retrieve(&pending.request).await;
            self.apply_response(pending.seq, result);
        }
    }

    fn issue(&mut self, term: String) -> SessionAction {
        let intent = QueryIntent::new()
            .with_term(term)
            .with_facets(self.selection.clone())
            .with_page(self.page)
            .with_page_size(self.page_size);

        let request = QueryBuilder::new(&self.schema).build(&intent);

        let seq = self.next_seq;
        self.next_seq += 1;
        self.current_seq = Some(seq);
        self.view = SessionView::Loading;

        debug!(seq, page = self.page, match_all = request.is_match_all(), "issuing retrieval request");
        SessionAction::Issue(PendingQuery { seq, request })
    }
}
