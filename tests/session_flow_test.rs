//! End-to-end session flows against the in-process gateway

mod common;

use common::record;
use payment_search::config::SearchConfig;
use payment_search::gateway::{
    GatewayResult, MemoryGateway, RetrievalError, RetrievalGateway, RetrievalResponse,
};
use payment_search::query::RetrievalRequest;
use payment_search::schema::{FacetGroup, IndexSchema};
use payment_search::session::{PendingQuery, SearchSession, SessionAction, SessionView};
use std::sync::Arc;
use std::time::{Duration, Instant};

const DELAY: Duration = Duration::from_millis(500);

fn session() -> SearchSession {
    SearchSession::new(Arc::new(IndexSchema::payments()), &SearchConfig::default())
}

fn issued(action: SessionAction) -> PendingQuery {
    match action {
        SessionAction::Issue(pending) => pending,
        SessionAction::None => panic!("expected a request to be issued"),
    }
}

/// Gateway that always fails at the transport layer
struct DownGateway;

#[async_trait::async_trait]
impl RetrievalGateway for DownGateway {
    async fn retrieve(&self, _request: &RetrievalRequest) -> GatewayResult<RetrievalResponse> {
        Err(RetrievalError::Transport("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_typed_term_produces_ready_page_with_facets() {
    let gateway = MemoryGateway::new(
        IndexSchema::payments(),
        vec![
            record("1", "MaybankV2", "visa", "MY", 0),
            record("2", "CIMBV2", "mc", "SG", 1),
        ],
    );

    let mut session = session();
    let start = Instant::now();

    session.keystroke("j", start);
    session.keystroke("ja", start + Duration::from_millis(100));
    session.keystroke("jane", start + Duration::from_millis(200));

    let action = session.tick(start + Duration::from_millis(700));
    session.dispatch(&gateway, action).await;

    match session.view() {
        SessionView::Ready(page) => {
            // Both records share the fixture email, so both match "jane".
            assert_eq!(page.records.len(), 2);
            assert_eq!(page.total_pages, 1);
            let schemes: Vec<&str> = page.facets[&FacetGroup::Scheme]
                .iter()
                .map(|b| b.value.as_str())
                .collect();
            assert_eq!(schemes, vec!["mc", "visa"]);
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn test_facet_toggle_from_deep_page_restarts_at_page_one() {
    let records: Vec<_> = (0..25)
        .map(|i| record(&format!("id{i:02}"), "MaybankV2", "visa", "MY", i as i64))
        .collect();
    let gateway = MemoryGateway::new(IndexSchema::payments(), records);

    let mut session = session();
    let start = Instant::now();

    session.keystroke("", start);
    let action = session.tick(start + DELAY);
    session.dispatch(&gateway, action).await;

    let action = session.set_page(3);
    session.dispatch(&gateway, action).await;
    assert_eq!(session.page(), 3);

    let action = session.toggle_facet(FacetGroup::Psp, "MaybankV2");
    let pending = issued(action.clone());
    assert_eq!(pending.request.page, 1);
    session.dispatch(&gateway, action).await;

    match session.view() {
        SessionView::Ready(page) => {
            assert_eq!(session.page(), 1);
            assert_eq!(page.records[0].grab_link_id, "id00");
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn test_short_term_keeps_facet_filtered_results() {
    let gateway = MemoryGateway::new(
        IndexSchema::payments(),
        vec![
            record("1", "MaybankV2", "visa", "MY", 0),
            record("2", "CIMBV2", "mc", "SG", 1),
        ],
    );

    let mut session = session();
    let start = Instant::now();

    session.keystroke("jane", start);
    let action = session.tick(start + DELAY);
    session.dispatch(&gateway, action).await;

    let action = session.toggle_facet(FacetGroup::Scheme, "visa");
    session.dispatch(&gateway, action).await;

    // Backspacing below threshold drops the text constraint, but the facet
    // filter must still be applied.
    session.keystroke("ja", start + DELAY);
    let action = session.tick(start + DELAY * 2);
    let pending = issued(action.clone());
    assert!(pending.request.text.is_none());
    session.dispatch(&gateway, action).await;

    match session.view() {
        SessionView::Ready(page) => {
            assert_eq!(page.records.len(), 1);
            assert_eq!(page.records[0].grab_link_id, "1");
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn test_short_term_repeats_issue_nothing_when_already_termless() {
    let gateway = MemoryGateway::new(
        IndexSchema::payments(),
        vec![
            record("1", "MaybankV2", "visa", "MY", 0),
            record("2", "CIMBV2", "mc", "SG", 1),
        ],
    );

    let mut session = session();
    let start = Instant::now();

    // Term-less filtered view is already on screen.
    let action = session.toggle_facet(FacetGroup::Scheme, "visa");
    session.dispatch(&gateway, action).await;
    assert!(session.view().is_ready());

    // A short term would produce the exact request already displayed, so
    // the engine must not be hit again.
    session.keystroke("ja", start);
    assert_eq!(session.tick(start + DELAY), SessionAction::None);

    match session.view() {
        SessionView::Ready(page) => assert_eq!(page.records.len(), 1),
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn test_short_term_without_facets_clears_locally() {
    let gateway = MemoryGateway::new(
        IndexSchema::payments(),
        vec![record("1", "MaybankV2", "visa", "MY", 0)],
    );

    let mut session = session();
    let start = Instant::now();

    session.keystroke("jane", start);
    let action = session.tick(start + DELAY);
    session.dispatch(&gateway, action).await;
    assert!(session.view().is_ready());

    session.keystroke("ja", start + DELAY);
    assert_eq!(session.tick(start + DELAY * 2), SessionAction::None);
    assert_eq!(*session.view(), SessionView::Empty);
}

#[tokio::test]
async fn test_stale_response_never_overwrites_newer_one() {
    let gateway = MemoryGateway::new(
        IndexSchema::payments(),
        vec![
            record("1", "MaybankV2", "visa", "MY", 0),
            record("2", "CIMBV2", "mc", "SG", 1),
        ],
    );

    let mut session = session();
    let start = Instant::now();

    session.keystroke("jane", start);
    let r1 = issued(session.tick(start + DELAY));

    session.keystroke("acme", start + DELAY);
    let r2 = issued(session.tick(start + DELAY * 2));

    // Both responses resolve, but the earlier one arrives last.
    let r2_result = gateway.retrieve(&r2.request).await;
    let r1_result = gateway.retrieve(&r1.request).await;

    session.apply_response(r2.seq, r2_result);
    session.apply_response(r1.seq, r1_result);

    match session.view() {
        SessionView::Ready(page) => {
            // "acme" matches merchant names on both records via prefix.
            assert_eq!(page.records.len(), 2);
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn test_gateway_failure_shows_unavailable_not_empty() {
    let mut session = session();
    let start = Instant::now();

    session.keystroke("jane", start);
    let action = session.tick(start + DELAY);
    session.dispatch(&DownGateway, action).await;

    assert_eq!(*session.view(), SessionView::Unavailable);

    // Recovery: the next action retries against a healthy gateway.
    let gateway = MemoryGateway::new(
        IndexSchema::payments(),
        vec![record("1", "MaybankV2", "visa", "MY", 0)],
    );
    let action = session.toggle_facet(FacetGroup::Scheme, "visa");
    session.dispatch(&gateway, action).await;
    assert!(session.view().is_ready());
}

#[tokio::test]
async fn test_paging_round_trip_is_stable() {
    let records: Vec<_> = (0..25)
        .map(|i| record(&format!("id{i:02}"), "MaybankV2", "visa", "MY", i as i64))
        .collect();
    let gateway = MemoryGateway::new(IndexSchema::payments(), records);

    let mut session = session();
    let start = Instant::now();

    session.keystroke("", start);
    let action = session.tick(start + DELAY);
    session.dispatch(&gateway, action).await;

    let first_page = match session.view() {
        SessionView::Ready(page) => page.records.clone(),
        other => panic!("unexpected view {other:?}"),
    };

    let action = session.set_page(2);
    session.dispatch(&gateway, action).await;
    let action = session.set_page(1);
    session.dispatch(&gateway, action).await;

    match session.view() {
        SessionView::Ready(page) => assert_eq!(page.records, first_page),
        other => panic!("unexpected view {other:?}"),
    }
}
