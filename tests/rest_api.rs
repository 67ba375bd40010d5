//! REST surface driven through `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use procurement_rfq::api::rest::{
    ACTOR_ID_HEADER, ACTOR_ROLE_HEADER, AppState, CommitAwardsRequest, ErrorResponse,
    HealthResponse, create_router,
};
use procurement_rfq::application::services::{
    AwardCommit, AwardComparison, NewQuotation, ResponseSubmission,
};
use procurement_rfq::application::{EngineConfig, ManualClock, Procurement};
use procurement_rfq::domain::entities::{
    AwardSelection, LineItemDraft, Quotation, ResponseItemDraft, RetailerResponse,
};
use procurement_rfq::domain::value_objects::{
    ItemId, Quantity, QuotationStatus, QuotationType, Timestamp,
};
use procurement_rfq::infrastructure::events::InMemoryEventPublisher;
use rust_decimal::dec;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;

fn t0() -> Timestamp {
    Timestamp::from_secs(1_704_067_200).unwrap()
}

fn app() -> (Router, ManualClock) {
    let clock = ManualClock::new(t0());
    let procurement = Procurement::in_memory(
        Arc::new(InMemoryEventPublisher::new()),
        Arc::new(clock.clone()),
        EngineConfig::default(),
    );
    (create_router(AppState::new(procurement)), clock)
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    actor: Option<(&str, &str)>,
    body: Option<serde_json::Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((role, id)) = actor {
        builder = builder
            .header(ACTOR_ROLE_HEADER, role)
            .header(ACTOR_ID_HEADER, id);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

fn json(value: &impl Serialize) -> serde_json::Value {
    serde_json::to_value(value).unwrap()
}

const ADMIN: (&str, &str) = ("ADMIN", "admin-1");

async fn create_and_publish(router: &Router) -> Quotation {
    let body = json(&NewQuotation {
        name: "Weekly".to_string(),
        quotation_type: QuotationType::Regular,
        validity_until: t0().add_days(2),
        notes: None,
        line_items: vec![
            LineItemDraft::new(ItemId::new("A"), Quantity::new(dec!(10)).unwrap(), "kg"),
            LineItemDraft::new(ItemId::new("B"), Quantity::new(dec!(5)).unwrap(), "kg"),
        ],
    });
    let (status, bytes) = send(router, "POST", "/api/v1/quotations", Some(ADMIN), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Quotation = parse(&bytes);
    assert_eq!(created.number(), "QT-000001");

    let uri = format!("/api/v1/quotations/{}/publish", created.id());
    let (status, bytes) = send(router, "POST", &uri, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);
    parse(&bytes)
}

#[tokio::test]
async fn health_needs_no_identity() {
    let (router, _) = app();
    let (status, bytes) = send(&router, "GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = parse(&bytes);
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn missing_identity_is_401() {
    let (router, _) = app();
    let (status, bytes) = send(&router, "GET", "/api/v1/quotations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let error: ErrorResponse = parse(&bytes);
    assert_eq!(error.code, "UNAUTHENTICATED");
}

#[tokio::test]
async fn wrong_role_is_403() {
    let (router, _) = app();
    let (status, bytes) = send(
        &router,
        "GET",
        "/api/v1/quotations",
        Some(("RETAILER", "R1")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let error: ErrorResponse = parse(&bytes);
    assert_eq!(error.code, "UNAUTHORIZED");
}

#[tokio::test]
async fn unknown_quotation_is_404() {
    let (router, _) = app();
    let uri = "/api/v1/quotations/6f1c1a56-2a3e-4c55-9d1e-000000000000";
    let (status, bytes) = send(&router, "GET", uri, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = parse(&bytes);
    assert_eq!(error.code, "NOT_FOUND");
}

#[tokio::test]
async fn submit_compare_and_award() {
    let (router, clock) = app();
    let quotation = create_and_publish(&router).await;
    let a = quotation.line_items()[0].id();
    let b = quotation.line_items()[1].id();
    let responses_uri = format!("/api/v1/quotations/{}/responses", quotation.id());
    let comparison_uri = format!("/api/v1/quotations/{}/award-comparison", quotation.id());
    let awards_uri = format!("/api/v1/quotations/{}/awards", quotation.id());

    let submission = json(&ResponseSubmission::new(vec![
        ResponseItemDraft::new(a, dec!(90)),
        ResponseItemDraft::new(b, dec!(200)),
    ]));
    let (status, bytes) = send(
        &router,
        "POST",
        &responses_uri,
        Some(("RETAILER", "R2")),
        Some(submission),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let response: RetailerResponse = parse(&bytes);
    assert_eq!(response.retailer_id().as_str(), "R2");

    let (status, bytes) = send(&router, "GET", &comparison_uri, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let error: ErrorResponse = parse(&bytes);
    assert_eq!(error.code, "QUOTATION_STILL_OPEN");

    clock.set(t0().add_days(2).add_secs(1));
    let (status, bytes) = send(&router, "GET", &comparison_uri, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);
    let comparison: AwardComparison = parse(&bytes);
    assert_eq!(comparison.lines.len(), 2);

    let cross_line = json(&CommitAwardsRequest {
        selections: vec![AwardSelection::new(a, response.item_for_line(b).unwrap().id())],
    });
    let (status, bytes) = send(&router, "POST", &awards_uri, Some(ADMIN), Some(cross_line)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = parse(&bytes);
    assert_eq!(error.code, "INVALID_AWARD");

    let defaults = json(&CommitAwardsRequest {
        selections: comparison.default_selections(),
    });
    let (status, bytes) = send(&router, "POST", &awards_uri, Some(ADMIN), Some(defaults)).await;
    assert_eq!(status, StatusCode::OK);
    let commit: AwardCommit = parse(&bytes);
    assert_eq!(commit.quotation_status, QuotationStatus::Awarded);
    assert_eq!(commit.awarded.len(), 2);

    let late = json(&ResponseSubmission::new(vec![ResponseItemDraft::new(a, dec!(1))]));
    let (status, bytes) = send(
        &router,
        "POST",
        &responses_uri,
        Some(("RETAILER", "R3")),
        Some(late),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let error: ErrorResponse = parse(&bytes);
    assert_eq!(error.code, "RESPONSE_WINDOW_CLOSED");
}

#[tokio::test]
async fn invalid_price_is_400() {
    let (router, _) = app();
    let quotation = create_and_publish(&router).await;
    let a = quotation.line_items()[0].id();
    let uri = format!("/api/v1/quotations/{}/responses", quotation.id());

    let body = json(&ResponseSubmission::new(vec![ResponseItemDraft::new(a, dec!(0))]));
    let (status, bytes) = send(&router, "POST", &uri, Some(("RETAILER", "R1")), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = parse(&bytes);
    assert_eq!(error.code, "INVALID_PRICE");
}

#[tokio::test]
async fn draft_quotation_is_hidden_from_retailers() {
    let (router, _) = app();
    let body = json(&NewQuotation {
        name: "Draft only".to_string(),
        quotation_type: QuotationType::Bulk,
        validity_until: t0().add_days(2),
        notes: None,
        line_items: Vec::new(),
    });
    let (status, bytes) = send(&router, "POST", "/api/v1/quotations", Some(ADMIN), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let draft: Quotation = parse(&bytes);

    let uri = format!("/api/v1/open-quotations/{}", draft.id());
    let (status, _) = send(&router, "GET", &uri, Some(("RETAILER", "R1")), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let publish = format!("/api/v1/quotations/{}/publish", draft.id());
    let (status, bytes) = send(&router, "POST", &publish, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = parse(&bytes);
    assert_eq!(error.code, "EMPTY_QUOTATION");
}
