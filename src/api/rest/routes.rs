//! # REST Routes
//!
//! Router assembly for the REST API.

use crate::api::rest::handlers::{self, AppState};
use axum::Router;
use axum::routing::{get, post, put};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the `/api/v1` router with tracing and CORS layers.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/stock-requests",
            get(handlers::list_stock_requests).post(handlers::raise_stock_request),
        )
        .route(
            "/stock-requests/aggregate",
            post(handlers::aggregate_stock_requests),
        )
        .route(
            "/quotations",
            get(handlers::list_quotations).post(handlers::create_quotation),
        )
        .route(
            "/quotations/from-stock-requests",
            post(handlers::create_quotation_from_stock_requests),
        )
        .route("/quotations/{id}", get(handlers::get_quotation))
        .route("/quotations/{id}/publish", post(handlers::publish_quotation))
        .route("/quotations/{id}/close", post(handlers::close_quotation))
        .route("/quotations/{id}/cancel", post(handlers::cancel_quotation))
        .route(
            "/quotations/{id}/responses",
            get(handlers::get_responses).post(handlers::submit_response),
        )
        .route(
            "/quotations/{id}/responses/draft",
            put(handlers::save_draft_response),
        )
        .route(
            "/quotations/{id}/award-comparison",
            get(handlers::award_comparison),
        )
        .route("/quotations/{id}/awards", post(handlers::commit_awards))
        .route("/open-quotations", get(handlers::list_open_quotations))
        .route("/open-quotations/{id}", get(handlers::get_open_quotation));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
