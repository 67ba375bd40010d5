//! # REST API
//!
//! REST endpoints using axum over the [`Procurement`](crate::application::Procurement)
//! facade.
//!
//! The caller is asserted by the upstream identity layer through the
//! `x-actor-role` (`ADMIN`, `STORE` or `RETAILER`) and `x-actor-id` headers.
//! Failures are rendered as `{"code": .., "message": ..}` with the status
//! derived from the error class:
//!
//! | Class         | Status |
//! |---------------|--------|
//! | Validation    | 400    |
//! | StateConflict | 409    |
//! | NotFound      | 404    |
//! | Integrity     | 422    |
//! | Unauthorized  | 403    |
//! | Internal      | 500    |
//!
//! # Endpoints
//!
//! ## Stock Requests
//! - `POST /api/v1/stock-requests` - Raise a stock request (store)
//! - `GET /api/v1/stock-requests` - Pending requests (admin) or own requests (store)
//! - `POST /api/v1/stock-requests/aggregate` - Group pending requests into line items
//!
//! ## Quotations (admin)
//! - `POST /api/v1/quotations` - Create a draft quotation
//! - `POST /api/v1/quotations/from-stock-requests` - Create from pending stock requests
//! - `GET /api/v1/quotations` - List quotations, optionally `?status=`
//! - `GET /api/v1/quotations/{id}` - Get quotation by ID
//! - `POST /api/v1/quotations/{id}/publish` - Publish to retailers
//! - `POST /api/v1/quotations/{id}/close` - Close the response window early
//! - `POST /api/v1/quotations/{id}/cancel` - Cancel
//!
//! ## Responses
//! - `GET /api/v1/open-quotations` - Quotations accepting responses
//! - `GET /api/v1/open-quotations/{id}` - Retailer view with own response
//! - `PUT /api/v1/quotations/{id}/responses/draft` - Save a draft (retailer)
//! - `POST /api/v1/quotations/{id}/responses` - Submit (retailer)
//! - `GET /api/v1/quotations/{id}/responses` - Submitted responses (admin)
//!
//! ## Awards (admin)
//! - `GET /api/v1/quotations/{id}/award-comparison` - Ranked candidates per line item
//! - `POST /api/v1/quotations/{id}/awards` - Commit award selections
//!
//! ## Health
//! - `GET /api/v1/health` - Health check endpoint
//!
//! # Usage
//!
//! ```ignore
//! use procurement_rfq::api::rest::{create_router, AppState};
//!
//! let router = create_router(AppState::new(procurement));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ACTOR_ID_HEADER, ACTOR_ROLE_HEADER, ActorHeaders, AggregateRequest, ApiError, ApiResult,
    AppState, CommitAwardsRequest, ErrorResponse, HealthResponse, QuotationFilter, status_for,
};
pub use routes::create_router;
