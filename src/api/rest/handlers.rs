//! # REST Handlers
//!
//! Request handlers, request/response bodies and the HTTP error mapping.

use crate::application::error::ApplicationError;
use crate::application::services::{
    AggregatedLineItem, AwardCommit, AwardComparison, NewAggregatedQuotation, NewQuotation,
    NewStockRequest, ResponseSubmission,
};
use crate::application::{Caller, Procurement, RetailerQuotationView};
use crate::domain::entities::{AwardSelection, Quotation, RetailerResponse, StockRequestItem};
use crate::domain::errors::ErrorKind;
use crate::domain::value_objects::{QuotationId, QuotationStatus, Role, StockRequestItemId};
use axum::Json;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

/// Header carrying the caller's role.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Header carrying the caller's ID.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Shared state of the REST API.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Engine entry point.
    pub procurement: Procurement,
}

impl AppState {
    /// Wraps the engine for sharing across handlers.
    #[must_use]
    pub fn new(procurement: Procurement) -> Arc<Self> {
        Arc::new(Self { procurement })
    }
}

// ============================================================================
// Errors
// ============================================================================

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    /// Missing or malformed identity headers.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", message)
    }

    /// Returns the HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Maps an error class to its HTTP status.
#[must_use]
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::StateConflict => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Integrity => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        let kind = err.kind();
        if kind == ErrorKind::Internal {
            error!(error = %err, "request failed");
            return Self::new(
                status_for(kind),
                err.code(),
                "internal server error",
            );
        }
        debug!(error = %err, kind = ?kind, "request rejected");
        Self::new(status_for(kind), err.code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Handler result.
pub type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Caller extraction
// ============================================================================

/// The caller asserted by the upstream identity layer via
/// `x-actor-role` / `x-actor-id`.
#[derive(Debug, Clone)]
pub struct ActorHeaders(pub Caller);

impl ActorHeaders {
    fn from_headers(headers: &HeaderMap) -> ApiResult<Self> {
        let header = |name: &str| -> ApiResult<String> {
            headers
                .get(name)
                .ok_or_else(|| ApiError::unauthenticated(format!("missing {name} header")))?
                .to_str()
                .map(|v| v.trim().to_string())
                .map_err(|_| ApiError::unauthenticated(format!("invalid {name} header")))
        };

        let role: Role = header(ACTOR_ROLE_HEADER)?
            .parse()
            .map_err(|e| ApiError::unauthenticated(format!("{e}")))?;
        let id = header(ACTOR_ID_HEADER)?;
        if id.is_empty() {
            return Err(ApiError::unauthenticated(format!(
                "empty {ACTOR_ID_HEADER} header"
            )));
        }
        Ok(Self(Caller::new(role, id)))
    }
}

impl<S> FromRequestParts<S> for ActorHeaders
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}

// ============================================================================
// Bodies
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Stock requests to aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRequest {
    /// Pending stock request IDs.
    pub stock_request_ids: Vec<StockRequestItemId>,
}

/// Optional status filter for quotation listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotationFilter {
    /// Only quotations with this status.
    pub status: Option<QuotationStatus>,
}

/// Award selections to commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitAwardsRequest {
    /// One selection per line item.
    pub selections: Vec<AwardSelection>,
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /api/v1/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/v1/stock-requests`
pub async fn raise_stock_request(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Json(body): Json<NewStockRequest>,
) -> ApiResult<(StatusCode, Json<StockRequestItem>)> {
    let item = state.procurement.raise_stock_request(&caller, body).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /api/v1/stock-requests`
pub async fn list_stock_requests(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
) -> ApiResult<Json<Vec<StockRequestItem>>> {
    Ok(Json(state.procurement.list_stock_requests(&caller).await?))
}

/// `POST /api/v1/stock-requests/aggregate`
pub async fn aggregate_stock_requests(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Json(body): Json<AggregateRequest>,
) -> ApiResult<Json<Vec<AggregatedLineItem>>> {
    let lines = state
        .procurement
        .aggregate_stock_requests(&caller, &body.stock_request_ids)
        .await?;
    Ok(Json(lines))
}

/// `POST /api/v1/quotations`
pub async fn create_quotation(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Json(body): Json<NewQuotation>,
) -> ApiResult<(StatusCode, Json<Quotation>)> {
    let quotation = state.procurement.create_quotation(&caller, body).await?;
    Ok((StatusCode::CREATED, Json(quotation)))
}

/// `POST /api/v1/quotations/from-stock-requests`
pub async fn create_quotation_from_stock_requests(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Json(body): Json<NewAggregatedQuotation>,
) -> ApiResult<(StatusCode, Json<Quotation>)> {
    let quotation = state
        .procurement
        .create_quotation_from_stock_requests(&caller, body)
        .await?;
    Ok((StatusCode::CREATED, Json(quotation)))
}

/// `GET /api/v1/quotations`
pub async fn list_quotations(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Query(filter): Query<QuotationFilter>,
) -> ApiResult<Json<Vec<Quotation>>> {
    Ok(Json(
        state
            .procurement
            .list_quotations(&caller, filter.status)
            .await?,
    ))
}

/// `GET /api/v1/quotations/{id}`
pub async fn get_quotation(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Path(id): Path<QuotationId>,
) -> ApiResult<Json<Quotation>> {
    Ok(Json(state.procurement.get_quotation(&caller, id).await?))
}

/// `POST /api/v1/quotations/{id}/publish`
pub async fn publish_quotation(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Path(id): Path<QuotationId>,
) -> ApiResult<Json<Quotation>> {
    Ok(Json(state.procurement.publish_quotation(&caller, id).await?))
}

/// `POST /api/v1/quotations/{id}/close`
pub async fn close_quotation(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Path(id): Path<QuotationId>,
) -> ApiResult<Json<Quotation>> {
    Ok(Json(state.procurement.close_quotation(&caller, id).await?))
}

/// `POST /api/v1/quotations/{id}/cancel`
pub async fn cancel_quotation(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Path(id): Path<QuotationId>,
) -> ApiResult<Json<Quotation>> {
    Ok(Json(state.procurement.cancel_quotation(&caller, id).await?))
}

/// `GET /api/v1/open-quotations`
pub async fn list_open_quotations(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
) -> ApiResult<Json<Vec<RetailerQuotationView>>> {
    Ok(Json(state.procurement.open_quotations(&caller).await?))
}

/// `GET /api/v1/open-quotations/{id}`
pub async fn get_open_quotation(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Path(id): Path<QuotationId>,
) -> ApiResult<Json<RetailerQuotationView>> {
    Ok(Json(state.procurement.open_quotation(&caller, id).await?))
}

/// `PUT /api/v1/quotations/{id}/responses/draft`
pub async fn save_draft_response(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Path(id): Path<QuotationId>,
    Json(body): Json<ResponseSubmission>,
) -> ApiResult<Json<RetailerResponse>> {
    Ok(Json(
        state
            .procurement
            .save_draft_response(&caller, id, body)
            .await?,
    ))
}

/// `POST /api/v1/quotations/{id}/responses`
pub async fn submit_response(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Path(id): Path<QuotationId>,
    Json(body): Json<ResponseSubmission>,
) -> ApiResult<Json<RetailerResponse>> {
    Ok(Json(
        state.procurement.submit_response(&caller, id, body).await?,
    ))
}

/// `GET /api/v1/quotations/{id}/responses`
pub async fn get_responses(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Path(id): Path<QuotationId>,
) -> ApiResult<Json<Vec<RetailerResponse>>> {
    Ok(Json(state.procurement.get_responses(&caller, id).await?))
}

/// `GET /api/v1/quotations/{id}/award-comparison`
pub async fn award_comparison(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Path(id): Path<QuotationId>,
) -> ApiResult<Json<AwardComparison>> {
    Ok(Json(state.procurement.award_comparison(&caller, id).await?))
}

/// `POST /api/v1/quotations/{id}/awards`
pub async fn commit_awards(
    State(state): State<Arc<AppState>>,
    ActorHeaders(caller): ActorHeaders,
    Path(id): Path<QuotationId>,
    Json(body): Json<CommitAwardsRequest>,
) -> ApiResult<Json<AwardCommit>> {
    Ok(Json(
        state
            .procurement
            .commit_awards(&caller, id, &body.selections)
            .await?,
    ))
}
