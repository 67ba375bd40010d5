//! # Procurement Facade
//!
//! The single entry point collaborators use. Every call takes the asserted
//! [`Caller`], checks the matching [`Action`] capability and then delegates to
//! the engine service that owns the operation.
//!
//! Retailers always act as themselves: their retailer ID is taken from the
//! caller, never from the request body.

use crate::application::authorization::{Action, Caller, authorize};
use crate::application::clock::{Clock, SystemClock};
use crate::application::engine_config::EngineConfig;
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::{
    AggregatedLineItem, AwardAllocator, AwardCommit, AwardComparison, AwardComparisonEngine,
    LowestPriceStrategy, NewAggregatedQuotation, NewQuotation, NewStockRequest,
    QuotationLifecycleService, QuotationLocks, ResponseSubmission, RetailerResponseLedger,
    StockRequestAggregator, StockRequestService,
};
use crate::domain::entities::{
    AwardSelection, Quotation, QuotationLineItem, RetailerResponse, StockRequestItem,
};
use crate::domain::services::ResponseWindow;
use crate::domain::value_objects::{
    ItemId, LineItemId, Quantity, QuotationId, QuotationStatus, QuotationType, Role,
    StockRequestItemId, Timestamp,
};
use crate::infrastructure::events::EventPublisher;
use crate::infrastructure::persistence::{
    InMemoryQuotationRepository, QuotationRepository, StockRequestRepository,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// A line item as shown to retailers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerLineItem {
    /// Line item.
    pub id: LineItemId,
    /// Requested item.
    pub item_id: ItemId,
    /// Requested quantity.
    pub requested_quantity: Quantity,
    /// Unit of measure.
    pub unit_of_measure: String,
    /// Free-form specifications.
    pub specifications: Option<String>,
}

impl From<&QuotationLineItem> for RetailerLineItem {
    fn from(line: &QuotationLineItem) -> Self {
        Self {
            id: line.id(),
            item_id: line.item_id().clone(),
            requested_quantity: line.requested_quantity(),
            unit_of_measure: line.unit_of_measure().to_string(),
            specifications: line.specifications().map(str::to_string),
        }
    }
}

/// Retailer-facing view of a quotation.
///
/// Other retailers' responses, awards and contributing stock requests are
/// never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerQuotationView {
    /// Quotation.
    pub id: QuotationId,
    /// Quotation number.
    pub number: String,
    /// Display name.
    pub name: String,
    /// Quotation type.
    pub quotation_type: QuotationType,
    /// Stored status.
    pub status: QuotationStatus,
    /// Response deadline.
    pub validity_until: Timestamp,
    /// Response window at the time of the call.
    pub window: ResponseWindow,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Requested line items.
    pub line_items: Vec<RetailerLineItem>,
    /// The caller's own response, draft or submitted.
    pub own_response: Option<RetailerResponse>,
}

impl RetailerQuotationView {
    fn project(quotation: &Quotation, caller: &Caller, now: Timestamp) -> Self {
        let own_response = match caller.role() {
            Role::Retailer => quotation.response_for(&caller.retailer_id()).cloned(),
            Role::Admin | Role::Store => None,
        };
        Self {
            id: quotation.id(),
            number: quotation.number().to_string(),
            name: quotation.name().to_string(),
            quotation_type: quotation.quotation_type(),
            status: quotation.status(),
            validity_until: quotation.validity_until(),
            window: quotation.window(now),
            notes: quotation.notes().map(str::to_string),
            line_items: quotation.line_items().iter().map(Into::into).collect(),
            own_response,
        }
    }
}

/// Capability-checked entry point to the procurement engine.
#[derive(Debug, Clone)]
pub struct Procurement {
    stock_requests: StockRequestService,
    aggregator: StockRequestAggregator,
    lifecycle: QuotationLifecycleService,
    ledger: RetailerResponseLedger,
    comparison: AwardComparisonEngine,
    allocator: AwardAllocator,
    clock: Arc<dyn Clock>,
}

impl Procurement {
    /// Wires the engine services over the given ports.
    #[must_use]
    pub fn new(
        quotations: Arc<dyn QuotationRepository>,
        stock_requests: Arc<dyn StockRequestRepository>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        let locks = Arc::new(QuotationLocks::new());
        Self {
            stock_requests: StockRequestService::new(
                Arc::clone(&stock_requests),
                Arc::clone(&clock),
            ),
            aggregator: StockRequestAggregator::new(Arc::clone(&stock_requests)),
            lifecycle: QuotationLifecycleService::new(
                Arc::clone(&quotations),
                Arc::clone(&stock_requests),
                Arc::clone(&publisher),
                Arc::clone(&clock),
                Arc::clone(&locks),
                config.clone(),
            ),
            ledger: RetailerResponseLedger::new(
                Arc::clone(&quotations),
                Arc::clone(&publisher),
                Arc::clone(&clock),
                Arc::clone(&locks),
                config,
            ),
            comparison: AwardComparisonEngine::new(
                Arc::clone(&quotations),
                Arc::new(LowestPriceStrategy::new()),
                Arc::clone(&clock),
            ),
            allocator: AwardAllocator::new(
                quotations,
                stock_requests,
                publisher,
                Arc::clone(&clock),
                locks,
            ),
            clock,
        }
    }

    /// Wires the engine over fresh in-memory repositories.
    #[must_use]
    pub fn in_memory(publisher: Arc<dyn EventPublisher>, clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
        let quotations = InMemoryQuotationRepository::new();
        let stock_requests = Arc::new(quotations.stock_requests());
        Self::new(Arc::new(quotations), stock_requests, publisher, clock, config)
    }

    /// Wires the engine over in-memory repositories and the system clock.
    #[must_use]
    pub fn with_system_clock(publisher: Arc<dyn EventPublisher>, config: EngineConfig) -> Self {
        Self::in_memory(publisher, Arc::new(SystemClock), config)
    }

    // ========== Stock Requests ==========

    /// Raises a stock request for the calling store.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless the caller is a store; see
    /// [`StockRequestService::raise`].
    pub async fn raise_stock_request(
        &self,
        caller: &Caller,
        request: NewStockRequest,
    ) -> ApplicationResult<StockRequestItem> {
        check(caller, Action::RaiseStockRequest)?;
        self.stock_requests.raise(caller.store_id(), request).await
    }

    /// Lists stock requests: pending ones for admins, own ones for stores.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for retailers.
    pub async fn list_stock_requests(
        &self,
        caller: &Caller,
    ) -> ApplicationResult<Vec<StockRequestItem>> {
        check(caller, Action::ListStockRequests)?;
        match caller.role() {
            Role::Store => self.stock_requests.for_store(&caller.store_id()).await,
            Role::Admin | Role::Retailer => self.stock_requests.pending().await,
        }
    }

    /// Groups pending stock requests into line item candidates.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless admin; see
    /// [`StockRequestAggregator::aggregate_pending`].
    pub async fn aggregate_stock_requests(
        &self,
        caller: &Caller,
        ids: &[StockRequestItemId],
    ) -> ApplicationResult<Vec<AggregatedLineItem>> {
        check(caller, Action::AggregateStockRequests)?;
        self.aggregator.aggregate_pending(ids).await
    }

    // ========== Quotations ==========

    /// Creates a draft quotation.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless admin; see [`QuotationLifecycleService::create`].
    pub async fn create_quotation(
        &self,
        caller: &Caller,
        request: NewQuotation,
    ) -> ApplicationResult<Quotation> {
        check(caller, Action::CreateQuotation)?;
        self.lifecycle.create(caller.id(), request).await
    }

    /// Creates a draft quotation from pending stock requests.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless admin; see
    /// [`QuotationLifecycleService::create_from_stock_requests`].
    pub async fn create_quotation_from_stock_requests(
        &self,
        caller: &Caller,
        request: NewAggregatedQuotation,
    ) -> ApplicationResult<Quotation> {
        check(caller, Action::AggregateStockRequests)?;
        check(caller, Action::CreateQuotation)?;
        self.lifecycle
            .create_from_stock_requests(caller.id(), request)
            .await
    }

    /// Publishes a draft quotation.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless admin; see [`QuotationLifecycleService::publish`].
    pub async fn publish_quotation(
        &self,
        caller: &Caller,
        id: QuotationId,
    ) -> ApplicationResult<Quotation> {
        check(caller, Action::PublishQuotation)?;
        self.lifecycle.publish(caller.id(), id).await
    }

    /// Closes a quotation's response window early.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless admin; see [`QuotationLifecycleService::close`].
    pub async fn close_quotation(
        &self,
        caller: &Caller,
        id: QuotationId,
    ) -> ApplicationResult<Quotation> {
        check(caller, Action::CloseQuotation)?;
        self.lifecycle.close(caller.id(), id).await
    }

    /// Cancels a quotation.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless admin; see [`QuotationLifecycleService::cancel`].
    pub async fn cancel_quotation(
        &self,
        caller: &Caller,
        id: QuotationId,
    ) -> ApplicationResult<Quotation> {
        check(caller, Action::CancelQuotation)?;
        self.lifecycle.cancel(caller.id(), id).await
    }

    /// Returns the full quotation aggregate.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless admin; `NotFound` for an unknown quotation.
    pub async fn get_quotation(
        &self,
        caller: &Caller,
        id: QuotationId,
    ) -> ApplicationResult<Quotation> {
        check(caller, Action::ViewQuotation)?;
        self.lifecycle.get(id).await
    }

    /// Lists quotations, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless admin.
    pub async fn list_quotations(
        &self,
        caller: &Caller,
        status: Option<QuotationStatus>,
    ) -> ApplicationResult<Vec<Quotation>> {
        check(caller, Action::ViewQuotation)?;
        self.lifecycle.list(status).await
    }

    /// Returns the retailer-facing view of a quotation.
    ///
    /// Drafts do not exist as far as retailers are concerned.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for stores; `NotFound` for unknown quotations and, for
    /// retailers, drafts.
    pub async fn open_quotation(
        &self,
        caller: &Caller,
        id: QuotationId,
    ) -> ApplicationResult<RetailerQuotationView> {
        check(caller, Action::ViewOpenQuotation)?;
        let quotation = self.lifecycle.get(id).await?;
        if caller.role() == Role::Retailer && quotation.status() == QuotationStatus::Draft {
            return Err(ApplicationError::not_found("Quotation", id.to_string()));
        }
        Ok(RetailerQuotationView::project(
            &quotation,
            caller,
            self.clock.now(),
        ))
    }

    /// Lists quotations currently accepting responses.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for stores.
    pub async fn open_quotations(
        &self,
        caller: &Caller,
    ) -> ApplicationResult<Vec<RetailerQuotationView>> {
        check(caller, Action::ViewOpenQuotation)?;
        let now = self.clock.now();
        let published = self.lifecycle.list(Some(QuotationStatus::Published)).await?;
        Ok(published
            .iter()
            .filter(|q| q.window(now).accepts_responses())
            .map(|q| RetailerQuotationView::project(q, caller, now))
            .collect())
    }

    // ========== Responses ==========

    /// Stores the caller's draft response.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless retailer; see [`RetailerResponseLedger::save_draft`].
    pub async fn save_draft_response(
        &self,
        caller: &Caller,
        quotation_id: QuotationId,
        submission: ResponseSubmission,
    ) -> ApplicationResult<RetailerResponse> {
        check(caller, Action::SaveDraftResponse)?;
        self.ledger
            .save_draft(caller.retailer_id(), quotation_id, submission)
            .await
    }

    /// Submits the caller's response.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless retailer; see [`RetailerResponseLedger::submit`].
    pub async fn submit_response(
        &self,
        caller: &Caller,
        quotation_id: QuotationId,
        submission: ResponseSubmission,
    ) -> ApplicationResult<RetailerResponse> {
        check(caller, Action::SubmitResponse)?;
        self.ledger
            .submit(caller.retailer_id(), quotation_id, submission)
            .await
    }

    /// Returns the submitted responses of a quotation.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless admin; `NotFound` for an unknown quotation.
    pub async fn get_responses(
        &self,
        caller: &Caller,
        quotation_id: QuotationId,
    ) -> ApplicationResult<Vec<RetailerResponse>> {
        check(caller, Action::ViewResponses)?;
        self.ledger.responses(quotation_id).await
    }

    // ========== Awards ==========

    /// Builds the award comparison view.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless admin; see [`AwardComparisonEngine::build`].
    pub async fn award_comparison(
        &self,
        caller: &Caller,
        quotation_id: QuotationId,
    ) -> ApplicationResult<AwardComparison> {
        check(caller, Action::ViewComparison)?;
        self.comparison.build(quotation_id).await
    }

    /// Commits award selections.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless admin; see [`AwardAllocator::commit_awards`].
    pub async fn commit_awards(
        &self,
        caller: &Caller,
        quotation_id: QuotationId,
        selections: &[AwardSelection],
    ) -> ApplicationResult<AwardCommit> {
        check(caller, Action::CommitAwards)?;
        self.allocator
            .commit_awards(caller.id(), quotation_id, selections)
            .await
    }
}

fn check(caller: &Caller, action: Action) -> ApplicationResult<()> {
    authorize(caller, action).inspect_err(|_| {
        warn!(caller = %caller, action = %action, "capability check failed");
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::clock::ManualClock;
    use crate::domain::entities::{LineItemDraft, ResponseItemDraft};
    use crate::domain::errors::ErrorKind;
    use crate::domain::value_objects::StockRequestStatus;
    use crate::infrastructure::events::InMemoryEventPublisher;
    use rust_decimal::dec;

    fn t0() -> Timestamp {
        Timestamp::from_secs(1_704_067_200).unwrap()
    }

    fn engine() -> (Procurement, InMemoryEventPublisher, ManualClock) {
        let events = InMemoryEventPublisher::new();
        let clock = ManualClock::new(t0());
        let procurement = Procurement::in_memory(
            Arc::new(events.clone()),
            Arc::new(clock.clone()),
            EngineConfig::default(),
        );
        (procurement, events, clock)
    }

    fn admin() -> Caller {
        Caller::admin("admin-1")
    }

    fn draft_request() -> NewQuotation {
        NewQuotation {
            name: "Weekly".to_string(),
            quotation_type: QuotationType::Regular,
            validity_until: t0().add_days(2),
            notes: None,
            line_items: vec![LineItemDraft::new(
                ItemId::new("A"),
                Quantity::new(dec!(10)).unwrap(),
                "kg",
            )],
        }
    }

    mod capabilities {
        use super::*;

        #[tokio::test]
        async fn retailer_cannot_create_quotation() {
            let (engine, events, _) = engine();
            let err = engine
                .create_quotation(&Caller::retailer("R1"), draft_request())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unauthorized);
            assert!(events.is_empty());
        }

        #[tokio::test]
        async fn admin_cannot_submit_response() {
            let (engine, _, _) = engine();
            let q = engine.create_quotation(&admin(), draft_request()).await.unwrap();
            let err = engine
                .submit_response(&admin(), q.id(), ResponseSubmission::new(Vec::new()))
                .await
                .unwrap_err();
            assert!(err.is_unauthorized());
        }

        #[tokio::test]
        async fn store_cannot_view_open_quotations() {
            let (engine, _, _) = engine();
            let err = engine.open_quotations(&Caller::store("S1")).await.unwrap_err();
            assert!(err.is_unauthorized());
        }
    }

    mod stock_requests {
        use super::*;

        #[tokio::test]
        async fn stores_see_only_their_own() {
            let (engine, _, _) = engine();
            let s1 = Caller::store("S1");
            let s2 = Caller::store("S2");
            engine
                .raise_stock_request(&s1, NewStockRequest::new("A", dec!(3), "kg"))
                .await
                .unwrap();
            engine
                .raise_stock_request(&s2, NewStockRequest::new("A", dec!(4), "kg"))
                .await
                .unwrap();

            let own = engine.list_stock_requests(&s1).await.unwrap();
            assert_eq!(own.len(), 1);
            assert_eq!(own[0].store_id().as_str(), "S1");

            let pending = engine.list_stock_requests(&admin()).await.unwrap();
            assert_eq!(pending.len(), 2);
        }

        #[tokio::test]
        async fn aggregated_quotation_quotes_requests_on_publish() {
            let (engine, _, _) = engine();
            let s1 = Caller::store("S1");
            let s2 = Caller::store("S2");
            let a = engine
                .raise_stock_request(&s1, NewStockRequest::new("A", dec!(3), "kg"))
                .await
                .unwrap();
            let b = engine
                .raise_stock_request(&s2, NewStockRequest::new("A", dec!(4), "kg"))
                .await
                .unwrap();

            let lines = engine
                .aggregate_stock_requests(&admin(), &[a.id(), b.id()])
                .await
                .unwrap();
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].total_quantity.get(), dec!(7));

            let q = engine
                .create_quotation_from_stock_requests(
                    &admin(),
                    NewAggregatedQuotation {
                        name: "Weekly".to_string(),
                        quotation_type: QuotationType::Regular,
                        validity_until: t0().add_days(2),
                        notes: None,
                        stock_request_ids: vec![a.id(), b.id()],
                    },
                )
                .await
                .unwrap();
            engine.publish_quotation(&admin(), q.id()).await.unwrap();

            let pending = engine.list_stock_requests(&admin()).await.unwrap();
            assert!(pending.is_empty());
            let own = engine.list_stock_requests(&s1).await.unwrap();
            assert_eq!(own[0].status(), StockRequestStatus::Quoted);
        }
    }

    mod retailer_view {
        use super::*;

        #[tokio::test]
        async fn drafts_are_hidden_from_retailers() {
            let (engine, _, _) = engine();
            let q = engine.create_quotation(&admin(), draft_request()).await.unwrap();

            let err = engine
                .open_quotation(&Caller::retailer("R1"), q.id())
                .await
                .unwrap_err();
            assert!(err.is_not_found());

            let view = engine.open_quotation(&admin(), q.id()).await.unwrap();
            assert_eq!(view.window, ResponseWindow::NotPublished);
        }

        #[tokio::test]
        async fn view_carries_only_own_response() {
            let (engine, _, clock) = engine();
            let q = engine.create_quotation(&admin(), draft_request()).await.unwrap();
            engine.publish_quotation(&admin(), q.id()).await.unwrap();
            let line = q.line_items()[0].id();

            let r1 = Caller::retailer("R1");
            let r2 = Caller::retailer("R2");
            engine
                .save_draft_response(
                    &r1,
                    q.id(),
                    ResponseSubmission::new(vec![ResponseItemDraft::new(line, dec!(5))]),
                )
                .await
                .unwrap();
            engine
                .submit_response(
                    &r2,
                    q.id(),
                    ResponseSubmission::new(vec![ResponseItemDraft::new(line, dec!(6))]),
                )
                .await
                .unwrap();

            let view = engine.open_quotation(&r1, q.id()).await.unwrap();
            let own = view.own_response.unwrap();
            assert_eq!(own.retailer_id().as_str(), "R1");
            assert!(!own.is_submitted());

            let open = engine.open_quotations(&r2).await.unwrap();
            assert_eq!(open.len(), 1);
            clock.advance_days(3);
            assert!(engine.open_quotations(&r2).await.unwrap().is_empty());

            let responses = engine.get_responses(&admin(), q.id()).await.unwrap();
            assert_eq!(responses.len(), 1);
            assert_eq!(responses[0].retailer_id().as_str(), "R2");
        }
    }

    mod awards {
        use super::*;

        #[tokio::test]
        async fn comparison_then_default_award() {
            let (engine, events, clock) = engine();
            let q = engine.create_quotation(&admin(), draft_request()).await.unwrap();
            engine.publish_quotation(&admin(), q.id()).await.unwrap();
            let line = q.line_items()[0].id();
            engine
                .submit_response(
                    &Caller::retailer("R1"),
                    q.id(),
                    ResponseSubmission::new(vec![ResponseItemDraft::new(line, dec!(7))]),
                )
                .await
                .unwrap();

            clock.advance_days(3);
            let comparison = engine.award_comparison(&admin(), q.id()).await.unwrap();
            let commit = engine
                .commit_awards(&admin(), q.id(), &comparison.default_selections())
                .await
                .unwrap();

            assert_eq!(commit.quotation_status, QuotationStatus::Awarded);
            assert_eq!(events.count_named("quotation.awarded"), 1);
            assert_eq!(events.count_named("response.submitted"), 1);
        }
    }
}
