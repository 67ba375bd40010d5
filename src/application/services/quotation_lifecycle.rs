//! # Quotation Lifecycle
//!
//! Creation and status transitions of quotations.
//!
//! Every write runs under the quotation's lock, re-reads the aggregate,
//! applies the domain transition and commits with the version it loaded.
//! Stock request status flips that belong to a transition are committed in
//! the same repository call:
//!
//! | Transition          | Stock requests                        |
//! |---------------------|---------------------------------------|
//! | draft → published   | contributing requests become `quoted` |
//! | * → cancelled       | quoted requests return to `pending`   |
//!
//! Events are published only after the commit succeeds.

use crate::application::clock::Clock;
use crate::application::engine_config::EngineConfig;
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::commit::{load_quotation, publish_events};
use crate::application::services::quotation_locks::QuotationLocks;
use crate::application::services::stock_request_aggregation::StockRequestAggregator;
use crate::domain::entities::{LineItemDraft, Quotation, StockRequestItem};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::events::{
    CloseReason, QuotationCancelled, QuotationClosed, QuotationCreated, QuotationPublished,
};
use crate::domain::value_objects::arithmetic::CheckedArithmetic;
use crate::domain::value_objects::{
    ActorId, QuotationId, QuotationStatus, QuotationType, StockRequestItemId, StockRequestStatus,
    Timestamp,
};
use crate::infrastructure::events::EventPublisher;
use crate::infrastructure::persistence::{QuotationRepository, StockRequestRepository};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Request to create a draft quotation from explicit line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuotation {
    /// Display name.
    pub name: String,
    /// Quotation type.
    #[serde(default)]
    pub quotation_type: QuotationType,
    /// Response deadline.
    pub validity_until: Timestamp,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Requested line items.
    pub line_items: Vec<LineItemDraft>,
}

/// Request to create a draft quotation by aggregating stock requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAggregatedQuotation {
    /// Display name.
    pub name: String,
    /// Quotation type.
    #[serde(default)]
    pub quotation_type: QuotationType,
    /// Response deadline.
    pub validity_until: Timestamp,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Pending stock requests to aggregate.
    pub stock_request_ids: Vec<StockRequestItemId>,
}

/// Quotation creation and status transitions.
#[derive(Debug, Clone)]
pub struct QuotationLifecycleService {
    quotations: Arc<dyn QuotationRepository>,
    stock_requests: Arc<dyn StockRequestRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    locks: Arc<QuotationLocks>,
    config: EngineConfig,
}

impl QuotationLifecycleService {
    /// Creates a new service.
    #[must_use]
    pub fn new(
        quotations: Arc<dyn QuotationRepository>,
        stock_requests: Arc<dyn StockRequestRepository>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        locks: Arc<QuotationLocks>,
        config: EngineConfig,
    ) -> Self {
        Self {
            quotations,
            stock_requests,
            publisher,
            clock,
            locks,
            config,
        }
    }

    /// Creates a draft quotation.
    ///
    /// Line items that reference stock requests must reference pending ones
    /// for the same item and unit, summing exactly to the requested quantity.
    ///
    /// # Errors
    ///
    /// - `Validation` if the line item limit is exceeded
    /// - domain `InvalidSelection` for unknown or non-pending stock requests,
    ///   or contributors that do not match their line
    /// - domain validation errors from the quotation builder
    pub async fn create(
        &self,
        created_by: &ActorId,
        request: NewQuotation,
    ) -> ApplicationResult<Quotation> {
        if request.line_items.len() > self.config.max_line_items {
            return Err(ApplicationError::validation(format!(
                "quotation has {} line items, limit is {}",
                request.line_items.len(),
                self.config.max_line_items
            )));
        }

        let referenced: Vec<StockRequestItemId> = request
            .line_items
            .iter()
            .flat_map(|line| line.contributing_request_item_ids.iter().copied())
            .collect();
        let requests = self.load_pending(&referenced).await?;
        check_contributors(&request.line_items, &requests)?;

        let sequence = self.quotations.next_number().await?;
        let number = self.config.format_number(sequence);
        let now = self.clock.now();

        let quotation = Quotation::builder(
            number,
            request.name,
            created_by.clone(),
            request.validity_until,
        )
        .quotation_type(request.quotation_type)
        .notes(request.notes)
        .line_items(request.line_items)
        .build(now)?;
        self.quotations.insert(&quotation).await?;

        info!(
            quotation_id = %quotation.id(),
            number = %quotation.number(),
            actor = %created_by,
            line_items = quotation.line_items().len(),
            "quotation created"
        );
        publish_events(
            self.publisher.as_ref(),
            vec![
                QuotationCreated::new(
                    quotation.id(),
                    created_by.clone(),
                    quotation.number(),
                    quotation.line_items().len(),
                    referenced.len(),
                    now,
                )
                .into(),
            ],
        )
        .await;

        Ok(quotation)
    }

    /// Aggregates pending stock requests and creates a draft quotation from
    /// the result.
    ///
    /// # Errors
    ///
    /// See [`StockRequestAggregator::aggregate_pending`] and [`Self::create`].
    pub async fn create_from_stock_requests(
        &self,
        created_by: &ActorId,
        request: NewAggregatedQuotation,
    ) -> ApplicationResult<Quotation> {
        let aggregator = StockRequestAggregator::new(Arc::clone(&self.stock_requests));
        let lines = aggregator
            .aggregate_pending(&request.stock_request_ids)
            .await?;

        self.create(
            created_by,
            NewQuotation {
                name: request.name,
                quotation_type: request.quotation_type,
                validity_until: request.validity_until,
                notes: request.notes,
                line_items: lines.iter().map(|l| l.to_line_item_draft()).collect(),
            },
        )
        .await
    }

    /// Publishes a draft quotation and marks its stock requests quoted.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown quotation
    /// - domain `InvalidTransition`, `EmptyQuotation` or `InvalidDeadline`
    /// - domain `InvalidSelection` if a contributing request is no longer pending
    /// - `ConcurrentModification` if another writer won the race
    pub async fn publish(&self, actor: &ActorId, id: QuotationId) -> ApplicationResult<Quotation> {
        let _guard = self.locks.lock(id).await;
        let mut quotation = load_quotation(self.quotations.as_ref(), id).await?;
        let expected = quotation.version();
        let now = self.clock.now();

        if let Err(e) = quotation.publish(now) {
            warn!(quotation_id = %id, error = %e, "publish rejected");
            return Err(e.into());
        }

        let mut requests = self
            .load_pending(&quotation.contributing_request_ids())
            .await?;
        for request in &mut requests {
            request.mark_quoted(id, now)?;
        }
        self.quotations.save(&quotation, expected, &requests).await?;

        info!(
            quotation_id = %id,
            number = %quotation.number(),
            actor = %actor,
            validity_until = %quotation.validity_until(),
            stock_requests = requests.len(),
            "quotation published"
        );
        publish_events(
            self.publisher.as_ref(),
            vec![
                QuotationPublished::new(
                    id,
                    actor.clone(),
                    quotation.number(),
                    quotation.validity_until(),
                    quotation.line_items().len(),
                    now,
                )
                .into(),
            ],
        )
        .await;

        Ok(quotation)
    }

    /// Closes a published, unexpired quotation early.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown quotation
    /// - domain `InvalidTransition` unless published and unexpired
    /// - `ConcurrentModification` if another writer won the race
    pub async fn close(&self, actor: &ActorId, id: QuotationId) -> ApplicationResult<Quotation> {
        let _guard = self.locks.lock(id).await;
        let mut quotation = load_quotation(self.quotations.as_ref(), id).await?;
        let expected = quotation.version();
        let now = self.clock.now();

        if let Err(e) = quotation.close(now) {
            warn!(quotation_id = %id, error = %e, "close rejected");
            return Err(e.into());
        }
        self.quotations.save(&quotation, expected, &[]).await?;

        info!(quotation_id = %id, number = %quotation.number(), actor = %actor, "quotation closed");
        publish_events(
            self.publisher.as_ref(),
            vec![
                QuotationClosed::new(
                    id,
                    actor.clone(),
                    quotation.number(),
                    CloseReason::Manual,
                    now,
                )
                .into(),
            ],
        )
        .await;

        Ok(quotation)
    }

    /// Cancels a quotation and releases its quoted stock requests.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown quotation
    /// - domain `InvalidTransition` if awarded or already cancelled
    /// - `ConcurrentModification` if another writer won the race
    pub async fn cancel(&self, actor: &ActorId, id: QuotationId) -> ApplicationResult<Quotation> {
        let _guard = self.locks.lock(id).await;
        let mut quotation = load_quotation(self.quotations.as_ref(), id).await?;
        let expected = quotation.version();
        let now = self.clock.now();

        if let Err(e) = quotation.cancel(now) {
            warn!(quotation_id = %id, error = %e, "cancel rejected");
            return Err(e.into());
        }

        let mut released: Vec<StockRequestItem> = self
            .stock_requests
            .get_many(&quotation.contributing_request_ids())
            .await?
            .into_iter()
            .filter(|r| {
                r.status() == StockRequestStatus::Quoted && r.quotation_id() == Some(id)
            })
            .collect();
        for request in &mut released {
            request.release(now)?;
        }
        self.quotations.save(&quotation, expected, &released).await?;

        info!(
            quotation_id = %id,
            number = %quotation.number(),
            actor = %actor,
            released = released.len(),
            "quotation cancelled"
        );
        publish_events(
            self.publisher.as_ref(),
            vec![
                QuotationCancelled::new(
                    id,
                    actor.clone(),
                    quotation.number(),
                    released.len(),
                    now,
                )
                .into(),
            ],
        )
        .await;

        Ok(quotation)
    }

    /// Returns a quotation by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown quotation.
    pub async fn get(&self, id: QuotationId) -> ApplicationResult<Quotation> {
        load_quotation(self.quotations.as_ref(), id).await
    }

    /// Lists quotations, newest first, optionally filtered by stored status.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn list(&self, status: Option<QuotationStatus>) -> ApplicationResult<Vec<Quotation>> {
        let quotations = match status {
            Some(status) => self.quotations.find_by_status(status).await?,
            None => self.quotations.get_all().await?,
        };
        Ok(quotations)
    }

    /// Loads stock requests and checks that every one exists and is pending.
    async fn load_pending(
        &self,
        ids: &[StockRequestItemId],
    ) -> ApplicationResult<Vec<StockRequestItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let unique: HashSet<StockRequestItemId> = ids.iter().copied().collect();
        if unique.len() != ids.len() {
            return Err(DomainError::invalid_selection(
                "a stock request may contribute to one line item only",
            )
            .into());
        }

        let requests = self.stock_requests.get_many(ids).await?;
        if requests.len() != ids.len() {
            return Err(
                DomainError::invalid_selection("quotation references unknown stock requests")
                    .into(),
            );
        }
        if let Some(taken) = requests.iter().find(|r| !r.is_pending()) {
            return Err(DomainError::invalid_selection(format!(
                "stock request {} is {}, not pending",
                taken.id(),
                taken.status()
            ))
            .into());
        }
        Ok(requests)
    }
}

/// Checks that every line's contributing requests are for the line's item
/// and unit and add up to its requested quantity.
fn check_contributors(lines: &[LineItemDraft], requests: &[StockRequestItem]) -> DomainResult<()> {
    let by_id: HashMap<StockRequestItemId, &StockRequestItem> =
        requests.iter().map(|r| (r.id(), r)).collect();

    for line in lines {
        if line.contributing_request_item_ids.is_empty() {
            continue;
        }
        let mut total = Decimal::ZERO;
        for id in &line.contributing_request_item_ids {
            let request = by_id.get(id).ok_or_else(|| {
                DomainError::invalid_selection(format!("stock request {id} not loaded"))
            })?;
            if request.item_id() != &line.item_id
                || request.unit_of_measure() != line.unit_of_measure
            {
                return Err(DomainError::invalid_selection(format!(
                    "stock request {id} is for {} {}, line is {} {}",
                    request.item_id(),
                    request.unit_of_measure(),
                    line.item_id,
                    line.unit_of_measure
                )));
            }
            total = total.safe_add(request.quantity().get())?;
        }
        if total != line.requested_quantity.get() {
            return Err(DomainError::invalid_selection(format!(
                "line {} requests {} but its stock requests sum to {total}",
                line.item_id,
                line.requested_quantity.get()
            )));
        }
    }
    Ok(())
}
