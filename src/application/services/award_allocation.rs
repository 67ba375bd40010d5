//! # Award Allocator
//!
//! Commits admin-selected winners per line item.
//!
//! A call is all-or-nothing: every selection is validated before anything is
//! written. Partial awards are allowed and later calls extend them. A
//! selection for an already-awarded line item overwrites the earlier award
//! and is reported with the previous winner for audit.
//!
//! The first commit on a published-but-expired quotation normalizes it to
//! `closed`. Once every line item with at least one candidate has an award
//! the quotation becomes `awarded`, and the stock requests behind awarded
//! line items become `fulfilled` in the same commit.

use crate::application::clock::Clock;
use crate::application::error::ApplicationResult;
use crate::application::services::commit::{load_quotation, publish_events};
use crate::application::services::quotation_locks::QuotationLocks;
use crate::domain::entities::{Award, AwardChange, AwardSelection, StockRequestItem};
use crate::domain::events::{
    AwardCommitted, CloseReason, ProcurementEvent, QuotationAwarded, QuotationClosed,
};
use crate::domain::value_objects::{
    ActorId, QuotationId, QuotationStatus, StockRequestItemId, StockRequestStatus, Timestamp,
};
use crate::infrastructure::events::EventPublisher;
use crate::infrastructure::persistence::{QuotationRepository, StockRequestRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a successful award commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardCommit {
    /// Quotation.
    pub quotation_id: QuotationId,
    /// Awards written by this call, one per line item.
    pub awarded: Vec<Award>,
    /// Awards this call overwrote.
    pub replaced: Vec<Award>,
    /// Status after the commit.
    pub quotation_status: QuotationStatus,
}

impl AwardCommit {
    fn from_changes(
        quotation_id: QuotationId,
        changes: Vec<AwardChange>,
        status: QuotationStatus,
    ) -> Self {
        let mut awarded = Vec::with_capacity(changes.len());
        let mut replaced = Vec::new();
        for change in changes {
            awarded.push(change.award);
            if let Some(previous) = change.previous {
                replaced.push(previous);
            }
        }
        Self {
            quotation_id,
            awarded,
            replaced,
            quotation_status: status,
        }
    }
}

/// Award use cases.
#[derive(Debug, Clone)]
pub struct AwardAllocator {
    quotations: Arc<dyn QuotationRepository>,
    stock_requests: Arc<dyn StockRequestRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    locks: Arc<QuotationLocks>,
}

impl AwardAllocator {
    /// Creates a new allocator.
    #[must_use]
    pub fn new(
        quotations: Arc<dyn QuotationRepository>,
        stock_requests: Arc<dyn StockRequestRepository>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        locks: Arc<QuotationLocks>,
    ) -> Self {
        Self {
            quotations,
            stock_requests,
            publisher,
            clock,
            locks,
        }
    }

    /// Commits a batch of award selections.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown quotation
    /// - domain `QuotationStillOpen` while the window is open
    /// - domain `InvalidTransition` for draft or cancelled quotations
    /// - domain `NoItemsSelected` for an empty batch
    /// - domain `UnknownLineItem` / `InvalidAward` for bad selections
    /// - `ConcurrentModification` if another writer won the race
    pub async fn commit_awards(
        &self,
        awarded_by: &ActorId,
        quotation_id: QuotationId,
        selections: &[AwardSelection],
    ) -> ApplicationResult<AwardCommit> {
        let _guard = self.locks.lock(quotation_id).await;
        let mut quotation = load_quotation(self.quotations.as_ref(), quotation_id).await?;
        let expected = quotation.version();
        let now = self.clock.now();

        let outcome = match quotation.apply_awards(selections, awarded_by, now) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    quotation_id = %quotation_id,
                    selections = selections.len(),
                    error = %e,
                    "award rejected"
                );
                return Err(e.into());
            }
        };

        let fulfilled = if outcome.awarded_now() {
            self.fulfilled_requests(quotation_id, &quotation.awarded_request_ids(), now)
                .await?
        } else {
            Vec::new()
        };
        self.quotations.save(&quotation, expected, &fulfilled).await?;

        let reawarded = outcome.changes.iter().filter(|c| c.is_reaward()).count();
        info!(
            quotation_id = %quotation_id,
            number = %quotation.number(),
            actor = %awarded_by,
            awarded = outcome.changes.len(),
            reawarded,
            status = %outcome.status,
            "awards committed"
        );

        let mut events: Vec<ProcurementEvent> = Vec::with_capacity(outcome.changes.len() + 2);
        if outcome.closed_now() {
            events.push(
                QuotationClosed::new(
                    quotation_id,
                    awarded_by.clone(),
                    quotation.number(),
                    CloseReason::DeadlineElapsed,
                    now,
                )
                .into(),
            );
        }
        for change in &outcome.changes {
            events.push(AwardCommitted::from_change(quotation_id, change).into());
        }
        if outcome.awarded_now() {
            events.push(
                QuotationAwarded::new(
                    quotation_id,
                    awarded_by.clone(),
                    quotation.number(),
                    quotation.awards().len(),
                    now,
                )
                .into(),
            );
        }
        publish_events(self.publisher.as_ref(), events).await;

        Ok(AwardCommit::from_changes(
            quotation_id,
            outcome.changes,
            outcome.status,
        ))
    }

    async fn fulfilled_requests(
        &self,
        quotation_id: QuotationId,
        ids: &[StockRequestItemId],
        now: Timestamp,
    ) -> ApplicationResult<Vec<StockRequestItem>> {
        let mut requests: Vec<StockRequestItem> = self
            .stock_requests
            .get_many(ids)
            .await?
            .into_iter()
            .filter(|r| {
                r.status() == StockRequestStatus::Quoted && r.quotation_id() == Some(quotation_id)
            })
            .collect();
        for request in &mut requests {
            request.mark_fulfilled(now)?;
        }
        Ok(requests)
    }
}
