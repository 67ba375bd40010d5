//! # Retailer Response Ledger
//!
//! Accepts, validates and stores retailer responses.
//!
//! - One live response per retailer per quotation
//! - `submit` replaces the retailer's whole item set; it never merges
//! - Totals are recomputed from `unit_price × quantity` on every write
//! - Once the window is over (closed, awarded or past the deadline) every
//!   write fails with `ResponseWindowClosed`
//!
//! Draft responses can be saved while the window is open. They are never
//! visible to admins and never compete for awards until submitted.

use crate::application::clock::Clock;
use crate::application::engine_config::EngineConfig;
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::commit::{load_quotation, publish_events};
use crate::application::services::quotation_locks::QuotationLocks;
use crate::domain::entities::{ResponseItemDraft, RetailerResponse};
use crate::domain::errors::DomainError;
use crate::domain::events::ResponseSubmitted;
use crate::domain::services::response_window;
use crate::domain::value_objects::{QuotationId, ResponseStatus, RetailerId};
use crate::infrastructure::events::EventPublisher;
use crate::infrastructure::persistence::QuotationRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A retailer's priced items and notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSubmission {
    /// Priced line items.
    pub items: Vec<ResponseItemDraft>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl ResponseSubmission {
    /// Creates a submission without notes.
    #[must_use]
    pub fn new(items: Vec<ResponseItemDraft>) -> Self {
        Self { items, notes: None }
    }

    /// Sets notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Retailer response use cases.
#[derive(Debug, Clone)]
pub struct RetailerResponseLedger {
    quotations: Arc<dyn QuotationRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    locks: Arc<QuotationLocks>,
    config: EngineConfig,
}

impl RetailerResponseLedger {
    /// Creates a new ledger.
    #[must_use]
    pub fn new(
        quotations: Arc<dyn QuotationRepository>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        locks: Arc<QuotationLocks>,
        config: EngineConfig,
    ) -> Self {
        Self {
            quotations,
            publisher,
            clock,
            locks,
            config,
        }
    }

    /// Submits a response, replacing any earlier one from the same retailer.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown quotation
    /// - `Validation` if the item limit is exceeded
    /// - domain `QuotationClosed` / `ResponseWindowClosed` outside the window
    /// - domain `NoItemsSelected`, `UnknownLineItem`, `InvalidPrice`,
    ///   `DuplicateLineItem` or `InvalidQuantity` for bad items
    /// - `ConcurrentModification` if another writer won the race
    pub async fn submit(
        &self,
        retailer_id: RetailerId,
        quotation_id: QuotationId,
        submission: ResponseSubmission,
    ) -> ApplicationResult<RetailerResponse> {
        self.write(retailer_id, quotation_id, submission, ResponseStatus::Submitted)
            .await
    }

    /// Saves a draft response while the window is open.
    ///
    /// # Errors
    ///
    /// As [`Self::submit`], plus domain `ResponseAlreadySubmitted` if the
    /// retailer has already submitted.
    pub async fn save_draft(
        &self,
        retailer_id: RetailerId,
        quotation_id: QuotationId,
        submission: ResponseSubmission,
    ) -> ApplicationResult<RetailerResponse> {
        self.write(retailer_id, quotation_id, submission, ResponseStatus::Draft)
            .await
    }

    async fn write(
        &self,
        retailer_id: RetailerId,
        quotation_id: QuotationId,
        submission: ResponseSubmission,
        status: ResponseStatus,
    ) -> ApplicationResult<RetailerResponse> {
        let _guard = self.locks.lock(quotation_id).await;
        let mut quotation = load_quotation(self.quotations.as_ref(), quotation_id).await?;
        let expected = quotation.version();
        let now = self.clock.now();

        if let Err(e) = response_window::ensure_accepting_responses(&quotation, now) {
            warn!(
                quotation_id = %quotation_id,
                retailer_id = %retailer_id,
                error = %e,
                "response rejected"
            );
            return Err(e.into());
        }
        if submission.items.len() > self.config.max_response_items {
            return Err(ApplicationError::validation(format!(
                "response has {} items, limit is {}",
                submission.items.len(),
                self.config.max_response_items
            )));
        }
        let resubmission = quotation
            .response_for(&retailer_id)
            .is_some_and(RetailerResponse::is_submitted);

        let response = match quotation.save_response(
            retailer_id.clone(),
            submission.items,
            submission.notes,
            status,
            now,
        ) {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    quotation_id = %quotation_id,
                    retailer_id = %retailer_id,
                    error = %e,
                    "response rejected"
                );
                return Err(e.into());
            }
        };
        let total = response.total_amount().map_err(DomainError::from)?;
        self.quotations.save(&quotation, expected, &[]).await?;

        if status == ResponseStatus::Draft {
            debug!(
                quotation_id = %quotation_id,
                retailer_id = %retailer_id,
                items = response.items().len(),
                "draft response saved"
            );
            return Ok(response);
        }

        info!(
            quotation_id = %quotation_id,
            response_id = %response.id(),
            retailer_id = %retailer_id,
            items = response.items().len(),
            total = %total,
            resubmission,
            "response submitted"
        );
        publish_events(
            self.publisher.as_ref(),
            vec![
                ResponseSubmitted::new(
                    quotation_id,
                    response.id(),
                    retailer_id,
                    response.items().len(),
                    total,
                    resubmission,
                    now,
                )
                .into(),
            ],
        )
        .await;

        Ok(response)
    }

    /// Returns the submitted responses of a quotation. Drafts are excluded.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown quotation.
    pub async fn responses(
        &self,
        quotation_id: QuotationId,
    ) -> ApplicationResult<Vec<RetailerResponse>> {
        let quotation = load_quotation(self.quotations.as_ref(), quotation_id).await?;
        Ok(quotation.submitted_responses().cloned().collect())
    }

    /// Returns one retailer's own response, draft or submitted.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown quotation.
    pub async fn own_response(
        &self,
        retailer_id: &RetailerId,
        quotation_id: QuotationId,
    ) -> ApplicationResult<Option<RetailerResponse>> {
        let quotation = load_quotation(self.quotations.as_ref(), quotation_id).await?;
        Ok(quotation.response_for(retailer_id).cloned())
    }
}
