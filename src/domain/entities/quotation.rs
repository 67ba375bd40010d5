//! # Quotation Aggregate Root
//!
//! The quotation owns its line items, every retailer response and every award,
//! and is the sole unit of contention: all writes to any of them go through a
//! method on [`Quotation`] and bump its `version`.
//!
//! # State Machine
//!
//! ```text
//! Draft → Published → Closed → Awarded
//!   ↓         ↓          ↓
//!   └─────────┴──────────┴→ Cancelled
//! ```
//!
//! A published quotation past its deadline is *expired* (derived, see
//! [`response_window`]). It rejects responses like a closed one and may be
//! awarded; the first award commit normalizes it to `Closed`.
//!
//! The aggregate never reads the wall clock. Every mutating method takes `now`.
//!
//! # Examples
//!
//! ```
//! use procurement_rfq::domain::entities::{LineItemDraft, Quotation, ResponseItemDraft};
//! use procurement_rfq::domain::value_objects::{
//!     ActorId, ItemId, Quantity, QuotationStatus, RetailerId, Timestamp,
//! };
//! use rust_decimal::Decimal;
//!
//! let now = Timestamp::from_secs(1_704_067_200).unwrap();
//! let mut quotation = Quotation::builder("QT-000001", "Weekly rice", ActorId::new("admin"), now.add_days(2))
//!     .line_item(LineItemDraft::new(ItemId::new("rice"), Quantity::new(Decimal::new(10, 0)).unwrap(), "bag"))
//!     .build(now)
//!     .unwrap();
//!
//! quotation.publish(now).unwrap();
//! let line = quotation.line_items()[0].id();
//!
//! quotation
//!     .submit_response(
//!         RetailerId::new("r1"),
//!         vec![ResponseItemDraft::new(line, Decimal::new(100, 0))],
//!         None,
//!         now.add_secs(60),
//!     )
//!     .unwrap();
//!
//! assert_eq!(quotation.status(), QuotationStatus::Published);
//! assert_eq!(quotation.submitted_responses().count(), 1);
//! ```

use crate::domain::entities::award::{Award, AwardChange, AwardSelection};
use crate::domain::entities::line_item::{LineItemDraft, QuotationLineItem};
use crate::domain::entities::retailer_response::{
    ResponseItem, ResponseItemDraft, RetailerResponse,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::response_window::{self, ResponseWindow};
use crate::domain::value_objects::{
    ActorId, ItemId, LineItemId, Price, Quantity, QuotationId, QuotationStatus, QuotationType,
    ResponseItemId, ResponseStatus, RetailerId, StockRequestItemId, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Quotation aggregate root.
///
/// # Invariants
///
/// - Status only moves forward along `Draft < Published < Closed < Awarded`;
///   `Cancelled` is terminal and unreachable from `Awarded`
/// - Line items are fixed at creation
/// - At most one response per retailer
/// - At most one award per line item, always pointing at an item of a
///   submitted response for that same line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotation {
    id: QuotationId,
    number: String,
    name: String,
    quotation_type: QuotationType,
    status: QuotationStatus,
    validity_until: Timestamp,
    created_by: ActorId,
    created_on: Timestamp,
    notes: Option<String>,
    line_items: Vec<QuotationLineItem>,
    responses: Vec<RetailerResponse>,
    awards: Vec<Award>,
    published_on: Option<Timestamp>,
    closed_on: Option<Timestamp>,
    /// Version for optimistic locking.
    version: u64,
    updated_at: Timestamp,
}

/// Result of applying a batch of award selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardOutcome {
    /// One entry per distinct line item in the batch.
    pub changes: Vec<AwardChange>,
    /// Status before the batch.
    pub previous_status: QuotationStatus,
    /// Status after the batch.
    pub status: QuotationStatus,
}

impl AwardOutcome {
    /// Returns true if this batch moved an expired quotation to `Closed`.
    #[must_use]
    pub fn closed_now(&self) -> bool {
        self.previous_status == QuotationStatus::Published
    }

    /// Returns true if this batch completed the award.
    #[must_use]
    pub fn awarded_now(&self) -> bool {
        self.previous_status != QuotationStatus::Awarded && self.status == QuotationStatus::Awarded
    }
}

impl Quotation {
    /// Returns a builder for a new draft quotation.
    #[must_use]
    pub fn builder(
        number: impl Into<String>,
        name: impl Into<String>,
        created_by: ActorId,
        validity_until: Timestamp,
    ) -> QuotationBuilder {
        QuotationBuilder::new(number, name, created_by, validity_until)
    }

    /// Reconstructs a quotation from storage without validation.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: QuotationId,
        number: String,
        name: String,
        quotation_type: QuotationType,
        status: QuotationStatus,
        validity_until: Timestamp,
        created_by: ActorId,
        created_on: Timestamp,
        notes: Option<String>,
        line_items: Vec<QuotationLineItem>,
        responses: Vec<RetailerResponse>,
        awards: Vec<Award>,
        published_on: Option<Timestamp>,
        closed_on: Option<Timestamp>,
        version: u64,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            number,
            name,
            quotation_type,
            status,
            validity_until,
            created_by,
            created_on,
            notes,
            line_items,
            responses,
            awards,
            published_on,
            closed_on,
            version,
            updated_at,
        }
    }

    fn transition_to(&mut self, target: QuotationStatus, now: Timestamp) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
        self.version = self.version.saturating_add(1);
    }

    // ========== Accessors ==========

    /// Returns the quotation ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> QuotationId {
        self.id
    }

    /// Returns the human-facing quotation number.
    #[inline]
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Returns the quotation name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the quotation type.
    #[inline]
    #[must_use]
    pub fn quotation_type(&self) -> QuotationType {
        self.quotation_type
    }

    /// Returns the stored status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> QuotationStatus {
        self.status
    }

    /// Returns the response deadline.
    #[inline]
    #[must_use]
    pub fn validity_until(&self) -> Timestamp {
        self.validity_until
    }

    /// Returns the authoring admin.
    #[inline]
    #[must_use]
    pub fn created_by(&self) -> &ActorId {
        &self.created_by
    }

    /// Returns when the quotation was created.
    #[inline]
    #[must_use]
    pub fn created_on(&self) -> Timestamp {
        self.created_on
    }

    /// Returns the notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the line items.
    #[inline]
    #[must_use]
    pub fn line_items(&self) -> &[QuotationLineItem] {
        &self.line_items
    }

    /// Finds a line item by ID.
    #[must_use]
    pub fn line_item(&self, id: LineItemId) -> Option<&QuotationLineItem> {
        self.line_items.iter().find(|line| line.id() == id)
    }

    /// Returns every response, drafts included.
    #[inline]
    #[must_use]
    pub fn responses(&self) -> &[RetailerResponse] {
        &self.responses
    }

    /// Returns the submitted responses.
    pub fn submitted_responses(&self) -> impl Iterator<Item = &RetailerResponse> {
        self.responses.iter().filter(|r| r.is_submitted())
    }

    /// Returns the response of `retailer_id`, if any.
    #[must_use]
    pub fn response_for(&self, retailer_id: &RetailerId) -> Option<&RetailerResponse> {
        self.responses
            .iter()
            .find(|r| r.retailer_id() == retailer_id)
    }

    /// Finds a response item and its response anywhere in the quotation.
    #[must_use]
    pub fn find_response_item(
        &self,
        id: ResponseItemId,
    ) -> Option<(&RetailerResponse, &ResponseItem)> {
        self.responses
            .iter()
            .find_map(|r| r.item(id).map(|item| (r, item)))
    }

    /// Returns the committed awards.
    #[inline]
    #[must_use]
    pub fn awards(&self) -> &[Award] {
        &self.awards
    }

    /// Returns the award of a line item, if any.
    #[must_use]
    pub fn award_for(&self, line_item_id: LineItemId) -> Option<&Award> {
        self.awards
            .iter()
            .find(|a| a.line_item_id() == line_item_id)
    }

    /// Returns when the quotation was published.
    #[inline]
    #[must_use]
    pub fn published_on(&self) -> Option<Timestamp> {
        self.published_on
    }

    /// Returns when the response window was closed by the admin or by the
    /// first award.
    #[inline]
    #[must_use]
    pub fn closed_on(&self) -> Option<Timestamp> {
        self.closed_on
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the aggregate last changed.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ========== Derived State ==========

    /// Returns true if published and past the deadline at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        response_window::is_expired(self, now)
    }

    /// Returns the response window at `now`.
    #[must_use]
    pub fn window(&self, now: Timestamp) -> ResponseWindow {
        response_window::window(self, now)
    }

    /// Returns true if at least one submitted response prices `line_item_id`.
    #[must_use]
    pub fn has_candidates(&self, line_item_id: LineItemId) -> bool {
        self.submitted_responses()
            .any(|r| r.item_for_line(line_item_id).is_some())
    }

    /// Returns true if every line item with a candidate has an award.
    #[must_use]
    pub fn is_fully_awarded(&self) -> bool {
        self.line_items
            .iter()
            .filter(|line| self.has_candidates(line.id()))
            .all(|line| self.award_for(line.id()).is_some())
    }

    /// Returns every contributing stock request, in line order.
    #[must_use]
    pub fn contributing_request_ids(&self) -> Vec<StockRequestItemId> {
        self.line_items
            .iter()
            .flat_map(|line| line.contributing_request_item_ids().iter().copied())
            .collect()
    }

    /// Returns the contributing stock requests of awarded line items.
    #[must_use]
    pub fn awarded_request_ids(&self) -> Vec<StockRequestItemId> {
        self.line_items
            .iter()
            .filter(|line| self.award_for(line.id()).is_some())
            .flat_map(|line| line.contributing_request_item_ids().iter().copied())
            .collect()
    }

    // ========== State Transitions ==========

    /// Publishes the quotation to retailers.
    ///
    /// Transitions: Draft → Published
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless in Draft.
    /// Returns `DomainError::EmptyQuotation` if there are no line items.
    /// Returns `DomainError::InvalidDeadline` if `validity_until` is not after `now`.
    pub fn publish(&mut self, now: Timestamp) -> DomainResult<()> {
        if !self.status.can_transition_to(QuotationStatus::Published) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: QuotationStatus::Published,
            });
        }
        if self.line_items.is_empty() {
            return Err(DomainError::EmptyQuotation);
        }
        if !self.validity_until.is_after(&now) {
            return Err(DomainError::InvalidDeadline(format!(
                "validity_until {} is not after {}",
                self.validity_until, now
            )));
        }

        self.transition_to(QuotationStatus::Published, now)?;
        self.published_on = Some(now);
        self.touch(now);
        Ok(())
    }

    /// Closes the response window early.
    ///
    /// Transitions: Published (unexpired) → Closed
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless published and unexpired.
    pub fn close(&mut self, now: Timestamp) -> DomainResult<()> {
        if self.is_expired(now) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: QuotationStatus::Closed,
            });
        }
        self.transition_to(QuotationStatus::Closed, now)?;
        self.closed_on = Some(now);
        self.touch(now);
        Ok(())
    }

    /// Cancels the quotation.
    ///
    /// Transitions: Draft/Published/Closed → Cancelled
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if awarded or already cancelled.
    pub fn cancel(&mut self, now: Timestamp) -> DomainResult<()> {
        self.transition_to(QuotationStatus::Cancelled, now)?;
        self.touch(now);
        Ok(())
    }

    // ========== Responses ==========

    /// Submits `retailer_id`'s response, replacing any earlier one in full.
    ///
    /// # Errors
    ///
    /// See [`save_response`](Self::save_response).
    pub fn submit_response(
        &mut self,
        retailer_id: RetailerId,
        items: Vec<ResponseItemDraft>,
        notes: Option<String>,
        now: Timestamp,
    ) -> DomainResult<RetailerResponse> {
        self.save_response(retailer_id, items, notes, ResponseStatus::Submitted, now)
    }

    /// Stores `retailer_id`'s response as a draft.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ResponseAlreadySubmitted` if the retailer already
    /// submitted; otherwise see [`save_response`](Self::save_response).
    pub fn save_draft_response(
        &mut self,
        retailer_id: RetailerId,
        items: Vec<ResponseItemDraft>,
        notes: Option<String>,
        now: Timestamp,
    ) -> DomainResult<RetailerResponse> {
        self.save_response(retailer_id, items, notes, ResponseStatus::Draft, now)
    }

    /// Validates and stores a response with the given status.
    ///
    /// Checks run in order: response window, non-empty items, then per item
    /// line membership, price, duplicates and quantity range.
    ///
    /// # Errors
    ///
    /// - `QuotationClosed` / `ResponseWindowClosed` outside the open window
    /// - `NoItemsSelected` if `items` is empty
    /// - `UnknownLineItem` if a line item is not part of this quotation
    /// - `InvalidPrice` if a unit price is not positive
    /// - `DuplicateLineItem` if a line item is priced twice
    /// - `InvalidQuantity` unless `0 < quantity <= requested_quantity`
    /// - `ResponseAlreadySubmitted` when saving a draft over a submission
    pub fn save_response(
        &mut self,
        retailer_id: RetailerId,
        items: Vec<ResponseItemDraft>,
        notes: Option<String>,
        status: ResponseStatus,
        now: Timestamp,
    ) -> DomainResult<RetailerResponse> {
        response_window::ensure_accepting_responses(self, now)?;
        if items.is_empty() {
            return Err(DomainError::NoItemsSelected);
        }

        let mut response = match self.response_for(&retailer_id) {
            Some(existing) if status == ResponseStatus::Draft && existing.is_submitted() => {
                return Err(DomainError::ResponseAlreadySubmitted(retailer_id));
            }
            Some(existing) => existing.clone(),
            None => RetailerResponse::new(self.id, retailer_id, now),
        };
        let priced = self.validate_response_items(&response, items)?;
        response.replace(priced, notes, status, now);

        match self.responses.iter_mut().find(|r| r.id() == response.id()) {
            Some(slot) => *slot = response.clone(),
            None => self.responses.push(response.clone()),
        }
        self.touch(now);
        Ok(response)
    }

    fn validate_response_items(
        &self,
        response: &RetailerResponse,
        items: Vec<ResponseItemDraft>,
    ) -> DomainResult<Vec<ResponseItem>> {
        let mut seen = HashSet::with_capacity(items.len());
        let mut priced = Vec::with_capacity(items.len());

        for draft in items {
            let line = self
                .line_item(draft.line_item_id)
                .ok_or(DomainError::UnknownLineItem(draft.line_item_id))?;
            let unit_price = Price::new(draft.unit_price)?;
            if !seen.insert(draft.line_item_id) {
                return Err(DomainError::DuplicateLineItem(draft.line_item_id));
            }

            let requested = line.requested_quantity();
            let quantity = match draft.quantity {
                Some(value) => Quantity::positive(value)?,
                None => requested,
            };
            if quantity > requested {
                return Err(DomainError::InvalidQuantity(format!(
                    "offered quantity {quantity} exceeds requested {requested} for line item {}",
                    line.id()
                )));
            }

            priced.push(ResponseItem::new(
                response.id(),
                line.id(),
                unit_price,
                quantity,
                draft.notes,
            )?);
        }

        Ok(priced)
    }

    // ========== Awards ==========

    /// Commits a batch of award selections atomically.
    ///
    /// Every selection is validated before anything changes. Within the batch
    /// the last selection for a line item wins. Existing awards for selected
    /// line items are overwritten. A published-but-expired quotation is
    /// normalized to `Closed`, and the quotation moves to `Awarded` once every
    /// line item with a submitted candidate has an award.
    ///
    /// # Errors
    ///
    /// - `QuotationStillOpen` while the response window is open
    /// - `InvalidTransition` for draft or cancelled quotations
    /// - `NoItemsSelected` if `selections` is empty
    /// - `UnknownLineItem` if a line item is not part of this quotation
    /// - `InvalidAward` if a response item is unknown, prices a different
    ///   line item, or belongs to a draft response
    pub fn apply_awards(
        &mut self,
        selections: &[AwardSelection],
        awarded_by: &ActorId,
        now: Timestamp,
    ) -> DomainResult<AwardOutcome> {
        response_window::ensure_window_closed(self, now)?;
        if selections.is_empty() {
            return Err(DomainError::NoItemsSelected);
        }

        let mut batch: Vec<Award> = Vec::with_capacity(selections.len());
        for selection in selections {
            let award = self.validate_selection(selection, awarded_by, now)?;
            match batch
                .iter_mut()
                .find(|a| a.line_item_id() == award.line_item_id())
            {
                Some(slot) => *slot = award,
                None => batch.push(award),
            }
        }

        let previous_status = self.status;
        let mut changes = Vec::with_capacity(batch.len());
        for award in batch {
            let previous = match self
                .awards
                .iter_mut()
                .find(|a| a.line_item_id() == award.line_item_id())
            {
                Some(slot) => Some(std::mem::replace(slot, award.clone())),
                None => {
                    self.awards.push(award.clone());
                    None
                }
            };
            changes.push(AwardChange { award, previous });
        }

        if self.status == QuotationStatus::Published {
            self.transition_to(QuotationStatus::Closed, now)?;
            self.closed_on = Some(now);
        }
        if self.status == QuotationStatus::Closed && self.is_fully_awarded() {
            self.transition_to(QuotationStatus::Awarded, now)?;
        }
        self.touch(now);

        Ok(AwardOutcome {
            changes,
            previous_status,
            status: self.status,
        })
    }

    fn validate_selection(
        &self,
        selection: &AwardSelection,
        awarded_by: &ActorId,
        now: Timestamp,
    ) -> DomainResult<Award> {
        if self.line_item(selection.line_item_id).is_none() {
            return Err(DomainError::UnknownLineItem(selection.line_item_id));
        }
        let (response, item) = self
            .find_response_item(selection.response_item_id)
            .ok_or_else(|| {
                DomainError::invalid_award(format!(
                    "response item {} is not part of quotation {}",
                    selection.response_item_id, self.number
                ))
            })?;
        if item.line_item_id() != selection.line_item_id {
            return Err(DomainError::invalid_award(format!(
                "response item {} prices line item {}, not {}",
                item.id(),
                item.line_item_id(),
                selection.line_item_id
            )));
        }
        if !response.is_submitted() {
            return Err(DomainError::invalid_award(format!(
                "response item {} belongs to an unsubmitted response",
                item.id()
            )));
        }

        Ok(Award::new(
            selection.line_item_id,
            item.id(),
            response.retailer_id().clone(),
            awarded_by.clone(),
            now,
        ))
    }
}

impl fmt::Display for Quotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quotation({} {} lines={} [{}])",
            self.number,
            self.quotation_type,
            self.line_items.len(),
            self.status
        )
    }
}

/// Builder for new draft [`Quotation`]s.
#[derive(Debug, Clone)]
pub struct QuotationBuilder {
    number: String,
    name: String,
    created_by: ActorId,
    validity_until: Timestamp,
    quotation_type: QuotationType,
    notes: Option<String>,
    line_items: Vec<LineItemDraft>,
}

impl QuotationBuilder {
    /// Creates a builder with the required fields.
    #[must_use]
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        created_by: ActorId,
        validity_until: Timestamp,
    ) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            created_by,
            validity_until,
            quotation_type: QuotationType::default(),
            notes: None,
            line_items: Vec::new(),
        }
    }

    /// Sets the quotation type.
    #[must_use]
    pub fn quotation_type(mut self, quotation_type: QuotationType) -> Self {
        self.quotation_type = quotation_type;
        self
    }

    /// Sets notes.
    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Appends one line item.
    #[must_use]
    pub fn line_item(mut self, draft: LineItemDraft) -> Self {
        self.line_items.push(draft);
        self
    }

    /// Appends several line items.
    #[must_use]
    pub fn line_items(mut self, drafts: impl IntoIterator<Item = LineItemDraft>) -> Self {
        self.line_items.extend(drafts);
        self
    }

    /// Builds a draft quotation.
    ///
    /// A quotation may be created without line items; it just cannot be
    /// published.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` for a blank name, blank item or
    /// unit, or an item listed on two lines.
    /// Returns `DomainError::InvalidQuantity` for a non-positive quantity.
    /// Returns `DomainError::InvalidSelection` if a stock request contributes
    /// to two lines.
    pub fn build(self, now: Timestamp) -> DomainResult<Quotation> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("quotation name is required"));
        }

        let mut items: HashSet<&ItemId> = HashSet::new();
        let mut requests: HashSet<StockRequestItemId> = HashSet::new();
        for draft in &self.line_items {
            if draft.item_id.as_str().trim().is_empty() {
                return Err(DomainError::validation("line item requires an item id"));
            }
            if draft.unit_of_measure.trim().is_empty() {
                return Err(DomainError::validation(format!(
                    "line item {} requires a unit of measure",
                    draft.item_id
                )));
            }
            if !draft.requested_quantity.is_positive() {
                return Err(DomainError::InvalidQuantity(format!(
                    "requested quantity for {} must be positive",
                    draft.item_id
                )));
            }
            if !items.insert(&draft.item_id) {
                return Err(DomainError::validation(format!(
                    "item {} appears on more than one line",
                    draft.item_id
                )));
            }
            for id in &draft.contributing_request_item_ids {
                if !requests.insert(*id) {
                    return Err(DomainError::invalid_selection(format!(
                        "stock request {id} contributes to more than one line"
                    )));
                }
            }
        }

        let id = QuotationId::new_v4();
        let line_items = self
            .line_items
            .into_iter()
            .map(|draft| QuotationLineItem::from_draft(id, draft))
            .collect();

        Ok(Quotation {
            id,
            number: self.number,
            name: self.name,
            quotation_type: self.quotation_type,
            status: QuotationStatus::Draft,
            validity_until: self.validity_until,
            created_by: self.created_by,
            created_on: now,
            notes: self.notes,
            line_items,
            responses: Vec::new(),
            awards: Vec::new(),
            published_on: None,
            closed_on: None,
            version: 1,
            updated_at: now,
        })
    }
}
