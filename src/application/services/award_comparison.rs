//! # Award Comparison Engine
//!
//! Read-only projection of a quotation's candidate pool, per line item, used
//! to drive award decisions.
//!
//! Comparison is only available once the response window is over: the
//! quotation is closed or awarded, or published past its deadline. While the
//! window is open the engine fails with `QuotationStillOpen`.
//!
//! A line item nobody bid on has no candidates and no lowest candidate; that
//! is a normal result, not an error.

use crate::application::clock::Clock;
use crate::application::error::ApplicationResult;
use crate::application::services::commit::load_quotation;
use crate::application::services::ranking_strategy::{Candidate, RankingStrategy};
use crate::domain::entities::{AwardSelection, Quotation};
use crate::domain::errors::DomainResult;
use crate::domain::services::response_window::{self, ResponseWindow};
use crate::domain::value_objects::{
    ItemId, LineItemId, Quantity, QuotationId, QuotationStatus, ResponseItemId, RetailerId,
    Timestamp,
};
use crate::infrastructure::persistence::QuotationRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// The award currently held by a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlreadyAwarded {
    /// Winning response item.
    pub response_item_id: ResponseItemId,
    /// Winning retailer.
    pub retailer_id: RetailerId,
}

/// Ranked candidates for one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemComparison {
    /// Line item.
    pub line_item_id: LineItemId,
    /// Requested item.
    pub item_id: ItemId,
    /// Requested quantity.
    pub requested_quantity: Quantity,
    /// Unit of measure.
    pub unit_of_measure: String,
    /// Candidates, best first.
    pub candidates: Vec<Candidate>,
    /// Best candidate, if any.
    pub lowest: Option<Candidate>,
    /// Current award, if any.
    pub already_awarded: Option<AlreadyAwarded>,
}

impl LineItemComparison {
    /// Returns true if at least one retailer priced this line.
    #[must_use]
    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }
}

/// Comparison view of a whole quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardComparison {
    /// Quotation.
    pub quotation_id: QuotationId,
    /// Quotation number.
    pub number: String,
    /// Stored status at the time of the projection.
    pub status: QuotationStatus,
    /// Response window at the time of the projection.
    pub window: ResponseWindow,
    /// Name of the ranking strategy used.
    pub ranking: String,
    /// One entry per line item, in quotation order.
    pub lines: Vec<LineItemComparison>,
}

impl AwardComparison {
    /// Returns the comparison for one line item.
    #[must_use]
    pub fn line(&self, line_item_id: LineItemId) -> Option<&LineItemComparison> {
        self.lines.iter().find(|l| l.line_item_id == line_item_id)
    }

    /// Proposes the lowest candidate for every line item that has candidates
    /// and no award yet.
    #[must_use]
    pub fn default_selections(&self) -> Vec<AwardSelection> {
        self.lines
            .iter()
            .filter(|l| l.already_awarded.is_none())
            .filter_map(|l| {
                l.lowest
                    .as_ref()
                    .map(|c| AwardSelection::new(l.line_item_id, c.response_item_id))
            })
            .collect()
    }

    /// Returns true if every line item with candidates has an award.
    #[must_use]
    pub fn is_fully_awarded(&self) -> bool {
        self.lines
            .iter()
            .filter(|l| l.has_candidates())
            .all(|l| l.already_awarded.is_some())
    }
}

/// Builds the comparison view of an already-loaded quotation.
///
/// Only submitted responses contribute candidates.
///
/// # Errors
///
/// Returns `QuotationStillOpen` while the window is open, `InvalidTransition`
/// for draft or cancelled quotations, and `Arithmetic` if a total overflows.
pub fn build_comparison(
    quotation: &Quotation,
    strategy: &dyn RankingStrategy,
    now: Timestamp,
) -> DomainResult<AwardComparison> {
    response_window::ensure_window_closed(quotation, now)?;

    let mut lines = Vec::with_capacity(quotation.line_items().len());
    for line in quotation.line_items() {
        let mut candidates = Vec::new();
        for response in quotation.submitted_responses() {
            if let Some(item) = response.item_for_line(line.id()) {
                candidates.push(Candidate::from_response_item(response, item)?);
            }
        }
        let candidates = strategy.rank(candidates);

        lines.push(LineItemComparison {
            line_item_id: line.id(),
            item_id: line.item_id().clone(),
            requested_quantity: line.requested_quantity(),
            unit_of_measure: line.unit_of_measure().to_string(),
            lowest: candidates.first().cloned(),
            candidates,
            already_awarded: quotation.award_for(line.id()).map(|a| AlreadyAwarded {
                response_item_id: a.response_item_id(),
                retailer_id: a.retailer_id().clone(),
            }),
        });
    }

    Ok(AwardComparison {
        quotation_id: quotation.id(),
        number: quotation.number().to_string(),
        status: quotation.status(),
        window: quotation.window(now),
        ranking: strategy.name().to_string(),
        lines,
    })
}

/// Loads quotations and projects their comparison view.
#[derive(Debug, Clone)]
pub struct AwardComparisonEngine {
    quotations: Arc<dyn QuotationRepository>,
    strategy: Arc<dyn RankingStrategy>,
    clock: Arc<dyn Clock>,
}

impl AwardComparisonEngine {
    /// Creates a new engine.
    #[must_use]
    pub fn new(
        quotations: Arc<dyn QuotationRepository>,
        strategy: Arc<dyn RankingStrategy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            quotations,
            strategy,
            clock,
        }
    }

    /// Returns the ranking strategy in use.
    #[must_use]
    pub fn strategy(&self) -> &dyn RankingStrategy {
        self.strategy.as_ref()
    }

    /// Builds the comparison view of a quotation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown quotation; otherwise see
    /// [`build_comparison`].
    pub async fn build(&self, quotation_id: QuotationId) -> ApplicationResult<AwardComparison> {
        let quotation = load_quotation(self.quotations.as_ref(), quotation_id).await?;
        let comparison = build_comparison(&quotation, self.strategy.as_ref(), self.clock.now())?;
        debug!(
            quotation_id = %quotation_id,
            lines = comparison.lines.len(),
            window = %comparison.window,
            "award comparison built"
        );
        Ok(comparison)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::ranking_strategy::LowestPriceStrategy;
    use crate::domain::entities::{LineItemDraft, ResponseItemDraft};
    use crate::domain::errors::DomainError;
    use crate::domain::value_objects::ActorId;
    use rust_decimal::dec;

    fn t0() -> Timestamp {
        Timestamp::from_secs(1_704_067_200).unwrap()
    }

    /// Items A (qty 10) and B (qty 5), published at t0 with a two-day window.
    fn published() -> Quotation {
        let mut q = Quotation::builder("QT-000001", "Weekly", ActorId::new("admin"), t0().add_days(2))
            .line_item(LineItemDraft::new(ItemId::new("A"), Quantity::new(dec!(10)).unwrap(), "kg"))
            .line_item(LineItemDraft::new(ItemId::new("B"), Quantity::new(dec!(5)).unwrap(), "kg"))
            .build(t0())
            .unwrap();
        q.publish(t0()).unwrap();
        q
    }

    fn lines(q: &Quotation) -> (LineItemId, LineItemId) {
        (q.line_items()[0].id(), q.line_items()[1].id())
    }

    fn after_deadline() -> Timestamp {
        t0().add_days(2).add_secs(1)
    }

    #[test]
    fn open_quotation_is_still_open() {
        let q = published();
        assert_eq!(
            build_comparison(&q, &LowestPriceStrategy, t0().add_secs(60)),
            Err(DomainError::QuotationStillOpen)
        );
    }

    #[test]
    fn scenario_lowest_and_candidate_counts() {
        let mut q = published();
        let (a, b) = lines(&q);
        q.submit_response(
            RetailerId::new("R1"),
            vec![ResponseItemDraft::new(a, dec!(100))],
            None,
            t0().add_secs(10),
        )
        .unwrap();
        q.submit_response(
            RetailerId::new("R2"),
            vec![
                ResponseItemDraft::new(a, dec!(90)),
                ResponseItemDraft::new(b, dec!(200)),
            ],
            None,
            t0().add_secs(20),
        )
        .unwrap();

        let view = build_comparison(&q, &LowestPriceStrategy, after_deadline()).unwrap();
        let line_a = view.line(a).unwrap();
        let line_b = view.line(b).unwrap();

        assert_eq!(view.window, ResponseWindow::Expired);
        assert_eq!(line_a.candidates.len(), 2);
        assert_eq!(line_b.candidates.len(), 1);
        let lowest_a = line_a.lowest.as_ref().unwrap();
        assert_eq!(lowest_a.retailer_id.as_str(), "R2");
        assert_eq!(lowest_a.unit_price.get(), dec!(90));
        assert_eq!(lowest_a.total_amount.get(), dec!(900));
        assert_eq!(line_b.lowest.as_ref().unwrap().retailer_id.as_str(), "R2");
    }

    #[test]
    fn drafts_are_not_candidates() {
        let mut q = published();
        let (a, _) = lines(&q);
        q.save_draft_response(
            RetailerId::new("R1"),
            vec![ResponseItemDraft::new(a, dec!(1))],
            None,
            t0().add_secs(10),
        )
        .unwrap();

        let view = build_comparison(&q, &LowestPriceStrategy, after_deadline()).unwrap();
        assert!(view.lines.iter().all(|l| l.candidates.is_empty() && l.lowest.is_none()));
        assert!(view.default_selections().is_empty());
        assert!(view.is_fully_awarded());
    }

    #[test]
    fn default_selections_skip_awarded_lines() {
        let mut q = published();
        let (a, b) = lines(&q);
        let r = q
            .submit_response(
                RetailerId::new("R1"),
                vec![
                    ResponseItemDraft::new(a, dec!(10)),
                    ResponseItemDraft::new(b, dec!(20)),
                ],
                None,
                t0().add_secs(10),
            )
            .unwrap();
        let item_a = r.item_for_line(a).unwrap().id();
        q.apply_awards(
            &[AwardSelection::new(a, item_a)],
            &ActorId::new("admin"),
            after_deadline(),
        )
        .unwrap();

        let view = build_comparison(&q, &LowestPriceStrategy, after_deadline()).unwrap();
        let proposed = view.default_selections();

        assert_eq!(proposed.len(), 1);
        assert_eq!(proposed[0].line_item_id, b);
        let awarded = view.line(a).unwrap().already_awarded.as_ref().unwrap();
        assert_eq!(awarded.response_item_id, item_a);
        assert!(!view.is_fully_awarded());
    }
}
