//! # Ranking Strategy
//!
//! Strategies for ordering the candidate response items of a line item.
//!
//! This module provides the [`RankingStrategy`] trait and the default
//! [`LowestPriceStrategy`]. Ranking must be deterministic: identical inputs
//! always produce identical order, regardless of the input order.

use crate::domain::entities::{ResponseItem, RetailerResponse};
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{
    Amount, Price, Quantity, ResponseId, ResponseItemId, RetailerId, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A submitted response item competing for a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// The rank (1 = best). Zero until ranked.
    pub rank: usize,
    /// Priced response item.
    pub response_item_id: ResponseItemId,
    /// Parent response.
    pub response_id: ResponseId,
    /// Bidding retailer.
    pub retailer_id: RetailerId,
    /// Offered unit price.
    pub unit_price: Price,
    /// Offered quantity.
    pub quantity: Quantity,
    /// `unit_price × quantity`.
    pub total_amount: Amount,
    /// When the parent response was last submitted.
    pub submitted_on: Timestamp,
}

impl Candidate {
    /// Builds an unranked candidate from a submitted response and one of its
    /// items.
    ///
    /// A response without a submission time ranks as submitted at
    /// `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` if the total overflows.
    pub fn from_response_item(response: &RetailerResponse, item: &ResponseItem) -> DomainResult<Self> {
        Ok(Self {
            rank: 0,
            response_item_id: item.id(),
            response_id: response.id(),
            retailer_id: response.retailer_id().clone(),
            unit_price: item.unit_price(),
            quantity: item.quantity(),
            total_amount: item.total_amount()?,
            submitted_on: response.submitted_on().unwrap_or(response.created_at()),
        })
    }

    /// Returns true if this candidate is the best (rank 1).
    #[must_use]
    pub fn is_best(&self) -> bool {
        self.rank == 1
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Candidate(#{} {} @ {} x {})",
            self.rank, self.retailer_id, self.unit_price, self.quantity
        )
    }
}

/// Trait for ranking strategies.
pub trait RankingStrategy: Send + Sync + fmt::Debug {
    /// Orders candidates best first and assigns ranks starting at 1.
    fn rank(&self, candidates: Vec<Candidate>) -> Vec<Candidate>;

    /// Returns the name of this ranking strategy.
    fn name(&self) -> &'static str;
}

/// Lowest unit price first.
///
/// Ties go to the earlier submission, then to the lower response item ID so
/// the order is total.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestPriceStrategy;

impl LowestPriceStrategy {
    /// Creates a new lowest price strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn compare(a: &Candidate, b: &Candidate) -> Ordering {
        a.unit_price
            .cmp(&b.unit_price)
            .then_with(|| a.submitted_on.cmp(&b.submitted_on))
            .then_with(|| a.response_item_id.cmp(&b.response_item_id))
    }
}

impl RankingStrategy for LowestPriceStrategy {
    fn rank(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.sort_by(Self::compare);
        for (index, candidate) in candidates.iter_mut().enumerate() {
            candidate.rank = index + 1;
        }
        candidates
    }

    fn name(&self) -> &'static str {
        "LowestPrice"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::{Decimal, dec};

    fn candidate(retailer: &str, price: Decimal, submitted_secs: i64) -> Candidate {
        let unit_price = Price::new(price).unwrap();
        let quantity = Quantity::new(dec!(10)).unwrap();
        Candidate {
            rank: 0,
            response_item_id: ResponseItemId::new_v4(),
            response_id: ResponseId::new_v4(),
            retailer_id: RetailerId::new(retailer),
            unit_price,
            quantity,
            total_amount: unit_price.total_for(quantity).unwrap(),
            submitted_on: Timestamp::from_secs(submitted_secs).unwrap(),
        }
    }

    #[test]
    fn empty_input_ranks_to_empty() {
        assert!(LowestPriceStrategy::new().rank(Vec::new()).is_empty());
    }

    #[test]
    fn cheaper_first_then_earlier_submission() {
        let ranked = LowestPriceStrategy.rank(vec![
            candidate("A", dec!(50), 1),
            candidate("C", dec!(45), 20),
            candidate("B", dec!(45), 10),
        ]);

        let order: Vec<&str> = ranked.iter().map(|c| c.retailer_id.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
        assert!(ranked[0].is_best());
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn full_tie_breaks_on_response_item_id() {
        let a = candidate("A", dec!(10), 5);
        let b = candidate("B", dec!(10), 5);
        let forward = LowestPriceStrategy.rank(vec![a.clone(), b.clone()]);
        let backward = LowestPriceStrategy.rank(vec![b, a]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn strategy_name() {
        assert_eq!(LowestPriceStrategy.name(), "LowestPrice");
    }
}
