//! # Stock Request Aggregation
//!
//! Groups pending per-store stock requests by item into candidate quotation
//! line items.
//!
//! Aggregation is a pure read. Nothing changes until the output is used to
//! create and publish a quotation; the pending check is repeated at publish
//! time under the quotation commit.
//!
//! # Grouping Rules
//!
//! - The grouping key is `item_id`; groups appear in order of first occurrence
//! - Contributions keep the order in which request IDs were selected
//! - Quantities are summed as decimals
//! - All contributions to a group must share one unit of measure
//!
//! # Examples
//!
//! ```ignore
//! let aggregator = StockRequestAggregator::new(stock_repo);
//! let lines = aggregator.aggregate_pending(&[a, b, c]).await?;
//! let drafts: Vec<LineItemDraft> = lines.iter().map(AggregatedLineItem::to_line_item_draft).collect();
//! ```

use crate::application::error::ApplicationResult;
use crate::domain::entities::{LineItemDraft, StockRequestItem};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{ItemId, Quantity, StockRequestItemId, StoreId};
use crate::infrastructure::persistence::StockRequestRepository;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// One stock request's share of an aggregated line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributingRequest {
    /// Requesting store.
    pub store_id: StoreId,
    /// Contributing stock request.
    pub request_item_id: StockRequestItemId,
    /// Quantity requested by the store.
    pub quantity: Quantity,
}

/// A candidate quotation line built from pending stock requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedLineItem {
    /// Aggregated item.
    pub item_id: ItemId,
    /// Sum of contributing quantities.
    pub total_quantity: Quantity,
    /// Shared unit of measure.
    pub unit_of_measure: String,
    /// Per-store breakdown in selection order.
    pub contributing: Vec<ContributingRequest>,
}

impl AggregatedLineItem {
    /// IDs of the contributing stock requests, in order.
    #[must_use]
    pub fn contributing_ids(&self) -> Vec<StockRequestItemId> {
        self.contributing.iter().map(|c| c.request_item_id).collect()
    }

    /// Converts into a quotation line item draft carrying traceability.
    #[must_use]
    pub fn to_line_item_draft(&self) -> LineItemDraft {
        LineItemDraft::new(
            self.item_id.clone(),
            self.total_quantity,
            self.unit_of_measure.clone(),
        )
        .with_contributing(self.contributing_ids())
    }
}

/// Groups already-loaded stock requests.
///
/// Every item must be pending.
///
/// # Errors
///
/// Returns `DomainError::InvalidSelection` if an item is not pending or a
/// group mixes units of measure, and `DomainError::Arithmetic` if a sum
/// overflows.
pub fn aggregate(items: &[StockRequestItem]) -> DomainResult<Vec<AggregatedLineItem>> {
    let mut lines: Vec<AggregatedLineItem> = Vec::new();

    for item in items {
        if !item.is_pending() {
            return Err(DomainError::invalid_selection(format!(
                "stock request {} is {}, not pending",
                item.id(),
                item.status()
            )));
        }

        let contribution = ContributingRequest {
            store_id: item.store_id().clone(),
            request_item_id: item.id(),
            quantity: item.quantity(),
        };

        match lines.iter_mut().find(|l| &l.item_id == item.item_id()) {
            Some(line) => {
                if line.unit_of_measure != item.unit_of_measure() {
                    return Err(DomainError::invalid_selection(format!(
                        "item {} requested in both {} and {}",
                        item.item_id(),
                        line.unit_of_measure,
                        item.unit_of_measure()
                    )));
                }
                line.total_quantity = line.total_quantity.safe_add(item.quantity())?;
                line.contributing.push(contribution);
            }
            None => lines.push(AggregatedLineItem {
                item_id: item.item_id().clone(),
                total_quantity: item.quantity(),
                unit_of_measure: item.unit_of_measure().to_string(),
                contributing: vec![contribution],
            }),
        }
    }

    Ok(lines)
}

/// Loads and aggregates selected stock requests.
#[derive(Debug, Clone)]
pub struct StockRequestAggregator {
    repository: Arc<dyn StockRequestRepository>,
}

impl StockRequestAggregator {
    /// Creates a new aggregator.
    #[must_use]
    pub fn new(repository: Arc<dyn StockRequestRepository>) -> Self {
        Self { repository }
    }

    /// Aggregates the selected pending stock requests.
    ///
    /// Repeated IDs count once.
    ///
    /// # Errors
    ///
    /// Returns a domain `InvalidSelection` error if the selection is empty,
    /// names an unknown request, or names a request that is not pending.
    pub async fn aggregate_pending(
        &self,
        ids: &[StockRequestItemId],
    ) -> ApplicationResult<Vec<AggregatedLineItem>> {
        let mut seen = HashSet::with_capacity(ids.len());
        let unique: Vec<StockRequestItemId> =
            ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        if unique.is_empty() {
            return Err(DomainError::invalid_selection("no stock requests selected").into());
        }

        let items = self.repository.get_many(&unique).await?;
        if items.len() != unique.len() {
            let found: HashSet<StockRequestItemId> =
                items.iter().map(StockRequestItem::id).collect();
            let missing: Vec<String> = unique
                .iter()
                .filter(|id| !found.contains(id))
                .map(ToString::to_string)
                .collect();
            return Err(DomainError::invalid_selection(format!(
                "unknown stock requests: {}",
                missing.join(", ")
            ))
            .into());
        }

        let lines = aggregate(&items)?;
        debug!(
            requests = unique.len(),
            lines = lines.len(),
            "stock requests aggregated"
        );
        Ok(lines)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{QuotationId, Timestamp};
    use crate::infrastructure::persistence::InMemoryStockRequestRepository;
    use rust_decimal::{Decimal, dec};

    fn request(store: &str, item: &str, qty: Decimal, uom: &str) -> StockRequestItem {
        StockRequestItem::new(
            StoreId::new(store),
            ItemId::new(item),
            Quantity::new(qty).unwrap(),
            uom,
            Timestamp::from_secs(100).unwrap(),
        )
        .unwrap()
    }

    mod grouping {
        use super::*;

        #[test]
        fn sums_by_item_in_first_seen_order() {
            let items = vec![
                request("s1", "rice", dec!(10), "kg"),
                request("s2", "oil", dec!(3), "l"),
                request("s3", "rice", dec!(2.5), "kg"),
            ];
            let lines = aggregate(&items).unwrap();

            assert_eq!(lines.len(), 2);
            assert_eq!(lines[0].item_id.as_str(), "rice");
            assert_eq!(lines[0].total_quantity.get(), dec!(12.5));
            assert_eq!(lines[0].contributing.len(), 2);
            assert_eq!(lines[0].contributing[0].store_id.as_str(), "s1");
            assert_eq!(lines[0].contributing[1].store_id.as_str(), "s3");
            assert_eq!(lines[1].item_id.as_str(), "oil");
        }

        #[test]
        fn mixed_units_are_rejected() {
            let items = vec![
                request("s1", "rice", dec!(10), "kg"),
                request("s2", "rice", dec!(10), "bag"),
            ];
            assert!(matches!(
                aggregate(&items),
                Err(DomainError::InvalidSelection(_))
            ));
        }

        #[test]
        fn non_pending_is_rejected() {
            let mut quoted = request("s1", "rice", dec!(1), "kg");
            quoted
                .mark_quoted(QuotationId::new_v4(), Timestamp::from_secs(200).unwrap())
                .unwrap();
            assert!(matches!(
                aggregate(&[quoted]),
                Err(DomainError::InvalidSelection(_))
            ));
        }

        #[test]
        fn draft_carries_contributing_ids() {
            let a = request("s1", "rice", dec!(1), "kg");
            let b = request("s2", "rice", dec!(2), "kg");
            let lines = aggregate(&[a.clone(), b.clone()]).unwrap();
            let draft = lines[0].to_line_item_draft();

            assert_eq!(draft.requested_quantity.get(), dec!(3));
            assert_eq!(draft.contributing_request_item_ids, vec![a.id(), b.id()]);
        }
    }

    mod loading {
        use super::*;

        async fn seeded(items: &[StockRequestItem]) -> StockRequestAggregator {
            let repo = InMemoryStockRequestRepository::new();
            for item in items {
                repo.save(item).await.unwrap();
            }
            StockRequestAggregator::new(Arc::new(repo))
        }

        #[tokio::test]
        async fn unknown_id_is_invalid_selection() {
            let a = request("s1", "rice", dec!(1), "kg");
            let aggregator = seeded(std::slice::from_ref(&a)).await;

            let err = aggregator
                .aggregate_pending(&[a.id(), StockRequestItemId::new_v4()])
                .await
                .unwrap_err();
            assert!(matches!(
                err.as_domain(),
                Some(DomainError::InvalidSelection(_))
            ));
        }

        #[tokio::test]
        async fn empty_selection_is_invalid() {
            let aggregator = seeded(&[]).await;
            assert!(aggregator.aggregate_pending(&[]).await.is_err());
        }

        #[tokio::test]
        async fn repeated_ids_count_once_and_output_is_stable() {
            let a = request("s1", "rice", dec!(4), "kg");
            let b = request("s2", "rice", dec!(6), "kg");
            let aggregator = seeded(&[a.clone(), b.clone()]).await;

            let first = aggregator
                .aggregate_pending(&[a.id(), b.id(), a.id()])
                .await
                .unwrap();
            let second = aggregator.aggregate_pending(&[a.id(), b.id()]).await.unwrap();

            assert_eq!(first, second);
            assert_eq!(first[0].total_quantity.get(), dec!(10));
        }
    }
}
