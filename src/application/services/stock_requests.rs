//! # Stock Request Intake
//!
//! Stores raise per-item stock requests; admins list what is still pending
//! aggregation.

use crate::application::clock::Clock;
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::StockRequestItem;
use crate::domain::value_objects::{ItemId, Quantity, StockRequestItemId, StoreId};
use crate::infrastructure::persistence::StockRequestRepository;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// A store's request for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStockRequest {
    /// Requested item.
    pub item_id: ItemId,
    /// Requested quantity, must be positive.
    pub quantity: Decimal,
    /// Unit of measure.
    pub unit_of_measure: String,
}

impl NewStockRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(item_id: impl Into<String>, quantity: Decimal, unit_of_measure: impl Into<String>) -> Self {
        Self {
            item_id: ItemId::new(item_id),
            quantity,
            unit_of_measure: unit_of_measure.into(),
        }
    }
}

/// Stock request use cases.
#[derive(Debug, Clone)]
pub struct StockRequestService {
    repository: Arc<dyn StockRequestRepository>,
    clock: Arc<dyn Clock>,
}

impl StockRequestService {
    /// Creates a new service.
    #[must_use]
    pub fn new(repository: Arc<dyn StockRequestRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Raises a pending stock request on behalf of `store_id`.
    ///
    /// # Errors
    ///
    /// Returns a domain `InvalidQuantity` error unless the quantity is positive,
    /// and a validation error for a blank item or unit of measure.
    pub async fn raise(
        &self,
        store_id: StoreId,
        request: NewStockRequest,
    ) -> ApplicationResult<StockRequestItem> {
        let quantity = Quantity::new(request.quantity)?;
        let item = StockRequestItem::new(
            store_id,
            request.item_id,
            quantity,
            request.unit_of_measure,
            self.clock.now(),
        )?;
        self.repository.save(&item).await?;

        info!(
            stock_request_id = %item.id(),
            store_id = %item.store_id(),
            item_id = %item.item_id(),
            quantity = %item.quantity(),
            "stock request raised"
        );
        Ok(item)
    }

    /// Returns a stock request by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist.
    pub async fn get(&self, id: StockRequestItemId) -> ApplicationResult<StockRequestItem> {
        self.repository
            .get(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("StockRequestItem", id.to_string()))
    }

    /// Lists pending stock requests, oldest first.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn pending(&self) -> ApplicationResult<Vec<StockRequestItem>> {
        Ok(self.repository.find_pending().await?)
    }

    /// Lists the stock requests raised by one store, oldest first.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn for_store(&self, store_id: &StoreId) -> ApplicationResult<Vec<StockRequestItem>> {
        Ok(self.repository.find_by_store(store_id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::clock::ManualClock;
    use crate::domain::errors::ErrorKind;
    use crate::domain::value_objects::{StockRequestStatus, Timestamp};
    use crate::infrastructure::persistence::InMemoryStockRequestRepository;
    use rust_decimal::dec;

    fn service() -> StockRequestService {
        StockRequestService::new(
            Arc::new(InMemoryStockRequestRepository::new()),
            Arc::new(ManualClock::new(Timestamp::from_secs(1_000).unwrap())),
        )
    }

    #[tokio::test]
    async fn raised_request_is_pending() {
        let service = service();
        let item = service
            .raise(StoreId::new("s1"), NewStockRequest::new("rice", dec!(25), "kg"))
            .await
            .unwrap();

        assert_eq!(item.status(), StockRequestStatus::Pending);
        assert_eq!(service.pending().await.unwrap().len(), 1);
        assert_eq!(service.get(item.id()).await.unwrap(), item);
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let err = service()
            .raise(StoreId::new("s1"), NewStockRequest::new("rice", dec!(0), "kg"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn unknown_request_is_not_found() {
        let err = service().get(StockRequestItemId::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn for_store_filters_by_store() {
        let service = service();
        service
            .raise(StoreId::new("s1"), NewStockRequest::new("rice", dec!(1), "kg"))
            .await
            .unwrap();
        service
            .raise(StoreId::new("s2"), NewStockRequest::new("rice", dec!(2), "kg"))
            .await
            .unwrap();

        let mine = service.for_store(&StoreId::new("s2")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].quantity().get(), dec!(2));
    }
}
