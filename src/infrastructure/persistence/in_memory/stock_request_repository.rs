//! # In-Memory Stock Request Repository
//!
//! In-memory implementation of [`StockRequestRepository`].

use crate::domain::entities::StockRequestItem;
use crate::domain::value_objects::{StockRequestItemId, StoreId};
use crate::infrastructure::persistence::in_memory::{SharedStorage, Storage};
use crate::infrastructure::persistence::traits::{RepositoryResult, StockRequestRepository};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`StockRequestRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryStockRequestRepository {
    storage: SharedStorage,
}

impl InMemoryStockRequestRepository {
    /// Creates a new empty repository with its own storage.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(Arc::new(RwLock::new(Storage::default())))
    }

    pub(crate) fn with_storage(storage: SharedStorage) -> Self {
        Self { storage }
    }
}

impl Default for InMemoryStockRequestRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn oldest_first(items: &mut [StockRequestItem]) {
    items.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
}

#[async_trait]
impl StockRequestRepository for InMemoryStockRequestRepository {
    async fn save(&self, item: &StockRequestItem) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.stock_requests.insert(item.id(), item.clone());
        Ok(())
    }

    async fn get(&self, id: &StockRequestItemId) -> RepositoryResult<Option<StockRequestItem>> {
        let storage = self.storage.read().await;
        Ok(storage.stock_requests.get(id).cloned())
    }

    async fn get_many(
        &self,
        ids: &[StockRequestItemId],
    ) -> RepositoryResult<Vec<StockRequestItem>> {
        let storage = self.storage.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| storage.stock_requests.get(id).cloned())
            .collect())
    }

    async fn find_pending(&self) -> RepositoryResult<Vec<StockRequestItem>> {
        let storage = self.storage.read().await;
        let mut pending: Vec<StockRequestItem> = storage
            .stock_requests
            .values()
            .filter(|item| item.is_pending())
            .cloned()
            .collect();
        oldest_first(&mut pending);
        Ok(pending)
    }

    async fn find_by_store(&self, store_id: &StoreId) -> RepositoryResult<Vec<StockRequestItem>> {
        let storage = self.storage.read().await;
        let mut items: Vec<StockRequestItem> = storage
            .stock_requests
            .values()
            .filter(|item| item.store_id() == store_id)
            .cloned()
            .collect();
        oldest_first(&mut items);
        Ok(items)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.stock_requests.len() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ItemId, Quantity, QuotationId, Timestamp};
    use rust_decimal::dec;

    fn request(store: &str, secs: i64) -> StockRequestItem {
        StockRequestItem::new(
            StoreId::new(store),
            ItemId::new("A"),
            Quantity::new(dec!(2)).unwrap(),
            "kg",
            Timestamp::from_secs(secs).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn get_many_preserves_requested_order_and_skips_unknown() {
        let repo = InMemoryStockRequestRepository::new();
        let a = request("s1", 1);
        let b = request("s2", 2);
        repo.save(&a).await.unwrap();
        repo.save(&b).await.unwrap();

        let found = repo
            .get_many(&[b.id(), StockRequestItemId::new_v4(), a.id()])
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(StockRequestItem::id).collect();
        assert_eq!(ids, vec![b.id(), a.id()]);
    }

    #[tokio::test]
    async fn find_pending_excludes_quoted() {
        let repo = InMemoryStockRequestRepository::new();
        let pending = request("s1", 2);
        let mut quoted = request("s1", 1);
        quoted
            .mark_quoted(QuotationId::new_v4(), Timestamp::from_secs(3).unwrap())
            .unwrap();
        repo.save(&pending).await.unwrap();
        repo.save(&quoted).await.unwrap();

        let found = repo.find_pending().await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), pending.id());
    }

    #[tokio::test]
    async fn find_by_store_is_oldest_first() {
        let repo = InMemoryStockRequestRepository::new();
        let late = request("s1", 20);
        let early = request("s1", 10);
        repo.save(&late).await.unwrap();
        repo.save(&early).await.unwrap();
        repo.save(&request("s2", 5)).await.unwrap();

        let found = repo.find_by_store(&StoreId::new("s1")).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id(), early.id());
        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
