//! # In-Memory Quotation Repository
//!
//! In-memory implementation of [`QuotationRepository`].

use crate::domain::entities::{Quotation, StockRequestItem};
use crate::domain::value_objects::{QuotationId, QuotationStatus};
use crate::infrastructure::persistence::in_memory::stock_request_repository::InMemoryStockRequestRepository;
use crate::infrastructure::persistence::in_memory::{SharedStorage, Storage};
use crate::infrastructure::persistence::traits::{
    QuotationRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

const ENTITY: &str = "Quotation";

/// In-memory implementation of [`QuotationRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryQuotationRepository {
    storage: SharedStorage,
}

impl InMemoryQuotationRepository {
    /// Creates a new empty repository with its own storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Storage::default())),
        }
    }

    /// Returns a stock request repository backed by the same storage.
    #[must_use]
    pub fn stock_requests(&self) -> InMemoryStockRequestRepository {
        InMemoryStockRequestRepository::with_storage(Arc::clone(&self.storage))
    }
}

impl Default for InMemoryQuotationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuotationRepository for InMemoryQuotationRepository {
    async fn next_number(&self) -> RepositoryResult<u64> {
        let mut storage = self.storage.write().await;
        storage.quotation_sequence = storage
            .quotation_sequence
            .checked_add(1)
            .ok_or_else(|| RepositoryError::internal("quotation sequence exhausted"))?;
        Ok(storage.quotation_sequence)
    }

    async fn insert(&self, quotation: &Quotation) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if storage.quotations.contains_key(&quotation.id()) {
            return Err(RepositoryError::duplicate(ENTITY, quotation.id().to_string()));
        }
        if storage
            .quotations
            .values()
            .any(|q| q.number() == quotation.number())
        {
            return Err(RepositoryError::duplicate(ENTITY, quotation.number()));
        }
        storage.quotations.insert(quotation.id(), quotation.clone());
        Ok(())
    }

    async fn get(&self, id: &QuotationId) -> RepositoryResult<Option<Quotation>> {
        let storage = self.storage.read().await;
        Ok(storage.quotations.get(id).cloned())
    }

    async fn save(
        &self,
        quotation: &Quotation,
        expected_version: u64,
        stock_requests: &[StockRequestItem],
    ) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;

        let stored = storage
            .quotations
            .get(&quotation.id())
            .ok_or_else(|| RepositoryError::not_found(ENTITY, quotation.id().to_string()))?;
        if stored.version() != expected_version {
            return Err(RepositoryError::version_conflict(
                ENTITY,
                quotation.id().to_string(),
                expected_version,
                stored.version(),
            ));
        }

        for item in stock_requests {
            let current = storage.stock_requests.get(&item.id()).ok_or_else(|| {
                RepositoryError::not_found("StockRequestItem", item.id().to_string())
            })?;
            if !current.status().can_transition_to(item.status()) {
                return Err(RepositoryError::stale_state(
                    "StockRequestItem",
                    item.id().to_string(),
                    format!("stored status {} cannot become {}", current.status(), item.status()),
                ));
            }
        }

        for item in stock_requests {
            storage.stock_requests.insert(item.id(), item.clone());
        }
        storage.quotations.insert(quotation.id(), quotation.clone());
        Ok(())
    }

    async fn find_by_status(&self, status: QuotationStatus) -> RepositoryResult<Vec<Quotation>> {
        let storage = self.storage.read().await;
        let mut found: Vec<Quotation> = storage
            .quotations
            .values()
            .filter(|q| q.status() == status)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_on().cmp(&a.created_on()));
        Ok(found)
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Quotation>> {
        let storage = self.storage.read().await;
        let mut all: Vec<Quotation> = storage.quotations.values().cloned().collect();
        all.sort_by(|a, b| b.created_on().cmp(&a.created_on()));
        Ok(all)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.quotations.len() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::LineItemDraft;
    use crate::domain::value_objects::{
        ActorId, ItemId, Quantity, StockRequestStatus, StoreId, Timestamp,
    };
    use crate::infrastructure::persistence::traits::StockRequestRepository;
    use rust_decimal::dec;

    fn t0() -> Timestamp {
        Timestamp::from_secs(1_704_067_200).unwrap()
    }

    fn quotation(number: &str) -> Quotation {
        Quotation::builder(number, "test", ActorId::new("admin"), t0().add_days(1))
            .line_item(LineItemDraft::new(
                ItemId::new("A"),
                Quantity::new(dec!(1)).unwrap(),
                "kg",
            ))
            .build(t0())
            .unwrap()
    }

    #[tokio::test]
    async fn new_repository_is_empty() {
        let repo = InMemoryQuotationRepository::new();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn numbers_are_strictly_increasing() {
        let repo = InMemoryQuotationRepository::new();
        let a = repo.next_number().await.unwrap();
        let b = repo.next_number().await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[tokio::test]
    async fn insert_and_get() {
        let repo = InMemoryQuotationRepository::new();
        let q = quotation("QT-000001");
        repo.insert(&q).await.unwrap();
        assert_eq!(repo.get(&q.id()).await.unwrap(), Some(q));
    }

    #[tokio::test]
    async fn duplicate_number_rejected() {
        let repo = InMemoryQuotationRepository::new();
        repo.insert(&quotation("QT-000001")).await.unwrap();
        let err = repo.insert(&quotation("QT-000001")).await.unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn save_checks_version() {
        let repo = InMemoryQuotationRepository::new();
        let mut q = quotation("QT-000001");
        repo.insert(&q).await.unwrap();

        let loaded = q.version();
        q.publish(t0()).unwrap();
        repo.save(&q, loaded, &[]).await.unwrap();

        let err = repo.save(&q, loaded, &[]).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(
            repo.get(&q.id()).await.unwrap().unwrap().status(),
            QuotationStatus::Published
        );
    }

    #[tokio::test]
    async fn save_writes_stock_requests_atomically() {
        let repo = InMemoryQuotationRepository::new();
        let stock = repo.stock_requests();
        let mut request = StockRequestItem::new(
            StoreId::new("s1"),
            ItemId::new("A"),
            Quantity::new(dec!(1)).unwrap(),
            "kg",
            t0(),
        )
        .unwrap();
        stock.save(&request).await.unwrap();

        let mut q = quotation("QT-000001");
        repo.insert(&q).await.unwrap();
        let loaded = q.version();
        q.publish(t0()).unwrap();
        request.mark_quoted(q.id(), t0()).unwrap();
        repo.save(&q, loaded, std::slice::from_ref(&request))
            .await
            .unwrap();

        let stored = stock.get(&request.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), StockRequestStatus::Quoted);
    }

    #[tokio::test]
    async fn stale_stock_request_aborts_whole_commit() {
        let repo = InMemoryQuotationRepository::new();
        let stock = repo.stock_requests();
        let mut request = StockRequestItem::new(
            StoreId::new("s1"),
            ItemId::new("A"),
            Quantity::new(dec!(1)).unwrap(),
            "kg",
            t0(),
        )
        .unwrap();
        request.mark_quoted(crate::domain::value_objects::QuotationId::new_v4(), t0())
            .unwrap();
        stock.save(&request).await.unwrap();

        let mut q = quotation("QT-000002");
        repo.insert(&q).await.unwrap();
        let loaded = q.version();
        q.publish(t0()).unwrap();

        let err = repo
            .save(&q, loaded, std::slice::from_ref(&request))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::StaleState { .. }));
        assert_eq!(
            repo.get(&q.id()).await.unwrap().unwrap().status(),
            QuotationStatus::Draft
        );
    }

    #[tokio::test]
    async fn find_by_status_filters() {
        let repo = InMemoryQuotationRepository::new();
        let draft = quotation("QT-000001");
        let mut published = quotation("QT-000002");
        repo.insert(&draft).await.unwrap();
        repo.insert(&published).await.unwrap();
        let loaded = published.version();
        published.publish(t0()).unwrap();
        repo.save(&published, loaded, &[]).await.unwrap();

        let found = repo.find_by_status(QuotationStatus::Published).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].number(), "QT-000002");
        assert_eq!(repo.get_all().await.unwrap().len(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
