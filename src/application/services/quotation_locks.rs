//! # Quotation Locks
//!
//! Serializes writers per quotation inside one process. Each quotation gets
//! its own async mutex; writers to different quotations never wait on each
//! other. Readers do not take the lock.
//!
//! The repository's optimistic version check still applies, so writers in
//! other processes are caught as `ConcurrentModification`.

use crate::domain::value_objects::QuotationId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-quotation writer locks.
#[derive(Debug, Default)]
pub struct QuotationLocks {
    locks: DashMap<QuotationId, Arc<Mutex<()>>>,
}

impl QuotationLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive write access to `id`.
    ///
    /// The lock is released when the returned guard is dropped.
    pub async fn lock(&self, id: QuotationId) -> OwnedMutexGuard<()> {
        let mutex = Arc::clone(
            self.locks
                .entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        mutex.lock_owned().await
    }

    /// Number of quotations that have been locked at least once.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns true if no quotation has been locked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_quotation_is_exclusive() {
        let locks = Arc::new(QuotationLocks::new());
        let id = QuotationId::new_v4();

        let guard = locks.lock(id).await;
        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.lock(id).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        assert!(tokio::time::timeout(Duration::from_secs(1), contender).await.is_ok());
    }

    #[tokio::test]
    async fn different_quotations_do_not_block() {
        let locks = QuotationLocks::new();
        let _a = locks.lock(QuotationId::new_v4()).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.lock(QuotationId::new_v4()))
            .await;
        assert!(b.is_ok());
        assert_eq!(locks.len(), 2);
    }
}
