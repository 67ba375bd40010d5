//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! The quotation aggregate (quotation, line items, responses, awards) is
//! persisted as one unit. Stock request status flips caused by a quotation
//! transition are written in the same commit as the quotation itself, so a
//! stock request can never be marked quoted for a quotation that failed to
//! publish.
//!
//! # Available Repositories
//!
//! - [`QuotationRepository`]: Persistence for the quotation aggregate
//! - [`StockRequestRepository`]: Persistence for store stock requests
//!
//! # Examples
//!
//! ```ignore
//! use procurement_rfq::infrastructure::persistence::traits::QuotationRepository;
//!
//! async fn publish(repo: &impl QuotationRepository, mut q: Quotation) -> RepositoryResult<()> {
//!     let expected = q.version();
//!     q.publish(Timestamp::now())?;
//!     repo.save(&q, expected, &[]).await
//! }
//! ```

use crate::domain::entities::{Quotation, StockRequestItem};
use crate::domain::value_objects::{QuotationId, QuotationStatus, StockRequestItemId, StoreId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Optimistic locking conflict.
    #[error("Version conflict: {entity_type} with id {id} has been modified")]
    VersionConflict {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
        /// Expected version.
        expected: u64,
        /// Actual version.
        actual: u64,
    },

    /// A dependent entity changed underneath the commit.
    #[error("Stale state: {entity_type} with id {id}: {reason}")]
    StaleState {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
        /// What no longer holds.
        reason: String,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a version conflict error.
    #[must_use]
    pub fn version_conflict(
        entity_type: &'static str,
        id: impl Into<String>,
        expected: u64,
        actual: u64,
    ) -> Self {
        Self::VersionConflict {
            entity_type,
            id: id.into(),
            expected,
            actual,
        }
    }

    /// Creates a stale state error.
    #[must_use]
    pub fn stale_state(
        entity_type: &'static str,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::StaleState {
            entity_type,
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Returns true if a concurrent writer won the race.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. } | Self::StaleState { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for the quotation aggregate.
#[async_trait]
pub trait QuotationRepository: Send + Sync + fmt::Debug {
    /// Issues the next quotation sequence number.
    ///
    /// Numbers are unique and strictly increasing.
    async fn next_number(&self) -> RepositoryResult<u64>;

    /// Inserts a newly created quotation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the ID or number already exists.
    async fn insert(&self, quotation: &Quotation) -> RepositoryResult<()>;

    /// Gets a quotation by ID.
    ///
    /// Returns `None` if the quotation does not exist.
    async fn get(&self, id: &QuotationId) -> RepositoryResult<Option<Quotation>>;

    /// Atomically replaces a quotation and upserts the given stock requests.
    ///
    /// `expected_version` is the version the caller loaded. Each stock request
    /// must be a legal status successor of its stored state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the quotation does not exist.
    /// Returns `RepositoryError::VersionConflict` if the stored version differs
    /// from `expected_version`.
    /// Returns `RepositoryError::StaleState` if a stock request changed status
    /// since it was loaded.
    async fn save(
        &self,
        quotation: &Quotation,
        expected_version: u64,
        stock_requests: &[StockRequestItem],
    ) -> RepositoryResult<()>;

    /// Finds quotations with the given stored status.
    async fn find_by_status(&self, status: QuotationStatus) -> RepositoryResult<Vec<Quotation>>;

    /// Gets all quotations, newest first.
    async fn get_all(&self) -> RepositoryResult<Vec<Quotation>>;

    /// Counts all quotations.
    async fn count(&self) -> RepositoryResult<u64>;
}

/// Repository for store stock requests.
#[async_trait]
pub trait StockRequestRepository: Send + Sync + fmt::Debug {
    /// Saves a stock request, inserting or replacing it.
    async fn save(&self, item: &StockRequestItem) -> RepositoryResult<()>;

    /// Gets a stock request by ID.
    async fn get(&self, id: &StockRequestItemId) -> RepositoryResult<Option<StockRequestItem>>;

    /// Gets several stock requests, in the order of `ids`.
    ///
    /// Unknown IDs are skipped.
    async fn get_many(&self, ids: &[StockRequestItemId])
    -> RepositoryResult<Vec<StockRequestItem>>;

    /// Finds pending stock requests, oldest first.
    async fn find_pending(&self) -> RepositoryResult<Vec<StockRequestItem>>;

    /// Finds the stock requests raised by a store, oldest first.
    async fn find_by_store(&self, store_id: &StoreId) -> RepositoryResult<Vec<StockRequestItem>>;

    /// Counts all stock requests.
    async fn count(&self) -> RepositoryResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod repository_error {
        use super::*;

        #[test]
        fn not_found_error() {
            let err = RepositoryError::not_found("Quotation", "q-123");
            assert!(err.is_not_found());
            assert!(!err.is_duplicate());
            assert!(!err.is_conflict());
            assert!(err.to_string().contains("not found"));
            assert!(err.to_string().contains("Quotation"));
            assert!(err.to_string().contains("q-123"));
        }

        #[test]
        fn duplicate_error() {
            let err = RepositoryError::duplicate("Quotation", "QT-000001");
            assert!(err.is_duplicate());
            assert!(err.to_string().contains("Duplicate"));
        }

        #[test]
        fn version_conflict_is_conflict() {
            let err = RepositoryError::version_conflict("Quotation", "q-1", 3, 4);
            assert!(err.is_conflict());
            assert!(err.to_string().contains("conflict"));
        }

        #[test]
        fn stale_state_is_conflict() {
            let err = RepositoryError::stale_state("StockRequestItem", "s-1", "already quoted");
            assert!(err.is_conflict());
            assert!(err.to_string().contains("already quoted"));
        }

        #[test]
        fn internal_error() {
            let err = RepositoryError::internal("Unexpected state");
            assert!(err.to_string().contains("Internal"));
        }
    }
}
