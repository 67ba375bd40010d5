//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent failures that can occur during use case execution,
//! including business rule violations, authorization failures, lost
//! concurrency races and infrastructure errors.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)          - Business rule violations
//! ├── Repository(RepositoryError)  - Persistence failures
//! ├── Validation(String)           - Request limits and malformed input
//! ├── NotFound { .. }              - Unknown quotation or stock request
//! ├── Unauthorized { .. }          - Caller lacks the capability
//! ├── ConcurrentModification { .. }- Lost a race on the quotation aggregate
//! └── Internal(String)             - Unexpected failure
//! ```
//!
//! # Examples
//!
//! ```
//! use procurement_rfq::application::error::ApplicationError;
//! use procurement_rfq::domain::errors::ErrorKind;
//!
//! let err = ApplicationError::not_found("Quotation", "q-123");
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//!
//! let err = ApplicationError::concurrent_modification("q-123");
//! assert!(err.is_retryable());
//! ```

use crate::domain::errors::{DomainError, ErrorKind};
use crate::domain::value_objects::Role;
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error from business logic.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Persistence failure that is neither a lookup miss nor a lost race.
    #[error("repository error: {0}")]
    Repository(RepositoryError),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// Caller's role does not grant the requested action.
    #[error("unauthorized: {role} may not {action}")]
    Unauthorized {
        /// Caller role.
        role: Role,
        /// Attempted action.
        action: String,
    },

    /// Another writer committed to the same quotation first.
    #[error("concurrent modification of {id}; reload and retry")]
    ConcurrentModification {
        /// Contended aggregate.
        id: String,
    },

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(role: Role, action: impl Into<String>) -> Self {
        Self::Unauthorized {
            role,
            action: action.into(),
        }
    }

    /// Creates a concurrent modification error.
    #[must_use]
    pub fn concurrent_modification(id: impl Into<String>) -> Self {
        Self::ConcurrentModification { id: id.into() }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classifies this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => e.kind(),
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::ConcurrentModification { .. } => ErrorKind::StateConflict,
            Self::Repository(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns a stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
            Self::Repository(_) => "REPOSITORY_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if re-reading state and re-issuing the intent may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is an authorization error.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns the wrapped domain error, if any.
    #[must_use]
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity_type, id } => Self::not_found(entity_type, id),
            RepositoryError::VersionConflict { id, .. } | RepositoryError::StaleState { id, .. } => {
                Self::concurrent_modification(id)
            }
            other => Self::Repository(other),
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_keep_their_kind() {
        let err: ApplicationError = DomainError::QuotationStillOpen.into();
        assert_eq!(err.kind(), ErrorKind::StateConflict);
        assert_eq!(err.code(), "QUOTATION_STILL_OPEN");
        assert!(!err.is_retryable());
        assert!(err.as_domain().is_some());
    }

    #[test]
    fn version_conflict_becomes_concurrent_modification() {
        let err: ApplicationError =
            RepositoryError::version_conflict("Quotation", "q-1", 2, 3).into();
        assert!(matches!(err, ApplicationError::ConcurrentModification { .. }));
        assert_eq!(err.kind(), ErrorKind::StateConflict);
        assert!(err.is_retryable());
    }

    #[test]
    fn stale_state_becomes_concurrent_modification() {
        let err: ApplicationError =
            RepositoryError::stale_state("StockRequestItem", "s-1", "already quoted").into();
        assert!(err.is_retryable());
    }

    #[test]
    fn repository_not_found_maps_to_not_found() {
        let err: ApplicationError = RepositoryError::not_found("Quotation", "q-9").into();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("q-9"));
    }

    #[test]
    fn connection_failure_is_internal() {
        let err: ApplicationError = RepositoryError::connection("refused").into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.code(), "REPOSITORY_ERROR");
    }

    #[test]
    fn unauthorized_names_role_and_action() {
        let err = ApplicationError::unauthorized(Role::Retailer, "commit awards");
        assert!(err.is_unauthorized());
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(err.to_string().contains("RETAILER"));
        assert!(err.to_string().contains("commit awards"));
    }

    #[test]
    fn validation_is_not_retryable() {
        let err = ApplicationError::validation("too many line items");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!err.is_retryable());
    }
}
