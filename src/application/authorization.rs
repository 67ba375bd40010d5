//! # Caller Authorization
//!
//! Role checks wrap every engine call instead of living inside the state
//! machine. The identity layer asserts a [`Caller`]; each use case names the
//! [`Action`] it performs and [`authorize`] either lets it through or returns
//! [`ApplicationError::Unauthorized`].
//!
//! | Role     | Actions                                                        |
//! |----------|----------------------------------------------------------------|
//! | Store    | raise and list own stock requests                              |
//! | Admin    | everything except responding to quotations                     |
//! | Retailer | view open quotations, save drafts and submit its own response  |

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::value_objects::{ActorId, RetailerId, Role, StoreId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticated caller as asserted by the external identity layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caller {
    role: Role,
    id: ActorId,
}

impl Caller {
    /// Creates a caller.
    #[must_use]
    pub fn new(role: Role, id: impl Into<String>) -> Self {
        Self {
            role,
            id: ActorId::new(id),
        }
    }

    /// Creates an admin caller.
    #[must_use]
    pub fn admin(id: impl Into<String>) -> Self {
        Self::new(Role::Admin, id)
    }

    /// Creates a store caller.
    #[must_use]
    pub fn store(id: impl Into<String>) -> Self {
        Self::new(Role::Store, id)
    }

    /// Creates a retailer caller.
    #[must_use]
    pub fn retailer(id: impl Into<String>) -> Self {
        Self::new(Role::Retailer, id)
    }

    /// Returns the caller's role.
    #[inline]
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the caller's identity.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ActorId {
        &self.id
    }

    /// The caller's identity read as a store.
    #[must_use]
    pub fn store_id(&self) -> StoreId {
        StoreId::new(self.id.as_str())
    }

    /// The caller's identity read as a retailer.
    #[must_use]
    pub fn retailer_id(&self) -> RetailerId {
        RetailerId::new(self.id.as_str())
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.id)
    }
}

/// An engine operation subject to a capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Raise a stock request.
    RaiseStockRequest,
    /// List stock requests.
    ListStockRequests,
    /// Aggregate pending stock requests.
    AggregateStockRequests,
    /// Create a quotation.
    CreateQuotation,
    /// Publish a quotation.
    PublishQuotation,
    /// Close a quotation early.
    CloseQuotation,
    /// Cancel a quotation.
    CancelQuotation,
    /// Read the full quotation aggregate.
    ViewQuotation,
    /// Read the retailer-facing view of a quotation.
    ViewOpenQuotation,
    /// Store a draft response.
    SaveDraftResponse,
    /// Submit a response.
    SubmitResponse,
    /// Read submitted responses.
    ViewResponses,
    /// Build the award comparison.
    ViewComparison,
    /// Commit awards.
    CommitAwards,
}

impl Action {
    /// Roles permitted to perform this action.
    #[must_use]
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Self::RaiseStockRequest => &[Role::Store],
            Self::ListStockRequests => &[Role::Admin, Role::Store],
            Self::ViewOpenQuotation => &[Role::Admin, Role::Retailer],
            Self::SaveDraftResponse | Self::SubmitResponse => &[Role::Retailer],
            Self::AggregateStockRequests
            | Self::CreateQuotation
            | Self::PublishQuotation
            | Self::CloseQuotation
            | Self::CancelQuotation
            | Self::ViewQuotation
            | Self::ViewResponses
            | Self::ViewComparison
            | Self::CommitAwards => &[Role::Admin],
        }
    }

    /// Returns true if `role` may perform this action.
    #[must_use]
    pub fn permits(&self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RaiseStockRequest => "raise stock requests",
            Self::ListStockRequests => "list stock requests",
            Self::AggregateStockRequests => "aggregate stock requests",
            Self::CreateQuotation => "create quotations",
            Self::PublishQuotation => "publish quotations",
            Self::CloseQuotation => "close quotations",
            Self::CancelQuotation => "cancel quotations",
            Self::ViewQuotation => "view quotations",
            Self::ViewOpenQuotation => "view open quotations",
            Self::SaveDraftResponse => "save draft responses",
            Self::SubmitResponse => "submit responses",
            Self::ViewResponses => "view responses",
            Self::ViewComparison => "view award comparisons",
            Self::CommitAwards => "commit awards",
        };
        f.write_str(s)
    }
}

/// Checks that `caller` may perform `action`.
///
/// # Errors
///
/// Returns `ApplicationError::Unauthorized` if the caller's role lacks the
/// capability.
pub fn authorize(caller: &Caller, action: Action) -> ApplicationResult<()> {
    if action.permits(caller.role()) {
        Ok(())
    } else {
        Err(ApplicationError::unauthorized(
            caller.role(),
            action.to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_cannot_submit_responses() {
        let err = authorize(&Caller::admin("a1"), Action::SubmitResponse).unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn retailer_cannot_award_or_compare() {
        let retailer = Caller::retailer("r1");
        assert!(authorize(&retailer, Action::CommitAwards).is_err());
        assert!(authorize(&retailer, Action::ViewComparison).is_err());
        assert!(authorize(&retailer, Action::ViewResponses).is_err());
        assert!(authorize(&retailer, Action::SubmitResponse).is_ok());
    }

    #[test]
    fn only_stores_raise_stock_requests() {
        assert!(authorize(&Caller::store("s1"), Action::RaiseStockRequest).is_ok());
        assert!(authorize(&Caller::admin("a1"), Action::RaiseStockRequest).is_err());
        assert!(authorize(&Caller::retailer("r1"), Action::RaiseStockRequest).is_err());
    }

    #[test]
    fn admin_drives_the_lifecycle() {
        let admin = Caller::admin("a1");
        for action in [
            Action::AggregateStockRequests,
            Action::CreateQuotation,
            Action::PublishQuotation,
            Action::CloseQuotation,
            Action::CancelQuotation,
            Action::CommitAwards,
        ] {
            assert!(authorize(&admin, action).is_ok(), "{action}");
        }
    }

    #[test]
    fn caller_identity_reads_as_retailer() {
        let caller = Caller::retailer("acme");
        assert_eq!(caller.retailer_id().as_str(), "acme");
        assert_eq!(caller.to_string(), "RETAILER:acme");
    }
}
