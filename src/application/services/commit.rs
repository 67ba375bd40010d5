//! Shared steps of every quotation write: loading the aggregate and
//! publishing the events of a successful commit.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::Quotation;
use crate::domain::events::{DomainEvent, ProcurementEvent};
use crate::domain::value_objects::QuotationId;
use crate::infrastructure::events::EventPublisher;
use crate::infrastructure::persistence::QuotationRepository;
use tracing::{debug, warn};

/// Loads a quotation or fails with `NotFound`.
pub(crate) async fn load_quotation(
    repository: &dyn QuotationRepository,
    id: QuotationId,
) -> ApplicationResult<Quotation> {
    repository
        .get(&id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Quotation", id.to_string()))
}

/// Publishes events after a commit. Failures are logged, never returned.
pub(crate) async fn publish_events(publisher: &dyn EventPublisher, events: Vec<ProcurementEvent>) {
    for event in events {
        let name = event.event_name();
        let quotation_id = event.quotation_id();
        match publisher.publish(event).await {
            Ok(()) => debug!(event = name, %quotation_id, "event published"),
            Err(e) => warn!(event = name, %quotation_id, error = %e, "event publish failed"),
        }
    }
}
