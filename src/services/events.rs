//! Post-commit delivery of domain events
//!
//! Delivery is best-effort: a failing sink is logged and never reaches the
//! caller of the operation that produced the event.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{error::AppResult, models::notification::DomainEvent};

/// Destination for domain events
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: &DomainEvent) -> AppResult<()>;
}

#[derive(Clone)]
pub struct EventPublisher {
    sink: Arc<dyn EventSink>,
}

impl EventPublisher {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Deliver events in order, logging failures
    pub async fn publish_all(&self, events: Vec<DomainEvent>) {
        for event in &events {
            if let Err(e) = self.sink.publish(event).await {
                tracing::warn!(
                    kind = %event.kind(),
                    recipient = event.recipient(),
                    "Failed to dispatch event: {}",
                    e
                );
            }
        }
    }
}
