//! Outbound order events.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::events::OrderEvent;

pub type DynEventPublisher = Arc<dyn EventPublisher + Send + Sync>;

/// Fire-and-forget: publishing never fails the operation that raised the event.
#[async_trait]
pub trait EventPublisher {
    async fn publish(&self, event: OrderEvent);
}

pub struct NatsPublisher {
    client: async_nats::Client,
}

impl NatsPublisher {
    pub fn new(client: async_nats::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EventPublisher for NatsPublisher {
    async fn publish(&self, event: OrderEvent) {
        let payload = match serde_json::to_vec(&event) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("Failed to encode {:?}: {}", event, err);
                return;
            }
        };
        if let Err(err) = self.client.publish(event.subject().to_string(), payload.into()).await {
            warn!("Failed to publish to {}: {}", event.subject(), err);
        }
    }
}

/// Used when no broker is configured.
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, event: OrderEvent) {
        debug!("No event broker configured, dropping {}", event.subject());
    }
}
