//! Domain events announced after a card mutation commits.

use std::sync::Mutex;

use proto::eventbus::{
    self, cards_events_service_client::CardsEventsServiceClient,
};
use tokio::runtime::Handle;
use tonic::{transport::Channel, Request};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    CardMoved {
        card_id: String,
        board_id: String,
        old_column_id: String,
        new_column_id: String,
        new_position: i32,
    },
    CardUpdated {
        card_id: String,
        board_id: String,
        updated_fields: Vec<String>,
    },
}

pub trait EventSink: Send + Sync {
    /// Delivery is fire-and-forget; a failure never reaches the caller.
    fn publish(&self, event: DomainEvent);
}

/// Forwards events to the event bus service.
#[derive(Clone)]
pub struct EventBusPublisher {
    client: CardsEventsServiceClient<Channel>,
    runtime: Handle,
}

impl EventBusPublisher {
    pub fn new(client: CardsEventsServiceClient<Channel>, runtime: Handle) -> Self {
        Self { client, runtime }
    }
}

impl EventSink for EventBusPublisher {
    fn publish(&self, event: DomainEvent) {
        let mut service = self.client.clone();
        self.runtime.spawn(async move {
            let result = match event {
                DomainEvent::CardMoved {
                    card_id,
                    board_id,
                    old_column_id,
                    new_column_id,
                    new_position,
                } => {
                    debug!(%card_id, "publishing card moved event");
                    service
                        .card_moved(Request::new(eventbus::CardMovedEvent {
                            card_id,
                            board_id,
                            old_column_id,
                            new_column_id,
                            new_position,
                        }))
                        .await
                }
                DomainEvent::CardUpdated {
                    card_id,
                    board_id,
                    updated_fields,
                } => {
                    debug!(%card_id, "publishing card updated event");
                    service
                        .card_updated(Request::new(eventbus::CardUpdatedEvent {
                            card_id,
                            board_id,
                            updated_fields,
                        }))
                        .await
                }
            };
            if let Err(status) = result {
                warn!(code = ?status.code(), message = status.message(), "event bus delivery failed");
            }
        });
    }
}

/// Keeps published events in memory, for tests and local runs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: DomainEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
