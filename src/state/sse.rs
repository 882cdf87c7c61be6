use tokio::sync::broadcast;

use crate::dto::sse::ServerEvent;

/// Broadcast hub fanning roster events out to every SSE subscriber.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events_sent_after_subscribing() {
        let hub = SseHub::new(4);
        hub.broadcast(ServerEvent {
            event: Some("lost".into()),
            data: "{}".into(),
        });

        let mut rx = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);
        hub.broadcast(ServerEvent {
            event: Some("roster.refreshed".into()),
            data: "{\"count\":1}".into(),
        });

        let event = rx.recv().await.expect("event");
        assert_eq!(event.event.as_deref(), Some("roster.refreshed"));
    }
}
