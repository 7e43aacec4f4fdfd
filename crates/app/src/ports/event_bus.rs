//! Event bus port — where the registry reports registrations, state changes
//! and unloads.

use std::future::Future;

use coinflip_domain::error::CoinflipError;
use coinflip_domain::event::Event;

/// Sink for the registry's entity events.
pub trait EventPublisher: Send + Sync {
    /// Deliver one event to every current subscriber.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), CoinflipError>> + Send;

    /// Deliver a batch in order, stopping at the first failure.
    ///
    /// The registry gathers events while it holds its lock and hands them
    /// over here once the lock is released.
    fn publish_all(
        &self,
        events: Vec<Event>,
    ) -> impl Future<Output = Result<(), CoinflipError>> + Send {
        async move {
            for event in events {
                self.publish(event).await?;
            }
            Ok(())
        }
    }
}

impl<T: EventPublisher> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), CoinflipError>> + Send {
        (**self).publish(event)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use coinflip_domain::error::ValidationError;
    use coinflip_domain::event::EventType;

    /// Records events and refuses everything after `capacity`.
    struct BoundedSink {
        capacity: usize,
        seen: Mutex<Vec<EventType>>,
    }

    impl EventPublisher for BoundedSink {
        fn publish(
            &self,
            event: Event,
        ) -> impl Future<Output = Result<(), CoinflipError>> + Send {
            let mut seen = self.seen.lock().unwrap();
            let result = if seen.len() < self.capacity {
                seen.push(event.event_type);
                Ok(())
            } else {
                Err(ValidationError::EmptyName.into())
            };
            async move { result }
        }
    }

    fn event(event_type: EventType) -> Event {
        Event::new(event_type, None, serde_json::Value::Null)
    }

    #[tokio::test]
    async fn should_publish_batch_in_order() {
        let sink = BoundedSink {
            capacity: 8,
            seen: Mutex::default(),
        };

        sink.publish_all(vec![
            event(EventType::EntityRegistered),
            event(EventType::StateChanged),
        ])
        .await
        .unwrap();

        assert_eq!(
            *sink.seen.lock().unwrap(),
            vec![EventType::EntityRegistered, EventType::StateChanged]
        );
    }

    #[tokio::test]
    async fn should_stop_batch_at_first_failure() {
        let sink = BoundedSink {
            capacity: 1,
            seen: Mutex::default(),
        };

        let result = sink
            .publish_all(vec![
                event(EventType::StateChanged),
                event(EventType::StateChanged),
                event(EventType::EntityRemoved),
            ])
            .await;

        assert!(result.is_err());
        assert_eq!(*sink.seen.lock().unwrap(), vec![EventType::StateChanged]);
    }

    #[tokio::test]
    async fn should_forward_batches_through_arc() {
        let sink = std::sync::Arc::new(BoundedSink {
            capacity: 8,
            seen: Mutex::default(),
        });

        sink.publish_all(vec![event(EventType::EntityRemoved)])
            .await
            .unwrap();

        assert_eq!(sink.seen.lock().unwrap().len(), 1);
    }
}
