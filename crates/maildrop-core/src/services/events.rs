/// Event publishing on top of a message broker
use crate::constants::{EVENT_ROUTING_KEY, LOG_TARGET_EVENTS};
use crate::error::MaildropError;
use crate::models::EventEnvelope;
use crate::services::broker::MessageBroker;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

/// Wraps events in the task envelope and publishes them to one exchange
pub struct EventPublisher {
    broker: Arc<dyn MessageBroker>,
    exchange: String,
}

impl EventPublisher {
    pub fn new(broker: Arc<dyn MessageBroker>, exchange: impl Into<String>) -> Self {
        Self {
            broker,
            exchange: exchange.into(),
        }
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Publishes `event_type` under a freshly generated task id
    pub async fn publish(
        &self,
        event_type: &str,
        args: Vec<Value>,
        fields: Map<String, Value>,
    ) -> Result<bool, MaildropError> {
        self.publish_envelope(&EventEnvelope::new(event_type, args, fields))
            .await
    }

    /// Publishes a prebuilt envelope
    ///
    /// Returns `Ok(true)` once the broker acknowledges. A missing
    /// acknowledgment means the message may not have been delivered and is
    /// reported as `MaildropError::Emit`.
    pub async fn publish_envelope(&self, envelope: &EventEnvelope) -> Result<bool, MaildropError> {
        let body = envelope.to_json()?;
        let event_type = envelope.event_type().unwrap_or_default();

        info!(
            target: LOG_TARGET_EVENTS,
            event_type = event_type,
            task_id = %envelope.id,
            resource_type = ?envelope.kwarg_str("resource_type"),
            resource_id = ?envelope.kwarg_str("resource_id"),
            user_id = ?envelope.kwarg_str("user_id"),
            "Emitting event"
        );

        let acked = self
            .broker
            .publish(&self.exchange, EVENT_ROUTING_KEY, &body)
            .await?;

        if !acked {
            info!(
                target: LOG_TARGET_EVENTS,
                event_type = event_type,
                task_id = %envelope.id,
                resource_type = ?envelope.kwarg_str("resource_type"),
                resource_id = ?envelope.kwarg_str("resource_id"),
                user_id = ?envelope.kwarg_str("user_id"),
                "Failure emitting event"
            );
            return Err(MaildropError::Emit(
                "Message may have failed to deliver".to_string(),
            ));
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::broker::MockMessageBroker;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_publish_sends_envelope_to_exchange() {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();

        let mut broker = MockMessageBroker::new();
        broker
            .expect_publish()
            .withf(|exchange, routing_key, _| exchange == "microservice-events" && routing_key.is_empty())
            .times(1)
            .returning(move |_, _, body| {
                *sink.lock().unwrap() = body.to_vec();
                Ok(true)
            });

        let publisher = EventPublisher::new(Arc::new(broker), "microservice-events");
        let mut fields = Map::new();
        fields.insert("resource_type".to_string(), Value::from("invoice"));

        let sent = publisher
            .publish("invoice_paid", vec![Value::from(7)], fields)
            .await
            .unwrap();
        assert!(sent);

        let body: Value = serde_json::from_slice(&captured.lock().unwrap()).unwrap();
        assert_eq!(body["task"], "microservice.event");
        assert_eq!(body["args"], serde_json::json!(["invoice_paid", 7]));
        assert_eq!(body["kwargs"]["resource_type"], "invoice");
        assert_eq!(body["kwargs"]["task_id"], body["id"]);
    }

    #[tokio::test]
    async fn test_publish_without_ack_is_emit_error() {
        let mut broker = MockMessageBroker::new();
        broker.expect_publish().times(1).returning(|_, _, _| Ok(false));

        let publisher = EventPublisher::new(Arc::new(broker), "microservice-events");
        let result = publisher.publish("send_email", vec![], Map::new()).await;

        assert!(matches!(result, Err(MaildropError::Emit(_))));
    }

    #[tokio::test]
    async fn test_broker_errors_propagate() {
        let mut broker = MockMessageBroker::new();
        broker
            .expect_publish()
            .returning(|_, _, _| Err(MaildropError::Timeout("5s".to_string())));

        let publisher = EventPublisher::new(Arc::new(broker), "microservice-events");
        let result = publisher.publish("send_email", vec![], Map::new()).await;

        assert!(matches!(result, Err(MaildropError::Timeout(_))));
    }
}
