/// AMQP message broker
use crate::constants::{EVENT_CONTENT_ENCODING, EVENT_CONTENT_TYPE, PERSISTENT_DELIVERY_MODE};
use crate::error::MaildropError;
use crate::models::BrokerConfig;
use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, ConfirmSelectOptions};
use lapin::{BasicProperties, Connection, ConnectionProperties};
use std::time::Duration;
use tracing::{debug, warn};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Publishes one message and returns whether the broker acknowledged it
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        body: &[u8],
    ) -> Result<bool, MaildropError>;
}

/// Publishes over a fresh AMQP connection per message
///
/// Nothing is pooled: every publish connects, opens a channel with publisher
/// confirms, publishes, and closes the connection again.
pub struct AmqpBroker {
    url: String,
    service_name: String,
    timeout: Duration,
}

impl AmqpBroker {
    pub fn new(url: impl Into<String>, service_name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            service_name: service_name.into(),
            timeout,
        }
    }

    pub fn from_config(config: &BrokerConfig) -> Self {
        Self::new(&config.url, &config.service_name, config.timeout())
    }

    /// JSON, UTF-8 and persistent, stamped with the service name
    fn message_properties(&self) -> BasicProperties {
        BasicProperties::default()
            .with_content_type(EVENT_CONTENT_TYPE.into())
            .with_content_encoding(EVENT_CONTENT_ENCODING.into())
            .with_delivery_mode(PERSISTENT_DELIVERY_MODE)
            .with_app_id(self.service_name.clone().into())
    }

    async fn publish_once(
        &self,
        exchange: &str,
        routing_key: &str,
        body: &[u8],
    ) -> Result<bool, MaildropError> {
        let properties =
            ConnectionProperties::default().with_connection_name(self.service_name.clone().into());
        let connection = Connection::connect(&self.url, properties).await?;

        let channel = connection.create_channel().await?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await?;

        let confirmation = channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                body,
                self.message_properties(),
            )
            .await?
            .await?;

        if let Err(e) = connection.close(200, "OK").await {
            warn!(error = %e, "Failed to close broker connection cleanly");
        }

        debug!(
            exchange = exchange,
            bytes = body.len(),
            acked = confirmation.is_ack(),
            "Published message"
        );
        Ok(confirmation.is_ack())
    }
}

#[async_trait]
impl MessageBroker for AmqpBroker {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        body: &[u8],
    ) -> Result<bool, MaildropError> {
        tokio::time::timeout(self.timeout, self.publish_once(exchange, routing_key, body))
            .await
            .map_err(|_| {
                MaildropError::Timeout(format!(
                    "Publishing to exchange '{}' took longer than {:?}",
                    exchange, self.timeout
                ))
            })?
    }
}
