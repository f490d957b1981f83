pub mod message;
pub mod uri;
pub mod utils;

use anyhow::{Context, Result};
use log::info;
use rdkafka::producer::FutureProducer;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

pub use message::OutboundMessage;
pub use uri::BrokerUri;

/// Sends one payload to a topic and reports the id the message was published under.
pub trait Publisher {
    fn publish(&self, topic: &str, payload: &[u8]) -> impl Future<Output = Result<Uuid>> + Send;
}

#[derive(Clone)]
pub struct KafkaPublisher {
    pub producer: FutureProducer,
}

impl KafkaPublisher {
    pub fn new(producer: FutureProducer) -> Self {
        KafkaPublisher { producer }
    }

    /// Builds a producer for `uri` and waits up to `timeout` for the cluster to answer.
    ///
    /// The producer waits for all in-sync replicas and is idempotent, so an acknowledged
    /// message survives a broker restart. `message_timeout` bounds how long a single
    /// publish may wait for its delivery report.
    pub fn connect(uri: &BrokerUri, timeout: Duration, message_timeout: Duration) -> Result<Self> {
        info!("Connecting producer to {}", uri.bootstrap_servers());
        let producer: FutureProducer = uri
            .client_config()
            .set("acks", "all")
            .set("enable.idempotence", "true")
            .set("message.timeout.ms", message_timeout.as_millis().to_string())
            .create()
            .context("failed to create producer")?;

        utils::check_connection(&producer, timeout)
            .with_context(|| format!("broker {} unreachable", uri.bootstrap_servers()))?;

        Ok(KafkaPublisher::new(producer))
    }
}

impl Publisher for KafkaPublisher {
    fn publish(&self, topic: &str, payload: &[u8]) -> impl Future<Output = Result<Uuid>> + Send {
        let producer = self.producer.clone();
        let topic = topic.to_string();
        let message = OutboundMessage::new(payload);
        async move {
            utils::publish_message(&producer, &topic, &message).await?;
            Ok(message.id)
        }
    }
}
