use crate::message::OutboundMessage;
use crate::uri::BrokerUri;
use anyhow::Context;
use log::{debug, error, info, warn};
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::error::KafkaError;
use rdkafka::error::RDKafkaErrorCode;
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use std::time::Duration;

pub const MESSAGE_ID_HEADER: &str = "message_uuid";

pub async fn publish_message(
    producer: &FutureProducer,
    topic: &str,
    message: &OutboundMessage,
) -> Result<(), KafkaError> {
    let key = message.key();
    let headers = OwnedHeaders::new().insert(Header {
        key: MESSAGE_ID_HEADER,
        value: Some(key.as_str()),
    });
    let record = FutureRecord::to(topic)
        .key(key.as_str())
        .payload(message.payload.as_slice())
        .headers(headers);

    let produce_future = producer.send(record, Duration::from_secs(0));

    match produce_future.await {
        Ok(delivery) => {
            debug!("Message {key} delivered {:?}", delivery);
            Ok(())
        }
        Err(e) => {
            error!("Failed to enqueue message {key}: {:?}", e);
            Err(e.0)
        }
    }
}

/// Blocks until the cluster answers a metadata request, proving the producer can reach it.
pub fn check_connection(producer: &FutureProducer, timeout: Duration) -> Result<(), KafkaError> {
    let metadata = producer.client().fetch_metadata(None, timeout)?;
    info!(
        "Connected to cluster: {} broker(s), {} topic(s)",
        metadata.brokers().len(),
        metadata.topics().len()
    );
    Ok(())
}

/// Topic layout created at startup. With more than one replica, a write must reach at
/// least two of them before `acks=all` reports success.
pub fn topic_spec(topic: &str, partitions: i32, replication: i32) -> NewTopic<'_> {
    let spec = NewTopic::new(topic, partitions, TopicReplication::Fixed(replication))
        .set("cleanup.policy", "delete");
    if replication > 1 {
        spec.set("min.insync.replicas", "2")
    } else {
        spec
    }
}

/// Creates `topic` unless it already exists.
pub async fn ensure_topic(
    uri: &BrokerUri,
    topic: &str,
    partitions: i32,
    replication: i32,
) -> anyhow::Result<()> {
    let admin: AdminClient<DefaultClientContext> = uri
        .client_config()
        .create()
        .context("failed to create admin client")?;

    let spec = topic_spec(topic, partitions, replication);
    let results = admin
        .create_topics([&spec], &AdminOptions::new())
        .await
        .with_context(|| format!("create topic {topic}"))?;

    match results.into_iter().next() {
        Some(Ok(name)) => {
            info!("Created topic {name} ({partitions} partitions, {replication} replicas)")
        }
        Some(Err((name, RDKafkaErrorCode::TopicAlreadyExists))) => {
            info!("Topic already exists: {name}")
        }
        Some(Err((name, code))) => {
            return Err(KafkaError::AdminOp(code)).with_context(|| format!("create topic {name}"));
        }
        None => warn!("Broker returned no result for topic {topic}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_replica_topic_has_no_isr_floor() {
        let spec = topic_spec("example-topic", 1, 1);
        assert_eq!(spec.name, "example-topic");
        assert_eq!(spec.num_partitions, 1);
        assert_eq!(spec.config, vec![("cleanup.policy", "delete")]);
    }

    #[test]
    fn replicated_topic_requires_two_in_sync() {
        let spec = topic_spec("example-topic", 3, 3);
        assert!(spec.config.contains(&("min.insync.replicas", "2")));
    }
}
