// region:    --- Imports
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::error::RDKafkaErrorCode;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

// endregion: --- Imports

// region:    --- Kafka Producer
#[derive(Clone)]
pub struct KafkaProducer {
    producer: Arc<FutureProducer>,
}

impl KafkaProducer {
    pub fn new(brokers: &str) -> Result<Self, String> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| format!("producer creation failed: {:?}", e))?;

        Ok(KafkaProducer {
            producer: Arc::new(producer),
        })
    }

    /// Publish one message keyed by aggregate id, so a lot's events keep their order.
    pub async fn send_message(&self, topic: &str, key: &str, value: &str) -> Result<(), String> {
        debug!("{:<12} --> topic={}, key={}", "Producer", topic, key);
        let record = FutureRecord::to(topic).key(key).payload(value);

        self.producer
            .send(record, Duration::from_secs(0))
            .await
            .map_err(|(e, _)| format!("error sending message: {:?}", e))?;

        Ok(())
    }
}

// endregion: --- Kafka Producer

// region:    --- Kafka Manager
pub struct KafkaManager {
    producer: Arc<KafkaProducer>,
    brokers: String,
}

impl KafkaManager {
    pub fn new(brokers: &str) -> Result<Self, String> {
        let producer = Arc::new(KafkaProducer::new(brokers)?);
        Ok(KafkaManager {
            producer,
            brokers: brokers.to_string(),
        })
    }

    pub fn get_producer(&self) -> Arc<KafkaProducer> {
        Arc::clone(&self.producer)
    }

    /// Create the topic; an already existing topic counts as success.
    pub async fn create_topic(
        &self,
        topic_name: &str,
        num_partitions: i32,
        replication_factor: i32,
    ) -> Result<(), String> {
        info!("{:<12} --> Creating topic {}", "Manager", topic_name);

        let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .create()
            .map_err(|e| format!("admin client creation failed: {:?}", e))?;

        let new_topic = NewTopic::new(
            topic_name,
            num_partitions,
            TopicReplication::Fixed(replication_factor),
        );

        let results = admin_client
            .create_topics(&[new_topic], &AdminOptions::new())
            .await
            .map_err(|e| {
                error!("{:<12} --> Topic creation failed: {:?}", "Manager", e);
                format!("topic creation failed: {:?}", e)
            })?;

        for result in results {
            match result {
                Ok(name) => info!("{:<12} --> Topic {} created", "Manager", name),
                Err((name, RDKafkaErrorCode::TopicAlreadyExists)) => {
                    info!("{:<12} --> Topic {} already exists", "Manager", name)
                }
                Err((name, code)) => {
                    error!("{:<12} --> Topic {} failed: {:?}", "Manager", name, code);
                    return Err(format!("topic {} creation failed: {:?}", name, code));
                }
            }
        }

        Ok(())
    }
}

// endregion: --- Kafka Manager
