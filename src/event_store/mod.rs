// region:    --- Imports
use crate::auction::events::LotEvent;
use crate::error::AppError;
use crate::ids::TenantId;
use crate::message_broker::KafkaProducer;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Event Model
/// Envelope persisted in the `events` table and published to the broker.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub tenant_id: i64,
    pub aggregate_type: String,
    pub aggregate_id: i64,
    pub event_type: String,
    pub data: serde_json::Value,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Aggregate version the event produced; unique per aggregate.
    pub version: i64,
}

impl Event {
    pub fn new(tenant: TenantId, event: &LotEvent, version: i64) -> Result<Self, AppError> {
        let data = serde_json::to_value(event)
            .map_err(|e| AppError::Broker(format!("event serialization failed: {e}")))?;
        Ok(Self {
            id: 0,
            tenant_id: tenant.0,
            aggregate_type: event.aggregate_type().to_string(),
            aggregate_id: event.aggregate_id(),
            event_type: event.event_type().to_string(),
            data,
            timestamp: event.timestamp(),
            version,
        })
    }

    pub fn decode(&self) -> Result<LotEvent, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}
// endregion: --- Event Model

// region:    --- Event Store Trait
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn append_and_publish_event(&self, event: Event) -> Result<(), AppError>;
}

/// Record an event for a command that already committed. Failures are logged only:
/// the state change stands whether or not the notification goes out.
pub async fn record_event(
    event_store: &dyn EventStore,
    tenant: TenantId,
    event: LotEvent,
    version: i64,
) {
    let event_type = event.event_type();
    let result = match Event::new(tenant, &event, version) {
        Ok(envelope) => event_store.append_and_publish_event(envelope).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        warn!(
            "{:<12} --> {} not recorded for tenant {}: {}",
            "EventStore", event_type, tenant, e
        );
    }
}

// endregion: --- Event Store Trait

// region:    --- Postgres Event Store
pub struct PostgresEventStore {
    pool: Arc<PgPool>,
    kafka_producer: Arc<KafkaProducer>,
    topic: String,
}

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn append_and_publish_event(&self, event: Event) -> Result<(), AppError> {
        let event_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO events (tenant_id, aggregate_type, aggregate_id, event_type, data, timestamp, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (aggregate_type, aggregate_id, version) DO NOTHING
            RETURNING id",
        )
        .bind(event.tenant_id)
        .bind(&event.aggregate_type)
        .bind(event.aggregate_id)
        .bind(&event.event_type)
        .bind(&event.data)
        .bind(event.timestamp)
        .bind(event.version)
        .fetch_optional(&*self.pool)
        .await?;

        let Some(event_id) = event_id else {
            warn!(
                "{:<12} --> {} {} v{} already recorded",
                "EventStore", event.aggregate_type, event.aggregate_id, event.version
            );
            return Ok(());
        };

        let stored = Event {
            id: event_id,
            ..event
        };
        let payload = serde_json::to_string(&stored)
            .map_err(|e| AppError::Broker(format!("event serialization failed: {e}")))?;

        self.kafka_producer
            .send_message(&self.topic, &stored.aggregate_id.to_string(), &payload)
            .await
            .map_err(AppError::Broker)?;

        info!(
            "{:<12} --> {} #{} published",
            "EventStore", stored.event_type, stored.id
        );
        Ok(())
    }
}

impl PostgresEventStore {
    pub fn new(pool: Arc<PgPool>, kafka_producer: Arc<KafkaProducer>, topic: String) -> Self {
        Self {
            pool,
            kafka_producer,
            topic,
        }
    }
}

// endregion: --- Postgres Event Store

// region:    --- Memory Event Store
/// Keeps events in process; same duplicate-version rule as the table's unique key.
#[derive(Default)]
pub struct MemoryEventStore {
    events: Mutex<Vec<Event>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<Event> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append_and_publish_event(&self, mut event: Event) -> Result<(), AppError> {
        let mut events = self.events.lock().await;
        let duplicate = events.iter().any(|e| {
            e.aggregate_type == event.aggregate_type
                && e.aggregate_id == event.aggregate_id
                && e.version == event.version
        });
        if !duplicate {
            event.id = events.len() as i64 + 1;
            events.push(event);
        }
        Ok(())
    }
}

// endregion: --- Memory Event Store
