// region:    --- Imports
use bidexpert_bidding::config::Config;
use bidexpert_bidding::database::DatabaseManager;
use bidexpert_bidding::event_store::PostgresEventStore;
use bidexpert_bidding::handlers::AppState;
use bidexpert_bidding::message_broker::KafkaManager;
use bidexpert_bidding::repository::PostgresRepository;
use bidexpert_bidding::routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

// endregion: --- Imports

const EVENT_TOPIC_PARTITIONS: i32 = 5;
const EVENT_TOPIC_REPLICATION: i32 = 1;

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    let db_manager = Arc::new(DatabaseManager::connect(&config).await?);
    if let Err(e) = db_manager.initialize_database(config.db_reset).await {
        error!("{:<12} --> Database initialization failed: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> Database ready", "Main");

    let kafka_manager = KafkaManager::new(&config.kafka_brokers)?;
    kafka_manager
        .create_topic(
            &config.events_topic,
            EVENT_TOPIC_PARTITIONS,
            EVENT_TOPIC_REPLICATION,
        )
        .await?;

    let state = AppState {
        repo: Arc::new(PostgresRepository::new(Arc::clone(&db_manager))),
        event_store: Arc::new(PostgresEventStore::new(
            db_manager.get_pool(),
            kafka_manager.get_producer(),
            config.events_topic.clone(),
        )),
        settings: config.bidding,
    };

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    if let Err(err) = axum::serve(listener, routes::router(state).into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
