//! Composition root. Builds the speech service for the configured backend.
//!
//! This is the only place that imports concrete outbound adapters.

use std::sync::Arc;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    adapters::outbound::{memory::InMemorySpeechRepository, postgres::PostgresSpeechRepository},
    config::{DatabaseSettings, Settings, StorageBackend},
    domain::{ports::inbound::SpeechService, services::SpeechServiceImpl},
};

#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub async fn create_speech_service(
    settings: &Settings,
) -> Result<Arc<dyn SpeechService>, FactoryError> {
    match settings.storage.backend {
        StorageBackend::Postgres => {
            let pool = connect(&settings.database).await?;
            let repository = PostgresSpeechRepository::new(pool);
            Ok(Arc::new(SpeechServiceImpl::new(Arc::new(repository))))
        }
        StorageBackend::Memory => Ok(in_memory_speech_service()),
    }
}

pub fn in_memory_speech_service() -> Arc<dyn SpeechService> {
    let repository = InMemorySpeechRepository::new();
    Arc::new(SpeechServiceImpl::new(Arc::new(repository)))
}

async fn connect(settings: &DatabaseSettings) -> Result<PgPool, FactoryError> {
    tracing::info!(
        host = %settings.host,
        database = %settings.database_name,
        "connecting to postgres"
    );

    let pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_with(settings.with_db())
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
