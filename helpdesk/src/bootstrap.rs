//! Infrastructure setup.
//!
//! [`Resources::from_config`] turns a [`Config`] into the ticket store and
//! classifier the HTTP layer needs:
//!
//! 1. Connect to `PostgreSQL` (and run migrations) when `DATABASE_URL` is set,
//!    otherwise fall back to the in-memory store
//! 2. Build the inference provider (Anthropic, or unconfigured without a key)
//! 3. Wrap the provider in a [`Classifier`]

use crate::config::Config;
use crate::provider::build_provider;
use crate::server::AppState;
use anyhow::Context;
use helpdesk_core::{Classifier, Clock, InMemoryTicketStore, SystemClock, TicketStore};
use helpdesk_postgres::PostgresTicketStore;
use std::sync::Arc;
use tracing::info;

/// Shared application resources.
#[derive(Clone)]
pub struct Resources {
    /// Ticket persistence
    pub store: Arc<dyn TicketStore>,
    /// Label suggestions
    pub classifier: Arc<Classifier>,
}

impl Resources {
    /// Initialize every resource from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable or migrations fail.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = connect_store(config, clock).await?;

        let provider = build_provider(&config.classifier);
        let classifier = Arc::new(Classifier::new(
            provider,
            config.classifier.classifier_config(),
        ));

        Ok(Self { store, classifier })
    }

    /// Application state for the HTTP layer.
    #[must_use]
    pub fn into_state(self) -> AppState {
        AppState::new(self.store, self.classifier)
    }
}

async fn connect_store(config: &Config, clock: Arc<dyn Clock>) -> anyhow::Result<Arc<dyn TicketStore>> {
    let Some(url) = &config.database.url else {
        tracing::warn!("DATABASE_URL not set; tickets are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryTicketStore::new(clock)));
    };

    info!("Connecting to ticket database...");
    let store = PostgresTicketStore::connect(
        url,
        config.database.max_connections,
        config.database.connect_timeout(),
        clock,
    )
    .await
    .context("Failed to connect to ticket database")?;

    if config.database.run_migrations {
        info!("Running ticket migrations...");
        store
            .migrate()
            .await
            .context("Failed to run ticket migrations")?;
        info!("Ticket migrations complete");
    }

    info!("Ticket database connected");
    Ok(Arc::new(store))
}
