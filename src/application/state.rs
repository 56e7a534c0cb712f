// src/application/state.rs
//
// Application state: the long-lived infrastructure built once at startup
// and shared by reference with everything that needs it.

use log::info;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{create_connection_pool, get_connection, initialize_database, verify_database_integrity};
use crate::error::AppResult;
use crate::integrations::{GeminiClient, HttpRemoteStore, MetadataEnricher};
use crate::repositories::{LocalStore, SqliteLocalStore};
use crate::services::PersistenceGateway;

pub struct AppState {
    pub gateway: Arc<PersistenceGateway>,
    pub enricher: Arc<dyn MetadataEnricher>,
}

impl AppState {
    /// Open the local database, then wire the gateway and the enricher
    ///
    /// Without a remote URL the gateway starts (and stays) in local-fallback.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let pool = Arc::new(create_connection_pool(&config.database_path)?);
        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
            verify_database_integrity(&conn)?;
        }
        info!("Local store at {}", config.database_path.display());

        let local: Arc<dyn LocalStore> =
            Arc::new(SqliteLocalStore::with_key(pool, config.storage_key.clone()));

        let gateway = match &config.remote_url {
            Some(url) => {
                info!("Remote store at {}", url);
                let remote = HttpRemoteStore::new(url.clone(), config.request_timeout)?;
                PersistenceGateway::new(Arc::new(remote), local)
            }
            None => {
                info!("No remote store configured, using local store only");
                PersistenceGateway::local_only(local)
            }
        };

        let enricher = GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.request_timeout,
        )?;

        Ok(Self {
            gateway: Arc::new(gateway),
            enricher: Arc::new(enricher),
        })
    }
}
