use mongodb::{Client, Database, options::ClientOptions};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

use super::MongoConfig;

/// Error type for MongoDB operations
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB configuration error: {0}")]
    Configuration(String),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Build a client from `config` and return a handle to the resolved database.
///
/// The driver connects lazily; the first operation on the returned handle
/// performs server selection within the configured timeouts.
///
/// # Example
/// ```ignore
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "evently");
/// let db = connect_from_config(&config).await?;
/// ```
pub async fn connect_from_config(config: &MongoConfig) -> Result<Database, MongoError> {
    let url = config.url.as_deref().ok_or_else(|| {
        MongoError::Configuration(
            "MongoDB connection string is not set (MONGODB_URI, MONGODB_URL or MONGO_URL)"
                .to_string(),
        )
    })?;

    let mut options = ClientOptions::parse(url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let database = config.resolve_database(options.default_database.as_deref());
    let client = Client::with_options(options)?;

    info!(database = %database, "MongoDB client created");
    Ok(client.database(&database))
}

/// Process-wide, lazily opened MongoDB handle.
///
/// The first call to [`acquire`](Self::acquire) builds the client; concurrent
/// first callers wait on the same in-flight initialization, so at most one
/// client is ever opened. A failed initialization is not cached and the next
/// caller tries again. Hold one connector per process (usually behind an
/// `Arc` in application state).
#[derive(Debug)]
pub struct MongoConnector {
    config: MongoConfig,
    database: OnceCell<Database>,
    clients_opened: AtomicUsize,
}

impl MongoConnector {
    pub fn new(config: MongoConfig) -> Self {
        Self {
            config,
            database: OnceCell::new(),
            clients_opened: AtomicUsize::new(0),
        }
    }

    /// Connector around an already open database handle
    pub fn from_database(database: Database) -> Self {
        Self {
            config: MongoConfig::default(),
            database: OnceCell::new_with(Some(database)),
            clients_opened: AtomicUsize::new(1),
        }
    }

    /// Returns the shared database handle, opening the client on first use.
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Result<Database, MongoError> {
        self.database
            .get_or_try_init(|| async {
                let database = connect_from_config(&self.config).await.inspect_err(|e| {
                    warn!(error = %e, "MongoDB initialization failed");
                })?;
                self.clients_opened.fetch_add(1, Ordering::SeqCst);
                Ok(database)
            })
            .await
            .cloned()
    }

    /// Whether a client has been opened
    pub fn is_connected(&self) -> bool {
        self.database.initialized()
    }

    /// Number of clients opened over the connector's lifetime (0 or 1)
    pub fn clients_opened(&self) -> usize {
        self.clients_opened.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &MongoConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_acquire_without_url_is_configuration_error() {
        let connector = MongoConnector::new(MongoConfig::default());

        let err = connector.acquire().await.unwrap_err();
        assert!(matches!(err, MongoError::Configuration(_)));
        assert!(!connector.is_connected());

        // Failure is not memoized; the next call reports it again
        let err = connector.acquire().await.unwrap_err();
        assert!(matches!(err, MongoError::Configuration(_)));
        assert_eq!(connector.clients_opened(), 0);
    }

    #[tokio::test]
    async fn test_acquire_invalid_url_is_mongo_error() {
        let connector = MongoConnector::new(MongoConfig::new("not-a-mongo-uri"));

        let err = connector.acquire().await.unwrap_err();
        assert!(matches!(err, MongoError::Mongo(_)));
    }

    #[tokio::test]
    async fn test_acquire_resolves_database_name() {
        let connector = MongoConnector::new(MongoConfig::new("mongodb://127.0.0.1:27017/from_uri"));
        assert_eq!(connector.acquire().await.unwrap().name(), "from_uri");

        let connector = MongoConnector::new(MongoConfig::new("mongodb://127.0.0.1:27017"));
        assert_eq!(connector.acquire().await.unwrap().name(), "evently");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_callers_share_one_client() {
        let connector = Arc::new(MongoConnector::new(MongoConfig::with_database(
            "mongodb://127.0.0.1:27017",
            "evently_test",
        )));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let connector = Arc::clone(&connector);
                tokio::spawn(async move { connector.acquire().await.map(|db| db.name().to_string()) })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "evently_test");
        }

        assert!(connector.is_connected());
        assert_eq!(connector.clients_opened(), 1);
    }
}
