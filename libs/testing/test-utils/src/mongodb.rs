//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that starts a MongoDB container for testing.

use database::mongodb::{MongoConfig, MongoConnector};
use std::sync::Arc;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let connector = mongo.connector("my_test_db");
/// let db = connector.acquire().await.unwrap();
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    pub url: String,
}

impl TestMongo {
    /// Start a MongoDB 7 container
    pub async fn new() -> Self {
        let container = Mongo::default()
            .with_tag("7")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let url = format!("mongodb://127.0.0.1:{}", host_port);

        tracing::info!(port = host_port, "Test MongoDB ready (mongo:7)");

        Self { container, url }
    }

    /// Connection config for `database` on this container
    pub fn config(&self, database: &str) -> MongoConfig {
        MongoConfig::with_database(self.url.clone(), database).with_app_name("test-utils")
    }

    /// Lazily-connecting connector scoped to `database`
    pub fn connector(&self, database: &str) -> Arc<MongoConnector> {
        Arc::new(MongoConnector::new(self.config(database)))
    }
}

impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_mongo_insert_find() {
        let mongo = TestMongo::new().await;
        let db = mongo.connector("test_utils").acquire().await.unwrap();
        let collection = db.collection::<mongodb::bson::Document>("smoke");

        collection.insert_one(doc! { "name": "ok" }).await.unwrap();
        let found = collection.find_one(doc! { "name": "ok" }).await.unwrap();

        assert!(found.is_some());
    }
}
