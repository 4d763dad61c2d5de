use mongodb::{Database, bson::doc};

use super::{MongoConnector, MongoError};

/// Run a `ping` command against the database
///
/// # Example
/// ```ignore
/// let db = connector.acquire().await?;
/// ping(&db).await?;
/// ```
pub async fn ping(database: &Database) -> Result<(), MongoError> {
    database
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| MongoError::ConnectionFailed(e.to_string()))
}

/// Check MongoDB health through the connector.
///
/// Returns `false` when no connection can be acquired or the ping fails.
pub async fn check_health(connector: &MongoConnector) -> bool {
    match connector.acquire().await {
        Ok(database) => ping(&database).await.is_ok(),
        Err(_) => false,
    }
}
