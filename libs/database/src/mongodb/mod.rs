//! MongoDB database connector and utilities
//!
//! Provides lazy connection management and MongoDB-specific helpers.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE, MongoConfig};
pub use connector::{MongoConnector, MongoError, connect_from_config};
pub use health::{check_health, ping};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database, bson};
