//! Database library providing the MongoDB connector used by the services
//! in this workspace.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB support
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All features
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, MongoConnector};
//!
//! let connector = MongoConnector::new(MongoConfig::from_env()?);
//!
//! // Nothing is opened until the first caller needs the database
//! let db = connector.acquire().await?;
//! let events = db.collection::<Document>("events");
//! ```

#[cfg(feature = "mongodb")]
pub mod mongodb;
