//! Application state management.
//!
//! The state is cloned into each router (inexpensive Arc clones) and holds:
//! - Configuration
//! - The lazily-connecting MongoDB connector
//! - The events service

use database::mongodb::MongoConnector;
use domain_events::{CloudinaryUploader, EventService, MongoEventRepository};
use std::sync::Arc;

use crate::config::Config;

/// Events service as wired in production
pub type Events = EventService<MongoEventRepository, CloudinaryUploader>;

#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    /// Shared MongoDB connector; nothing connects until first use
    pub connector: Arc<MongoConnector>,
    pub events: Arc<Events>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let connector = Arc::new(MongoConnector::new(config.mongodb.clone()));
        let repository = MongoEventRepository::new(Arc::clone(&connector));
        let uploader = CloudinaryUploader::new(config.cloudinary.clone());

        Self {
            events: Arc::new(EventService::new(repository, uploader)),
            connector,
            config,
        }
    }
}
