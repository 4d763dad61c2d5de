//! Event Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{EventError, Result};
use crate::media::MediaUploader;
use crate::models::{CreateEvent, Event, SimilarEvents};
use crate::repository::EventRepository;

/// Event service: validation, image upload and persistence.
///
/// Creating an event uploads the banner before anything is written, so a
/// failed upload never leaves a record behind.
pub struct EventService<R: EventRepository, M: MediaUploader> {
    repository: Arc<R>,
    uploader: Arc<M>,
}

impl<R: EventRepository, M: MediaUploader> EventService<R, M> {
    pub fn new(repository: R, uploader: M) -> Self {
        Self {
            repository: Arc::new(repository),
            uploader: Arc::new(uploader),
        }
    }

    /// Validate, upload the image, then persist
    #[instrument(skip(self, input, image), fields(title = %input.title, image_size = image.len()))]
    pub async fn create(&self, input: CreateEvent, image: Vec<u8>) -> Result<Event> {
        input.validate()?;

        if image.is_empty() {
            return Err(EventError::BadRequest(
                crate::forms::IMAGE_REQUIRED.to_string(),
            ));
        }

        let media = self.uploader.upload(image).await?;
        let event = Event::new(input, media.url);

        let created = self.repository.create(event).await?;
        tracing::info!(slug = %created.slug, "Event created");
        Ok(created)
    }

    /// All events, newest first
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Event>> {
        self.repository.list_all().await
    }

    #[instrument(skip(self))]
    pub async fn find_by_slug(&self, slug: &str) -> Result<Event> {
        self.repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| EventError::NotFound(slug.to_string()))
    }

    /// Up to `limit` other events sharing a tag with the event at `slug`.
    ///
    /// Never fails: a missing source or a store error comes back as a soft
    /// failure the caller can render as "nothing similar".
    #[instrument(skip(self))]
    pub async fn find_similar_by_slug(&self, slug: &str, limit: usize) -> SimilarEvents {
        let source = match self.repository.find_by_slug(slug).await {
            Ok(Some(source)) => source,
            Ok(None) => return SimilarEvents::SourceMissing,
            Err(e) => {
                tracing::warn!(error = %e, "Similar events lookup failed");
                return SimilarEvents::LookupFailed(e.to_string());
            }
        };

        match self.repository.find_similar(&source, limit).await {
            Ok(events) => SimilarEvents::Found(events),
            Err(e) => {
                tracing::warn!(error = %e, "Similar events lookup failed");
                SimilarEvents::LookupFailed(e.to_string())
            }
        }
    }

    /// Readiness probe for the backing store
    pub async fn ping(&self) -> Result<()> {
        self.repository.ping().await
    }
}

impl<R: EventRepository, M: MediaUploader> Clone for EventService<R, M> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            uploader: Arc::clone(&self.uploader),
        }
    }
}
