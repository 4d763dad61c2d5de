//! Event domain models

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::codec::json_string_list;

pub const EVENT_CREATED: &str = "Event created successfully";
pub const EVENTS_FETCHED: &str = "Events fetched successfully";
pub const EVENT_FETCHED: &str = "Event fetched successfully";

/// Default number of similar events shown on a detail page
pub const SIMILAR_EVENTS_LIMIT: usize = 4;

/// Slugs taken by static page routes under `/events/`
pub const RESERVED_SLUGS: &[&str] = &["create"];

static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static slug regex"));

/// How attendees take part in an event
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventMode {
    Online,
    Offline,
    Hybrid,
}

/// Event entity
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    /// URL-safe identifier derived from the title, unique across events
    pub slug: String,
    pub description: String,
    pub overview: String,
    /// Hosted image URL returned by the media uploader
    pub image: String,
    pub venue: String,
    pub location: String,
    /// Display date as entered by the organizer
    pub date: String,
    /// Display time as entered by the organizer
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub organizer: String,
    pub agenda: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Build a new event from validated input and the hosted image URL
    pub fn new(input: CreateEvent, image: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::now_v7(),
            slug: slugify(&input.title),
            title: input.title,
            description: input.description,
            overview: input.overview,
            image,
            venue: input.venue,
            location: input.location,
            date: input.date,
            time: input.time,
            mode: input.mode,
            audience: input.audience,
            organizer: input.organizer,
            agenda: input.agenda,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this event shares at least one tag with `tags`
    pub fn shares_tag_with(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }
}

/// Input for creating an event.
///
/// Built from the multipart form; `tags` and `agenda` arrive already decoded.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    #[validate(
        length(min = 1, max = 200, message = "Title is required"),
        custom(function = "validate_sluggable")
    )]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Overview is required"))]
    pub overview: String,
    #[validate(length(min = 1, message = "Venue is required"))]
    pub venue: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,
    #[validate(length(min = 1, message = "Time is required"))]
    pub time: String,
    pub mode: EventMode,
    #[validate(length(min = 1, message = "Audience is required"))]
    pub audience: String,
    #[validate(length(min = 1, message = "Organizer is required"))]
    pub organizer: String,
    #[validate(length(min = 1, message = "At least one agenda item is required"))]
    pub agenda: Vec<String>,
    #[validate(length(min = 1, message = "At least one tag is required"))]
    pub tags: Vec<String>,
}

fn validate_sluggable(title: &str) -> Result<(), ValidationError> {
    let slug = slugify(title);
    if slug.is_empty() {
        let mut err = ValidationError::new("slug");
        err.message = Some("Title must contain at least one ASCII letter or digit (a-z, 0-9)".into());
        return Err(err);
    }
    if RESERVED_SLUGS.contains(&slug.as_str()) {
        let mut err = ValidationError::new("reserved_slug");
        err.message = Some(format!("Title '{}' is reserved, choose another", title.trim()).into());
        return Err(err);
    }
    Ok(())
}

/// Lowercase `title` and collapse every run of non-alphanumerics into `-`.
///
/// `"Rust Conf 2025: Async!"` becomes `"rust-conf-2025-async"`.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    SLUG_SEPARATORS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Event as returned by the JSON API.
///
/// `tags` and `agenda` are JSON-encoded strings on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    #[serde(with = "json_string_list")]
    #[schema(value_type = String, example = "[\"Keynote\",\"Q&A\"]")]
    pub agenda: Vec<String>,
    pub organizer: String,
    #[serde(with = "json_string_list")]
    #[schema(value_type = String, example = "[\"AI\",\"Web3\"]")]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            slug: event.slug,
            description: event.description,
            overview: event.overview,
            image: event.image,
            venue: event.venue,
            location: event.location,
            date: event.date,
            time: event.time,
            mode: event.mode,
            audience: event.audience,
            agenda: event.agenda,
            organizer: event.organizer,
            tags: event.tags,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// `{ message, event }` response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventEnvelope {
    pub message: String,
    pub event: EventResponse,
}

impl EventEnvelope {
    pub fn new(message: &str, event: Event) -> Self {
        Self {
            message: message.to_string(),
            event: event.into(),
        }
    }
}

/// `{ message, events }` response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventListEnvelope {
    pub message: String,
    pub events: Vec<EventResponse>,
}

impl EventListEnvelope {
    pub fn new(message: &str, events: Vec<Event>) -> Self {
        Self {
            message: message.to_string(),
            events: events.into_iter().map(EventResponse::from).collect(),
        }
    }
}

/// Outcome of a similar-events lookup.
///
/// The lookup never fails its caller; soft failures are tagged so they can be
/// told apart from an honest "no matches".
#[derive(Debug, Clone, PartialEq)]
pub enum SimilarEvents {
    /// Events sharing at least one tag with the source (possibly empty)
    Found(Vec<Event>),
    /// No event has the requested slug
    SourceMissing,
    /// The store failed; the reason is kept for logs and tests
    LookupFailed(String),
}

impl SimilarEvents {
    /// Matches, or an empty list for either soft failure
    pub fn into_events(self) -> Vec<Event> {
        match self {
            SimilarEvents::Found(events) => events,
            SimilarEvents::SourceMissing | SimilarEvents::LookupFailed(_) => Vec::new(),
        }
    }

    pub fn is_soft_failure(&self) -> bool {
        !matches!(self, SimilarEvents::Found(_))
    }
}
