//! Events Domain
//!
//! Event listings backed by MongoDB, with banner images hosted on Cloudinary.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Request Flow                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  POST /api/events ─► forms ─► EventService ─┬─► MediaUploader│
//! │                                             │   (Cloudinary) │
//! │                                             └─► Repository   │
//! │                                                 (MongoDB)    │
//! │                                                              │
//! │  GET /, /events/{slug} ─► pages ─► EventService ─► Repository│
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! `tags` and `agenda` travel as JSON-encoded strings on the HTTP boundary
//! and are plain arrays everywhere else.

mod codec;
mod error;
mod forms;
pub mod handlers;
mod media;
mod models;
mod mongodb;
pub mod pages;
mod repository;
mod service;

pub use codec::{decode_string_list, encode_string_list};
pub use error::{EventError, Result};
pub use forms::{EventFormData, IMAGE_FIELD, IMAGE_REQUIRED};
pub use handlers::ApiDoc;
pub use media::{
    CloudinaryConfig, CloudinaryUploader, MediaUploader, UploadedMedia, sign_upload,
};
pub use models::{
    CreateEvent, EVENT_CREATED, EVENT_FETCHED, EVENTS_FETCHED, Event, EventEnvelope,
    EventListEnvelope, EventMode, EventResponse, SIMILAR_EVENTS_LIMIT, SimilarEvents, slugify,
};
pub use self::mongodb::MongoEventRepository;
pub use pages::PageRenderer;
pub use repository::{EventRepository, InMemoryEventRepository};
pub use service::EventService;
