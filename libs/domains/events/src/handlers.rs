use axum::{
    Json, Router,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError,
    errors::responses::{
        BadRequestResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::Result;
use crate::forms::EventFormData;
use crate::media::MediaUploader;
use crate::models::{
    EVENT_CREATED, EVENT_FETCHED, EVENTS_FETCHED, EventEnvelope, EventListEnvelope, EventMode,
    EventResponse,
};
use crate::repository::EventRepository;
use crate::service::EventService;

/// OpenAPI documentation for the Events API
#[derive(OpenApi)]
#[openapi(
    paths(create_event, list_events, get_event),
    components(
        schemas(
            CreateEventForm,
            EventResponse,
            EventEnvelope,
            EventListEnvelope,
            EventMode
        ),
        responses(
            BadRequestResponse,
            BadRequestValidationResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Events", description = "Event listing and creation (MongoDB + Cloudinary)")
    )
)]
pub struct ApiDoc;

/// Multipart body accepted by `POST /api/events`
#[derive(ToSchema)]
#[allow(dead_code)]
struct CreateEventForm {
    title: String,
    description: String,
    overview: String,
    venue: String,
    location: String,
    date: String,
    time: String,
    mode: EventMode,
    audience: String,
    organizer: String,
    /// JSON array of strings, e.g. `["AI","Web3"]`
    #[schema(example = "[\"AI\",\"Web3\"]")]
    tags: String,
    /// JSON array of strings, e.g. `["Keynote","Q&A"]`
    #[schema(example = "[\"Keynote\",\"Q&A\"]")]
    agenda: String,
    /// Banner image
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Create the events router with all HTTP endpoints
pub fn router<R, M>(service: Arc<EventService<R, M>>) -> Router
where
    R: EventRepository + 'static,
    M: MediaUploader + 'static,
{
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/{slug}", get(get_event))
        .with_state(service)
}

/// Create an event from a multipart form
#[utoipa::path(
    post,
    path = "",
    tag = "Events",
    request_body(content = CreateEventForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Event created successfully", body = EventEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_event<R: EventRepository, M: MediaUploader>(
    State(service): State<Arc<EventService<R, M>>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<impl IntoResponse, AppError> {
    let (input, image) = EventFormData::read(multipart?).await?.into_parts()?;
    let event = service.create(input, image).await?;

    Ok((
        StatusCode::CREATED,
        Json(EventEnvelope::new(EVENT_CREATED, event)),
    ))
}

/// List all events, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Events",
    responses(
        (status = 200, description = "Events fetched successfully", body = EventListEnvelope),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_events<R: EventRepository, M: MediaUploader>(
    State(service): State<Arc<EventService<R, M>>>,
) -> Result<Json<EventListEnvelope>> {
    let events = service.list_all().await?;
    Ok(Json(EventListEnvelope::new(EVENTS_FETCHED, events)))
}

/// Get an event by slug
#[utoipa::path(
    get,
    path = "/{slug}",
    tag = "Events",
    params(
        ("slug" = String, Path, description = "Event slug")
    ),
    responses(
        (status = 200, description = "Event fetched successfully", body = EventEnvelope),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event<R: EventRepository, M: MediaUploader>(
    State(service): State<Arc<EventService<R, M>>>,
    Path(slug): Path<String>,
) -> Result<Json<EventEnvelope>> {
    let event = service.find_by_slug(&slug).await?;
    Ok(Json(EventEnvelope::new(EVENT_FETCHED, event)))
}
