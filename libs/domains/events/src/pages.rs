//! Server-rendered HTML pages.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Page handlers never answer with the JSON error body: a missing event gets
//! the HTML 404 page and any other failure the HTML error page.

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::error::{EventError, Result};
use crate::media::MediaUploader;
use crate::models::{Event, SIMILAR_EVENTS_LIMIT};
use crate::repository::EventRepository;
use crate::service::EventService;

/// Preset tag chips on the create form
pub const POPULAR_TAGS: &[&str] = &[
    "React",
    "Next.js",
    "TypeScript",
    "TailwindCSS",
    "Node.js",
    "GraphQL",
    "AI",
    "Web3",
    "DevOps",
    "Cloud",
];

/// Preset agenda chips on the create form
pub const POPULAR_AGENDA: &[&str] = &[
    "Keynote",
    "Workshop",
    "Panel Discussion",
    "Networking",
    "Lunch Break",
    "Q&A",
    "Closing Ceremony",
    "Hackathon",
];

const EVENT_MODES: &[&str] = &["online", "offline", "hybrid"];

const TEMPLATES: &[(&str, &str)] = &[
    ("layout", include_str!("templates/layout.hbs")),
    ("event_card", include_str!("templates/event_card.hbs")),
    ("index", include_str!("templates/index.hbs")),
    ("create", include_str!("templates/create.hbs")),
    ("detail", include_str!("templates/detail.hbs")),
    ("not_found", include_str!("templates/not_found.hbs")),
    ("error", include_str!("templates/error.hbs")),
];

#[derive(Debug, Serialize)]
struct EventCard {
    title: String,
    slug: String,
    image: String,
    location: String,
    date: String,
    time: String,
    mode: String,
}

impl From<&Event> for EventCard {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            slug: event.slug.clone(),
            image: event.image.clone(),
            location: event.location.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            mode: event.mode.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct EventDetail {
    title: String,
    description: String,
    overview: String,
    image: String,
    venue: String,
    location: String,
    date: String,
    time: String,
    mode: String,
    audience: String,
    organizer: String,
    agenda: Vec<String>,
    tags: Vec<String>,
}

impl From<Event> for EventDetail {
    fn from(event: Event) -> Self {
        Self {
            mode: event.mode.to_string(),
            title: event.title,
            description: event.description,
            overview: event.overview,
            image: event.image,
            venue: event.venue,
            location: event.location,
            date: event.date,
            time: event.time,
            audience: event.audience,
            organizer: event.organizer,
            agenda: event.agenda,
            tags: event.tags,
        }
    }
}

#[derive(Serialize)]
struct IndexPage {
    page_title: &'static str,
    canonical_url: String,
    events: Vec<EventCard>,
}

#[derive(Serialize)]
struct CreatePage {
    page_title: &'static str,
    canonical_url: String,
    modes: &'static [&'static str],
    popular_tags: &'static [&'static str],
    popular_agenda: &'static [&'static str],
}

#[derive(Serialize)]
struct DetailPage {
    page_title: String,
    canonical_url: String,
    event: EventDetail,
    similar: Vec<EventCard>,
}

#[derive(Serialize)]
struct MessagePage {
    page_title: &'static str,
    canonical_url: String,
    message: String,
}

/// Handlebars registry plus the public base URL used for canonical links
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
    base_url: String,
}

impl PageRenderer {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut handlebars = Handlebars::new();

        for (name, source) in TEMPLATES {
            handlebars
                .register_template_string(name, *source)
                .map_err(|e| {
                    EventError::Internal(format!("Failed to register template {}: {}", name, e))
                })?;
        }

        Ok(Self {
            handlebars,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn canonical(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        self.handlebars
            .render(template, data)
            .map_err(|e| EventError::Internal(format!("Failed to render {}: {}", template, e)))
    }

    fn page<T: Serialize>(&self, status: StatusCode, template: &str, data: &T) -> Response {
        match self.render(template, data) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                error!(error = %e, "Page rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }

    fn not_found(&self, path: &str, message: String) -> Response {
        let data = MessagePage {
            page_title: "Not Found",
            canonical_url: self.canonical(path),
            message,
        };
        self.page(StatusCode::NOT_FOUND, "not_found", &data)
    }

    fn server_error(&self, path: &str, err: &EventError) -> Response {
        error!(error = %err, path, "Page failed to load");
        let data = MessagePage {
            page_title: "Error",
            canonical_url: self.canonical(path),
            message: String::new(),
        };
        self.page(StatusCode::INTERNAL_SERVER_ERROR, "error", &data)
    }
}

struct PagesState<R: EventRepository, M: MediaUploader> {
    service: Arc<EventService<R, M>>,
    renderer: PageRenderer,
}

/// HTML routes: `/`, `/events/create`, `/events/{slug}` and an HTML 404
/// fallback for everything else.
pub fn router<R, M>(service: Arc<EventService<R, M>>, renderer: PageRenderer) -> Router
where
    R: EventRepository + 'static,
    M: MediaUploader + 'static,
{
    let state = Arc::new(PagesState { service, renderer });

    Router::new()
        .route("/", get(index_page))
        .route("/events/create", get(create_page))
        .route("/events/{slug}", get(detail_page))
        .fallback(not_found_page)
        .with_state(state)
}

#[instrument(skip(state))]
async fn index_page<R: EventRepository, M: MediaUploader>(
    State(state): State<Arc<PagesState<R, M>>>,
) -> Response {
    let renderer = &state.renderer;

    match state.service.list_all().await {
        Ok(events) => {
            let data = IndexPage {
                page_title: "Events",
                canonical_url: renderer.canonical("/"),
                events: events.iter().map(EventCard::from).collect(),
            };
            renderer.page(StatusCode::OK, "index", &data)
        }
        Err(e) => renderer.server_error("/", &e),
    }
}

async fn create_page<R: EventRepository, M: MediaUploader>(
    State(state): State<Arc<PagesState<R, M>>>,
) -> Response {
    let data = CreatePage {
        page_title: "Create Event",
        canonical_url: state.renderer.canonical("/events/create"),
        modes: EVENT_MODES,
        popular_tags: POPULAR_TAGS,
        popular_agenda: POPULAR_AGENDA,
    };
    state.renderer.page(StatusCode::OK, "create", &data)
}

#[instrument(skip(state))]
async fn detail_page<R: EventRepository, M: MediaUploader>(
    State(state): State<Arc<PagesState<R, M>>>,
    Path(slug): Path<String>,
) -> Response {
    let renderer = &state.renderer;
    let path = format!("/events/{}", slug);

    let event = match state.service.find_by_slug(&slug).await {
        Ok(event) => event,
        Err(e @ EventError::NotFound(_)) => return renderer.not_found(&path, e.to_string()),
        Err(e) => return renderer.server_error(&path, &e),
    };

    let similar = state
        .service
        .find_similar_by_slug(&slug, SIMILAR_EVENTS_LIMIT)
        .await;
    if similar.is_soft_failure() {
        debug!(?similar, "Rendering without similar events");
    }

    let data = DetailPage {
        page_title: event.title.clone(),
        canonical_url: renderer.canonical(&path),
        similar: similar.into_events().iter().map(EventCard::from).collect(),
        event: event.into(),
    };
    renderer.page(StatusCode::OK, "detail", &data)
}

async fn not_found_page<R: EventRepository, M: MediaUploader>(
    State(state): State<Arc<PagesState<R, M>>>,
    uri: Uri,
) -> Response {
    state
        .renderer
        .not_found(uri.path(), "The page you are looking for does not exist.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::event;

    fn renderer() -> PageRenderer {
        PageRenderer::new("https://evently.test/").unwrap()
    }

    #[test]
    fn test_all_templates_register() {
        let renderer = renderer();
        assert_eq!(renderer.base_url, "https://evently.test");
        for (name, _) in TEMPLATES {
            assert!(renderer.handlebars.has_template(name), "missing {}", name);
        }
    }

    #[test]
    fn test_index_renders_cards_and_escapes() {
        let events = [event("<script>alert(1)</script> Conf", &["AI"]), event("Cloud Day", &["Cloud"])];
        let data = IndexPage {
            page_title: "Events",
            canonical_url: renderer().canonical("/"),
            events: events.iter().map(EventCard::from).collect(),
        };

        let html = renderer().render("index", &data).unwrap();
        assert!(html.contains(r#"<link rel="canonical" href="https://evently.test/">"#));
        assert!(html.contains(r#"href="/events/cloud-day""#));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_detail_renders_empty_similar_message() {
        let source = event("AI Summit", &["AI", "Web3"]);
        let data = DetailPage {
            page_title: source.title.clone(),
            canonical_url: renderer().canonical("/events/ai-summit"),
            similar: Vec::new(),
            event: source.into(),
        };

        let html = renderer().render("detail", &data).unwrap();
        assert!(html.contains("Similar Events You Might Like"));
        assert!(html.contains("No similar events found."));
        assert!(html.contains("<li>Keynote</li>"));
        assert!(html.contains("Be the first to book"));
        assert!(html.contains("Thank you for signing up"));
    }

    #[test]
    fn test_create_page_lists_presets() {
        let data = CreatePage {
            page_title: "Create Event",
            canonical_url: renderer().canonical("/events/create"),
            modes: EVENT_MODES,
            popular_tags: POPULAR_TAGS,
            popular_agenda: POPULAR_AGENDA,
        };

        let html = renderer().render("create", &data).unwrap();
        assert!(html.contains(r#"data-value="TailwindCSS""#));
        assert!(html.contains(r#"data-value="Closing Ceremony""#));
        assert!(html.contains(r#"<option value="hybrid">"#));
        assert!(html.contains("Please select at least one tag"));
    }
}
