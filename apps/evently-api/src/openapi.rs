//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Evently API",
        version = "0.1.0",
        description = "Create, list and browse developer events",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/events", api = domain_events::ApiDoc)
    ),
    tags(
        (name = "Events", description = "Event listing and creation (MongoDB + Cloudinary)")
    )
)]
pub struct ApiDoc;
