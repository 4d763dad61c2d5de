//! HTML pages, merged at the site root

use axum::Router;
use domain_events::{PageRenderer, pages};

use crate::state::AppState;

pub fn router(state: &AppState) -> eyre::Result<Router> {
    let renderer = PageRenderer::new(state.config.base_url.clone())?;
    Ok(pages::router(state.events.clone(), renderer))
}
