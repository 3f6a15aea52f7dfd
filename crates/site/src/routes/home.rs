//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use rmt_core::MediaKind;

use crate::filters;
use crate::models::{MediaItem, Product};
use crate::state::AppState;

/// Images shown in the home gallery strip.
const GALLERY_SIZE: usize = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Featured products in display order.
    pub featured: Vec<Product>,
    /// Newest uploaded video, played in the hero.
    pub hero_video: Option<MediaItem>,
    /// Newest uploaded images.
    pub gallery: Vec<MediaItem>,
}

/// Pick the hero video and gallery images out of a newest-first media list.
fn pick_home_media(media: Vec<MediaItem>) -> (Option<MediaItem>, Vec<MediaItem>) {
    let mut hero_video = None;
    let mut gallery = Vec::with_capacity(GALLERY_SIZE);

    for item in media {
        match item.resource_type {
            MediaKind::Video if hero_video.is_none() => hero_video = Some(item),
            MediaKind::Image if gallery.len() < GALLERY_SIZE => gallery.push(item),
            _ => {}
        }
    }

    (hero_video, gallery)
}

/// Display the home page.
///
/// Store failures are logged and render as empty sections.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let featured = state.products().list_featured().await.unwrap_or_else(|e| {
        tracing::error!("Failed to load featured products: {e}");
        Vec::new()
    });

    let media = state.media().list().await.unwrap_or_else(|e| {
        tracing::error!("Failed to load media: {e}");
        Vec::new()
    });
    let (hero_video, gallery) = pick_home_media(media);

    HomeTemplate {
        featured,
        hero_video,
        gallery,
    }
}
