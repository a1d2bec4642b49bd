//! Genre catalog handler.

use axum::Json;
use vsound_models::{genre_tracks, GenreTrack};

/// List every genre with its stock soundtrack URL.
pub async fn list_genres() -> Json<Vec<GenreTrack>> {
    Json(genre_tracks())
}
