use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    Error, Res,
    api::AccessToken,
    info,
    monthly::{self, PlaylistSource},
    server::AppState,
    types::MonthlyPlaylistPreview,
};

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub identifier: String,
    /// `id` or `url`, as sent by the front-end source picker.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Month buckets of the requested source. Nothing is written to Spotify.
pub async fn preview(
    State(state): State<AppState>,
    AccessToken(token): AccessToken,
    WithRejection(Query(query), _): WithRejection<Query<PreviewQuery>, Error>,
) -> Res<Json<Vec<MonthlyPlaylistPreview>>> {
    let source = PlaylistSource::parse_with_kind(&query.identifier, query.kind.as_deref())?;
    info!("Building monthly preview for {}", source);

    let previews = monthly::preview_source(&state.spotify(&token), &source).await?;
    Ok(Json(previews))
}
