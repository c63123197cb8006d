use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Res,
    api::AccessToken,
    monthly::{PlaylistSource, SyncOptions, sync_monthly_playlists},
    server::AppState,
    types::{MonthlyPlaylistRequest, SyncOutcome},
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMonthlyPlaylistsRequest {
    pub playlists: Vec<MonthlyPlaylistRequest>,
    pub identifier: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub covers: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMonthlyPlaylistsResponse {
    pub message: String,
    pub playlists: Vec<SyncOutcome>,
}

/// Creates or tops up one playlist per requested month.
///
/// The identifier is validated before anything is fetched. A failure part
/// way through returns the error; months already processed keep their
/// changes.
pub async fn create_monthly_playlists(
    State(state): State<AppState>,
    AccessToken(token): AccessToken,
    WithRejection(Json(body), _): WithRejection<Json<CreateMonthlyPlaylistsRequest>, Error>,
) -> Res<Json<CreateMonthlyPlaylistsResponse>> {
    let source = PlaylistSource::parse_with_kind(&body.identifier, body.kind.as_deref())?;
    let options = SyncOptions {
        covers: body.covers.unwrap_or(SyncOptions::default().covers),
    };

    let outcomes =
        sync_monthly_playlists(&state.spotify(&token), &body.playlists, &source, options).await?;

    Ok(Json(CreateMonthlyPlaylistsResponse {
        message: format!("Processed {} monthly playlists.", outcomes.len()),
        playlists: outcomes,
    }))
}
