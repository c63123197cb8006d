use axum::{Json, extract::State};

use crate::{
    Res,
    api::AccessToken,
    monthly::source::{LIKED_SONGS_ID, LIKED_SONGS_NAME},
    server::AppState,
    spotify::Catalog,
    types::{SimplifiedPlaylist, UserProfile},
};

/// Lists the sources a user can sort: Liked Songs first, then every
/// playlist in the order Spotify returns them.
pub async fn playlists(
    State(state): State<AppState>,
    AccessToken(token): AccessToken,
) -> Res<Json<Vec<SimplifiedPlaylist>>> {
    let spotify = state.spotify(&token);

    let user = spotify.current_user().await?;
    let liked_total = spotify.saved_tracks_total().await?;
    let playlists = spotify.user_playlists().await?;

    let mut listing = Vec::with_capacity(playlists.len() + 1);
    listing.push(SimplifiedPlaylist {
        id: LIKED_SONGS_ID.to_string(),
        name: LIKED_SONGS_NAME.to_string(),
        owner: user.display_name.unwrap_or(user.id),
        track_count: liked_total,
        image_url: None,
    });
    listing.extend(playlists.into_iter().map(SimplifiedPlaylist::from));

    Ok(Json(listing))
}

pub async fn user(
    State(state): State<AppState>,
    AccessToken(token): AccessToken,
) -> Res<Json<UserProfile>> {
    let profile = state.spotify(&token).current_user().await?;
    Ok(Json(profile))
}
