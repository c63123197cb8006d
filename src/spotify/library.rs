use crate::{
    Res,
    spotify::{SpotifyClient, paginate},
    types::{Page, Playlist, SavedItem, UserProfile},
};

const SAVED_TRACKS_PAGE: u32 = 50;
const PLAYLISTS_PAGE: u32 = 50;

pub(super) async fn current_user(client: &SpotifyClient) -> Res<UserProfile> {
    client.get_json(client.endpoint("me")).await
}

/// Retrieves every saved track of the user.
///
/// Walks `/me/tracks` in pages of 50, the maximum the endpoint allows.
pub(super) async fn saved_tracks(client: &SpotifyClient) -> Res<Vec<SavedItem>> {
    let first = format!(
        "{}?limit={}",
        client.endpoint("me/tracks"),
        SAVED_TRACKS_PAGE
    );
    paginate::drain(first, move |url| client.get_json::<Page<SavedItem>>(url)).await
}

pub(super) async fn saved_tracks_total(client: &SpotifyClient) -> Res<u64> {
    let url = format!("{}?limit=1", client.endpoint("me/tracks"));
    let page: Page<SavedItem> = client.get_json(url).await?;
    Ok(page.total.unwrap_or(0))
}

/// Lists all playlists the user owns or follows, in Spotify's listing order.
///
/// Spotify occasionally returns `null` in place of a playlist it can no
/// longer resolve; those entries are dropped.
pub(super) async fn user_playlists(client: &SpotifyClient) -> Res<Vec<Playlist>> {
    let first = format!(
        "{}?limit={}",
        client.endpoint("me/playlists"),
        PLAYLISTS_PAGE
    );
    let entries =
        paginate::drain(first, move |url| client.get_json::<Page<Option<Playlist>>>(url)).await?;
    Ok(entries.into_iter().flatten().collect())
}
