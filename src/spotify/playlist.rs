use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::{
    Error, Res,
    spotify::{MAX_ITEMS_PER_WRITE, SpotifyClient, check, paginate},
    types::{
        AddTracksRequest, CreatePlaylistRequest, Page, Playlist, SavedItem, UpdatePlaylistRequest,
    },
};

const ITEMS_PAGE: &str = "100";
const ITEM_FIELDS: &str = "items(added_at,track(uri,name,artists(name))),next,total";

/// Retrieves every item of a playlist.
///
/// Only the fields the monthly core reads are requested, and episodes are
/// left out (`additional_types=track`), so podcast entries arrive without a
/// track payload and are skipped downstream.
pub(super) async fn items(client: &SpotifyClient, playlist_id: &str) -> Res<Vec<SavedItem>> {
    let base = client.endpoint(&format!("playlists/{}/tracks", playlist_id));
    let first = Url::parse_with_params(
        &base,
        &[
            ("limit", ITEMS_PAGE),
            ("additional_types", "track"),
            ("fields", ITEM_FIELDS),
        ],
    )
    .map_err(|e| Error::Unexpected(format!("invalid playlist url {}: {}", base, e)))?;

    paginate::drain(first.to_string(), move |url| {
        client.get_json::<Page<SavedItem>>(url)
    })
    .await
}

/// Creates a private playlist for the user.
pub(super) async fn create(
    client: &SpotifyClient,
    user_id: &str,
    name: &str,
    description: &str,
) -> Res<Playlist> {
    let url = client.endpoint(&format!("users/{}/playlists", user_id));
    let body = CreatePlaylistRequest {
        name: name.to_string(),
        description: description.to_string(),
        public: false,
    };

    let response = check(client.post(&url).json(&body).send().await?).await?;
    Ok(response.json::<Playlist>().await?)
}

pub(super) async fn add_items(
    client: &SpotifyClient,
    playlist_id: &str,
    uris: &[String],
) -> Res<()> {
    if uris.len() > MAX_ITEMS_PER_WRITE {
        return Err(Error::Unexpected(format!(
            "refusing to add {} items in one request, the limit is {}",
            uris.len(),
            MAX_ITEMS_PER_WRITE
        )));
    }

    let url = client.endpoint(&format!("playlists/{}/tracks", playlist_id));
    let body = AddTracksRequest {
        uris: uris.to_vec(),
    };
    check(client.post(&url).json(&body).send().await?).await?;
    Ok(())
}

pub(super) async fn update_description(
    client: &SpotifyClient,
    playlist_id: &str,
    description: &str,
) -> Res<()> {
    let url = client.endpoint(&format!("playlists/{}", playlist_id));
    let body = UpdatePlaylistRequest {
        description: description.to_string(),
    };
    check(client.put(&url).json(&body).send().await?).await?;
    Ok(())
}

/// Replaces the playlist cover. Spotify expects the JPEG as a base64 body.
pub(super) async fn upload_cover(
    client: &SpotifyClient,
    playlist_id: &str,
    jpeg: &[u8],
) -> Res<()> {
    let url = client.endpoint(&format!("playlists/{}/images", playlist_id));
    let response = client
        .put(&url)
        .header(CONTENT_TYPE, "image/jpeg")
        .body(STANDARD.encode(jpeg))
        .send()
        .await?;
    check(response).await?;
    Ok(())
}
