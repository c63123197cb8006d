use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Token endpoint response for both the authorization-code and the
/// refresh-token grants. Spotify omits `refresh_token` on refresh when it
/// does not rotate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: String,
}

/// One page of a cursor-paginated Spotify collection.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistOwner {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackCount {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// Playlist object as returned by `/me/playlists` and playlist creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub owner: PlaylistOwner,
    #[serde(default)]
    pub tracks: TrackCount,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl Playlist {
    /// Public web link of the playlist, falling back to the canonical
    /// `open.spotify.com` form when the API left it out.
    pub fn url(&self) -> String {
        self.external_urls
            .spotify
            .clone()
            .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", self.id))
    }
}

// Spotify sends `"images": null` for playlists without artwork.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackPayload {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

/// Raw entry of `/me/tracks` or `/playlists/{id}/tracks`. Both fields are
/// optional on the wire: local files and removed tracks come back with a
/// `null` track, and some exports drop `added_at`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedItem {
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub track: Option<TrackPayload>,
}

/// A validated track entry: every field present, ready to be bucketed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackItem {
    pub added_at: String,
    pub uri: String,
    pub name: String,
    pub artists: Vec<String>,
}

impl SavedItem {
    /// Validates the wire entry into a [`TrackItem`].
    ///
    /// Returns `None` when `added_at` is missing or empty, when the track
    /// payload is missing, or when the payload has no uri.
    pub fn into_track_item(self) -> Option<TrackItem> {
        let added_at = self.added_at.filter(|a| !a.is_empty())?;
        let track = self.track?;
        let uri = track.uri.filter(|u| !u.is_empty())?;

        Some(TrackItem {
            added_at,
            uri,
            name: track.name.unwrap_or_default(),
            artists: track.artists.into_iter().map(|a| a.name).collect(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

/// Playlist entry handed to the front-end playlist picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub track_count: u64,
    pub image_url: Option<String>,
}

impl From<Playlist> for SimplifiedPlaylist {
    fn from(playlist: Playlist) -> Self {
        Self {
            image_url: playlist.images.first().map(|i| i.url.clone()),
            owner: playlist
                .owner
                .display_name
                .unwrap_or_else(|| playlist.owner.id.clone()),
            track_count: playlist.tracks.total,
            id: playlist.id,
            name: playlist.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTrack {
    pub id: String,
    pub name: String,
    pub artists: String,
    pub added_at: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPlaylistPreview {
    pub id: String,
    pub name: String,
    pub tracks: Vec<MonthlyTrack>,
}

#[derive(Tabled)]
pub struct PreviewTableRow {
    pub month: String,
    pub playlist: String,
    pub tracks: usize,
}

/// One month the client wants written: the playlist name and the songs
/// (identified by track uri) it should contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyPlaylistRequest {
    pub name: String,
    #[serde(default)]
    pub songs: Vec<SongRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRef {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistAction {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub id: String,
    pub name: String,
    pub url: String,
    pub action: PlaylistAction,
    pub tracks_added: usize,
}

#[derive(Tabled)]
pub struct SyncTableRow {
    pub playlist: String,
    pub action: String,
    pub added: usize,
    pub url: String,
}
