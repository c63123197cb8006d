//! # Spotify Integration Module
//!
//! This module is the integration layer between Monthlify and the Spotify
//! Web API. It owns every HTTP request to Spotify, decodes the responses into
//! the typed records of [`crate::types`] and turns failures into
//! [`crate::Error::Upstream`].
//!
//! ## Architecture
//!
//! ```text
//! Monthly core (partition, preview, sync)
//!          ↓
//!     Catalog trait
//!          ↓
//! SpotifyClient (reqwest, JSON)
//!     ├── library   (profile, saved tracks, playlist listing)
//!     ├── playlist  (items, create, add, describe, cover)
//!     └── paginate  (cursor draining)
//!          ↓
//! Spotify Web API
//! ```
//!
//! The [`Catalog`] trait is the seam between the sync engine and the network:
//! the engine only ever talks to a `Catalog`, which lets tests substitute an
//! in-memory library.
//!
//! ## Authentication
//!
//! [`auth`] builds the authorization URL and exchanges authorization codes
//! and refresh tokens at the accounts service using the client credentials
//! (HTTP Basic). The resulting access token is handed to
//! [`SpotifyClient::new`]; the client itself never refreshes tokens.
//!
//! ## Error Handling
//!
//! - Non-2xx responses are decoded from Spotify's `{"error": {...}}` body
//!   and returned as `Upstream` errors carrying status and message
//! - Transport failures are returned as `Upstream` errors without status
//! - Nothing is retried; the caller decides what a failure means
//!
//! ## API Coverage
//!
//! - `GET /me`, `GET /me/tracks`, `GET /me/playlists`
//! - `GET /playlists/{id}/tracks`
//! - `POST /users/{user_id}/playlists`
//! - `POST /playlists/{id}/tracks`
//! - `PUT /playlists/{id}`
//! - `PUT /playlists/{id}/images`

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{
    Error, Res,
    types::{ApiErrorResponse, Playlist, SavedItem, UserProfile},
};

pub mod auth;
mod library;
pub mod paginate;
mod playlist;

/// Most items Spotify accepts in a single write to a playlist's track list.
pub const MAX_ITEMS_PER_WRITE: usize = 100;

/// Operations the monthly core needs from the music catalog.
///
/// Every listing method returns the complete, fully paginated collection.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn current_user(&self) -> Res<UserProfile>;

    /// The user's Liked Songs, most recently added first.
    async fn saved_tracks(&self) -> Res<Vec<SavedItem>>;

    /// Number of Liked Songs without fetching them.
    async fn saved_tracks_total(&self) -> Res<u64>;

    async fn user_playlists(&self) -> Res<Vec<Playlist>>;

    async fn playlist_items(&self, playlist_id: &str) -> Res<Vec<SavedItem>>;

    async fn create_playlist(&self, user_id: &str, name: &str, description: &str)
    -> Res<Playlist>;

    /// Appends at most [`MAX_ITEMS_PER_WRITE`] uris to a playlist.
    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Res<()>;

    async fn update_description(&self, playlist_id: &str, description: &str) -> Res<()>;

    async fn upload_cover(&self, playlist_id: &str, jpeg: &[u8]) -> Res<()>;
}

/// Spotify Web API client bound to one user's access token.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: String,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url).bearer_auth(&self.token)
    }

    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        self.http.post(url).bearer_auth(&self.token)
    }

    pub(crate) fn put(&self, url: &str) -> RequestBuilder {
        self.http.put(url).bearer_auth(&self.token)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: String) -> Res<T> {
        let response = check(self.get(&url).send().await?).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Passes successful responses through and converts everything else into an
/// `Upstream` error carrying Spotify's own message.
pub(crate) async fn check(response: Response) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorResponse>(&body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    Err(Error::upstream(Some(status.as_u16()), message))
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn current_user(&self) -> Res<UserProfile> {
        library::current_user(self).await
    }

    async fn saved_tracks(&self) -> Res<Vec<SavedItem>> {
        library::saved_tracks(self).await
    }

    async fn saved_tracks_total(&self) -> Res<u64> {
        library::saved_tracks_total(self).await
    }

    async fn user_playlists(&self) -> Res<Vec<Playlist>> {
        library::user_playlists(self).await
    }

    async fn playlist_items(&self, playlist_id: &str) -> Res<Vec<SavedItem>> {
        playlist::items(self, playlist_id).await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Res<Playlist> {
        playlist::create(self, user_id, name, description).await
    }

    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        playlist::add_items(self, playlist_id, uris).await
    }

    async fn update_description(&self, playlist_id: &str, description: &str) -> Res<()> {
        playlist::update_description(self, playlist_id, description).await
    }

    async fn upload_cover(&self, playlist_id: &str, jpeg: &[u8]) -> Res<()> {
        playlist::upload_cover(self, playlist_id, jpeg).await
    }
}
