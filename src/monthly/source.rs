use std::{fmt, str::FromStr};

use url::Url;

use crate::{Error, Res, spotify::Catalog, types::SavedItem};

/// Identifier the front-end uses for the Liked Songs pseudo playlist.
pub const LIKED_SONGS_ID: &str = "liked-songs";
pub const LIKED_SONGS_NAME: &str = "Liked Songs";

const PLAYLIST_HOST: &str = "open.spotify.com";
const PLAYLIST_URI_PREFIX: &str = "spotify:playlist:";

/// Where the tracks to be sorted come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistSource {
    LikedSongs,
    Playlist(String),
}

impl PlaylistSource {
    /// Parses an identifier in any accepted form.
    ///
    /// Accepted forms:
    /// - `liked-songs` or `liked songs` (any case)
    /// - a bare playlist id, e.g. `37i9dQZF1DXcBWIGoYBM5M`
    /// - a playlist URL, e.g. `https://open.spotify.com/playlist/<id>?si=...`
    /// - a playlist URI, e.g. `spotify:playlist:<id>`
    pub fn parse(identifier: &str) -> Res<Self> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(Error::InvalidIdentifier(
                "playlist identifier is empty".to_string(),
            ));
        }

        if is_liked_songs(identifier) {
            return Ok(PlaylistSource::LikedSongs);
        }

        if let Some(id) = identifier.strip_prefix(PLAYLIST_URI_PREFIX) {
            return playlist_id(id).map(PlaylistSource::Playlist);
        }

        if identifier.contains("://") || identifier.starts_with(PLAYLIST_HOST) {
            return parse_url(identifier).map(PlaylistSource::Playlist);
        }

        playlist_id(identifier).map(PlaylistSource::Playlist)
    }

    /// Parses an identifier with the front-end's `type` hint (`id` or `url`).
    ///
    /// A `url` hint only accepts playlist URLs; any other hint, or none,
    /// falls back to [`PlaylistSource::parse`].
    pub fn parse_with_kind(identifier: &str, kind: Option<&str>) -> Res<Self> {
        match kind.map(str::trim) {
            Some(k) if k.eq_ignore_ascii_case("url") => {
                parse_url(identifier.trim()).map(PlaylistSource::Playlist)
            }
            _ => Self::parse(identifier),
        }
    }

    /// Human readable reference used in playlist descriptions.
    pub fn label(&self) -> String {
        match self {
            PlaylistSource::LikedSongs => LIKED_SONGS_NAME.to_string(),
            PlaylistSource::Playlist(id) => format!("https://{}/playlist/{}", PLAYLIST_HOST, id),
        }
    }

    /// Fetches every entry of the source, across all pages.
    pub async fn fetch<C>(&self, catalog: &C) -> Res<Vec<SavedItem>>
    where
        C: Catalog + ?Sized,
    {
        match self {
            PlaylistSource::LikedSongs => catalog.saved_tracks().await,
            PlaylistSource::Playlist(id) => catalog.playlist_items(id).await,
        }
    }
}

impl FromStr for PlaylistSource {
    type Err = Error;

    fn from_str(s: &str) -> Res<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PlaylistSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaylistSource::LikedSongs => write!(f, "{}", LIKED_SONGS_ID),
            PlaylistSource::Playlist(id) => write!(f, "{}", id),
        }
    }
}

fn is_liked_songs(identifier: &str) -> bool {
    identifier.eq_ignore_ascii_case(LIKED_SONGS_ID) || identifier.eq_ignore_ascii_case("liked songs")
}

fn playlist_id(candidate: &str) -> Res<String> {
    if !candidate.is_empty() && candidate.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(candidate.to_string())
    } else {
        Err(Error::InvalidIdentifier(format!(
            "{:?} is not a Spotify playlist id",
            candidate
        )))
    }
}

fn parse_url(raw: &str) -> Res<String> {
    let invalid = || Error::InvalidIdentifier(format!("{:?} is not a Spotify playlist URL", raw));

    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };
    let url = Url::parse(&with_scheme).map_err(|_| invalid())?;
    if url.host_str() != Some(PLAYLIST_HOST) {
        return Err(invalid());
    }

    // Localised links carry a leading `intl-xx` segment.
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();
    let segments: Vec<&str> = match segments.split_first() {
        Some((first, rest)) if first.starts_with("intl-") => rest.to_vec(),
        _ => segments,
    };

    if let ["playlist", id, ..] = segments.as_slice() {
        return playlist_id(id);
    }

    // Some share links only carry the playlist as a `uri` query parameter.
    url.query_pairs()
        .find(|(key, _)| key == "uri")
        .and_then(|(_, value)| value.strip_prefix(PLAYLIST_URI_PREFIX).map(str::to_string))
        .ok_or_else(invalid)
        .and_then(|id| playlist_id(&id))
}
