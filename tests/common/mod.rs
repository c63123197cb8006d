#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use monthlify::{
    Error, Res,
    spotify::{Catalog, MAX_ITEMS_PER_WRITE},
    types::{ArtistRef, Playlist, SavedItem, TrackPayload, UserProfile},
};

pub fn saved_item(added_at: &str, uri: &str) -> SavedItem {
    SavedItem {
        added_at: Some(added_at.to_string()),
        track: Some(TrackPayload {
            uri: Some(uri.to_string()),
            name: Some(format!("Track {}", uri)),
            artists: vec![
                ArtistRef {
                    name: "Artist A".to_string(),
                },
                ArtistRef {
                    name: "Artist B".to_string(),
                },
            ],
        }),
    }
}

pub fn uris(prefix: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("spotify:track:{}{}", prefix, i))
        .collect()
}

pub fn playlist(id: &str, name: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        ..Default::default()
    }
}

/// Everything the fake recorded, in call order.
#[derive(Debug, Default)]
pub struct Recorded {
    pub playlists: Vec<Playlist>,
    pub items: HashMap<String, Vec<String>>,
    pub created: Vec<String>,
    pub add_calls: Vec<(String, usize)>,
    pub descriptions: Vec<(String, String)>,
    pub covers: Vec<(String, Vec<u8>)>,
    pub listings: usize,
}

/// In-memory music library standing in for the Spotify Web API.
pub struct FakeCatalog {
    pub user: UserProfile,
    pub saved: Vec<SavedItem>,
    /// Zero-based index of the `add_items` call that fails, if any.
    pub fail_add_call: Option<usize>,
    pub state: Mutex<Recorded>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            user: UserProfile {
                id: "user-1".to_string(),
                display_name: Some("Test User".to_string()),
                images: Vec::new(),
            },
            saved: Vec::new(),
            fail_add_call: None,
            state: Mutex::new(Recorded::default()),
        }
    }

    pub fn with_playlist(self, id: &str, name: &str, uris: &[String]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.playlists.push(playlist(id, name));
            state.items.insert(id.to_string(), uris.to_vec());
        }
        self
    }

    pub fn items_of(&self, playlist_id: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .items
            .get(playlist_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn playlist_named(&self, name: &str) -> Option<Playlist> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|p| p.name == name)
            .cloned()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn current_user(&self) -> Res<UserProfile> {
        Ok(self.user.clone())
    }

    async fn saved_tracks(&self) -> Res<Vec<SavedItem>> {
        Ok(self.saved.clone())
    }

    async fn saved_tracks_total(&self) -> Res<u64> {
        Ok(self.saved.len() as u64)
    }

    async fn user_playlists(&self) -> Res<Vec<Playlist>> {
        let mut state = self.state.lock().unwrap();
        state.listings += 1;
        Ok(state.playlists.clone())
    }

    async fn playlist_items(&self, playlist_id: &str) -> Res<Vec<SavedItem>> {
        let state = self.state.lock().unwrap();
        let items = state
            .items
            .get(playlist_id)
            .ok_or_else(|| Error::upstream(Some(404), "Resource not found"))?;
        Ok(items
            .iter()
            .map(|uri| saved_item("2024-01-01T00:00:00Z", uri))
            .collect())
    }

    async fn create_playlist(
        &self,
        _user_id: &str,
        name: &str,
        description: &str,
    ) -> Res<Playlist> {
        let mut state = self.state.lock().unwrap();
        let id = format!("created-{}", state.created.len() + 1);
        let mut created = playlist(&id, name);
        created.description = Some(description.to_string());

        state.created.push(id.clone());
        state.playlists.push(created.clone());
        state.items.insert(id, Vec::new());
        Ok(created)
    }

    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        let mut state = self.state.lock().unwrap();
        let call = state.add_calls.len();
        state.add_calls.push((playlist_id.to_string(), uris.len()));

        if self.fail_add_call == Some(call) {
            return Err(Error::upstream(Some(500), "Server error"));
        }
        if uris.len() > MAX_ITEMS_PER_WRITE {
            return Err(Error::upstream(Some(400), "Too many tracks requested"));
        }

        state
            .items
            .entry(playlist_id.to_string())
            .or_default()
            .extend(uris.iter().cloned());
        Ok(())
    }

    async fn update_description(&self, playlist_id: &str, description: &str) -> Res<()> {
        let mut state = self.state.lock().unwrap();
        state
            .descriptions
            .push((playlist_id.to_string(), description.to_string()));
        Ok(())
    }

    async fn upload_cover(&self, playlist_id: &str, jpeg: &[u8]) -> Res<()> {
        let mut state = self.state.lock().unwrap();
        state.covers.push((playlist_id.to_string(), jpeg.to_vec()));
        Ok(())
    }
}
