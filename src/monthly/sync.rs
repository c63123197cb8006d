use std::collections::HashSet;

use crate::{
    Res,
    cover::{self, CoverFormat},
    info,
    monthly::source::PlaylistSource,
    spotify::{Catalog, MAX_ITEMS_PER_WRITE},
    success,
    types::{
        MonthlyPlaylistPreview, MonthlyPlaylistRequest, Playlist, PlaylistAction, SongRef,
        SyncOutcome,
    },
    utils, warning,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Upload a generated cover to every playlist created during the run.
    pub covers: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { covers: true }
    }
}

/// Splits uris into consecutive write batches of at most
/// [`MAX_ITEMS_PER_WRITE`] items.
///
/// Concatenating the batches reproduces `uris` exactly. The sync engine
/// passes lists that already went through [`dedupe`], so a request that
/// names a song twice writes it once.
pub fn batches(uris: &[String]) -> std::slice::Chunks<'_, String> {
    uris.chunks(MAX_ITEMS_PER_WRITE)
}

/// Drops repeated uris, keeping the first occurrence of each.
///
/// A month's songs are treated as a set: the number of tracks written for a
/// request is its count of distinct uris, not its length.
pub fn dedupe<I>(uris: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    uris.into_iter()
        .filter(|uri| seen.insert(uri.clone()))
        .collect()
}

/// Desired uris missing from the playlist, in desired order.
pub fn difference(desired: &[String], existing: &HashSet<String>) -> Vec<String> {
    desired
        .iter()
        .filter(|uri| !existing.contains(*uri))
        .cloned()
        .collect()
}

pub fn playlist_description(name: &str, source: &PlaylistSource) -> String {
    format!(
        "{}: songs added to {}. Created with Monthlify.",
        name,
        source.label()
    )
}

/// Builds one sync request per previewed month, carrying every track.
pub fn requests_from_previews(previews: &[MonthlyPlaylistPreview]) -> Vec<MonthlyPlaylistRequest> {
    previews
        .iter()
        .map(|preview| MonthlyPlaylistRequest {
            name: preview.name.clone(),
            songs: preview
                .tracks
                .iter()
                .map(|t| SongRef { id: t.uri.clone() })
                .collect(),
        })
        .collect()
}

/// Creates or tops up one playlist per requested month.
///
/// The user's playlists are listed once. For each request, in order:
///
/// 1. **Lookup**: the first playlist whose name equals the request name
///    exactly is the destination. Playlists created earlier in this run
///    are part of the lookup.
/// 2. **Update**: when found, its description is rewritten to reference
///    the source, its current items are fetched, and only the requested
///    uris it does not contain yet are written.
/// 3. **Create**: otherwise a private playlist is created with the
///    description and every requested uri is written. With
///    [`SyncOptions::covers`] set, a generated cover is uploaded.
///
/// Writes go out in batches of [`MAX_ITEMS_PER_WRITE`] in request order.
///
/// # Errors
///
/// The first failing call stops the run and its error is returned.
/// Months processed before the failure keep their changes; nothing is
/// rolled back.
///
/// # Idempotence
///
/// Running the same requests twice writes nothing the second time: every
/// playlist is found by name and the difference set is empty.
pub async fn sync_monthly_playlists<C>(
    catalog: &C,
    requests: &[MonthlyPlaylistRequest],
    source: &PlaylistSource,
    options: SyncOptions,
) -> Res<Vec<SyncOutcome>>
where
    C: Catalog + ?Sized,
{
    let user = catalog.current_user().await?;
    let mut playlists = catalog.user_playlists().await?;
    let mut outcomes = Vec::with_capacity(requests.len());

    for request in requests {
        let desired = dedupe(request.songs.iter().map(|s| s.id.clone()));
        let description = playlist_description(&request.name, source);

        let existing = find_by_name(&playlists, &request.name).cloned();
        let outcome = match existing {
            Some(playlist) => update(catalog, playlist, &desired, &description).await?,
            None => {
                let (playlist, outcome) =
                    create(catalog, &user.id, &request.name, &desired, &description, options)
                        .await?;
                playlists.push(playlist);
                outcome
            }
        };

        outcomes.push(outcome);
    }

    Ok(outcomes)
}

fn find_by_name<'a>(playlists: &'a [Playlist], name: &str) -> Option<&'a Playlist> {
    let mut matches = playlists.iter().filter(|p| p.name == name);
    let first = matches.next()?;
    if matches.next().is_some() {
        warning!(
            "Several playlists are named {:?}; updating the first one listed ({})",
            name,
            first.id
        );
    }
    Some(first)
}

async fn update<C>(
    catalog: &C,
    playlist: Playlist,
    desired: &[String],
    description: &str,
) -> Res<SyncOutcome>
where
    C: Catalog + ?Sized,
{
    info!("Updating playlist {}", playlist.name);
    catalog.update_description(&playlist.id, description).await?;

    let existing: HashSet<String> = catalog
        .playlist_items(&playlist.id)
        .await?
        .into_iter()
        .filter_map(|item| item.track.and_then(|t| t.uri))
        .collect();

    let new_uris = difference(desired, &existing);
    write_batches(catalog, &playlist.id, &new_uris).await?;
    success!(
        "Playlist {} updated with {} new tracks",
        playlist.name,
        new_uris.len()
    );

    Ok(SyncOutcome {
        url: playlist.url(),
        id: playlist.id,
        name: playlist.name,
        action: PlaylistAction::Updated,
        tracks_added: new_uris.len(),
    })
}

async fn create<C>(
    catalog: &C,
    user_id: &str,
    name: &str,
    desired: &[String],
    description: &str,
    options: SyncOptions,
) -> Res<(Playlist, SyncOutcome)>
where
    C: Catalog + ?Sized,
{
    info!("Creating playlist {}", name);
    let playlist = catalog.create_playlist(user_id, name, description).await?;
    write_batches(catalog, &playlist.id, desired).await?;

    if options.covers {
        match utils::parse_playlist_name(name) {
            Some((month, year)) => {
                let jpeg = cover::render(
                    &utils::month_code(month)?,
                    year,
                    CoverFormat::Jpeg {
                        max_bytes: cover::UPLOAD_BYTE_BUDGET,
                    },
                )?;
                catalog.upload_cover(&playlist.id, &jpeg).await?;
            }
            None => warning!("No month in playlist name {:?}, skipping cover", name),
        }
    }

    success!("Playlist {} created with {} tracks", name, desired.len());

    let outcome = SyncOutcome {
        id: playlist.id.clone(),
        name: playlist.name.clone(),
        url: playlist.url(),
        action: PlaylistAction::Created,
        tracks_added: desired.len(),
    };
    Ok((playlist, outcome))
}

async fn write_batches<C>(catalog: &C, playlist_id: &str, uris: &[String]) -> Res<()>
where
    C: Catalog + ?Sized,
{
    for batch in batches(uris) {
        catalog.add_items(playlist_id, batch).await?;
    }
    Ok(())
}
