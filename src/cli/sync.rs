use reqwest::Client;
use tabled::Table;

use crate::{
    cli::{ApiAccess, spinner},
    error, info,
    monthly::{self, PlaylistSource, SyncOptions, sync::requests_from_previews},
    spotify::SpotifyClient,
    success,
    types::SyncTableRow,
};

/// Sorts every dated track of `source` into its monthly playlist.
pub async fn sync(source: String, access: ApiAccess, covers: bool) {
    let source = match PlaylistSource::parse(&source) {
        Ok(source) => source,
        Err(e) => error!("{}", e),
    };
    let client = SpotifyClient::new(Client::new(), access.api_url, access.access_token);

    let pb = spinner(format!("Fetching tracks from {}...", source.label()));
    let result = monthly::preview_source(&client, &source).await;
    pb.finish_and_clear();

    let previews = match result {
        Ok(previews) => previews,
        Err(e) => error!("Failed to fetch {}. Err: {}", source.label(), e),
    };

    if previews.is_empty() {
        info!("Nothing to sync, no dated tracks in {}", source.label());
        return;
    }

    info!("Syncing {} monthly playlists", previews.len());
    let requests = requests_from_previews(&previews);
    let outcomes =
        match monthly::sync_monthly_playlists(&client, &requests, &source, SyncOptions { covers })
            .await
        {
            Ok(outcomes) => outcomes,
            Err(e) => error!("Sync stopped. Earlier months were kept. Err: {}", e),
        };

    let rows: Vec<SyncTableRow> = outcomes
        .into_iter()
        .map(|o| SyncTableRow {
            playlist: o.name,
            action: format!("{:?}", o.action).to_lowercase(),
            added: o.tracks_added,
            url: o.url,
        })
        .collect();

    println!("{}", Table::new(rows));
    success!("Processed {} monthly playlists.", requests.len());
}
