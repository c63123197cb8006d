use reqwest::Client;
use tabled::Table;

use crate::{
    cli::{ApiAccess, spinner},
    error, info,
    monthly::{self, PlaylistSource},
    spotify::SpotifyClient,
    types::PreviewTableRow,
};

pub async fn preview(source: String, access: ApiAccess) {
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
        Err(e) => error!("Failed to build preview. Err: {}", e),
    };

    if previews.is_empty() {
        info!("No dated tracks found in {}", source.label());
        return;
    }

    let rows: Vec<PreviewTableRow> = previews
        .iter()
        .map(|p| PreviewTableRow {
            month: p.id.clone(),
            playlist: p.name.clone(),
            tracks: p.tracks.len(),
        })
        .collect();

    println!("{}", Table::new(rows));
}
