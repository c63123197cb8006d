use std::collections::BTreeMap;

use crate::{
    Error, Res,
    types::{MonthlyPlaylistPreview, MonthlyTrack, TrackItem},
    utils,
};

/// Splits a `YYYY-MM` key into its year text and month number.
pub fn parse_month_key(month_key: &str) -> Res<(&str, u32)> {
    let invalid = || Error::InvalidMonth(format!("malformed month key {:?}", month_key));

    let (year, month) = month_key.split_once('-').ok_or_else(invalid)?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    Ok((year, month))
}

/// Playlist name for a month key: `"2024-02"` gives `"February 2024"`.
pub fn month_display_name(month_key: &str) -> Res<String> {
    let (year, month) = parse_month_key(month_key)?;
    utils::playlist_name(year, month)
}

/// Turns month buckets into the read-only preview shown before syncing.
///
/// Months come out in ascending key order, which for `YYYY-MM` keys is
/// chronological. Every track is identified by its uri, the same key the
/// sync engine de-duplicates on.
///
/// # Errors
///
/// Returns `InvalidMonth` if a key does not carry a month between 1 and 12.
pub fn format_preview(
    buckets: &BTreeMap<String, Vec<TrackItem>>,
) -> Res<Vec<MonthlyPlaylistPreview>> {
    buckets
        .iter()
        .map(|(month_key, tracks)| {
            Ok(MonthlyPlaylistPreview {
                id: month_key.clone(),
                name: month_display_name(month_key)?,
                tracks: tracks.iter().map(monthly_track).collect(),
            })
        })
        .collect()
}

fn monthly_track(track: &TrackItem) -> MonthlyTrack {
    MonthlyTrack {
        id: track.uri.clone(),
        name: track.name.clone(),
        artists: track.artists.join(", "),
        added_at: track.added_at.clone(),
        uri: track.uri.clone(),
    }
}
