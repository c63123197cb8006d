use std::collections::BTreeMap;

use crate::types::{SavedItem, TrackItem};

/// Length of a `YYYY-MM` month key.
pub const MONTH_KEY_LEN: usize = 7;

/// Tracks grouped by the month they were added.
///
/// Keys are `YYYY-MM` strings, so iterating the map yields months in
/// chronological order. Inside a month, tracks keep fetch order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthPartition {
    pub buckets: BTreeMap<String, Vec<TrackItem>>,
    /// Items dropped because they had no `added_at`, no track payload, no
    /// uri, or an `added_at` too short to hold a month.
    pub skipped: usize,
}

impl MonthPartition {
    /// Number of tracks that landed in a bucket.
    pub fn bucketed(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Month key of an ISO-8601 timestamp: its first seven characters.
///
/// Returns `None` when the timestamp is shorter than a month key.
pub fn month_key(added_at: &str) -> Option<&str> {
    added_at.get(..MONTH_KEY_LEN)
}

/// Groups fetched entries by the month they were added.
///
/// Malformed entries are not an error: they are counted in
/// [`MonthPartition::skipped`] and otherwise ignored, so
/// `bucketed() + skipped` always equals the number of input items.
///
/// # Example
///
/// ```ignore
/// let partition = partition(items);
/// for (month, tracks) in &partition.buckets {
///     println!("{}: {} tracks", month, tracks.len());
/// }
/// ```
pub fn partition<I>(items: I) -> MonthPartition
where
    I: IntoIterator<Item = SavedItem>,
{
    let mut result = MonthPartition::default();

    for item in items {
        let Some(track) = item.into_track_item() else {
            result.skipped += 1;
            continue;
        };

        let Some(key) = month_key(&track.added_at).map(str::to_string) else {
            result.skipped += 1;
            continue;
        };

        result.buckets.entry(key).or_default().push(track);
    }

    result
}
