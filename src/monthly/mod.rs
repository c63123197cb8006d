//! # Monthly Module
//!
//! The core of Monthlify: turning a flat list of saved tracks into one
//! playlist per month.
//!
//! ```text
//! PlaylistSource ──fetch──▶ Vec<SavedItem>
//!        │                        │
//!        │                  partition()      month key = added_at[..7]
//!        │                        ▼
//!        │           BTreeMap<"YYYY-MM", Vec<TrackItem>>
//!        │                 │               │
//!        │         format_preview()   requests_from_previews()
//!        │                 ▼               ▼
//!        │      Vec<MonthlyPlaylistPreview>  Vec<MonthlyPlaylistRequest>
//!        │                                 │
//!        └────────────────────────▶ sync_monthly_playlists()
//!                                          ▼
//!                                   Vec<SyncOutcome>
//! ```
//!
//! Everything here is request scoped: nothing is cached between calls and
//! the user's Spotify library is the only state.

pub mod partition;
pub mod preview;
pub mod source;
pub mod sync;

pub use partition::{MonthPartition, month_key, partition};
pub use preview::{format_preview, month_display_name};
pub use source::PlaylistSource;
pub use sync::{SyncOptions, sync_monthly_playlists};

use crate::{Res, spotify::Catalog, types::MonthlyPlaylistPreview};

/// Fetches a source and returns its monthly preview.
pub async fn preview_source<C>(
    catalog: &C,
    source: &PlaylistSource,
) -> Res<Vec<MonthlyPlaylistPreview>>
where
    C: Catalog + ?Sized,
{
    let items = source.fetch(catalog).await?;
    let partition = partition(items);
    format_preview(&partition.buckets)
}
