//! TrackStore trait definition.

use super::models::{Direction, NewTrack, Page, Track, TrackFilter, TrackId};
use anyhow::Result;

/// Storage backend for the track catalog.
///
/// Tracks are immutable once created, so the trait only exposes reads and
/// a single create operation.
pub trait TrackStore: Send + Sync {
    /// All tracks in creation order, optionally restricted to a page.
    fn list_tracks(&self, page: Option<Page>) -> Result<Vec<Track>>;

    /// Tracks whose field matches the filter exactly. Empty when nothing matches.
    fn find_tracks(&self, filter: &TrackFilter) -> Result<Vec<Track>>;

    fn get_track(&self, id: TrackId) -> Result<Option<Track>>;

    /// The closest track after (or before) `id` in id order, wrapping around to
    /// the first (or last) track at the end of the catalog.
    ///
    /// Returns `None` only when the catalog is empty.
    fn get_neighbor(&self, id: TrackId, direction: Direction) -> Result<Option<Track>>;

    /// Persists a new track and returns it with its assigned id.
    fn create_track(&self, track: NewTrack) -> Result<Track>;

    fn count_tracks(&self) -> Result<usize>;
}
