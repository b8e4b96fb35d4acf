//! Store used when the track database could not be opened at startup.
//!
//! The server keeps running and every store-backed request fails, so the
//! problem shows up in responses and logs instead of a dead process.

use super::models::{Direction, NewTrack, Page, Track, TrackFilter, TrackId};
use super::trait_def::TrackStore;
use anyhow::{bail, Result};

pub struct UnavailableTrackStore {
    reason: String,
}

impl UnavailableTrackStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn fail<T>(&self) -> Result<T> {
        bail!("Track database unavailable: {}", self.reason)
    }
}

impl TrackStore for UnavailableTrackStore {
    fn list_tracks(&self, _page: Option<Page>) -> Result<Vec<Track>> {
        self.fail()
    }

    fn find_tracks(&self, _filter: &TrackFilter) -> Result<Vec<Track>> {
        self.fail()
    }

    fn get_track(&self, _id: TrackId) -> Result<Option<Track>> {
        self.fail()
    }

    fn get_neighbor(&self, _id: TrackId, _direction: Direction) -> Result<Option<Track>> {
        self.fail()
    }

    fn create_track(&self, _track: NewTrack) -> Result<Track> {
        self.fail()
    }

    fn count_tracks(&self) -> Result<usize> {
        self.fail()
    }
}
