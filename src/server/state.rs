use axum::extract::FromRef;

use crate::track_store::TrackStore;
use crate::uploads::AudioUploads;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedTrackStore = Arc<dyn TrackStore>;
pub type GuardedUploads = Arc<AudioUploads>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub track_store: GuardedTrackStore,
    pub uploads: GuardedUploads,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, track_store: GuardedTrackStore, uploads: AudioUploads) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            track_store,
            uploads: Arc::new(uploads),
            hash: env!("BUILD_HASH").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedTrackStore {
    fn from_ref(input: &ServerState) -> Self {
        input.track_store.clone()
    }
}

impl FromRef<ServerState> for GuardedUploads {
    fn from_ref(input: &ServerState) -> Self {
        input.uploads.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
