//! Badaga Music Server Library
//!
//! A small catalog of uploaded audio tracks served over HTTP. The library
//! exposes the modules for the binary and the end-to-end tests.

pub mod config;
pub mod server;
pub mod sqlite_persistence;
pub mod track_store;
pub mod uploads;

pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use track_store::{SqliteTrackStore, TrackStore, UnavailableTrackStore};
pub use uploads::AudioUploads;
