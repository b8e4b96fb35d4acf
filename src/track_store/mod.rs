mod models;
mod schema;
mod store;
mod trait_def;
mod unavailable_store;

pub use models::*;
pub use schema::TRACK_VERSIONED_SCHEMAS;
pub use store::SqliteTrackStore;
pub use trait_def::TrackStore;
pub use unavailable_store::UnavailableTrackStore;
