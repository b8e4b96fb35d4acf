//! Track catalog HTTP routes.

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        rejection::QueryRejection,
        Multipart, Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::error::ApiError;
use super::state::{GuardedTrackStore, GuardedUploads, ServerState};
use crate::track_store::{Direction, NewTrack, Page, Track, TrackFilter, TrackId};

/// Multipart field carrying the audio file on track creation.
pub const AUDIO_FILE_FIELD: &str = "audioFile";

#[derive(Debug, Default, Deserialize)]
pub struct ListTracksQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListTracksQuery {
    fn page(&self) -> Option<Page> {
        match (self.limit, self.offset) {
            (None, None) => None,
            (limit, offset) => Some(Page {
                limit,
                offset: offset.unwrap_or(0),
            }),
        }
    }
}

async fn list_tracks(
    State(track_store): State<GuardedTrackStore>,
    query: Result<Query<ListTracksQuery>, QueryRejection>,
) -> Result<Json<Vec<Track>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))?;
    Ok(Json(track_store.list_tracks(query.page())?))
}

async fn find_tracks(
    track_store: GuardedTrackStore,
    filter: TrackFilter,
) -> Result<Json<Vec<Track>>, ApiError> {
    Ok(Json(track_store.find_tracks(&filter)?))
}

async fn get_artist_tracks(
    State(track_store): State<GuardedTrackStore>,
    Path(artist): Path<String>,
) -> Result<Json<Vec<Track>>, ApiError> {
    find_tracks(track_store, TrackFilter::Artist(artist)).await
}

async fn get_album_tracks(
    State(track_store): State<GuardedTrackStore>,
    Path(album): Path<String>,
) -> Result<Json<Vec<Track>>, ApiError> {
    find_tracks(track_store, TrackFilter::Album(album)).await
}

async fn get_genre_tracks(
    State(track_store): State<GuardedTrackStore>,
    Path(genre): Path<String>,
) -> Result<Json<Vec<Track>>, ApiError> {
    find_tracks(track_store, TrackFilter::Genre(genre)).await
}

async fn get_track(
    State(track_store): State<GuardedTrackStore>,
    Path(id): Path<String>,
) -> Result<Json<Track>, ApiError> {
    let id: TrackId = id.parse()?;
    track_store
        .get_track(id)?
        .map(Json)
        .ok_or(ApiError::TrackNotFound)
}

fn neighbor_of(
    track_store: &GuardedTrackStore,
    id: &str,
    direction: Direction,
) -> Result<Json<Track>, ApiError> {
    let id: TrackId = id.parse()?;
    if track_store.get_track(id)?.is_none() {
        return Err(ApiError::TrackNotFound);
    }
    track_store
        .get_neighbor(id, direction)?
        .map(Json)
        .ok_or(ApiError::TrackNotFound)
}

async fn get_next_track(
    State(track_store): State<GuardedTrackStore>,
    Path(id): Path<String>,
) -> Result<Json<Track>, ApiError> {
    neighbor_of(&track_store, &id, Direction::Next)
}

async fn get_prev_track(
    State(track_store): State<GuardedTrackStore>,
    Path(id): Path<String>,
) -> Result<Json<Track>, ApiError> {
    neighbor_of(&track_store, &id, Direction::Previous)
}

/// Fields of a track creation request.
#[derive(Debug, Default)]
struct TrackUpload {
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    /// (client filename, bytes)
    audio: Option<(String, axum::body::Bytes)>,
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    Ok(field.text().await?)
}

async fn read_track_upload(mut multipart: Multipart) -> Result<TrackUpload, ApiError> {
    let mut upload = TrackUpload::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "title" => upload.title = Some(read_text(field).await?),
            "artist" => upload.artist = Some(read_text(field).await?),
            "album" => upload.album = Some(read_text(field).await?),
            AUDIO_FILE_FIELD => {
                let file_name = match field.file_name() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    // Without a filename the part is just a text value, not a file
                    _ => {
                        debug!("Ignoring {} part without a filename", AUDIO_FILE_FIELD);
                        continue;
                    }
                };
                if upload.audio.is_some() {
                    debug!("Ignoring extra {} part {:?}", AUDIO_FILE_FIELD, file_name);
                    continue;
                }
                let data = field.bytes().await?;
                upload.audio = Some((file_name, data));
            }
            other => debug!("Ignoring unknown multipart field {:?}", other),
        }
    }

    Ok(upload)
}

async fn post_track(
    State(track_store): State<GuardedTrackStore>,
    State(uploads): State<GuardedUploads>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Track>, ApiError> {
    // Anything that isn't a multipart body can't carry a file
    let multipart = multipart.map_err(|rejection| {
        debug!("Track creation without multipart body: {}", rejection);
        ApiError::MissingAudioFile
    })?;

    let upload = read_track_upload(multipart).await?;
    let (original_file_name, data) = upload.audio.ok_or(ApiError::MissingAudioFile)?;

    let stored = uploads.save(&original_file_name, &data).await?;

    let new_track = NewTrack {
        title: upload.title,
        artist: upload.artist,
        album: upload.album,
        audio_file_path: stored.public_path.clone(),
        original_file_name: Some(stored.original_file_name.clone()),
    };
    match track_store.create_track(new_track) {
        Ok(track) => {
            info!(
                "Created track {} ({:?}) with audio {}",
                track.id, track.title, track.audio_file_path
            );
            Ok(Json(track))
        }
        Err(err) => {
            if let Err(remove_err) = uploads.discard(&stored).await {
                warn!(
                    "Failed to remove orphaned upload {:?}: {}",
                    stored.file_name, remove_err
                );
            }
            Err(err.into())
        }
    }
}

pub fn make_track_routes(state: ServerState) -> Router {
    Router::new()
        .route("/tracks", get(list_tracks).post(post_track))
        .route("/tracks/{id}", get(get_track))
        .route("/artists/{artist}", get(get_artist_tracks))
        .route("/albums/{album}", get(get_album_tracks))
        .route("/genres/{genre}", get(get_genre_tracks))
        .route("/next/{id}", get(get_next_track))
        .route("/prev/{id}", get(get_prev_track))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_only_when_requested() {
        assert_eq!(ListTracksQuery::default().page(), None);

        let query = ListTracksQuery {
            limit: Some(10),
            offset: None,
        };
        assert_eq!(
            query.page(),
            Some(Page {
                limit: Some(10),
                offset: 0
            })
        );

        let query = ListTracksQuery {
            limit: None,
            offset: Some(3),
        };
        assert_eq!(query.page().map(|p| p.offset), Some(3));
    }
}
