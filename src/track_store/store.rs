//! SQLite-backed track store.

use super::models::{Direction, NewTrack, Page, Track, TrackFilter, TrackId};
use super::schema::TRACK_VERSIONED_SCHEMAS;
use super::trait_def::TrackStore;
use crate::sqlite_persistence::migrate_if_needed;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const TRACK_COLUMNS: &str =
    "id, title, artist, album, audio_file_path, original_file_name, created";

/// SQLite takes LIMIT/OFFSET as i64 and reads a negative OFFSET as 0, so
/// anything past i64::MAX saturates instead of wrapping.
fn sql_bound(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[derive(Clone)]
pub struct SqliteTrackStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTrackStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            db_path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open track database {:?}", db_path))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let store = Self::from_connection(conn)?;
        info!(
            "Opened track database {:?} with {} tracks",
            db_path,
            store.count_tracks()?
        );
        Ok(store)
    }

    /// A throwaway store, mostly useful for tests.
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        migrate_if_needed(&mut conn, TRACK_VERSIONED_SCHEMAS)
            .context("Failed to prepare track database schema")?;
        Ok(SqliteTrackStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Track database connection lock poisoned"))
    }

    fn parse_track_row(row: &rusqlite::Row) -> rusqlite::Result<Track> {
        Ok(Track {
            id: TrackId(row.get(0)?),
            title: row.get(1)?,
            artist: row.get(2)?,
            album: row.get(3)?,
            audio_file_path: row.get(4)?,
            original_file_name: row.get(5)?,
            created: row.get(6)?,
        })
    }

    fn query_tracks<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Track>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(sql)?;
        let tracks = stmt
            .query_map(params, Self::parse_track_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tracks)
    }

    fn query_track<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Option<Track>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(sql)?;
        Ok(stmt.query_row(params, Self::parse_track_row).optional()?)
    }
}

impl TrackStore for SqliteTrackStore {
    fn list_tracks(&self, page: Option<Page>) -> Result<Vec<Track>> {
        match page {
            None => self.query_tracks(
                &format!("SELECT {} FROM tracks ORDER BY id ASC", TRACK_COLUMNS),
                [],
            ),
            Some(page) => self.query_tracks(
                &format!(
                    "SELECT {} FROM tracks ORDER BY id ASC LIMIT ?1 OFFSET ?2",
                    TRACK_COLUMNS
                ),
                params![
                    page.limit.map(sql_bound).unwrap_or(-1),
                    sql_bound(page.offset)
                ],
            ),
        }
    }

    fn find_tracks(&self, filter: &TrackFilter) -> Result<Vec<Track>> {
        let (column, value) = match filter {
            TrackFilter::Artist(artist) => ("artist", artist),
            TrackFilter::Album(album) => ("album", album),
            TrackFilter::Genre(genre) => {
                debug!("Tracks have no genre, nothing matches {:?}", genre);
                return Ok(Vec::new());
            }
        };
        self.query_tracks(
            &format!(
                "SELECT {} FROM tracks WHERE {} = ?1 ORDER BY id ASC",
                TRACK_COLUMNS, column
            ),
            params![value],
        )
    }

    fn get_track(&self, id: TrackId) -> Result<Option<Track>> {
        self.query_track(
            &format!("SELECT {} FROM tracks WHERE id = ?1", TRACK_COLUMNS),
            params![id.0],
        )
    }

    fn get_neighbor(&self, id: TrackId, direction: Direction) -> Result<Option<Track>> {
        let (neighbor_sql, wrap_sql) = match direction {
            Direction::Next => (
                format!(
                    "SELECT {} FROM tracks WHERE id > ?1 ORDER BY id ASC LIMIT 1",
                    TRACK_COLUMNS
                ),
                format!("SELECT {} FROM tracks ORDER BY id ASC LIMIT 1", TRACK_COLUMNS),
            ),
            Direction::Previous => (
                format!(
                    "SELECT {} FROM tracks WHERE id < ?1 ORDER BY id DESC LIMIT 1",
                    TRACK_COLUMNS
                ),
                format!(
                    "SELECT {} FROM tracks ORDER BY id DESC LIMIT 1",
                    TRACK_COLUMNS
                ),
            ),
        };

        match self.query_track(&neighbor_sql, params![id.0])? {
            Some(track) => Ok(Some(track)),
            None => self.query_track(&wrap_sql, []),
        }
    }

    fn create_track(&self, track: NewTrack) -> Result<Track> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&format!(
            "INSERT INTO tracks (title, artist, album, audio_file_path, original_file_name)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {}",
            TRACK_COLUMNS
        ))?;
        let created = stmt
            .query_row(
                params![
                    track.title,
                    track.artist,
                    track.album,
                    track.audio_file_path,
                    track.original_file_name
                ],
                Self::parse_track_row,
            )
            .context("Failed to insert track")?;
        debug!("Created track {} at {}", created.id, created.audio_file_path);
        Ok(created)
    }

    fn count_tracks(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM tracks", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}
