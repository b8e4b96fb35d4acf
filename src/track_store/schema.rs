//! SQLite schema of the track store.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};
use anyhow::Result;
use rusqlite::Connection;

const TRACKS_TABLE_V0: Table = Table {
    name: "tracks",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text),
        sqlite_column!("artist", &SqlType::Text),
        sqlite_column!("album", &SqlType::Text),
        sqlite_column!("audio_file_path", &SqlType::Text, non_null = true),
    ],
    indices: &[
        ("idx_tracks_artist", "artist"),
        ("idx_tracks_album", "album"),
    ],
};

/// V1 keeps the client filename as metadata and records the creation time.
const TRACKS_TABLE_V1: Table = Table {
    name: "tracks",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text),
        sqlite_column!("artist", &SqlType::Text),
        sqlite_column!("album", &SqlType::Text),
        sqlite_column!("audio_file_path", &SqlType::Text, non_null = true),
        sqlite_column!("original_file_name", &SqlType::Text),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[
        ("idx_tracks_artist", "artist"),
        ("idx_tracks_album", "album"),
    ],
};

// SQLite can't ADD COLUMN with a non-constant default, so the table is rebuilt.
fn migrate_v0_to_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "ALTER TABLE tracks RENAME TO tracks_v0;
         DROP INDEX idx_tracks_artist;
         DROP INDEX idx_tracks_album;",
    )?;
    TRACKS_TABLE_V1.create(conn)?;
    conn.execute_batch(
        "INSERT INTO tracks (id, title, artist, album, audio_file_path)
             SELECT id, title, artist, album, audio_file_path FROM tracks_v0;
         DROP TABLE tracks_v0;",
    )?;
    Ok(())
}

pub const TRACK_VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 0,
        tables: &[TRACKS_TABLE_V0],
        migration: None,
    },
    VersionedSchema {
        version: 1,
        tables: &[TRACKS_TABLE_V1],
        migration: Some(migrate_v0_to_v1),
    },
];
