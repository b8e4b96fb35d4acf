//! Track models shared by the store and the HTTP layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Store-assigned track identifier, strictly increasing in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub i64);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid track id: {0:?}")]
pub struct InvalidTrackId(pub String);

impl FromStr for TrackId {
    type Err = InvalidTrackId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i64>() {
            Ok(value) if value > 0 => Ok(TrackId(value)),
            _ => Err(InvalidTrackId(s.to_string())),
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted track.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(rename = "_id")]
    pub id: TrackId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Public URL path of the audio file, `/audio/<stored name>`.
    pub audio_file_path: String,
    /// Filename the client uploaded with; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
    /// Creation time, unix seconds.
    pub created: i64,
}

/// Data for a track about to be created.
#[derive(Clone, Debug, Default)]
pub struct NewTrack {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub audio_file_path: String,
    pub original_file_name: Option<String>,
}

/// Exact, case-sensitive match on a single track field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackFilter {
    Artist(String),
    Album(String),
    /// Tracks carry no genre, so this never matches anything.
    Genre(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// A window over the creation-ordered track list. No limit means "until the end".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<usize>,
    pub offset: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids_only() {
        assert_eq!("42".parse::<TrackId>(), Ok(TrackId(42)));
        assert!("0".parse::<TrackId>().is_err());
        assert!("-3".parse::<TrackId>().is_err());
        assert!("abc".parse::<TrackId>().is_err());
        assert!("".parse::<TrackId>().is_err());
        assert!("65f1c0ffee".parse::<TrackId>().is_err());
    }

    #[test]
    fn serializes_with_catalog_field_names() {
        let track = Track {
            id: TrackId(7),
            title: Some("Song".to_string()),
            artist: None,
            album: Some("Album".to_string()),
            audio_file_path: "/audio/abc.mp3".to_string(),
            original_file_name: Some("song.mp3".to_string()),
            created: 1_700_000_000,
        };

        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(json["_id"], 7);
        assert_eq!(json["title"], "Song");
        assert!(json.get("artist").is_none());
        assert_eq!(json["audioFilePath"], "/audio/abc.mp3");
        assert_eq!(json["originalFileName"], "song.mp3");
    }
}
