//! Storage of uploaded audio files.
//!
//! Uploads land in a single flat directory which the server exposes under
//! `/audio`. Stored names are generated; the client's filename is only kept
//! as metadata on the track.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

/// URL prefix the upload directory is mounted at.
pub const AUDIO_ROUTE_PREFIX: &str = "/audio";

/// Extensions a stored file may keep. `/audio` picks the content type from it.
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "ogg", "m4a", "aac", "wma", "opus"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File too large: {0} bytes (max: {1})")]
    FileTooLarge(u64, u64),
}

/// An audio file written to the upload directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredAudio {
    /// Name of the file inside the upload directory.
    pub file_name: String,
    /// Filename as sent by the client.
    pub original_file_name: String,
    /// Path the file is served at, e.g. `/audio/<file_name>`.
    pub public_path: String,
}

#[derive(Clone, Debug)]
pub struct AudioUploads {
    dir: PathBuf,
    max_file_size: u64,
}

impl AudioUploads {
    pub fn new(dir: impl Into<PathBuf>, max_file_size: u64) -> Self {
        Self {
            dir: dir.into(),
            max_file_size,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Creates the upload directory if needed.
    pub async fn init(&self) -> Result<(), UploadError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Writes `data` under a freshly generated name.
    pub async fn save(
        &self,
        original_file_name: &str,
        data: &[u8],
    ) -> Result<StoredAudio, UploadError> {
        let size = data.len() as u64;
        if size > self.max_file_size {
            return Err(UploadError::FileTooLarge(size, self.max_file_size));
        }

        let file_name = generate_file_name(original_file_name, data);

        fs::create_dir_all(&self.dir).await?;
        let file_path = self.dir.join(&file_name);
        let mut file = fs::File::create(&file_path).await?;
        file.write_all(data).await?;
        file.flush().await?;

        debug!(
            "Stored upload {:?} as {:?} ({} bytes)",
            original_file_name, file_path, size
        );

        Ok(StoredAudio {
            public_path: public_path(&file_name),
            file_name,
            original_file_name: original_file_name.to_string(),
        })
    }

    /// Removes a stored file whose track could not be persisted.
    pub async fn discard(&self, stored: &StoredAudio) -> Result<(), UploadError> {
        fs::remove_file(self.dir.join(&stored.file_name)).await?;
        Ok(())
    }
}

pub fn public_path(file_name: &str) -> String {
    format!("{}/{}", AUDIO_ROUTE_PREFIX, file_name)
}

fn generate_file_name(original_file_name: &str, data: &[u8]) -> String {
    let stem = Uuid::new_v4().simple().to_string();
    match stored_extension(original_file_name, data) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

/// Extension of the client filename if it is a known audio one, otherwise
/// whatever audio type the content sniffs as. Non-audio content gets none.
fn stored_extension(original_file_name: &str, data: &[u8]) -> Option<String> {
    let from_name = Path::new(original_file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| SUPPORTED_EXTENSIONS.contains(&e.as_str()));

    from_name.or_else(|| {
        infer::get(data)
            .filter(|kind| kind.matcher_type() == infer::MatcherType::Audio)
            .map(|kind| kind.extension().to_string())
    })
}
