//! Shared constants for end-to-end tests

// ============================================================================
// Timeouts
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Upload limits
// ============================================================================

/// Upload limit the test server runs with, in megabytes.
pub const TEST_MAX_UPLOAD_SIZE_MB: u64 = 1;

// ============================================================================
// Track data
// ============================================================================

pub const ARTIST_KOTA: &str = "Kota Singers";

pub const ARTIST_TODA: &str = "Toda Choir";

pub const ALBUM_HILLS: &str = "Songs of the Hills";

/// Smallest thing that sniffs as an mp3.
pub const MP3_BYTES: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00badaga";
