//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own database and upload directory.

use super::constants::*;
use badaga_music_server::server::{make_app, state::GuardedTrackStore, RequestsLoggingLevel, ServerConfig};
use badaga_music_server::track_store::SqliteTrackStore;
use badaga_music_server::uploads::AudioUploads;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with isolated storage
///
/// When dropped, the server shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Directory uploaded audio files land in
    pub upload_dir: PathBuf,

    /// The store the server reads from, for direct checks in tests
    pub track_store: GuardedTrackStore,

    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server backed by a fresh SQLite database on a random port
    pub async fn spawn() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let track_store: GuardedTrackStore = Arc::new(
            SqliteTrackStore::new(temp_dir.path().join("tracks.db"))
                .expect("Failed to open track store"),
        );
        Self::spawn_in(temp_dir, track_store).await
    }

    /// Spawns a server on top of the given store
    pub async fn spawn_with_store(track_store: GuardedTrackStore) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self::spawn_in(temp_dir, track_store).await
    }

    async fn spawn_in(temp_dir: TempDir, track_store: GuardedTrackStore) -> Self {
        let upload_dir = temp_dir.path().join("uploads");
        let max_upload_size_bytes = TEST_MAX_UPLOAD_SIZE_MB * 1024 * 1024;
        let uploads = AudioUploads::new(&upload_dir, max_upload_size_bytes);
        uploads
            .init()
            .await
            .expect("Failed to create upload directory");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
            max_upload_size_bytes,
        };
        let app = make_app(config, track_store.clone(), uploads);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            upload_dir,
            track_store,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Polls the home endpoint until the server answers
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
