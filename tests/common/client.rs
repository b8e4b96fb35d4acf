//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per track endpoint. When routes or request
//! formats change, update only this file.

use super::constants::*;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use std::time::Duration;

/// Metadata sent along with an upload. `None` fields are left out of the form.
#[derive(Clone, Copy, Default)]
pub struct TrackFields<'a> {
    pub title: Option<&'a str>,
    pub artist: Option<&'a str>,
    pub album: Option<&'a str>,
}

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Track Endpoints
    // ========================================================================

    pub async fn list_tracks(&self) -> Response {
        self.get("/tracks").await
    }

    pub async fn list_tracks_page(&self, limit: usize, offset: usize) -> Response {
        self.get(&format!("/tracks?limit={}&offset={}", limit, offset))
            .await
    }

    pub async fn get_track(&self, id: &str) -> Response {
        self.get(&format!("/tracks/{}", id)).await
    }

    pub async fn get_artist_tracks(&self, artist: &str) -> Response {
        self.get(&format!("/artists/{}", artist)).await
    }

    pub async fn get_album_tracks(&self, album: &str) -> Response {
        self.get(&format!("/albums/{}", album)).await
    }

    pub async fn get_genre_tracks(&self, genre: &str) -> Response {
        self.get(&format!("/genres/{}", genre)).await
    }

    pub async fn get_next_track(&self, id: &str) -> Response {
        self.get(&format!("/next/{}", id)).await
    }

    pub async fn get_prev_track(&self, id: &str) -> Response {
        self.get(&format!("/prev/{}", id)).await
    }

    /// Fetches a stored audio file by the path a track reports.
    pub async fn get_audio(&self, audio_file_path: &str) -> Response {
        self.get(audio_file_path).await
    }

    // ========================================================================
    // Uploads
    // ========================================================================

    fn text_form(fields: TrackFields<'_>) -> Form {
        let mut form = Form::new();
        if let Some(title) = fields.title {
            form = form.text("title", title.to_string());
        }
        if let Some(artist) = fields.artist {
            form = form.text("artist", artist.to_string());
        }
        if let Some(album) = fields.album {
            form = form.text("album", album.to_string());
        }
        form
    }

    pub async fn post_form(&self, form: Form) -> Response {
        self.client
            .post(self.url("/tracks"))
            .multipart(form)
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn upload_track(
        &self,
        fields: TrackFields<'_>,
        file_name: &str,
        data: &[u8],
    ) -> Response {
        let part = Part::bytes(data.to_vec())
            .file_name(file_name.to_string())
            .mime_str("audio/mpeg")
            .expect("Invalid mime type");
        self.post_form(Self::text_form(fields).part("audioFile", part))
            .await
    }

    pub async fn upload_without_file(&self, fields: TrackFields<'_>) -> Response {
        self.post_form(Self::text_form(fields)).await
    }

    /// Uploads a small mp3 and returns the created track.
    ///
    /// # Panics
    ///
    /// Panics if the server does not answer 200.
    pub async fn create_track(&self, title: &str, artist: &str, album: &str) -> serde_json::Value {
        let response = self
            .upload_track(
                TrackFields {
                    title: Some(title),
                    artist: Some(artist),
                    album: Some(album),
                },
                &format!("{}.mp3", title),
                MP3_BYTES,
            )
            .await;
        let status = response.status();
        let body = response.text().await.expect("Failed to read body");
        assert_eq!(status, reqwest::StatusCode::OK, "Track creation failed: {}", body);
        serde_json::from_str(&body).expect("Invalid track JSON")
    }
}

