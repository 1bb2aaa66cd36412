//! Track resource wrapper.

use std::path::Path;

use melograph_client::{cleaned_audio_summary, endpoint, Client, MelographError, Payload, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::instrument;

const ENTITY: &str = "track";

/// Wrapper for track analysis operations.
#[derive(Debug, Clone)]
pub struct Track {
    client: Client,
}

/// Analysis profile of a previously uploaded track.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackProfile {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    /// Analysis state reported by the service (e.g. "complete", "pending").
    #[serde(default)]
    pub status: Option<String>,
    /// Acoustic feature mapping, normalized so `speechiness` is always
    /// present.
    #[serde(default)]
    pub audio_summary: Option<Map<String, Value>>,
    /// Fields this crate does not model explicitly.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Receipt for an upload submission.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackUpload {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Track {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches the analysis profile for a track id, including its audio
    /// summary bucket.
    #[instrument(skip(self))]
    pub async fn profile(&self, id: &str) -> Result<TrackProfile> {
        if id.trim().is_empty() {
            return Err(MelographError::MissingArgument("id"));
        }

        let payload = self
            .client
            .get(
                &endpoint(ENTITY, "profile"),
                &[("id", id), ("bucket", "audio_summary")],
            )
            .await?;

        let mut track = take_track(payload)?;
        let summary = match track.remove("audio_summary") {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        };
        if let Some(summary) = cleaned_audio_summary(summary) {
            track.insert("audio_summary".to_string(), Value::Object(summary));
        }

        from_track(track)
    }

    /// Uploads a local audio file for analysis, streaming its bytes as the
    /// request body.
    #[instrument(skip(self, file_path))]
    pub async fn upload(&self, file_path: impl AsRef<Path>) -> Result<TrackUpload> {
        let file_path = file_path.as_ref();
        if file_path.as_os_str().is_empty() {
            return Err(MelographError::MissingArgument("file_path"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );

        let payload = self
            .client
            .post(
                &endpoint(ENTITY, "upload"),
                &[("filetype", "mp3")],
                headers,
                Some(file_path),
            )
            .await?;

        from_track(take_track(payload)?)
    }

    /// Registers a remote audio URL for analysis instead of uploading a
    /// local file.
    #[instrument(skip(self))]
    pub async fn upload_url(&self, url: &str) -> Result<TrackUpload> {
        if url.trim().is_empty() {
            return Err(MelographError::MissingArgument("url"));
        }

        let payload = self
            .client
            .post(
                &endpoint(ENTITY, "upload"),
                &[("url", url)],
                HeaderMap::new(),
                None,
            )
            .await?;

        from_track(take_track(payload)?)
    }
}

fn take_track(mut payload: Payload) -> Result<Map<String, Value>> {
    match payload.remove("track") {
        Some(Value::Object(track)) => Ok(track),
        _ => Err(MelographError::InvalidResponse(
            "payload has no track member".to_string(),
        )),
    }
}

fn from_track<T: DeserializeOwned>(track: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(track))
        .map_err(|e| MelographError::InvalidResponse(format!("malformed track payload: {}", e)))
}
