use futures::TryStreamExt;
use secrecy::{ExposeSecret, Secret};
use std::path::Path;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::*;

use super::{ELEVEN_LABS_API_URL, PROVIDER_TIMEOUT};

/// Expected, in-band synthesis failures. The orchestrator treats any of
/// these as "no audio for this request"; they never reach the client.
#[derive(Error, Debug)]
pub enum TtsFailure {
    #[error("synthesis credentials not configured")]
    NotConfigured,
    #[error("synthesis request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("synthesis provider returned status {0}")]
    BadStatus(reqwest::StatusCode),
    #[error("failed writing audio file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct TtsClient {
    http: reqwest::Client,
    api_key: Option<Secret<String>>,
    base_url: String,
}

impl TtsClient {
    pub fn new(api_key: Option<Secret<String>>) -> Self {
        Self::with_base_url(api_key, ELEVEN_LABS_API_URL.to_owned())
    }

    pub fn with_base_url(api_key: Option<Secret<String>>, base_url: String) -> Self {
        TtsClient {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    /// Streams the synthesized audio to `out_path`. A partial file may be
    /// left behind on failure; callers must treat the returned result as
    /// the only signal that the file is usable.
    pub async fn synthesize_to_file(
        &self,
        text: &str,
        voice: &str,
        out_path: &Path,
    ) -> Result<(), TtsFailure> {
        let api_key = match &self.api_key {
            Some(key) => key.clone(),
            None => return Err(TtsFailure::NotConfigured),
        };

        let body = serde_json::json!({
            "text": text,
            "voice_settings": {"stability": 0.4, "similarity_boost": 0.75},
        });

        let response = self
            .http
            .post(format!("{}/text-to-speech/{}", self.base_url, voice))
            .header("xi-api-key", api_key.expose_secret())
            .json(&body)
            .timeout(PROVIDER_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(TtsFailure::BadStatus(status));
        }

        let mut file = tokio::fs::File::create(out_path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.try_next().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        debug!("Wrote synthesized audio to {:?}", out_path);
        Ok(())
    }
}
