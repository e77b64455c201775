use anyhow::Context;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::Path;
use tracing::*;

use super::{OPENAI_API_URL, PROVIDER_TIMEOUT};

const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Outcome of one transcription attempt. Failures are in-band, the adapter
/// never returns an error to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsrOutcome {
    /// Provider transcript, possibly empty
    Transcript(String),
    NotConfigured,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AsrClient {
    http: reqwest::Client,
    api_key: Option<Secret<String>>,
    base_url: String,
}

impl AsrClient {
    pub fn new(api_key: Option<Secret<String>>) -> Self {
        Self::with_base_url(api_key, OPENAI_API_URL.to_owned())
    }

    pub fn with_base_url(api_key: Option<Secret<String>>, base_url: String) -> Self {
        AsrClient {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    pub async fn transcribe(&self, audio_path: &Path, language: &str) -> AsrOutcome {
        let api_key = match &self.api_key {
            Some(key) => key.clone(),
            None => return AsrOutcome::NotConfigured,
        };
        match self.request_transcription(&api_key, audio_path, language).await {
            Ok(text) => {
                info!("Transcribed {} characters", text.len());
                AsrOutcome::Transcript(text)
            }
            Err(error) => {
                warn!("Transcription failed: {:#}", error);
                AsrOutcome::Failed(format!("{:#}", error))
            }
        }
    }

    async fn request_transcription(
        &self,
        api_key: &Secret<String>,
        audio_path: &Path,
        language: &str,
    ) -> anyhow::Result<String> {
        let audio_bytes = tokio::fs::read(audio_path)
            .await
            .context("Failed to read audio file")?;
        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_owned());

        let file_part = reqwest::multipart::Part::bytes(audio_bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", TRANSCRIPTION_MODEL)
            .text("language", language.to_owned())
            .text("response_format", "json");

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .multipart(form)
            .timeout(PROVIDER_TIMEOUT)
            .send()
            .await
            .context("Failed to send transcription request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("transcription provider returned {}: {}", status, body);
        }

        let transcription: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse transcription response")?;
        Ok(transcription.text)
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}
