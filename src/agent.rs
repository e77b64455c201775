use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::*;
use uuid::Uuid;

use crate::error::Result;
use crate::providers::{AsrClient, AsrOutcome, LlmClient, LlmOutcome, TtsClient};
use crate::voice_map::VoiceMap;
use crate::AUDIO_FILE_EXTENSION;

const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_UPLOAD_EXTENSION: &str = "wav";

// Sentinel texts only exist at this response boundary; the adapters
// themselves report outcomes as enums.
const ASR_NOT_CONFIGURED_TEXT: &str = "[ASR not configured - set OPENAI_API_KEY]";
const LLM_NOT_CONFIGURED_TEXT: &str = "[LLM not configured - set OPENAI_API_KEY]";
const LLM_SKIPPED_TEXT: &str = "[LLM unavailable due to ASR error or missing config]";

/// Response body of one voice-agent cycle, never persisted
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VoiceAgentResult {
    pub transcript: String,
    pub response_text: String,
    pub tts_audio_url: Option<String>,
}

/// Sequences ASR, LLM and TTS for one uploaded audio file
pub struct VoiceAgentService {
    asr: AsrClient,
    llm: LlmClient,
    tts: TtsClient,
    voices: VoiceMap,
    default_voice: String,
    static_dir: PathBuf,
}

impl VoiceAgentService {
    pub fn new(
        asr: AsrClient,
        llm: LlmClient,
        tts: TtsClient,
        voices: VoiceMap,
        default_voice: String,
        static_dir: PathBuf,
    ) -> Self {
        VoiceAgentService {
            asr,
            llm,
            tts,
            voices,
            default_voice,
            static_dir,
        }
    }

    /// Each adapter is called at most once; adapter failures are folded
    /// into the result body. Only failing to stage the upload itself is a
    /// genuine error.
    pub async fn handle_voice_request(
        &self,
        audio: &[u8],
        filename: Option<&str>,
        language: Option<&str>,
    ) -> Result<VoiceAgentResult> {
        let temp_path = temp_audio_path(filename);
        tokio::fs::write(&temp_path, audio).await?;

        let language = language
            .filter(|tag| !tag.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_lowercase();

        let asr_outcome = self.asr.transcribe(&temp_path, &language).await;

        let response_text = match &asr_outcome {
            AsrOutcome::Transcript(text) if !text.is_empty() => {
                match self.llm.respond(text, &language).await {
                    LlmOutcome::Reply(reply) => reply,
                    LlmOutcome::NotConfigured => LLM_NOT_CONFIGURED_TEXT.to_owned(),
                    LlmOutcome::Failed(message) => format!("[LLM error: {}]", message),
                }
            }
            _ => LLM_SKIPPED_TEXT.to_owned(),
        };

        let transcript = match asr_outcome {
            AsrOutcome::Transcript(text) => text,
            AsrOutcome::NotConfigured => ASR_NOT_CONFIGURED_TEXT.to_owned(),
            AsrOutcome::Failed(message) => format!("[ASR error: {}]", message),
        };

        let voice = self.voices.choose(&language, &self.default_voice);
        let out_filename = format!("generated_{}.{}", Uuid::new_v4().simple(), AUDIO_FILE_EXTENSION);
        let out_path = self.static_dir.join(&out_filename);
        let tts_audio_url = match self
            .tts
            .synthesize_to_file(&response_text, voice, &out_path)
            .await
        {
            Ok(()) => Some(format!("/static/{}", out_filename)),
            Err(error) => {
                warn!("Synthesis skipped: {}", error);
                None
            }
        };

        // best-effort cleanup
        if let Err(error) = tokio::fs::remove_file(&temp_path).await {
            debug!("Failed to remove temp file {:?}: {}", temp_path, error);
        }

        Ok(VoiceAgentResult {
            transcript,
            response_text,
            tts_audio_url,
        })
    }
}

/// Uniquely named path under the OS temp dir, keeping the upload's
/// extension so the transcription provider can detect the container
fn temp_audio_path(filename: Option<&str>) -> PathBuf {
    let extension = filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|extension| extension.to_str())
        .unwrap_or(DEFAULT_UPLOAD_EXTENSION);
    std::env::temp_dir().join(format!("{}.{}", Uuid::new_v4().simple(), extension))
}
