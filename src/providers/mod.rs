mod asr;
mod llm;
mod tts;

pub use asr::{AsrClient, AsrOutcome};
pub use llm::{LlmClient, LlmOutcome};
pub use tts::{TtsClient, TtsFailure};

use std::time::Duration;

/// Every provider call enforces its own fixed timeout, independent of any
/// client-side deadline
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(60);

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const ELEVEN_LABS_API_URL: &str = "https://api.elevenlabs.io/v1";
