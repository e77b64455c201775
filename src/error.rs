use thiserror::Error;

pub type Result<T> = std::result::Result<T, VoiceAgentError>;

#[derive(Error, Debug)]
pub enum VoiceAgentError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("serialisation error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
