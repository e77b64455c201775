pub mod agent;
pub mod configuration;
pub mod contact;
pub mod error;
pub mod logging;
pub mod providers;
pub mod server;
pub mod voice_map;

const AUDIO_FILE_EXTENSION: &str = "mp3";
