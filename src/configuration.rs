use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::*;

/// Use default config if no path is provided
pub fn get_configuration(config: Option<PathBuf>) -> crate::error::Result<AppConfig> {
    let mut builder = config::Config::builder();

    if let Some(config) = config {
        info!("Using configuration from {:?}", config);
        builder = builder.add_source(config::File::from(config));
    } else {
        info!("Using default configuration");
        builder = builder
            .add_source(config::File::with_name("configuration/settings").required(false))
            .add_source(config::File::with_name("configuration/dev_settings").required(false));
    }

    let settings = builder
        .add_source(config::Environment::default().separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Shared credential for the transcription and chat-completion provider
    pub openai_api_key: Option<Secret<String>>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    pub elevenlabs_api_key: Option<Secret<String>>,
    #[serde(default = "default_elevenlabs_voice")]
    pub elevenlabs_voice: String,
    // optional future integration
    pub synthflow_api_url: Option<String>,
    pub synthflow_api_key: Option<Secret<String>>,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_submissions_file")]
    pub submissions_file: PathBuf,
}

impl AppConfig {
    /// Empty keys count as absent so that `OPENAI_API_KEY=""` behaves
    /// like an unset variable
    pub fn openai_credentials(&self) -> Option<Secret<String>> {
        self.openai_api_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
            .cloned()
    }

    pub fn elevenlabs_credentials(&self) -> Option<Secret<String>> {
        self.elevenlabs_api_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
            .cloned()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_owned()
}

fn default_elevenlabs_voice() -> String {
    "Bella".to_owned()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_submissions_file() -> PathBuf {
    PathBuf::from("submissions.json")
}
