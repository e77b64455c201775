use clap::Parser;
use std::path::PathBuf;
use tracing::*;
use voice_agent::{
    agent::VoiceAgentService,
    configuration::get_configuration,
    contact::ContactStore,
    logging::setup_tracing,
    providers::{AsrClient, LlmClient, TtsClient},
    server::start_server,
    voice_map::VoiceMap,
};

#[derive(Parser, Debug)]
#[command(version, author, about = "Voice agent backend server")]
struct Opts {
    /// Path to the settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    setup_tracing(opts.verbose);

    let app_config = get_configuration(opts.config)?;

    std::fs::create_dir_all(&app_config.static_dir)?;

    let voices = VoiceMap::from_env();
    info!("Loaded {} voice mapping(s)", voices.len());

    let agent = VoiceAgentService::new(
        AsrClient::new(app_config.openai_credentials()),
        LlmClient::new(
            app_config.openai_credentials(),
            app_config.openai_model.clone(),
        ),
        TtsClient::new(app_config.elevenlabs_credentials()),
        voices,
        app_config.elevenlabs_voice.clone(),
        app_config.static_dir.clone(),
    );

    let contact_store = ContactStore::new(app_config.submissions_file.clone())?;

    start_server(&app_config, agent, contact_store).await?;
    Ok(())
}
