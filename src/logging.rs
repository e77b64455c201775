use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn setup_tracing(verbosity_level: u8) {
    let filter = match verbosity_level {
        0 => tracing::level_filters::LevelFilter::INFO,
        1 => tracing::level_filters::LevelFilter::DEBUG,
        _ => tracing::level_filters::LevelFilter::TRACE,
    };

    let stderr_layer = fmt::Layer::default()
        .with_thread_names(true)
        .with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(filter.into()))
        .with(stderr_layer);

    tracing::subscriber::set_global_default(subscriber).expect("unable to set global subscriber");
}
