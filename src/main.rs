use anyhow::Context;
use imshell::{profiling::Instrumentor, App, AppConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    if config.debug.profile {
        if let Err(e) = Instrumentor::begin_session("imshell", &config.debug.profile_output) {
            log::error!(
                "Failed to open profile '{}': {}. Profiling disabled.",
                config.debug.profile_output.display(),
                e
            );
        }
    }

    let result = App::new(config)
        .and_then(App::run)
        .context("imshell exited with an error");

    // A broken trace file must not hide the run's own outcome
    if let Err(e) = Instrumentor::end_session() {
        log::error!("Failed to write the profile: {}", e);
    }
    result
}
