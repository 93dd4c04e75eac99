use std::process::ExitCode;

use custom_rpc_lib::discord::DiscordConnector;
use custom_rpc_lib::presence::PresenceSession;
use custom_rpc_lib::settings::{get_settings_path, load_settings, Settings};
use custom_rpc_lib::{driver, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _guard = match logging::init_logging(&logging::LogOptions::for_app()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let settings = match startup_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Fatal: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let connector = DiscordConnector::new(settings.handshake_timeout());
    let mut session = PresenceSession::new(settings, connector);

    // polled by the driver before it first connects, which installs the handler
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    match driver::run(&mut session, interrupt).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Exiting: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn startup_settings() -> Result<Settings, custom_rpc_lib::error::SettingsError> {
    let path = get_settings_path()?;
    let settings = load_settings(&path)?;
    settings.validate().map_err(|e| {
        tracing::error!("Edit {} and try again", path.display());
        e
    })?;
    Ok(settings)
}
