use std::process::ExitCode;

use resolve_presence::config::PresenceConfig;
use resolve_presence::discord::DiscordClient;
use resolve_presence::logging;
use resolve_presence::presence::Reconciler;
use resolve_presence::startup::{self, StartupError};

fn main() -> ExitCode {
    let _guard = logging::init_logging();

    let config = PresenceConfig::default();

    let probe = match startup::check_dependencies(&config) {
        Ok(probe) => probe,
        Err(e) => {
            startup::report_startup_error(&e);
            return ExitCode::from(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            startup::report_startup_error(&StartupError::Runtime(e));
            return ExitCode::from(1);
        }
    };

    runtime.block_on(async move {
        let client = DiscordClient::new(&config);
        let reconciler = Reconciler::new(config, probe, client);

        tracing::info!("Discord RPC for DaVinci Resolve is running...");
        reconciler.run_until(shutdown_signal()).await;
    });

    tracing::info!("Exiting...");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C, running until killed: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
