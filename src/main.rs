use anyhow::Context;
use clap::Parser;
use slack_bridge::Bridge;
use slack_bridge::cli::Cli;
use slack_bridge::config::load_settings;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize rustls crypto provider
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter())),
        )
        .with_target(true)
        .with_line_number(true)
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %format!("{:#}", e), "Bridge stopped");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Slack bridge");

    let settings = load_settings(&cli.config, cli.verbose, cli.port)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    tracing::info!(
        team1_channel = %settings.team1.channel,
        team2_channel = %settings.team2.channel,
        verbose = settings.verbose,
        "Configuration loaded"
    );
    tracing::debug!(port = settings.port, "Port reserved for HTTP listener, not used by relay");

    let bridge = Bridge::from_settings(&settings).context("failed to create Slack clients")?;
    let profiles = bridge.profiles();

    let result = tokio::select! {
        result = bridge.run() => {
            let stats = result?;
            tracing::info!(
                forward_relayed = stats.forward.relayed,
                backward_relayed = stats.backward.relayed,
                failed = stats.forward.failed + stats.backward.failed,
                "Both event streams closed"
            );
            Ok(())
        }
        signal_name = shutdown_signal() => {
            let signal_name = signal_name.context("failed to install signal handlers")?;
            tracing::info!(signal = %signal_name, "Received shutdown signal");
            Ok(())
        }
    };

    profiles.log_stats().await;
    tracing::info!("Shutdown complete");
    result
}

/// Wait for SIGINT (Ctrl+C), SIGTERM or SIGQUIT on Unix, Ctrl+C elsewhere
async fn shutdown_signal() -> std::io::Result<String> {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigquit = signal(SignalKind::quit())?;

        let name = tokio::select! {
            _ = sigint.recv() => "SIGINT (Ctrl+C)",
            _ = sigterm.recv() => "SIGTERM",
            _ = sigquit.recv() => "SIGQUIT",
        };
        Ok(name.to_string())
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        Ok("Ctrl+C".to_string())
    }
}
