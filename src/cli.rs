use clap::Parser;
use std::path::PathBuf;

/// Relay messages between channels of two Slack workspaces
#[derive(Debug, Parser)]
#[command(name = "slack-bridge", version, about)]
pub struct Cli {
    /// Set the path of the config file
    #[arg(short, long, default_value = "./config.json")]
    pub config: PathBuf,

    /// Specify the port to be listened (reserved, not used by the relay)
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    /// Show verbose logging and echo every event from the bridged channels
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Default tracing filter when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "slack_bridge=debug,slack_morphism=info"
        } else {
            "slack_bridge=info,slack_morphism=warn"
        }
    }
}
