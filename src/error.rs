use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Slack API error: {0}")]
    SlackApi(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
