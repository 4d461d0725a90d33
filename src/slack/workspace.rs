use crate::error::Result;
use crate::profile::UserProfile;
use crate::slack::{ChannelSummary, OutgoingMessage, UserId};
use async_trait::async_trait;

/// Query side of one workspace connection
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// List channels visible to the bot
    async fn list_channels(&self) -> Result<Vec<ChannelSummary>>;

    /// Fetch a user's name and avatar
    async fn get_user(&self, user_id: &UserId) -> Result<UserProfile>;

    /// Post a message with impersonated name and avatar
    async fn post_message(&self, message: &OutgoingMessage) -> Result<()>;
}
