use crate::config::TeamConfig;
use crate::error::{BridgeError, Result};
use crate::slack::{ChannelId, WorkspaceApi};
use std::fmt;
use std::sync::Arc;

/// A team whose configured channel name has been resolved to a channel id
///
/// Only `resolve_channel` builds one, and the id cannot change afterwards.
#[derive(Clone)]
pub struct BoundConnection {
    label: String,
    channel_name: String,
    channel_id: ChannelId,
    client: Arc<dyn WorkspaceApi>,
}

impl BoundConnection {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    pub fn client(&self) -> &dyn WorkspaceApi {
        self.client.as_ref()
    }
}

impl fmt::Debug for BoundConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundConnection")
            .field("label", &self.label)
            .field("channel_name", &self.channel_name)
            .field("channel_id", &self.channel_id)
            .finish_non_exhaustive()
    }
}

/// Look up the team's channel by name and bind its id
///
/// A name that matches no channel is a fatal configuration error.
pub async fn resolve_channel(
    team: &TeamConfig,
    client: Arc<dyn WorkspaceApi>,
) -> Result<BoundConnection> {
    let channels = client.list_channels().await?;

    let Some(channel) = channels.into_iter().find(|c| c.name == team.channel) else {
        tracing::error!(
            team = %team.label,
            channel = %team.channel,
            "Channel not found"
        );
        return Err(BridgeError::ChannelNotFound(team.channel.clone()));
    };

    tracing::info!(
        team = %team.label,
        channel = %team.channel,
        channel_id = %channel.id.as_str(),
        "Channel bound"
    );

    Ok(BoundConnection {
        label: team.label.clone(),
        channel_name: team.channel.clone(),
        channel_id: channel.id,
        client,
    })
}
