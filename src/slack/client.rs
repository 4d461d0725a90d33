use crate::config::TeamConfig;
use crate::error::{BridgeError, Result};
use crate::profile::UserProfile;
use crate::slack::{ChannelSummary, OutgoingMessage, UserId, WorkspaceApi};
use async_trait::async_trait;
use slack_morphism::prelude::*;
use std::sync::Arc;

/// Avatar size used when impersonating a sender
const AVATAR_SIZE: u32 = 48;

/// Page size for `conversations.list`
const CHANNEL_PAGE_LIMIT: u16 = 200;

pub struct SlackClient {
    label: String,
    client: Arc<SlackHyperClient>,
    token: SlackApiToken,
    app_token: SlackApiToken,
}

impl SlackClient {
    pub fn new(team: &TeamConfig) -> Result<Self> {
        let connector = SlackClientHyperConnector::new()
            .map_err(|e| BridgeError::SlackApi(e.to_string()))?;

        let client = Arc::new(slack_morphism::SlackClient::new(connector));
        let token = SlackApiToken::new(team.bot_token.clone().into());
        let app_token = SlackApiToken::new(team.app_token.clone().into());

        Ok(Self {
            label: team.label.clone(),
            client,
            token,
            app_token,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn get_client(&self) -> Arc<SlackHyperClient> {
        self.client.clone()
    }

    pub fn get_app_token(&self) -> &SlackApiToken {
        &self.app_token
    }

    /// Get every public and private channel visible to the bot, following pagination
    pub async fn list_all_channels(&self) -> Result<Vec<ChannelSummary>> {
        tracing::debug!(team = %self.label, "Fetching channel list from Slack API");
        let session = self.client.open_session(&self.token);

        let mut channels = Vec::new();
        let mut cursor: Option<SlackCursorId> = None;

        loop {
            let mut request = SlackApiConversationsListRequest::new()
                .with_types(vec![
                    SlackConversationType::Public,
                    SlackConversationType::Private,
                ])
                .with_exclude_archived(true)
                .with_limit(CHANNEL_PAGE_LIMIT);

            if let Some(next) = cursor.take() {
                request = request.with_cursor(next);
            }

            let response = session
                .conversations_list(&request)
                .await
                .map_err(|e| BridgeError::SlackApi(e.to_string()))?;

            channels.extend(response.channels.into_iter().filter_map(|c| {
                c.name
                    .map(|name| ChannelSummary::new(c.id.to_string(), name))
            }));

            cursor = response
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.0.is_empty());

            if cursor.is_none() {
                break;
            }
        }

        tracing::debug!(
            team = %self.label,
            channel_count = channels.len(),
            "Received channel list"
        );

        Ok(channels)
    }

    /// Get user name and avatar from Slack API
    pub async fn get_user_profile(&self, user_id: &UserId) -> Result<UserProfile> {
        let session = self.client.open_session(&self.token);

        let request = SlackApiUsersInfoRequest::new(SlackUserId(user_id.as_str().to_string()));

        let response = session
            .users_info(&request)
            .await
            .map_err(|e| BridgeError::SlackApi(e.to_string()))?;

        let user = response.user;

        let avatar_url = user
            .profile
            .as_ref()
            .and_then(|p| p.icon.as_ref())
            .and_then(|icon| {
                icon.images
                    .as_ref()
                    .and_then(|images| {
                        images
                            .resolutions
                            .iter()
                            .find(|(size, _)| *size == AVATAR_SIZE)
                            .map(|(_, url)| url.clone())
                    })
                    .or_else(|| icon.image_original.clone())
            });

        Ok(UserProfile {
            id: user_id.clone(),
            display_name: user.name.unwrap_or_else(|| user_id.as_str().to_string()),
            avatar_url,
        })
    }

    /// Post a message under the sender's name and avatar instead of the bot identity
    pub async fn post_as(&self, message: &OutgoingMessage) -> Result<()> {
        let session = self.client.open_session(&self.token);

        let mut request = SlackApiChatPostMessageRequest::new(
            message.channel.as_str().into(),
            SlackMessageContent::new().with_text(message.text.clone()),
        );

        request.as_user = Some(false);
        request.link_names = Some(true);
        request.username = Some(message.username.clone());
        request.icon_url = message.icon_url.clone();

        session
            .chat_post_message(&request)
            .await
            .map_err(|e| BridgeError::SlackApi(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl WorkspaceApi for SlackClient {
    async fn list_channels(&self) -> Result<Vec<ChannelSummary>> {
        self.list_all_channels().await
    }

    async fn get_user(&self, user_id: &UserId) -> Result<UserProfile> {
        self.get_user_profile(user_id).await
    }

    async fn post_message(&self, message: &OutgoingMessage) -> Result<()> {
        self.post_as(message).await
    }
}
