use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Entry of a workspace channel listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    pub id: ChannelId,
    pub name: String,
}

impl ChannelSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ChannelId::new(id),
            name: name.into(),
        }
    }
}

/// How an inbound message event is treated by the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSubtype {
    /// Plain message typed by a person
    Normal,
    /// Posted by a bot, including our own relayed messages
    Bot,
    /// Edits, joins, topic changes and everything else
    Other(String),
}

/// A `message` event from a realtime connection
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub channel: ChannelId,
    pub subtype: MessageSubtype,
    pub user: Option<UserId>,
    pub text: String,
}

#[cfg(test)]
impl MessageEvent {
    pub fn normal(channel: &str, user: &str, text: &str) -> Self {
        Self {
            channel: ChannelId::new(channel),
            subtype: MessageSubtype::Normal,
            user: Some(UserId::new(user)),
            text: text.to_string(),
        }
    }
}

/// A message posted under someone else's name and avatar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub channel: ChannelId,
    pub text: String,
    pub username: String,
    pub icon_url: Option<String>,
}
