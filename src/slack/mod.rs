mod client;
mod events;
#[cfg(test)]
pub(crate) mod mock;
mod types;
mod workspace;

pub use client::SlackClient;
pub use events::{EventSource, SocketModeEventSource, classify, to_message_event};
pub use types::{
    ChannelId, ChannelSummary, MessageEvent, MessageSubtype, OutgoingMessage, UserId,
};
pub use workspace::WorkspaceApi;
