use crate::error::{BridgeError, Result};
use crate::slack::{ChannelId, MessageEvent, MessageSubtype, SlackClient, UserId};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use slack_morphism::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Capacity of the queue between a realtime connection and its relay engine
const EVENT_BUFFER: usize = 256;

/// How long a delivered message stays remembered for redelivery checks
const REDELIVERY_WINDOW: Duration = Duration::from_secs(3600);

/// Realtime side of one workspace connection
///
/// No events flow until `start` is called. The returned receiver closes when
/// the connection ends.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn start(&self) -> Result<mpsc::Receiver<MessageEvent>>;
}

/// Messages already forwarded, keyed by `channel:ts`
///
/// Socket Mode redelivers an event when the acknowledgement is late, so the
/// same message can arrive more than once.
#[derive(Default)]
pub struct DeliveryTracker {
    seen: DashMap<String, Instant>,
}

impl DeliveryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` the first time a message is seen, `false` for redeliveries
    pub fn first_delivery(&self, channel: &str, ts: &str) -> bool {
        match self.seen.entry(format!("{}:{}", channel, ts)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Instant::now());
                true
            }
        }
    }

    /// Forget messages older than `window`
    pub fn cleanup(&self, window: Duration) {
        let before = self.seen.len();
        self.seen.retain(|_, seen_at| seen_at.elapsed() < window);

        let removed = before.saturating_sub(self.seen.len());
        if removed > 0 {
            tracing::debug!(removed_count = removed, "Cleaned up delivered message keys");
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.seen.len()
    }
}

#[derive(Clone)]
struct ListenerState {
    team: String,
    events: mpsc::Sender<MessageEvent>,
    delivered: Arc<DeliveryTracker>,
}

/// Slack Socket Mode connection forwarding `message` events into a queue
pub struct SocketModeEventSource {
    slack_client: Arc<SlackClient>,
}

impl SocketModeEventSource {
    pub fn new(slack_client: Arc<SlackClient>) -> Self {
        Self { slack_client }
    }

    async fn handle_push_event(
        event: SlackPushEventCallback,
        _client: Arc<SlackHyperClient>,
        user_state: SlackClientEventsUserState,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let state: ListenerState = {
            let storage = user_state.read().await;
            storage
                .get_user_state::<ListenerState>()
                .ok_or("missing listener state")?
                .clone()
        };

        match event.event {
            SlackEventCallbackBody::Message(message) => {
                let Some(message_event) = to_message_event(&message) else {
                    tracing::debug!(team = %state.team, "Message event without channel, skipping");
                    return Ok(());
                };

                state.delivered.cleanup(REDELIVERY_WINDOW);
                let ts = message.origin.ts.to_string();
                if !state
                    .delivered
                    .first_delivery(message_event.channel.as_str(), &ts)
                {
                    tracing::debug!(
                        team = %state.team,
                        channel_id = %message_event.channel.as_str(),
                        ts = %ts,
                        "Duplicate delivery detected, skipping"
                    );
                    return Ok(());
                }

                if state.events.send(message_event).await.is_err() {
                    tracing::warn!(team = %state.team, "Relay engine gone, dropping event");
                }
            }
            _ => {
                tracing::trace!(team = %state.team, "Unhandled event type");
            }
        }

        Ok(())
    }

    fn error_handler(
        err: Box<dyn std::error::Error + Send + Sync>,
        _client: Arc<SlackHyperClient>,
        _states: SlackClientEventsUserState,
    ) -> HttpStatusCode {
        tracing::error!(
            error = %err,
            error_kind = std::any::type_name_of_val(&*err),
            "Slack event error"
        );
        HttpStatusCode::OK
    }
}

#[async_trait]
impl EventSource for SocketModeEventSource {
    async fn start(&self) -> Result<mpsc::Receiver<MessageEvent>> {
        let team = self.slack_client.label().to_string();
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        let state = ListenerState {
            team: team.clone(),
            events: tx,
            delivered: Arc::new(DeliveryTracker::new()),
        };

        let listener_environment = Arc::new(
            SlackClientEventsListenerEnvironment::new(self.slack_client.get_client())
                .with_error_handler(Self::error_handler)
                .with_user_state(state),
        );

        let callbacks =
            SlackSocketModeListenerCallbacks::new().with_push_events(Self::handle_push_event);

        let socket_mode_listener = SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment,
            callbacks,
        );

        tracing::info!(team = %team, "Connecting to Slack via Socket Mode");
        socket_mode_listener
            .listen_for(self.slack_client.get_app_token())
            .await
            .map_err(|e| BridgeError::SlackApi(e.to_string()))?;
        tracing::info!(team = %team, "Connected to Slack Socket Mode");

        tokio::spawn(async move {
            let exit_code = socket_mode_listener.serve().await;
            tracing::info!(team = %team, exit_code, "Socket Mode listener stopped");
        });

        Ok(rx)
    }
}

/// Convert a Slack `message` event; `None` when it carries no channel
pub fn to_message_event(message: &SlackMessageEvent) -> Option<MessageEvent> {
    let channel = message.origin.channel.as_ref()?;

    Some(MessageEvent {
        channel: ChannelId::new(channel.to_string()),
        subtype: classify(message.subtype.as_ref(), message.sender.bot_id.is_some()),
        user: message.sender.user.as_ref().map(|u| UserId::new(u.to_string())),
        text: message
            .content
            .as_ref()
            .and_then(|c| c.text.clone())
            .unwrap_or_default(),
    })
}

/// Classify a message by subtype; a bot id on a plain message also marks it as a bot post
pub fn classify(subtype: Option<&SlackMessageEventType>, has_bot_id: bool) -> MessageSubtype {
    match subtype {
        Some(SlackMessageEventType::BotMessage) => MessageSubtype::Bot,
        Some(other) => MessageSubtype::Other(format!("{:?}", other)),
        None if has_bot_id => MessageSubtype::Bot,
        None => MessageSubtype::Normal,
    }
}
