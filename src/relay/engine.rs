use crate::error::Result;
use crate::logging::{Timer, log_error};
use crate::profile::ProfileCache;
use crate::relay::{BoundConnection, MentionResolver};
use crate::slack::{MessageEvent, MessageSubtype, OutgoingMessage};
use std::sync::Arc;
use tokio::sync::mpsc;

/// What happened to one inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Posted into the destination channel
    Relayed,
    /// Not from the bound channel
    OtherChannel,
    /// Posted by a bot; relaying it would echo messages back and forth
    BotMessage,
    /// Edits, joins and other subtypes
    Unsupported(String),
    /// Normal message with nothing to relay
    Skipped(&'static str),
}

/// Counters for one relay direction
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelayStats {
    pub relayed: u64,
    pub ignored: u64,
    pub failed: u64,
}

/// Relays messages from one bound channel into another
pub struct RelayEngine {
    source: BoundConnection,
    destination: BoundConnection,
    profiles: Arc<ProfileCache>,
    mentions: MentionResolver,
    verbose: bool,
    direction: String,
}

impl RelayEngine {
    pub fn new(
        source: BoundConnection,
        destination: BoundConnection,
        profiles: Arc<ProfileCache>,
        verbose: bool,
    ) -> Self {
        let direction = format!("{} -> {}", source.label(), destination.label());
        Self {
            mentions: MentionResolver::new(profiles.clone()),
            source,
            destination,
            profiles,
            verbose,
            direction,
        }
    }

    pub fn direction(&self) -> &str {
        &self.direction
    }

    /// Consume events until the stream closes
    ///
    /// Events are handled one at a time in arrival order. A failed event is
    /// logged and dropped; it never stops the loop.
    pub async fn run(self, mut events: mpsc::Receiver<MessageEvent>) -> RelayStats {
        tracing::info!(
            direction = %self.direction,
            source_channel = %self.source.channel_name(),
            destination_channel = %self.destination.channel_name(),
            "Relay engine started"
        );

        let mut stats = RelayStats::default();

        while let Some(event) = events.recv().await {
            match self.handle_event(&event).await {
                Ok(RelayOutcome::Relayed) => stats.relayed += 1,
                Ok(outcome) => {
                    stats.ignored += 1;
                    tracing::trace!(direction = %self.direction, outcome = ?outcome, "Event not relayed");
                }
                Err(e) => {
                    stats.failed += 1;
                    log_error("relay_message", &self.direction, &e);
                }
            }
        }

        tracing::info!(
            direction = %self.direction,
            relayed = stats.relayed,
            ignored = stats.ignored,
            failed = stats.failed,
            "Event stream closed, relay engine stopped"
        );

        stats
    }

    /// Filter, classify, transform and publish a single event
    pub async fn handle_event(&self, event: &MessageEvent) -> Result<RelayOutcome> {
        if &event.channel != self.source.channel_id() {
            return Ok(RelayOutcome::OtherChannel);
        }

        if self.verbose {
            tracing::info!(
                direction = %self.direction,
                channel = %self.source.channel_name(),
                event = ?event,
                "#### {}",
                self.source.channel_name()
            );
        }

        match &event.subtype {
            MessageSubtype::Normal => {}
            MessageSubtype::Bot => {
                tracing::debug!(direction = %self.direction, "Ignoring bot message");
                return Ok(RelayOutcome::BotMessage);
            }
            MessageSubtype::Other(subtype) => {
                tracing::debug!(direction = %self.direction, subtype = %subtype, "Ignoring message subtype");
                return Ok(RelayOutcome::Unsupported(subtype.clone()));
            }
        }

        let Some(user) = &event.user else {
            return Ok(RelayOutcome::Skipped("no sender"));
        };
        if event.text.trim().is_empty() {
            return Ok(RelayOutcome::Skipped("empty text"));
        }

        let _timer = Timer::new("relay_message", self.direction.as_str());

        let sender = self.profiles.resolve(self.source.client(), user).await?;
        let text = self.mentions.rewrite(self.source.client(), &event.text).await?;

        let message = OutgoingMessage {
            channel: self.destination.channel_id().clone(),
            text,
            username: sender.display_name,
            icon_url: sender.avatar_url,
        };

        self.destination.client().post_message(&message).await?;

        tracing::info!(
            direction = %self.direction,
            user_id = %user.as_str(),
            user = %message.username,
            destination_channel = %self.destination.channel_name(),
            text_len = message.text.len(),
            "Message relayed"
        );

        Ok(RelayOutcome::Relayed)
    }
}
