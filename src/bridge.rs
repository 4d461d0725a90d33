//! Bridge orchestrator: binds both teams and runs one relay engine per direction

use crate::config::{Settings, TeamConfig};
use crate::error::{BridgeError, Result};
use crate::profile::ProfileCache;
use crate::relay::{BoundConnection, RelayEngine, RelayStats, resolve_channel};
use crate::slack::{EventSource, SlackClient, SocketModeEventSource, WorkspaceApi};
use std::sync::Arc;

/// One team with its query client and realtime connection
pub struct BridgeSide {
    pub team: TeamConfig,
    pub client: Arc<dyn WorkspaceApi>,
    pub events: Arc<dyn EventSource>,
}

impl BridgeSide {
    /// Slack-backed side using Socket Mode for events
    pub fn slack(team: TeamConfig) -> Result<Self> {
        let slack_client = Arc::new(SlackClient::new(&team)?);
        let events = Arc::new(SocketModeEventSource::new(slack_client.clone()));

        Ok(Self {
            team,
            client: slack_client,
            events,
        })
    }
}

/// Per-direction results once both event streams have closed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BridgeStats {
    pub forward: RelayStats,
    pub backward: RelayStats,
}

pub struct Bridge {
    first: BridgeSide,
    second: BridgeSide,
    profiles: Arc<ProfileCache>,
    verbose: bool,
}

impl Bridge {
    pub fn new(first: BridgeSide, second: BridgeSide, verbose: bool) -> Self {
        Self {
            first,
            second,
            profiles: Arc::new(ProfileCache::new()),
            verbose,
        }
    }

    /// Build a Slack bridge between the two configured teams
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let first = BridgeSide::slack(settings.team1.clone())?;
        let second = BridgeSide::slack(settings.team2.clone())?;
        tracing::info!("Slack clients created");

        Ok(Self::new(first, second, settings.verbose))
    }

    /// Profile cache shared by both directions
    pub fn profiles(&self) -> Arc<ProfileCache> {
        self.profiles.clone()
    }

    /// Resolve both channels concurrently; either failing aborts the bridge
    pub async fn bind(&self) -> Result<(BoundConnection, BoundConnection)> {
        tokio::try_join!(
            resolve_channel(&self.first.team, self.first.client.clone()),
            resolve_channel(&self.second.team, self.second.client.clone()),
        )
    }

    /// Bind channels, start both connections and relay until both streams close
    ///
    /// Nothing is started when a channel cannot be bound.
    pub async fn run(self) -> Result<BridgeStats> {
        let (first, second) = self.bind().await?;

        let (first_events, second_events) =
            tokio::try_join!(self.first.events.start(), self.second.events.start())?;

        let forward = RelayEngine::new(
            first.clone(),
            second.clone(),
            self.profiles.clone(),
            self.verbose,
        );
        let backward = RelayEngine::new(second, first, self.profiles.clone(), self.verbose);

        tracing::info!(
            forward = %forward.direction(),
            backward = %backward.direction(),
            "Bridge is ready to relay messages"
        );

        let forward_task = tokio::spawn(forward.run(first_events));
        let backward_task = tokio::spawn(backward.run(second_events));

        let (forward, backward) = tokio::join!(forward_task, backward_task);

        Ok(BridgeStats {
            forward: forward.map_err(|e| BridgeError::Internal(e.to_string()))?,
            backward: backward.map_err(|e| BridgeError::Internal(e.to_string()))?,
        })
    }
}
