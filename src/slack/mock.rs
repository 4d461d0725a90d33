//! In-memory workspace used by unit tests

use crate::error::{BridgeError, Result};
use crate::profile::UserProfile;
use crate::slack::{
    ChannelSummary, EventSource, MessageEvent, OutgoingMessage, UserId, WorkspaceApi,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Default)]
pub struct MockWorkspace {
    channels: Vec<ChannelSummary>,
    users: HashMap<String, UserProfile>,
    fetch_delay: Option<Duration>,
    fail_posts: AtomicBool,
    list_calls: AtomicUsize,
    fetches: Mutex<Vec<UserId>>,
    posted: Mutex<Vec<OutgoingMessage>>,
}

impl MockWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, id: &str, name: &str) -> Self {
        self.channels.push(ChannelSummary::new(id, name));
        self
    }

    pub fn with_user(mut self, id: &str, name: &str) -> Self {
        self.users.insert(
            id.to_string(),
            UserProfile {
                id: UserId::new(id),
                display_name: name.to_string(),
                avatar_url: Some(format!("https://avatars.example/{}_48.png", name)),
            },
        );
        self
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn fail_posts(&self, fail: bool) {
        self.fail_posts.store(fail, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    pub fn fetch_count_for(&self, id: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == id)
            .count()
    }

    pub fn posted(&self) -> Vec<OutgoingMessage> {
        self.posted.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkspaceApi for MockWorkspace {
    async fn list_channels(&self) -> Result<Vec<ChannelSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.channels.clone())
    }

    async fn get_user(&self, user_id: &UserId) -> Result<UserProfile> {
        self.fetches.lock().unwrap().push(user_id.clone());
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.users
            .get(user_id.as_str())
            .cloned()
            .ok_or_else(|| BridgeError::UserNotFound(user_id.as_str().to_string()))
    }

    async fn post_message(&self, message: &OutgoingMessage) -> Result<()> {
        if self.fail_posts.load(Ordering::SeqCst) {
            return Err(BridgeError::SlackApi("rate_limited".to_string()));
        }
        self.posted.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Event source backed by a pre-built queue
pub struct MockEventSource {
    events: Mutex<Option<mpsc::Receiver<MessageEvent>>>,
    started: AtomicBool,
}

impl MockEventSource {
    pub fn queue() -> (mpsc::Sender<MessageEvent>, Self) {
        let (tx, rx) = mpsc::channel(64);
        let source = Self {
            events: Mutex::new(Some(rx)),
            started: AtomicBool::new(false),
        };
        (tx, source)
    }

    pub fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for MockEventSource {
    async fn start(&self) -> Result<mpsc::Receiver<MessageEvent>> {
        self.started.store(true, Ordering::SeqCst);
        self.events
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| BridgeError::Internal("event source already started".to_string()))
    }
}
