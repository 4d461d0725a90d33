//! Profile cache with lazy-loading from the workspace that owns the user

use crate::error::Result;
use crate::profile::UserProfile;
use crate::slack::{UserId, WorkspaceApi};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};

/// Cache statistics for monitoring
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub api_calls: u64,
    pub api_errors: u64,
}

/// Process-wide profile cache shared by both relay directions
///
/// Entries never expire. Each user id owns a `OnceCell`, so concurrent lookups
/// of the same uncached user wait on one in-flight fetch instead of issuing
/// their own. A failed fetch leaves the cell empty and the next lookup retries.
#[derive(Default)]
pub struct ProfileCache {
    profiles: DashMap<UserId, Arc<OnceCell<UserProfile>>>,
    stats: RwLock<CacheStats>,
}

impl ProfileCache {
    pub fn new() -> Self {
        tracing::debug!("Creating profile cache with lazy-loading");
        Self::default()
    }

    /// Get a user's profile, fetching it through `client` on first use
    pub async fn resolve(&self, client: &dyn WorkspaceApi, user_id: &UserId) -> Result<UserProfile> {
        // Clone the cell out so the map shard is not locked across the fetch
        let cell = self.profiles.entry(user_id.clone()).or_default().clone();

        if let Some(profile) = cell.get() {
            self.stats.write().await.hits += 1;
            tracing::trace!(
                user_id = %user_id.as_str(),
                user = %profile.display_name,
                "Profile cache hit"
            );
            return Ok(profile.clone());
        }

        self.stats.write().await.misses += 1;
        tracing::debug!(
            user_id = %user_id.as_str(),
            "Profile cache miss, fetching from Slack API"
        );

        match cell.get_or_try_init(|| self.fetch(client, user_id)).await {
            Ok(profile) => Ok(profile.clone()),
            Err(e) => {
                // Drop the empty cell so ids that never resolve do not pile up
                self.profiles
                    .remove_if(user_id, |_, cell| !cell.initialized());
                Err(e)
            }
        }
    }

    async fn fetch(&self, client: &dyn WorkspaceApi, user_id: &UserId) -> Result<UserProfile> {
        self.stats.write().await.api_calls += 1;

        match client.get_user(user_id).await {
            Ok(profile) => {
                tracing::info!(
                    user_id = %user_id.as_str(),
                    user = %profile.display_name,
                    "Fetched and cached user profile"
                );
                Ok(profile)
            }
            Err(e) => {
                self.stats.write().await.api_errors += 1;
                tracing::warn!(
                    user_id = %user_id.as_str(),
                    error = %e,
                    "Failed to fetch user profile"
                );
                Err(e)
            }
        }
    }

    /// Cached profile without touching the network
    #[cfg(test)]
    pub fn get(&self, user_id: &UserId) -> Option<UserProfile> {
        self.profiles
            .get(user_id)
            .and_then(|cell| cell.value().get().cloned())
    }

    /// Number of fully fetched profiles
    pub fn len(&self) -> usize {
        self.profiles
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics
    pub async fn get_stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }

    /// Log cache statistics
    pub async fn log_stats(&self) {
        let stats = self.get_stats().await;

        let hit_rate = if stats.hits + stats.misses > 0 {
            (stats.hits as f32 / (stats.hits + stats.misses) as f32 * 100.0) as u32
        } else {
            0
        };

        tracing::info!(
            users_cached = self.len(),
            hit_rate = hit_rate,
            api_calls = stats.api_calls,
            api_errors = stats.api_errors,
            "Profile cache statistics"
        );
    }
}
