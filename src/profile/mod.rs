//! Sender profiles for impersonated posting
//!
//! Profiles are fetched lazily the first time a user is referenced, either as
//! the sender of a relayed message or inside a mention, and kept for the
//! lifetime of the process. Both relay directions share one cache.

mod cache;
mod types;

pub use cache::{CacheStats, ProfileCache};
pub use types::UserProfile;
