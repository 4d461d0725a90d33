//! One-way relay pipeline between two bound channels
//!
//! - `channel`: binds a configured channel name to its id
//! - `mention`: rewrites `<@U123>` tokens into readable names
//! - `engine`: per-direction consumer loop that filters, transforms and reposts

mod channel;
mod engine;
mod mention;

pub use channel::{BoundConnection, resolve_channel};
pub use engine::{RelayEngine, RelayOutcome, RelayStats};
pub use mention::{MentionResolver, mention_ids};
