pub mod bridge;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod profile;
pub mod relay;
pub mod slack;

pub use bridge::{Bridge, BridgeSide, BridgeStats};
pub use error::{BridgeError, Result};
