mod settings;

pub use settings::{Settings, TeamConfig, load_settings, load_settings_with};
