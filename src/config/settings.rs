use crate::error::{BridgeError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Settings {
    pub team1: TeamConfig,
    pub team2: TeamConfig,
    pub verbose: bool,
    /// Reserved for an HTTP listener; the relay never reads it.
    pub port: u16,
}

/// Immutable descriptor of one side of the bridge, before its channel is bound
#[derive(Clone)]
pub struct TeamConfig {
    pub label: String,
    pub bot_token: String,
    pub app_token: String,
    pub channel: String,
}

impl fmt::Debug for TeamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeamConfig")
            .field("label", &self.label)
            .field("bot_token", &"<redacted>")
            .field("app_token", &"<redacted>")
            .field("channel", &self.channel)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default)]
    team1: RawTeam,
    #[serde(default)]
    team2: RawTeam,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTeam {
    bot_token: Option<String>,
    app_token: Option<String>,
    channel: Option<String>,
}

pub fn load_settings(path: &Path, verbose: bool, port: u16) -> Result<Settings> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    load_settings_with(path, verbose, port, |key| std::env::var(key).ok())
}

/// Load settings from `path`, letting `env` override individual team fields.
///
/// A missing config file is not an error on its own: every field can come
/// from the environment (`TEAM1_BOT_TOKEN`, `TEAM1_APP_TOKEN`, `TEAM1_CHANNEL`
/// and the `TEAM2_` equivalents).
pub fn load_settings_with<F>(path: &Path, verbose: bool, port: u16, env: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str::<RawConfig>(&content).map_err(|e| {
            BridgeError::Config(format!("invalid config file {}: {}", path.display(), e))
        })?
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using environment only");
        RawConfig::default()
    };

    let team1 = build_team("team1", raw.team1, &env)?;
    let team2 = build_team("team2", raw.team2, &env)?;

    Ok(Settings {
        team1,
        team2,
        verbose,
        port,
    })
}

fn build_team<F>(label: &str, raw: RawTeam, env: &F) -> Result<TeamConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = label.to_uppercase();
    let field = |value: Option<String>, key: &str, name: &str| -> Result<String> {
        let var = format!("{}_{}", prefix, key);
        env(&var)
            .or(value)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| BridgeError::Config(format!("{}.{} not set (or {})", label, name, var)))
    };

    Ok(TeamConfig {
        label: label.to_string(),
        bot_token: field(raw.bot_token, "BOT_TOKEN", "botToken")?,
        app_token: field(raw.app_token, "APP_TOKEN", "appToken")?,
        channel: field(raw.channel, "CHANNEL", "channel")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const FULL: &str = r#"{
        "team1": {"botToken": "xoxb-1", "appToken": "xapp-1", "channel": "general"},
        "team2": {"botToken": "xoxb-2", "appToken": "xapp-2", "channel": "random"}
    }"#;

    #[test]
    fn test_load_from_file() {
        let file = write_config(FULL);
        let settings = load_settings_with(file.path(), true, 8000, |_| None).unwrap();

        assert_eq!(settings.team1.label, "team1");
        assert_eq!(settings.team1.bot_token, "xoxb-1");
        assert_eq!(settings.team1.channel, "general");
        assert_eq!(settings.team2.app_token, "xapp-2");
        assert_eq!(settings.team2.channel, "random");
        assert!(settings.verbose);
        assert_eq!(settings.port, 8000);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config(FULL);
        let vars: HashMap<&str, &str> = [("TEAM2_CHANNEL", "bridge")].into_iter().collect();
        let settings = load_settings_with(file.path(), false, 8000, |k| {
            vars.get(k).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(settings.team1.channel, "general");
        assert_eq!(settings.team2.channel, "bridge");
    }

    #[test]
    fn test_missing_file_uses_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let vars: HashMap<&str, &str> = [
            ("TEAM1_BOT_TOKEN", "a"),
            ("TEAM1_APP_TOKEN", "b"),
            ("TEAM1_CHANNEL", "c"),
            ("TEAM2_BOT_TOKEN", "d"),
            ("TEAM2_APP_TOKEN", "e"),
            ("TEAM2_CHANNEL", "f"),
        ]
        .into_iter()
        .collect();

        let settings =
            load_settings_with(&path, false, 1, |k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(settings.team1.channel, "c");
        assert_eq!(settings.team2.bot_token, "d");
    }

    #[test]
    fn test_missing_field_is_config_error() {
        let file = write_config(r#"{"team1": {"botToken": "x", "appToken": "y"}}"#);
        let err = load_settings_with(file.path(), false, 8000, |_| None).unwrap_err();

        assert!(matches!(err, BridgeError::Config(_)));
        assert!(err.to_string().contains("team1.channel"));
    }

    #[test]
    fn test_blank_value_rejected() {
        let file = write_config(
            r#"{
            "team1": {"botToken": "xoxb-1", "appToken": "xapp-1", "channel": "  "},
            "team2": {"botToken": "xoxb-2", "appToken": "xapp-2", "channel": "random"}
        }"#,
        );
        let err = load_settings_with(file.path(), false, 8000, |_| None).unwrap_err();
        assert!(err.to_string().contains("team1.channel"));
    }

    #[test]
    fn test_malformed_json() {
        let file = write_config("{ not json");
        let err = load_settings_with(file.path(), false, 8000, |_| None).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let file = write_config(FULL);
        let settings = load_settings_with(file.path(), false, 8000, |_| None).unwrap();
        let debug = format!("{:?}", settings.team1);

        assert!(!debug.contains("xoxb-1"));
        assert!(debug.contains("general"));
    }
}
