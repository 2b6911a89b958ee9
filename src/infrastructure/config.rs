use chrono::TimeDelta;
use serde::Deserialize;
use std::collections::HashMap;

/// Longest inactivity window accepted before a trend view closes
pub const MAX_INACTIVITY_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub console: ConsoleSettings,
    pub history: HistorySettings,
    /// Logical channel name -> entity id pushed by the host
    #[serde(default)]
    pub entities: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConsoleSettings {
    #[serde(default = "default_fallback")]
    pub fallback: String,
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    #[serde(default = "default_inactivity_secs")]
    pub inactivity_secs: u64,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            fallback: default_fallback(),
            tick_secs: default_tick_secs(),
            refresh_secs: default_refresh_secs(),
            inactivity_secs: default_inactivity_secs(),
        }
    }
}

impl ConsoleSettings {
    /// Inactivity window, clamped to `1..=MAX_INACTIVITY_SECS`
    pub fn inactivity_timeout(&self) -> TimeDelta {
        TimeDelta::seconds(self.inactivity_secs.clamp(1, MAX_INACTIVITY_SECS) as i64)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_INACTIVITY_SECS).contains(&self.inactivity_secs) {
            anyhow::bail!(
                "console.inactivity_secs must be between 1 and {}, got {}",
                MAX_INACTIVITY_SECS,
                self.inactivity_secs
            );
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistorySettings {
    pub host: String,
    pub token: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_fallback() -> String {
    "--".to_string()
}

fn default_tick_secs() -> u64 {
    1
}

fn default_refresh_secs() -> u64 {
    300
}

fn default_inactivity_secs() -> u64 {
    120
}

impl AppConfig {
    /// Mappings with a blank entity id count as absent
    pub fn entity_bindings(&self) -> HashMap<String, String> {
        self.entities
            .iter()
            .map(|(channel, entity)| (channel.clone(), entity.trim().to_string()))
            .filter(|(_, entity)| !entity.is_empty())
            .collect()
    }
}

pub fn load_config() -> anyhow::Result<AppConfig> {
    load_config_from("config/console")
}

/// Load `path` (any format the config crate recognises by extension) and
/// apply `CONSOLE__SECTION__KEY` environment overrides on top.
pub fn load_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(config::Environment::with_prefix("CONSOLE").separator("__"))
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.console.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_apply() {
        let config = parse(
            r#"
            [history]
            host = "http://homeassistant.local:8123"
            token = "abc"
            "#,
        );

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.console.fallback, "--");
        assert_eq!(config.console.refresh_secs, 300);
        assert_eq!(config.console.inactivity_secs, 120);
        assert!(config.entities.is_empty());
    }

    #[test]
    fn test_inactivity_outside_range_is_rejected() {
        let config = parse(
            r#"
            [console]
            inactivity_secs = 9000000000000

            [history]
            host = "http://ha:8123"
            token = "abc"
            "#,
        );

        assert!(config.console.validate().is_err());
        assert_eq!(
            config.console.inactivity_timeout(),
            TimeDelta::seconds(MAX_INACTIVITY_SECS as i64)
        );

        let zero = ConsoleSettings {
            inactivity_secs: 0,
            ..ConsoleSettings::default()
        };
        assert!(zero.validate().is_err());
        assert_eq!(zero.inactivity_timeout(), TimeDelta::seconds(1));
        assert!(ConsoleSettings::default().validate().is_ok());
    }

    #[test]
    fn test_entity_bindings_skip_blank_mappings() {
        let config = parse(
            r#"
            [history]
            host = "http://ha:8123"
            token = "abc"

            [entities]
            outdoor_temp = "sensor.outdoor_temperature"
            indoor_temp = "  "
            "#,
        );

        let bindings = config.entity_bindings();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings["outdoor_temp"], "sensor.outdoor_temperature");
    }
}
