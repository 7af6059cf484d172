use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "rewind";

pub const KEYS: &[&str] = &[
    "defaults.theme",
    "defaults.sound",
    "defaults.haptics",
    "defaults.quiz_timer",
    "telemetry.enabled",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<TelemetryConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// `on` or `off`. Sound starts muted unless this is `on`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub haptics: Option<String>,

    /// `off` runs quizzes without a countdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_timer: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

fn parse_switch(key: &str, value: &str) -> Result<String> {
    match value {
        "on" | "off" => Ok(value.to_string()),
        _ => anyhow::bail!("Invalid value for {key}: {value}. Must be 'on' or 'off'."),
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `rewind config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# Rewind configuration - https://github.com/mklab-se/rewind\n{yaml}");
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.sound" => {
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .sound = Some(parse_switch(key, value)?);
            }
            "defaults.haptics" => {
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .haptics = Some(parse_switch(key, value)?);
            }
            "defaults.quiz_timer" => {
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .quiz_timer = Some(parse_switch(key, value)?);
            }
            "telemetry.enabled" => {
                let enabled = match value {
                    "true" => true,
                    "false" => false,
                    _ => anyhow::bail!(
                        "Invalid value for telemetry.enabled: {value}. Must be 'true' or 'false'."
                    ),
                };
                self.telemetry
                    .get_or_insert_with(TelemetryConfig::default)
                    .enabled = Some(enabled);
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {}", KEYS.join(", ")),
        }
        Ok(())
    }

    fn defaults_field(&self, field: impl Fn(&DefaultsConfig) -> Option<&String>) -> Option<&str> {
        self.defaults.as_ref().and_then(field).map(String::as_str)
    }

    pub fn theme(&self) -> &str {
        self.defaults_field(|d| d.theme.as_ref()).unwrap_or("dark")
    }

    pub fn sound_on(&self) -> bool {
        self.defaults_field(|d| d.sound.as_ref()) == Some("on")
    }

    pub fn haptics_on(&self) -> bool {
        self.defaults_field(|d| d.haptics.as_ref()) != Some("off")
    }

    pub fn quiz_timer_on(&self) -> bool {
        self.defaults_field(|d| d.quiz_timer.as_ref()) != Some("off")
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.telemetry
            .as_ref()
            .and_then(|t| t.enabled)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.theme(), "dark");
        assert!(!config.sound_on());
        assert!(config.haptics_on());
        assert!(config.quiz_timer_on());
        assert!(config.telemetry_enabled());
    }

    #[test]
    fn test_set_valid_keys() {
        let mut config = Config::default();
        config.set("defaults.theme", "light").unwrap();
        config.set("defaults.sound", "on").unwrap();
        config.set("defaults.haptics", "off").unwrap();
        config.set("defaults.quiz_timer", "off").unwrap();
        config.set("telemetry.enabled", "false").unwrap();
        assert_eq!(config.theme(), "light");
        assert!(config.sound_on());
        assert!(!config.haptics_on());
        assert!(!config.quiz_timer_on());
        assert!(!config.telemetry_enabled());
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "neon").is_err());
        assert!(config.set("defaults.sound", "loud").is_err());
        assert!(config.set("telemetry.enabled", "yes").is_err());
        let err = config.set("defaults.aspect", "16:9").unwrap_err();
        assert!(err.to_string().contains("defaults.quiz_timer"));
        assert!(config.defaults.is_none());
    }

    #[test]
    fn test_parse_yaml() {
        let config = Config::parse(
            "defaults:\n  theme: light\n  quiz_timer: \"off\"\ntelemetry:\n  enabled: false\n",
        )
        .unwrap();
        assert_eq!(config.theme(), "light");
        assert!(!config.quiz_timer_on());
        assert!(!config.telemetry_enabled());
    }

    #[test]
    fn test_serialized_config_round_trips_settings() {
        let mut config = Config::default();
        config.set("defaults.sound", "on").unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("telemetry"));
        assert!(Config::parse(&yaml).unwrap().sound_on());
    }
}
