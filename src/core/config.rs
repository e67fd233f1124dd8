//! Configuration management with layered hierarchy

use clap::ValueEnum;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Display preference for prompts and progress output
///
/// Carried as injected configuration; it never affects form semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" => Ok(ThemePreference::System),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// regwiz configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display theme for prompts and progress output
    pub theme: Option<ThemePreference>,

    /// Stub gateway latency in milliseconds
    pub submit_delay_ms: Option<u64>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/regwiz/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Environment variables
        if let Ok(theme) = std::env::var("REGWIZ_THEME") {
            if let Ok(theme) = theme.parse() {
                config.theme = Some(theme);
            }
        }
        if let Ok(delay) = std::env::var("REGWIZ_SUBMIT_DELAY_MS") {
            if let Ok(delay) = delay.parse() {
                config.submit_delay_ms = Some(delay);
            }
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "regwiz")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.theme.is_some() {
            self.theme = other.theme;
        }
        if other.submit_delay_ms.is_some() {
            self.submit_delay_ms = other.submit_delay_ms;
        }
    }

    /// Effective theme, falling back to the system preference
    pub fn theme(&self) -> ThemePreference {
        self.theme.unwrap_or_default()
    }

    /// Stub gateway latency, matching the original endpoint's 1.5s delay
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms.unwrap_or(1500))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_other_takes_precedence() {
        let mut base = Config {
            theme: Some(ThemePreference::Light),
            submit_delay_ms: Some(100),
        };
        base.merge(Config {
            theme: Some(ThemePreference::Dark),
            submit_delay_ms: None,
        });

        assert_eq!(base.theme(), ThemePreference::Dark);
        assert_eq!(base.submit_delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.theme(), ThemePreference::System);
        assert_eq!(config.submit_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_theme_parsing() {
        assert_eq!("Dark".parse::<ThemePreference>(), Ok(ThemePreference::Dark));
        assert!("solarized".parse::<ThemePreference>().is_err());
    }

    #[test]
    fn test_config_file_shape() {
        let config: Config = serde_yml::from_str("theme: dark\nsubmit_delay_ms: 0\n").unwrap();
        assert_eq!(config.theme(), ThemePreference::Dark);
        assert_eq!(config.submit_delay(), Duration::ZERO);
    }
}
