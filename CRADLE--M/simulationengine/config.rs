use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use cradle_mind::MindConfig;
use serde::{Deserialize, Serialize};
use shared_logging::LogLevel;

use crate::{routine::NewbornConfig, source::SourceKind};

/// Log and event sinks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TelemetryConfig {
    /// JSON-lines log file.
    pub log_path: Option<PathBuf>,
    /// JSON-lines observer event file.
    pub event_path: Option<PathBuf>,
    /// Lowest level written (`debug`, `info`, `warn`, `error`).
    pub min_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            event_path: None,
            min_level: "info".into(),
        }
    }
}

impl TelemetryConfig {
    /// Parsed minimum level.
    pub fn level(&self) -> Result<LogLevel> {
        LogLevel::parse(&self.min_level)
            .ok_or_else(|| anyhow!("unknown log level `{}`", self.min_level))
    }
}

/// Sandbox run configuration, loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SandboxConfig {
    /// World and routine seed.
    pub seed: u64,
    /// Days a run covers.
    pub days: u32,
    /// Events per normal day for the caregiver flow.
    pub events_per_day: usize,
    /// Which experience source drives the run.
    pub source: SourceKind,
    /// Keep the infant in hospital for the rest of day 0.
    pub overnight_in_hospital: bool,
    /// Hours the world clock advances between events.
    pub tick_delta: f32,
    /// Optional TOML world layout extending the generated world.
    pub world_layout: Option<PathBuf>,
    /// Mind thresholds and windows.
    pub mind: MindConfig,
    /// Newborn routine knobs.
    pub newborn: NewbornConfig,
    /// Telemetry sinks.
    pub telemetry: TelemetryConfig,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            days: 3,
            events_per_day: 10,
            source: SourceKind::Newborn,
            overnight_in_hospital: false,
            tick_delta: 0.5,
            world_layout: None,
            mind: MindConfig::default(),
            newborn: NewbornConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl SandboxConfig {
    /// Loads a config file. Relative paths inside it resolve against the
    /// file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read sandbox config {}", path.display()))?;
        let mut config = Self::parse(&raw)
            .with_context(|| format!("invalid sandbox config {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parses TOML.
    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.telemetry.level()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut Option<PathBuf>| {
            if let Some(inner) = path.as_mut() {
                if inner.is_relative() {
                    *inner = base.join(&*inner);
                }
            }
        };
        resolve(&mut self.world_layout);
        resolve(&mut self.telemetry.log_path);
        resolve(&mut self.telemetry.event_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_fill_missing_sections() {
        let config = SandboxConfig::parse("seed = 11\nsource = \"caregiver\"\n").unwrap();
        assert_eq!(config.seed, 11);
        assert_eq!(config.source, SourceKind::Caregiver);
        assert_eq!(config.newborn.learning_events_per_day, 15);
        assert!((config.mind.block_threshold - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.telemetry.level().unwrap(), LogLevel::Info);
    }

    #[test]
    fn load_resolves_relative_paths() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("sandbox.toml");
        fs::write(
            &path,
            r#"
days = 5
world_layout = "layout.toml"

[newborn]
learning_events_per_day = 6

[telemetry]
log_path = "logs/run.jsonl"
min_level = "debug"
"#,
        )
        .unwrap();
        let config = SandboxConfig::load(&path).unwrap();
        assert_eq!(config.days, 5);
        assert_eq!(config.newborn.learning_events_per_day, 6);
        assert_eq!(config.newborn.feed_every, 4);
        assert_eq!(config.world_layout, Some(tmp.path().join("layout.toml")));
        assert_eq!(
            config.telemetry.log_path,
            Some(tmp.path().join("logs/run.jsonl"))
        );
    }

    #[test]
    fn bad_level_is_rejected() {
        let err = SandboxConfig::parse("[telemetry]\nmin_level = \"loud\"\n").unwrap_err();
        assert!(err.to_string().contains("loud"));
        assert!(SandboxConfig::load("/nonexistent/sandbox.toml").is_err());
    }
}
