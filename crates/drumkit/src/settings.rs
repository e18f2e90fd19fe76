//! Layered kit configuration

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use gesture_engine::EngineConfig;
use kit_playback::SoundBank;
use serde::{Deserialize, Serialize};
use tracing::{info, Level};

/// File consulted when `DRUMKIT_CONFIG` is not set
pub const DEFAULT_CONFIG_FILE: &str = "drumkit.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "DRUMKIT_CONFIG";

/// Replay input settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// JSON-lines pose recording
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Pace frames by their recorded timestamps; otherwise push as fast as possible
    pub realtime: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            path: None,
            realtime: true,
        }
    }
}

/// Top-level kit configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitConfig {
    /// trace, debug, info, warn or error
    pub log_level: String,
    /// Capacity of the playback command queue
    pub playback_queue: usize,
    pub engine: EngineConfig,
    pub sounds: SoundBank,
    pub replay: ReplayConfig,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            playback_queue: 64,
            engine: EngineConfig::default(),
            sounds: SoundBank::standard(),
            replay: ReplayConfig::default(),
        }
    }
}

impl KitConfig {
    /// Defaults, then `DRUMKIT_CONFIG` or `drumkit.toml`, then `DRUMKIT__*` variables
    pub fn load() -> anyhow::Result<Self> {
        let builder = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::defaults()?.add_source(File::from(PathBuf::from(path))),
            None => Self::defaults()?
                .add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false)),
        };
        Self::build(builder.add_source(env_source()))
    }

    /// Builder seeded with `KitConfig::default()`
    pub fn defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
        let defaults = Config::try_from(&KitConfig::default())
            .context("serializing default configuration")?;
        Ok(Config::builder().add_source(defaults))
    }

    /// Resolve and validate a layered builder
    pub fn build(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let config: KitConfig = builder
            .build()
            .context("reading configuration")?
            .try_deserialize()
            .context("parsing configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section before a session runs
    pub fn validate(&self) -> anyhow::Result<()> {
        self.level()?;
        if self.playback_queue == 0 {
            return Err(anyhow!("playback_queue must be at least 1"));
        }
        self.engine.validate()?;
        self.sounds.validate()?;
        Ok(())
    }

    /// Report the effective settings. Call once logging is installed.
    pub fn log_summary(&self) {
        info!(
            log_level = %self.log_level,
            replay = ?self.replay.path,
            realtime = self.replay.realtime,
            pedal_joint = ?self.engine.pedal_joint,
            sounds = self.sounds.len(),
            "Configuration loaded"
        );
    }

    /// Get the configured log level
    pub fn level(&self) -> anyhow::Result<Level> {
        Level::from_str(&self.log_level)
            .map_err(|_| anyhow!("unknown log_level '{}'", self.log_level))
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("DRUMKIT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
