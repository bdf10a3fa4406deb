use crate::animation::Easing;
use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rotary::{LayoutParameters, ParameterError};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ITEM_COUNT_RANGE: RangeInclusive<usize> = 1..=12;
pub const WINDING_COUNT_RANGE: RangeInclusive<f64> = 0.0..=7.0;
pub const RADIUS_RANGE: RangeInclusive<f64> = 0.0..=256.0;
pub const FRAME_RATE_RANGE: RangeInclusive<f64> = 1.0..=1000.0;
/// Seconds.
pub const DURATION_RANGE: RangeInclusive<f64> = 0.0..=3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub easing: Easing,
    /// Seconds.
    pub duration: f64,
    pub loop_min_duration: f64,
    pub loop_max_duration: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            easing: Easing::default(),
            duration: 2.0,
            loop_min_duration: 0.25,
            loop_max_duration: 3.0,
        }
    }
}

impl TransitionConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub winding_count: f64,
    pub item_count: usize,
    pub frame_rate: f64,
    pub socket_path: PathBuf,
    pub transition: TransitionConfig,
    pub parameters: LayoutParameters,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            winding_count: 1.0,
            item_count: 7,
            frame_rate: 60.0,
            socket_path: PathBuf::from("/tmp/rotary-menu.sock"),
            transition: TransitionConfig::default(),
            parameters: LayoutParameters::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid layout parameters: {0}")]
    Parameters(#[from] ParameterError),
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !WINDING_COUNT_RANGE.contains(&self.winding_count) {
            return Err(invalid(
                "winding_count",
                format!("{} is outside {:?}", self.winding_count, WINDING_COUNT_RANGE),
            ));
        }
        if !ITEM_COUNT_RANGE.contains(&self.item_count) {
            return Err(invalid(
                "item_count",
                format!("{} is outside {:?}", self.item_count, ITEM_COUNT_RANGE),
            ));
        }
        if !FRAME_RATE_RANGE.contains(&self.frame_rate) {
            return Err(invalid(
                "frame_rate",
                format!("{} is outside {:?}", self.frame_rate, FRAME_RATE_RANGE),
            ));
        }

        let t = &self.transition;
        for (field, seconds) in [
            ("transition.duration", t.duration),
            ("transition.loop_min_duration", t.loop_min_duration),
            ("transition.loop_max_duration", t.loop_max_duration),
        ] {
            if !DURATION_RANGE.contains(&seconds) {
                return Err(invalid(
                    field,
                    format!("{seconds} seconds is outside {DURATION_RANGE:?}"),
                ));
            }
        }
        if t.loop_min_duration > t.loop_max_duration {
            return Err(invalid(
                "transition.loop_min_duration",
                "must not exceed loop_max_duration",
            ));
        }

        self.parameters.validate()?;
        let p = &self.parameters;
        for (field, radius) in [
            ("parameters.item_ring_radius_when_expanded", p.item_ring_radius_when_expanded),
            ("parameters.item_ring_radius_when_contracted", p.item_ring_radius_when_contracted),
            ("parameters.item_radius_when_expanded", p.item_radius_when_expanded),
            ("parameters.item_radius_when_contracted", p.item_radius_when_contracted),
            ("parameters.center_item_radius_when_expanded", p.center_item_radius_when_expanded),
            ("parameters.center_item_radius_when_contracted", p.center_item_radius_when_contracted),
        ] {
            if !RADIUS_RANGE.contains(&radius) {
                return Err(invalid(field, format!("{radius} is outside {RADIUS_RANGE:?}")));
            }
        }
        Ok(())
    }
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "rotary", "rotary-menu").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("ROTARY_MENU")
        .separator("__")
        .try_parsing(true)
}

fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Config, ConfigError> {
    let config: Config = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Loads `path` (if it exists) with environment overrides on top.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    finish(
        config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(environment()),
    )
}

/// Parses a TOML document without consulting the environment.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    finish(
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml)),
    )
}

/// Like [`load_config_from`], but falls back to the defaults on any error.
pub fn load_or_default(path: &Path) -> Config {
    match load_config_from(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
