/// Runtime settings read from the environment; missing or invalid values fall
/// back to defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::geometry::ScreenSize;

pub const DEFAULT_WORLD_WIDTH: u32 = 800;
pub const DEFAULT_WORLD_HEIGHT: u32 = 600;
pub const DEFAULT_FPS: u32 = 30;
pub const DEFAULT_PROGRESS_PATH: &str = "progress.json";
pub const DEFAULT_DATABASE_PATH: &str = "game_database.db";
pub const DEFAULT_LOG_PATH: &str = "sky_patrol.log";

// Anything smaller leaves no room for the player's band.
const MIN_WORLD_WIDTH: u32 = 400;
const MIN_WORLD_HEIGHT: u32 = 200;

/// Runtime settings, read from `SKY_PATROL_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Virtual resolution the simulation runs at; the terminal view scales it.
    pub world: ScreenSize,
    pub fps: u32,
    pub progress_path: PathBuf,
    pub database_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: ScreenSize::new(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT),
            fps: DEFAULT_FPS,
            progress_path: PathBuf::from(DEFAULT_PROGRESS_PATH),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let width = read_env_u32("SKY_PATROL_WIDTH", DEFAULT_WORLD_WIDTH, MIN_WORLD_WIDTH);
        let height = read_env_u32("SKY_PATROL_HEIGHT", DEFAULT_WORLD_HEIGHT, MIN_WORLD_HEIGHT);
        Self {
            world: ScreenSize::new(width, height),
            fps: read_env_u32("SKY_PATROL_FPS", DEFAULT_FPS, 1),
            progress_path: read_env_path("SKY_PATROL_PROGRESS", DEFAULT_PROGRESS_PATH),
            database_path: read_env_path("SKY_PATROL_DB", DEFAULT_DATABASE_PATH),
            log_path: log_path_from_env(),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

/// The log file location alone, so logging can start before the rest of
/// the configuration is read.
pub fn log_path_from_env() -> PathBuf {
    read_env_path("SKY_PATROL_LOG", DEFAULT_LOG_PATH)
}

/// Parse an optional raw value, falling back to `default` when it is
/// missing, malformed or below `min`.
pub fn parse_u32_or(raw: Option<&str>, default: u32, min: u32) -> u32 {
    match raw.map(|s| s.trim().parse::<u32>()) {
        None => default,
        Some(Ok(v)) if v >= min => v,
        Some(_) => default,
    }
}

fn read_env_u32(key: &str, default: u32, min: u32) -> u32 {
    let raw = env::var(key).ok();
    let value = parse_u32_or(raw.as_deref(), default, min);
    if let Some(raw) = raw.as_deref() {
        if raw.trim().parse::<u32>().ok() != Some(value) {
            tracing::warn!("{key}={raw:?} is not a number >= {min}; using {default}");
        }
    }
    value
}

fn read_env_path(key: &str, default: &str) -> PathBuf {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
