//! Player settings stored in pmoconfig.
//!
//! The `PlayerConfigExt` trait adds typed accessors for the `player` and
//! `logger` sections to `pmoconfig::Config`:
//!
//! ```no_run
//! use pmoconfig::get_config;
//! use pmoplayqueue::PlayerConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = get_config();
//! config.set_player_log_events(false)?;
//! let settings = config.player_settings();
//! assert!(!settings.log_events);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use anyhow::Result;
use pmoconfig::Config;
use pmoconfig::serde_yaml::{Number, Value};
use tracing::warn;

/// Default period of the engine time observer.
pub const DEFAULT_TIME_OBSERVER_INTERVAL_MS: u64 = 100;

/// Default tracing filter used when `logger.min_level` is missing.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime knobs read once when a synchronizer is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSettings {
    /// Trace every engine lifecycle event at debug level.
    pub log_events: bool,
    pub time_observer_interval: Duration,
    /// Forwarded to [`SequentialPlayer::set_memory_cache`](crate::SequentialPlayer::set_memory_cache).
    pub memory_cache: bool,
    /// Fixed shuffle seed; `None` seeds from the OS.
    pub shuffle_seed: Option<u64>,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            log_events: true,
            time_observer_interval: Duration::from_millis(DEFAULT_TIME_OBSERVER_INTERVAL_MS),
            memory_cache: false,
            shuffle_seed: None,
        }
    }
}

pub trait PlayerConfigExt {
    // ========================================================================
    // player section
    // ========================================================================

    fn get_player_log_events(&self) -> bool;
    fn set_player_log_events(&self, enabled: bool) -> Result<()>;

    /// Period of the time observer. Zero or missing falls back to the default.
    fn get_time_observer_interval(&self) -> Duration;
    fn set_time_observer_interval(&self, interval: Duration) -> Result<()>;

    fn get_player_memory_cache(&self) -> bool;
    fn set_player_memory_cache(&self, enabled: bool) -> Result<()>;

    fn get_shuffle_seed(&self) -> Option<u64>;
    /// `None` writes a null seed back, so the next run seeds from the OS.
    fn set_shuffle_seed(&self, seed: Option<u64>) -> Result<()>;

    /// Every `player` key at once.
    fn player_settings(&self) -> PlayerSettings;

    // ========================================================================
    // logger section
    // ========================================================================

    /// Tracing filter directive built from `logger.min_level`.
    fn get_log_filter(&self) -> String;
}

impl PlayerConfigExt for Config {
    fn get_player_log_events(&self) -> bool {
        self.get_bool_or(&["player", "log_events"], true)
    }

    fn set_player_log_events(&self, enabled: bool) -> Result<()> {
        self.set_value(&["player", "log_events"], Value::Bool(enabled))
    }

    fn get_time_observer_interval(&self) -> Duration {
        match self.get_u64(&["player", "time_observer_interval_ms"]) {
            Some(0) => {
                warn!(
                    default_ms = DEFAULT_TIME_OBSERVER_INTERVAL_MS,
                    "Time observer interval of 0 ms ignored, using default"
                );
                Duration::from_millis(DEFAULT_TIME_OBSERVER_INTERVAL_MS)
            }
            Some(ms) => Duration::from_millis(ms),
            None => Duration::from_millis(DEFAULT_TIME_OBSERVER_INTERVAL_MS),
        }
    }

    fn set_time_observer_interval(&self, interval: Duration) -> Result<()> {
        let ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self.set_value(
            &["player", "time_observer_interval_ms"],
            Value::Number(Number::from(ms)),
        )
    }

    fn get_player_memory_cache(&self) -> bool {
        self.get_bool_or(&["player", "memory_cache"], false)
    }

    fn set_player_memory_cache(&self, enabled: bool) -> Result<()> {
        self.set_value(&["player", "memory_cache"], Value::Bool(enabled))
    }

    fn get_shuffle_seed(&self) -> Option<u64> {
        self.get_u64(&["player", "shuffle_seed"])
    }

    fn set_shuffle_seed(&self, seed: Option<u64>) -> Result<()> {
        let value = match seed {
            Some(seed) => Value::Number(Number::from(seed)),
            None => Value::Null,
        };
        self.set_value(&["player", "shuffle_seed"], value)
    }

    fn player_settings(&self) -> PlayerSettings {
        PlayerSettings {
            log_events: self.get_player_log_events(),
            time_observer_interval: self.get_time_observer_interval(),
            memory_cache: self.get_player_memory_cache(),
            shuffle_seed: self.get_shuffle_seed(),
        }
    }

    fn get_log_filter(&self) -> String {
        match self.get_value(&["logger", "min_level"]) {
            Ok(Value::String(level)) if !level.trim().is_empty() => level.trim().to_lowercase(),
            _ => DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
