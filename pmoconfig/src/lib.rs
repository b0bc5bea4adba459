//! # PMOPlayQueue configuration
//!
//! Configuration is a YAML tree built in layers:
//! - the default document embedded in the crate (`pmoplayqueue.yaml`),
//! - `config.yaml` from the configuration directory, merged over it,
//! - `PMOPLAYQUEUE_CONFIG__SECTION__KEY=value` environment overrides.
//!
//! Keys are case-insensitive: the whole tree is lower-cased on load and every
//! path lookup lower-cases its segments.
//!
//! Crates that need their own settings do not add getters here; they provide
//! an extension trait implemented for [`Config`] instead.
//!
//! ```no_run
//! use pmoconfig::get_config;
//! use serde_yaml::Value;
//!
//! let config = get_config();
//! let interval = config.get_value(&["player", "time_observer_interval_ms"])?;
//! config.set_value(&["player", "log_events"], Value::Bool(false))?;
//! # let _ = interval;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::{debug, info, warn};

pub use serde_yaml;

const DEFAULT_CONFIG: &str = include_str!("pmoplayqueue.yaml");

const ENV_CONFIG_DIR: &str = "PMOPLAYQUEUE_CONFIG";
const ENV_PREFIX: &str = "PMOPLAYQUEUE_CONFIG__";
const CONFIG_DIR_NAME: &str = ".pmoplayqueue";
const CONFIG_FILE_NAME: &str = "config.yaml";

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load PMOPlayQueue configuration"));
}

/// Layered YAML configuration.
///
/// A `Config` is either backed by a file (see [`Config::load_config`]), in
/// which case every [`set_value`](Config::set_value) is written back, or held
/// purely in memory (see [`Config::from_yaml_str`]).
#[derive(Debug)]
pub struct Config {
    path: Option<PathBuf>,
    data: Mutex<Value>,
}

impl Clone for Config {
    fn clone(&self) -> Self {
        let data = self.data.lock().unwrap().clone();
        Self {
            path: self.path.clone(),
            data: Mutex::new(data),
        }
    }
}

impl Config {
    /// Picks the configuration directory.
    ///
    /// Order: the `directory` argument, `$PMOPLAYQUEUE_CONFIG`,
    /// `./.pmoplayqueue`, `~/.pmoplayqueue`. Falls back to `./.pmoplayqueue`.
    fn find_config_dir(directory: &str) -> PathBuf {
        if !directory.is_empty() {
            return PathBuf::from(directory);
        }

        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, path = %env_path, "Using config directory from env");
            return PathBuf::from(env_path);
        }

        let local = Path::new(CONFIG_DIR_NAME);
        if local.exists() {
            return local.to_path_buf();
        }

        if let Some(home) = home_dir() {
            let home_config = home.join(CONFIG_DIR_NAME);
            if home_config.exists() {
                return home_config;
            }
        }

        local.to_path_buf()
    }

    fn prepare_config_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        if !path.is_dir() {
            return Err(anyhow!("{} is not a directory", path.display()));
        }
        Ok(())
    }

    /// Loads the configuration from `directory` (or the default search path
    /// when empty), merges every layer, and writes the result back to
    /// `config.yaml`.
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::find_config_dir(directory);
        Self::prepare_config_dir(&config_dir)?;
        info!(config_dir = %config_dir.display(), "Using config directory");

        let path = config_dir.join(CONFIG_FILE_NAME);

        let mut merged: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;
        match fs::read(&path) {
            Ok(bytes) => {
                info!(config_file = %path.display(), "Loaded config file");
                let external: Value = serde_yaml::from_slice(&bytes)?;
                merge_yaml(&mut merged, &lower_keys(external));
            }
            Err(_) => {
                info!(config_file = %path.display(), "Config file not found, using embedded defaults");
            }
        }

        let mut merged = lower_keys(merged);
        apply_env_overrides(&mut merged, env::vars());

        let config = Config {
            path: Some(path),
            data: Mutex::new(merged),
        };
        config.save()?;
        Ok(config)
    }

    /// Builds an in-memory configuration: `yaml` is merged over the embedded
    /// defaults. Nothing is read from or written to disk.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut merged: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;
        if !yaml.trim().is_empty() {
            let external: Value = serde_yaml::from_str(yaml)?;
            merge_yaml(&mut merged, &lower_keys(external));
        }
        Ok(Config {
            path: None,
            data: Mutex::new(lower_keys(merged)),
        })
    }

    /// In-memory configuration holding only the embedded defaults.
    pub fn defaults() -> Result<Self> {
        Self::from_yaml_str("")
    }

    /// File backing this configuration, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes the current tree to `config.yaml`. No-op for in-memory configs.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let data = self.data.lock().unwrap();
        let yaml = serde_yaml::to_string(&*data)?;
        fs::write(path, yaml)?;
        debug!(config_file = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Sets the value at `path` (e.g. `&["player", "log_events"]`) and saves.
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        {
            let mut data = self.data.lock().unwrap();
            set_path(&mut data, path, value)?;
        }
        self.save()
    }

    /// Returns a copy of the value at `path`.
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.data.lock().unwrap();
        get_path(&data, path).cloned()
    }

    /// Deserializes the subtree at `path` into `T`.
    pub fn get_section<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T> {
        let value = self.get_value(path)?;
        Ok(serde_yaml::from_value(value)?)
    }

    /// Reads a boolean, returning `default` when the key is missing or has
    /// another type.
    pub fn get_bool_or(&self, path: &[&str], default: bool) -> bool {
        match self.get_value(path) {
            Ok(Value::Bool(b)) => b,
            Ok(Value::String(s)) => s.parse().unwrap_or(default),
            Ok(other) => {
                warn!(path = %path.join("."), value = ?other, "Expected a boolean, using default");
                default
            }
            Err(_) => default,
        }
    }

    /// Reads an unsigned integer; `None` when missing, null, or not a number.
    pub fn get_u64(&self, path: &[&str]) -> Option<u64> {
        match self.get_value(path) {
            Ok(Value::Number(n)) => n.as_u64(),
            Ok(Value::String(s)) => s.parse().ok(),
            _ => None,
        }
    }
}

/// Returns the process-wide configuration, loading it on first access.
///
/// # Panics
///
/// Panics on first access if the configuration directory cannot be prepared
/// or the YAML is malformed.
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

fn get_path<'a>(data: &'a Value, path: &[&str]) -> Result<&'a Value> {
    let mut current = data;
    for (i, key) in path.iter().enumerate() {
        let Value::Mapping(map) = current else {
            return Err(anyhow!("Path {} is not a mapping", path[..i].join(".")));
        };
        current = map
            .get(Value::String(key.to_lowercase()))
            .ok_or_else(|| anyhow!("Path {} does not exist", path[..=i].join(".")))?;
    }
    Ok(current)
}

fn set_path(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((head, rest)) = path.split_first() else {
        *data = value;
        return Ok(());
    };
    let Value::Mapping(map) = data else {
        return Err(anyhow!("Cannot set {}: parent is not a mapping", path.join(".")));
    };
    let key = Value::String(head.to_lowercase());
    if rest.is_empty() {
        map.insert(key, value);
        return Ok(());
    }
    let child = map.entry(key).or_insert_with(|| Value::Mapping(Mapping::new()));
    if child.is_null() {
        *child = Value::Mapping(Mapping::new());
    }
    set_path(child, rest, value)
}

fn apply_env_overrides(config: &mut Value, vars: impl IntoIterator<Item = (String, String)>) {
    for (key, raw) in vars {
        let Some(suffix) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let path: Vec<&str> = suffix.split("__").filter(|s| !s.is_empty()).collect();
        if path.is_empty() {
            continue;
        }
        // "true", "42", "null" become typed YAML scalars
        let value = serde_yaml::from_str::<Value>(&raw).unwrap_or(Value::String(raw.clone()));
        if let Err(err) = set_path(config, &path, value) {
            warn!(env_var = %key, error = %err, "Ignoring configuration override");
        }
    }
}

fn lower_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| {
                    let k = match k {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (k, lower_keys(v))
                })
                .collect(),
        ),
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(lower_keys).collect()),
        other => other,
    }
}

/// Recursively merges `external` into `base`: mappings merge key by key,
/// anything else is replaced.
fn merge_yaml(base: &mut Value, external: &Value) {
    match (base, external) {
        (Value::Mapping(bmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match bmap.get_mut(k) {
                    Some(bv) => merge_yaml(bv, v),
                    None => {
                        bmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (b, e) => *b = e.clone(),
    }
}
