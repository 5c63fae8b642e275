use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::schema::HearthConfig;
use hearth_core::layout::SETTINGS_DIR;

/// Loads the Hearth configuration for one invocation.
pub struct ConfigLoader {
    config: HearthConfig,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > HEARTH_CONFIG env >
    /// `<root>/.settings/hearth.toml` > `~/.hearth/hearth.toml`.
    pub fn resolve_path(explicit: Option<&Path>, root: &Path) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("HEARTH_CONFIG") {
            return PathBuf::from(p);
        }
        let local = root.join(SETTINGS_DIR).join("hearth.toml");
        if local.exists() {
            return local;
        }
        if let Some(home) = dirs::home_dir() {
            let fallback = home.join(".hearth").join("hearth.toml");
            if fallback.exists() {
                return fallback;
            }
        }
        local
    }

    /// Load the config from disk, falling back to defaults when the file
    /// does not exist.
    pub fn load(explicit: Option<&Path>, root: &Path) -> hearth_core::Result<Self> {
        let config_path = Self::resolve_path(explicit, root);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            toml::from_str::<HearthConfig>(&raw).map_err(|e| {
                hearth_core::HearthError::Config(format!(
                    "failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })?
        } else {
            info!(?config_path, "config file not found, using defaults");
            HearthConfig::default()
        };

        let config = Self::apply_env_overrides(config);

        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => {
                return Err(hearth_core::HearthError::Config(e));
            }
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Get a snapshot of the loaded config.
    pub fn get(&self) -> HearthConfig {
        self.config.clone()
    }

    /// Path the config was resolved from.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Apply env var overrides (HEARTH_UPSTREAM_URL, HEARTH_LOG_LEVEL, ...).
    fn apply_env_overrides(mut config: HearthConfig) -> HearthConfig {
        if let Ok(v) = std::env::var("HEARTH_UPSTREAM_URL") {
            config.upstream.url = Some(v);
        }
        if let Ok(v) = std::env::var("HEARTH_UPSTREAM_BRANCH") {
            config.upstream.branch = v;
        }
        if let Ok(v) = std::env::var("HEARTH_FETCH_TIMEOUT_SECS") {
            if let Ok(secs) = v.parse::<u64>() {
                config.upstream.fetch_timeout_secs = secs;
            }
        }
        if let Ok(v) = std::env::var("HEARTH_LOG_LEVEL") {
            config.logging.level = v;
        }
        config
    }
}
