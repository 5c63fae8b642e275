use serde::{Deserialize, Serialize};

/// Root configuration, maps to `hearth.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HearthConfig {
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

// ── Upstream ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Name of the git remote the sync engine manages.
    pub remote: String,
    /// URL of the upstream repository. Required before `check-update`
    /// or `sync` can ensure the remote exists.
    pub url: Option<String>,
    /// Upstream branch to sync from.
    pub branch: String,
    /// Wall-clock bound on the fetch subprocess, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            remote: "upstream".into(),
            url: None,
            branch: "main".into(),
            fetch_timeout_secs: 30,
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level ("error", "warn", "info", "debug", "trace").
    pub level: String,
    /// Log format: "pretty" or "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl HearthConfig {
    /// Validate the config. Soft problems come back as warnings, hard
    /// problems as `Err`.
    pub fn validate(&self) -> Result<Vec<String>, String> {
        let mut warnings = Vec::new();

        if self.upstream.remote.is_empty() {
            return Err("upstream.remote must not be empty".into());
        }
        if self.upstream.branch.is_empty() {
            return Err("upstream.branch must not be empty".into());
        }
        if self.upstream.fetch_timeout_secs == 0 {
            return Err("upstream.fetch_timeout_secs must be at least 1".into());
        }
        if self.upstream.url.is_none() {
            warnings.push(
                "upstream.url not set: check-update and sync will report the remote as unconfigured"
                    .into(),
            );
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => warnings.push(format!(
                "logging.format '{other}' is not recognized, falling back to pretty"
            )),
        }

        Ok(warnings)
    }
}
