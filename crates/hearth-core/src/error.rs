use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for the entire Hearth workspace orchestrator.
#[derive(Error, Debug)]
pub enum HearthError {
    // ── Registry errors ────────────────────────────────────────
    #[error("metadata parse error in {path}: {reason}")]
    MetadataParse { path: PathBuf, reason: String },

    #[error("expected file missing: {0}")]
    MissingFile(PathBuf),

    // ── Sync errors ────────────────────────────────────────────
    #[error("uncommitted local changes block sync: {}", paths_display(.0))]
    UncommittedChanges(Vec<PathBuf>),

    #[error("upstream unreachable: {0}")]
    Network(String),

    #[error("backup failed before any mutation: {0}")]
    Backup(String),

    #[error("version control error: {0}")]
    Vcs(String),

    #[error("sync refused path outside whitelist: {0}")]
    PathNotWhitelisted(PathBuf),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, HearthError>;

fn paths_display(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A non-fatal problem noticed during a scan. One malformed record yields
/// a warning and the scan continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub path: PathBuf,
    pub reason: String,
}

impl Warning {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncommitted_changes_lists_paths() {
        let err = HearthError::UncommittedChanges(vec![
            PathBuf::from("VERSION"),
            PathBuf::from("system/skills/a/SKILL.md"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("VERSION"));
        assert!(msg.contains("system/skills/a/SKILL.md"));
    }

    #[test]
    fn warning_display() {
        let w = Warning::new("projects/03-roadmap/PROJECT.md", "missing status field");
        assert_eq!(
            w.to_string(),
            "projects/03-roadmap/PROJECT.md: missing status field"
        );
    }

    #[test]
    fn warning_serializes() {
        let w = Warning::new("skills/foo/SKILL.md", "no description");
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["path"], "skills/foo/SKILL.md");
        assert_eq!(json["reason"], "no description");
    }
}
