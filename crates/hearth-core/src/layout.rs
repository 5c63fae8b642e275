//! Well-known paths inside a managed workspace.
//!
//! Every component takes an explicit workspace root and resolves paths
//! through this type. Nothing in Hearth reads the process working
//! directory.

use std::path::{Path, PathBuf};

/// Directory of user projects (`{id}-{slug}` children).
pub const PROJECTS_DIR: &str = "projects";
/// Directory of user-scoped skills.
pub const USER_SKILLS_DIR: &str = "skills";
/// Upstream-owned framework directory.
pub const SYSTEM_DIR: &str = "system";
/// System-scoped skills, inside the framework directory.
pub const SYSTEM_SKILLS_DIR: &str = "system/skills";
/// Integration descriptors, inside the framework directory.
pub const INTEGRATIONS_DIR: &str = "system/integrations";
/// Memory directory and its marker file.
pub const MEMORY_DIR: &str = "memory";
pub const MEMORY_FILE: &str = "memory/MEMORY.md";
/// Scratch area for in-flight work.
pub const WORKSPACE_DIR: &str = "workspace";
/// Per-integration credential files.
pub const CREDENTIALS_DIR: &str = ".credentials";
/// Local settings directory, holds hearth.toml.
pub const SETTINGS_DIR: &str = ".settings";
/// Sync engine's own backups.
pub const BACKUPS_DIR: &str = ".backups";
/// Root instruction document.
pub const AGENTS_FILE: &str = "AGENTS.md";
/// Single-line version marker.
pub const VERSION_FILE: &str = "VERSION";

/// Overview document inside a project directory.
pub const PROJECT_OVERVIEW_FILE: &str = "PROJECT.md";
/// Task-list document inside a project directory.
pub const PROJECT_TASKS_FILE: &str = "TASKS.md";
/// Older task-list filename, probed when TASKS.md is absent.
pub const PROJECT_TASKS_FILE_LEGACY: &str = "TODO.md";

/// Skill definition filename inside a skill directory.
pub const SKILL_FILE: &str = "SKILL.md";

/// Resolves well-known paths under one workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.root.join(PROJECTS_DIR)
    }

    pub fn user_skills_dir(&self) -> PathBuf {
        self.root.join(USER_SKILLS_DIR)
    }

    pub fn system_dir(&self) -> PathBuf {
        self.root.join(SYSTEM_DIR)
    }

    pub fn system_skills_dir(&self) -> PathBuf {
        self.root.join(SYSTEM_SKILLS_DIR)
    }

    pub fn integrations_dir(&self) -> PathBuf {
        self.root.join(INTEGRATIONS_DIR)
    }

    pub fn memory_file(&self) -> PathBuf {
        self.root.join(MEMORY_FILE)
    }

    pub fn workspace_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    pub fn credentials_dir(&self) -> PathBuf {
        self.root.join(CREDENTIALS_DIR)
    }

    pub fn settings_dir(&self) -> PathBuf {
        self.root.join(SETTINGS_DIR)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.root.join(BACKUPS_DIR)
    }

    pub fn agents_file(&self) -> PathBuf {
        self.root.join(AGENTS_FILE)
    }

    pub fn version_file(&self) -> PathBuf {
        self.root.join(VERSION_FILE)
    }

    /// Read the single-line version marker. `None` when the file is
    /// absent (a fresh workspace before first sync).
    pub fn local_version(&self) -> Option<String> {
        let raw = std::fs::read_to_string(self.version_file()).ok()?;
        let line = raw.lines().next().unwrap_or("").trim();
        if line.is_empty() {
            None
        } else {
            Some(line.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_under_root() {
        let layout = WorkspaceLayout::new("/ws");
        assert_eq!(layout.projects_dir(), PathBuf::from("/ws/projects"));
        assert_eq!(layout.memory_file(), PathBuf::from("/ws/memory/MEMORY.md"));
        assert_eq!(
            layout.system_skills_dir(),
            PathBuf::from("/ws/system/skills")
        );
        assert_eq!(layout.version_file(), PathBuf::from("/ws/VERSION"));
    }

    #[test]
    fn local_version_reads_first_line() {
        let dir = tempfile::tempdir().unwrap();
        let layout = WorkspaceLayout::new(dir.path());
        assert_eq!(layout.local_version(), None);

        std::fs::write(layout.version_file(), "1.4.0\n").unwrap();
        assert_eq!(layout.local_version(), Some("1.4.0".into()));

        std::fs::write(layout.version_file(), "  2.0.1  \nnotes\n").unwrap();
        assert_eq!(layout.local_version(), Some("2.0.1".into()));
    }

    #[test]
    fn local_version_empty_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let layout = WorkspaceLayout::new(dir.path());
        std::fs::write(layout.version_file(), "\n").unwrap();
        assert_eq!(layout.local_version(), None);
    }
}
