use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::frontmatter::Frontmatter;
use hearth_core::layout::{PROJECT_TASKS_FILE, PROJECT_TASKS_FILE_LEGACY};

/// Lifecycle status declared in a project's overview frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Complete,
}

impl ProjectStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PLANNING" => Some(Self::Planning),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETE" => Some(Self::Complete),
            _ => None,
        }
    }
}

/// A project record reconstructed from its overview document, with
/// progress derived from the task-list file at read time. The derived
/// fields are never read from the overview document, even when present
/// there, so the task list stays the single source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    pub path: PathBuf,
    pub tasks_total: usize,
    pub tasks_completed: usize,
    pub progress: f64,
    pub current_task: String,
}

impl Project {
    /// Parse the overview frontmatter. Returns a reason string on
    /// failure; the scanner turns it into a warning and moves on.
    pub fn from_overview(content: &str, dir: &Path) -> Result<Self, String> {
        let (fm, _body) = Frontmatter::parse(content)?;

        let id = fm.get("id").ok_or("missing required field: id")?;
        let name = fm.get("name").ok_or("missing required field: name")?;
        let status_raw = fm.get("status").ok_or("missing required field: status")?;
        let description = fm
            .get("description")
            .ok_or("missing required field: description")?;

        let status = ProjectStatus::parse(&status_raw)
            .ok_or_else(|| format!("unknown status '{status_raw}'"))?;

        Ok(Self {
            id,
            name,
            status,
            description,
            created: fm.get("created"),
            updated: fm.get("updated"),
            path: dir.to_path_buf(),
            tasks_total: 0,
            tasks_completed: 0,
            progress: 0.0,
            current_task: String::new(),
        })
    }

    /// Fold derived task progress into the record.
    pub fn with_progress(mut self, progress: TaskProgress) -> Self {
        self.tasks_total = progress.total;
        self.tasks_completed = progress.completed;
        self.progress = progress.fraction();
        self.current_task = progress.current_task;
        self
    }

    /// Split a `{id}-{slug}` directory name. The id is the leading run
    /// of ASCII digits; anything without that shape is not a project.
    pub fn split_dir_name(name: &str) -> Option<(&str, &str)> {
        let digits = name.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        let rest = &name[digits..];
        let slug = rest.strip_prefix('-')?;
        if slug.is_empty() {
            return None;
        }
        Some((&name[..digits], slug))
    }
}

/// Checkbox counts derived from a task-list document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskProgress {
    pub total: usize,
    pub completed: usize,
    /// Trimmed text of the first unchecked item, empty when none.
    pub current_task: String,
}

impl TaskProgress {
    /// Read the project's task list. Probes the legacy filename only
    /// when the current one is absent. `None` when neither file exists.
    pub fn from_project_dir(dir: &Path) -> Option<Self> {
        let tasks = dir.join(PROJECT_TASKS_FILE);
        let path = if tasks.exists() {
            tasks
        } else {
            let legacy = dir.join(PROJECT_TASKS_FILE_LEGACY);
            if legacy.exists() { legacy } else { return None }
        };
        let content = std::fs::read_to_string(path).ok()?;
        Some(Self::from_markdown(&content))
    }

    /// Count checkbox markers, tolerant of leading whitespace and the
    /// case of the `x`.
    pub fn from_markdown(content: &str) -> Self {
        let mut progress = Self::default();
        for line in content.lines() {
            match checkbox_state(line) {
                Some((true, _)) => {
                    progress.total += 1;
                    progress.completed += 1;
                }
                Some((false, text)) => {
                    progress.total += 1;
                    if progress.current_task.is_empty() {
                        progress.current_task = text.trim().to_string();
                    }
                }
                None => {}
            }
        }
        progress
    }

    /// completed / total, or 0 when there are no tasks.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// `Some((checked, remainder))` when the line is a checkbox marker.
fn checkbox_state(line: &str) -> Option<(bool, &str)> {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix("- [ ]") {
        return Some((false, rest));
    }
    if let Some(rest) = trimmed.strip_prefix("- [x]") {
        return Some((true, rest));
    }
    if let Some(rest) = trimmed.strip_prefix("- [X]") {
        return Some((true, rest));
    }
    None
}
