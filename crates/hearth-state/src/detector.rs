use serde::{Deserialize, Serialize};
use tracing::debug;

use hearth_core::WorkspaceLayout;
use hearth_registry::{Project, ProjectStatus};

/// Well-known id of the bootstrap project. A workspace is not considered
/// initialized until this project reaches COMPLETE.
pub const BOOTSTRAP_PROJECT_ID: &str = "00";

/// Overall workspace classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemState {
    FirstTimeSetup,
    Resuming,
    Operational,
}

/// What the calling agent should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    LoadAndExecuteProject,
    ResumeProject,
    DisplayMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Immediate,
}

/// Machine-actionable instruction payload attached to a classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructions {
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<ExecutionMode>,
    pub message: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<Vec<String>>,
}

/// Classification plus its instruction payload. Computed fresh on every
/// invocation, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub state: SystemState,
    pub instructions: Instructions,
}

/// Marker-file observations feeding the classifier. A missing file is
/// meaningful input, not an error, and is distinct from a file that is
/// present but empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMarkers {
    pub memory_file_exists: bool,
    pub memory_file_empty: bool,
    pub settings_exists: bool,
}

impl MemoryMarkers {
    /// Observe the marker files under a workspace root.
    pub fn observe(layout: &WorkspaceLayout) -> Self {
        let memory = layout.memory_file();
        let memory_file_exists = memory.is_file();
        let memory_file_empty = memory_file_exists
            && std::fs::metadata(&memory).map(|m| m.len() == 0).unwrap_or(true);
        Self {
            memory_file_exists,
            memory_file_empty,
            settings_exists: layout.settings_dir().is_dir(),
        }
    }
}

/// Classify the workspace. Pure function, first matching rule wins:
///
/// 1. Bootstrap project missing or not COMPLETE, or memory marker file
///    missing entirely: FIRST_TIME_SETUP targeting the bootstrap id.
///    A present-but-empty memory file does not trigger this rule.
/// 2. Exactly one project IN_PROGRESS and the caller did not ask for
///    the menu: RESUMING targeting that project.
/// 3. Otherwise: OPERATIONAL, display the menu.
pub fn classify(
    projects: &[Project],
    memory: &MemoryMarkers,
    menu_requested: bool,
) -> Classification {
    let bootstrap = projects.iter().find(|p| p.id == BOOTSTRAP_PROJECT_ID);
    let bootstrap_complete =
        bootstrap.map(|p| p.status == ProjectStatus::Complete).unwrap_or(false);

    if !bootstrap_complete || !memory.memory_file_exists {
        let reason = if bootstrap.is_none() {
            format!("bootstrap project {BOOTSTRAP_PROJECT_ID} has not been created yet")
        } else if !bootstrap_complete {
            format!("bootstrap project {BOOTSTRAP_PROJECT_ID} is not COMPLETE")
        } else {
            "memory marker file is missing".to_string()
        };
        debug!(%reason, "classified as first-time setup");
        return Classification {
            state: SystemState::FirstTimeSetup,
            instructions: Instructions {
                action: Action::LoadAndExecuteProject,
                project_id: Some(BOOTSTRAP_PROJECT_ID.to_string()),
                execution_mode: Some(ExecutionMode::Immediate),
                message: "Workspace is not set up yet. Run the bootstrap project now.".into(),
                reason,
                workflow: Some(vec![
                    "Load the bootstrap project overview and task list".into(),
                    "Work through the unchecked tasks in order".into(),
                    "Mark each task complete as it finishes".into(),
                    "Set the project status to COMPLETE when done".into(),
                ]),
            },
        };
    }

    let in_progress: Vec<&Project> = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::InProgress)
        .collect();

    if in_progress.len() == 1 && !menu_requested {
        let p = in_progress[0];
        let message = if p.current_task.is_empty() {
            format!("Resume project {}: {}", p.id, p.name)
        } else {
            format!("Resume project {}: {} (next: {})", p.id, p.name, p.current_task)
        };
        return Classification {
            state: SystemState::Resuming,
            instructions: Instructions {
                action: Action::ResumeProject,
                project_id: Some(p.id.clone()),
                execution_mode: None,
                message,
                reason: "exactly one project is IN_PROGRESS".into(),
                workflow: None,
            },
        };
    }

    Classification {
        state: SystemState::Operational,
        instructions: Instructions {
            action: Action::DisplayMenu,
            project_id: None,
            execution_mode: None,
            message: "Workspace is operational. Show the menu.".into(),
            reason: if menu_requested {
                "menu explicitly requested".into()
            } else {
                format!("{} projects in progress", in_progress.len())
            },
            workflow: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_registry::TaskProgress;
    use std::path::Path;

    fn project(id: &str, status: &str) -> Project {
        let content = format!(
            "---\nid: \"{id}\"\nname: Project {id}\nstatus: {status}\ndescription: d\n---\n"
        );
        Project::from_overview(&content, Path::new("/ws/projects/x")).unwrap()
    }

    fn initialized_memory() -> MemoryMarkers {
        MemoryMarkers {
            memory_file_exists: true,
            memory_file_empty: false,
            settings_exists: true,
        }
    }

    #[test]
    fn empty_workspace_is_first_time_setup() {
        let memory = MemoryMarkers {
            memory_file_exists: false,
            memory_file_empty: false,
            settings_exists: false,
        };
        let c = classify(&[], &memory, false);
        assert_eq!(c.state, SystemState::FirstTimeSetup);
        assert_eq!(c.instructions.action, Action::LoadAndExecuteProject);
        assert_eq!(c.instructions.project_id.as_deref(), Some(BOOTSTRAP_PROJECT_ID));
        assert_eq!(c.instructions.execution_mode, Some(ExecutionMode::Immediate));
        assert!(c.instructions.workflow.as_ref().unwrap().len() >= 3);
    }

    #[test]
    fn incomplete_bootstrap_is_first_time_setup() {
        let projects = vec![project("00", "IN_PROGRESS")];
        let c = classify(&projects, &initialized_memory(), false);
        assert_eq!(c.state, SystemState::FirstTimeSetup);
        assert!(c.instructions.reason.contains("not COMPLETE"));
    }

    #[test]
    fn missing_memory_file_is_first_time_setup_even_with_complete_bootstrap() {
        let projects = vec![project("00", "COMPLETE")];
        let memory = MemoryMarkers {
            memory_file_exists: false,
            memory_file_empty: false,
            settings_exists: true,
        };
        let c = classify(&projects, &memory, false);
        assert_eq!(c.state, SystemState::FirstTimeSetup);
        assert!(c.instructions.reason.contains("memory"));
    }

    #[test]
    fn empty_memory_file_is_not_first_time_setup() {
        // Present-but-empty is distinct from missing
        let projects = vec![project("00", "COMPLETE")];
        let memory = MemoryMarkers {
            memory_file_exists: true,
            memory_file_empty: true,
            settings_exists: true,
        };
        let c = classify(&projects, &memory, false);
        assert_eq!(c.state, SystemState::Operational);
    }

    #[test]
    fn single_in_progress_project_resumes() {
        let projects = vec![
            project("00", "COMPLETE"),
            project("03", "IN_PROGRESS"),
            project("04", "PLANNING"),
        ];
        let c = classify(&projects, &initialized_memory(), false);
        assert_eq!(c.state, SystemState::Resuming);
        assert_eq!(c.instructions.action, Action::ResumeProject);
        assert_eq!(c.instructions.project_id.as_deref(), Some("03"));
    }

    #[test]
    fn resume_message_names_current_task() {
        let p = project("03", "IN_PROGRESS")
            .with_progress(TaskProgress::from_markdown("- [x] a\n- [ ] write draft\n"));
        let projects = vec![project("00", "COMPLETE"), p];
        let c = classify(&projects, &initialized_memory(), false);
        assert!(c.instructions.message.contains("write draft"));
    }

    #[test]
    fn menu_request_overrides_resume() {
        let projects = vec![project("00", "COMPLETE"), project("03", "IN_PROGRESS")];
        let c = classify(&projects, &initialized_memory(), true);
        assert_eq!(c.state, SystemState::Operational);
        assert_eq!(c.instructions.action, Action::DisplayMenu);
    }

    #[test]
    fn multiple_in_progress_shows_menu() {
        let projects = vec![
            project("00", "COMPLETE"),
            project("03", "IN_PROGRESS"),
            project("05", "IN_PROGRESS"),
        ];
        let c = classify(&projects, &initialized_memory(), false);
        assert_eq!(c.state, SystemState::Operational);
    }

    #[test]
    fn classification_is_deterministic() {
        let projects = vec![project("00", "COMPLETE"), project("02", "IN_PROGRESS")];
        let a = classify(&projects, &initialized_memory(), false);
        let b = classify(&projects, &initialized_memory(), false);
        assert_eq!(a, b);
    }

    #[test]
    fn state_serializes_screaming_snake() {
        let json = serde_json::to_string(&SystemState::FirstTimeSetup).unwrap();
        assert_eq!(json, "\"FIRST_TIME_SETUP\"");
        let json = serde_json::to_string(&Action::DisplayMenu).unwrap();
        assert_eq!(json, "\"display_menu\"");
    }

    #[test]
    fn observe_markers_distinguishes_missing_and_empty() {
        let ws = tempfile::tempdir().unwrap();
        let layout = hearth_core::WorkspaceLayout::new(ws.path());

        let m = MemoryMarkers::observe(&layout);
        assert!(!m.memory_file_exists);

        std::fs::create_dir_all(ws.path().join("memory")).unwrap();
        std::fs::write(layout.memory_file(), "").unwrap();
        let m = MemoryMarkers::observe(&layout);
        assert!(m.memory_file_exists);
        assert!(m.memory_file_empty);

        std::fs::write(layout.memory_file(), "# Memory\n").unwrap();
        let m = MemoryMarkers::observe(&layout);
        assert!(m.memory_file_exists);
        assert!(!m.memory_file_empty);
    }
}
