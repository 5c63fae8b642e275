use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use hearth_config::HearthConfig;
use hearth_core::layout::{PROJECT_OVERVIEW_FILE, PROJECT_TASKS_FILE, PROJECT_TASKS_FILE_LEGACY};
use hearth_core::{Warning, WorkspaceLayout};
use hearth_registry::{Project, ProjectStatus, Registry, Skill, SkillSource};
use hearth_state::{
    Classification, IntegrationStatus, MemoryMarkers, classify, files_to_load, integrations,
    pending_onboarding, token_estimate,
};
use hearth_sync::SyncEngine;

/// Scanned records included in the startup report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
}

/// Auxiliary numbers computed alongside classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub token_estimate: u64,
    pub pending_onboarding: Vec<String>,
    pub integrations: Vec<IntegrationStatus>,
    pub update_available: bool,
}

/// The one-object result of a `startup` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupReport {
    pub system_state: hearth_state::SystemState,
    pub files_to_load: Vec<PathBuf>,
    pub instructions: hearth_state::Instructions,
    pub metadata: Metadata,
    pub stats: Stats,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<Warning>,
}

/// Minimal-field project row for listings without `--full`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub progress: f64,
}

impl From<&Project> for ProjectSummary {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            status: p.status,
            progress: p.progress,
        }
    }
}

/// Minimal-field skill row for listings without `--full`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSummary {
    pub name: String,
    pub description: String,
    pub source: SkillSource,
}

impl From<&Skill> for SkillSummary {
    fn from(s: &Skill) -> Self {
        Self {
            name: s.name.clone(),
            description: s.description.clone(),
            source: s.source,
        }
    }
}

/// One project with its document paths resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub overview_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks_path: Option<PathBuf>,
}

/// One skill with its declared resources resolved to absolute paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDetail {
    #[serde(flatten)]
    pub skill: Skill,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub resource_paths: Vec<PathBuf>,
}

/// The service façade behind every CLI invocation.
pub struct WorkspaceService {
    layout: WorkspaceLayout,
    config: HearthConfig,
    registry: Registry,
}

impl WorkspaceService {
    pub fn new(root: impl Into<PathBuf>, config: HearthConfig) -> Self {
        let layout = WorkspaceLayout::new(root);
        let registry = Registry::new(layout.clone());
        Self {
            layout,
            config,
            registry,
        }
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// Registry + state detector + cheap update check, composed into one
    /// JSON-serializable report. The update check never fetches and
    /// never blocks: with no network or no configured remote it simply
    /// reports false.
    pub fn startup(&self, menu_requested: bool) -> StartupReport {
        let (projects, mut warnings) = self.registry.scan_projects();
        let (skills, skill_warnings) = self.registry.scan_skills();
        warnings.extend(skill_warnings);

        let memory = MemoryMarkers::observe(&self.layout);
        let classification: Classification = classify(&projects, &memory, menu_requested);
        debug!(state = ?classification.state, "classified workspace");

        let files = files_to_load(&self.layout, &classification, &projects);
        let update_available =
            SyncEngine::with_git(self.layout.clone(), self.config.upstream.clone())
                .update_available_cached();

        StartupReport {
            system_state: classification.state,
            stats: Stats {
                token_estimate: token_estimate(&files),
                pending_onboarding: pending_onboarding(&projects),
                integrations: integrations(&self.layout),
                update_available,
            },
            files_to_load: files,
            instructions: classification.instructions,
            metadata: Metadata { projects, skills },
            warnings,
        }
    }

    /// One project's resolved metadata and file paths.
    pub fn project(&self, id: &str) -> Option<ProjectDetail> {
        let project = self.registry.project(id)?;
        let overview_path = project.path.join(PROJECT_OVERVIEW_FILE);
        let tasks = project.path.join(PROJECT_TASKS_FILE);
        let tasks_path = if tasks.is_file() {
            Some(tasks)
        } else {
            let legacy = project.path.join(PROJECT_TASKS_FILE_LEGACY);
            legacy.is_file().then_some(legacy)
        };
        Some(ProjectDetail {
            project,
            overview_path,
            tasks_path,
        })
    }

    /// One skill's resolved metadata and file paths.
    pub fn skill(&self, name: &str) -> Option<SkillDetail> {
        let skill = self.registry.skill(name)?;
        let base = skill.path.parent().map(PathBuf::from).unwrap_or_default();
        let resource_paths = skill.resources.iter().map(|r| base.join(r)).collect();
        Some(SkillDetail {
            skill,
            resource_paths,
        })
    }

    pub fn list_projects(&self) -> (Vec<Project>, Vec<Warning>) {
        self.registry.scan_projects()
    }

    pub fn list_skills(&self) -> (Vec<Skill>, Vec<Warning>) {
        self.registry.scan_skills()
    }

    /// The sync engine configured for this workspace.
    pub fn sync_engine(&self) -> SyncEngine<hearth_sync::GitCli> {
        SyncEngine::with_git(self.layout.clone(), self.config.upstream.clone())
    }
}
