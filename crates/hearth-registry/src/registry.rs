use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::project::{Project, TaskProgress};
use crate::skill::{Skill, SkillSource};
use hearth_core::layout::{PROJECT_OVERVIEW_FILE, PROJECT_TASKS_FILE, SKILL_FILE};
use hearth_core::{Warning, WorkspaceLayout};

/// The metadata registry. Scans a workspace's project and skill roots
/// and reconstructs their records, accumulating warnings instead of
/// failing: this content is externally authored and drifts from spec.
///
/// Scans are read-only and recomputed from scratch on every call; the
/// filesystem is the single source of truth.
pub struct Registry {
    layout: WorkspaceLayout,
}

impl Registry {
    pub fn new(layout: WorkspaceLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// Scan the projects root. Results keep directory-enumeration order;
    /// one malformed record never aborts the scan.
    pub fn scan_projects(&self) -> (Vec<Project>, Vec<Warning>) {
        let mut projects = Vec::new();
        let mut warnings = Vec::new();

        let root = self.layout.projects_dir();
        let entries = match std::fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(_) => {
                debug!(?root, "projects directory does not exist, skipping");
                return (projects, warnings);
            }
        };

        for entry in entries.flatten() {
            let dir = entry.path();
            if !dir.is_dir() {
                continue;
            }
            let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if Project::split_dir_name(dir_name).is_none() {
                debug!(?dir, "not an {{id}}-{{slug}} directory, skipping");
                continue;
            }

            let overview = dir.join(PROJECT_OVERVIEW_FILE);
            let content = match std::fs::read_to_string(&overview) {
                Ok(c) => c,
                Err(_) => {
                    warn!(path = ?overview, "project overview missing");
                    warnings.push(Warning::new(&overview, "overview document missing"));
                    continue;
                }
            };

            let project = match Project::from_overview(&content, &dir) {
                Ok(p) => p,
                Err(reason) => {
                    warn!(path = ?overview, %reason, "failed to parse project");
                    warnings.push(Warning::new(&overview, reason));
                    continue;
                }
            };

            let project = match TaskProgress::from_project_dir(&dir) {
                Some(progress) => project.with_progress(progress),
                None => {
                    warnings.push(Warning::new(
                        dir.join(PROJECT_TASKS_FILE),
                        "task list missing, treating as zero tasks",
                    ));
                    project
                }
            };

            debug!(id = %project.id, name = %project.name, "loaded project");
            projects.push(project);
        }

        (projects, warnings)
    }

    /// Scan both skill roots and merge by name. A user-root entry always
    /// replaces a system-root entry of the same name: explicit priority,
    /// not insertion order. Result order is first-seen order, which keeps
    /// repeated scans of identical state byte-identical.
    pub fn scan_skills(&self) -> (Vec<Skill>, Vec<Warning>) {
        let mut skills: Vec<Skill> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut warnings = Vec::new();

        let roots = [
            (self.layout.system_skills_dir(), SkillSource::System),
            (self.layout.user_skills_dir(), SkillSource::User),
        ];

        for (root, source) in roots {
            for skill in self.scan_skill_root(&root, source, &mut warnings) {
                match index.get(&skill.name) {
                    Some(&i) => {
                        debug!(skill = %skill.name, ?source, "shadowing lower-priority skill");
                        skills[i] = skill;
                    }
                    None => {
                        index.insert(skill.name.clone(), skills.len());
                        skills.push(skill);
                    }
                }
            }
        }

        (skills, warnings)
    }

    fn scan_skill_root(
        &self,
        root: &Path,
        source: SkillSource,
        warnings: &mut Vec<Warning>,
    ) -> Vec<Skill> {
        let mut found = Vec::new();

        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(_) => {
                debug!(?root, "skills directory does not exist, skipping");
                return found;
            }
        };

        for entry in entries.flatten() {
            let dir = entry.path();
            if !dir.is_dir() {
                continue;
            }
            let skill_md = dir.join(SKILL_FILE);
            if !skill_md.exists() {
                continue;
            }
            let content = match std::fs::read_to_string(&skill_md) {
                Ok(c) => c,
                Err(e) => {
                    warnings.push(Warning::new(&skill_md, format!("unreadable: {e}")));
                    continue;
                }
            };
            match Skill::parse(&content, &skill_md, source) {
                Ok((skill, reasons)) => {
                    for reason in reasons {
                        warnings.push(Warning::new(&skill_md, reason));
                    }
                    debug!(skill = %skill.name, ?source, "loaded skill");
                    found.push(skill);
                }
                Err(reason) => {
                    warn!(path = ?skill_md, %reason, "failed to parse skill");
                    warnings.push(Warning::new(&skill_md, reason));
                }
            }
        }

        found
    }

    /// Look up one project by id.
    pub fn project(&self, id: &str) -> Option<Project> {
        let (projects, _) = self.scan_projects();
        projects.into_iter().find(|p| p.id == id)
    }

    /// Look up one skill by name (after user-over-system merge).
    pub fn skill(&self, name: &str) -> Option<Skill> {
        let (skills, _) = self.scan_skills();
        skills.into_iter().find(|s| s.name == name)
    }
}
