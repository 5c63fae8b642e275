//! Auxiliary stats computed alongside classification. These feed the
//! façade's output and are not part of the state machine proper.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::detector::Classification;
use hearth_core::WorkspaceLayout;
use hearth_registry::{Project, ProjectStatus};

/// Fixed onboarding sequence: project ids a new workspace is expected to
/// complete, in order, before being considered fully initialized.
pub const ONBOARDING_PROJECT_IDS: &[&str] = &["00", "01"];

/// Rough bytes-per-token ratio used for the context budget estimate.
const BYTES_PER_TOKEN: u64 = 4;

/// One integration's availability. "Available" means a descriptor exists
/// under the framework directory; "configured" additionally requires a
/// credential file to exist. Credential contents are never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationStatus {
    pub name: String,
    pub available: bool,
    pub configured: bool,
}

/// The files a calling agent would load for this classification: the
/// root instruction document, the memory file, and the target project's
/// documents when the instructions name one. Only files that exist are
/// listed.
pub fn files_to_load(
    layout: &WorkspaceLayout,
    classification: &Classification,
    projects: &[Project],
) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for candidate in [layout.agents_file(), layout.memory_file()] {
        if candidate.is_file() {
            files.push(candidate);
        }
    }

    if let Some(target_id) = &classification.instructions.project_id {
        if let Some(project) = projects.iter().find(|p| &p.id == target_id) {
            for name in [
                hearth_core::layout::PROJECT_OVERVIEW_FILE,
                hearth_core::layout::PROJECT_TASKS_FILE,
                hearth_core::layout::PROJECT_TASKS_FILE_LEGACY,
            ] {
                let candidate = project.path.join(name);
                if candidate.is_file() {
                    files.push(candidate);
                    // One task list is enough; prefer the current name
                    if name == hearth_core::layout::PROJECT_TASKS_FILE {
                        break;
                    }
                }
            }
        }
    }

    files
}

/// Aggregate byte size of the given files divided by a rough
/// bytes-per-token ratio. An estimate for budgeting, not accounting.
pub fn token_estimate(files: &[PathBuf]) -> u64 {
    let bytes: u64 = files
        .iter()
        .filter_map(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .sum();
    bytes / BYTES_PER_TOKEN
}

/// Members of the onboarding sequence not yet COMPLETE. A project that
/// has not been created at all counts as pending.
pub fn pending_onboarding(projects: &[Project]) -> Vec<String> {
    ONBOARDING_PROJECT_IDS
        .iter()
        .filter(|id| {
            !projects
                .iter()
                .any(|p| &p.id == *id && p.status == ProjectStatus::Complete)
        })
        .map(|id| id.to_string())
        .collect()
}

/// Discover integrations: descriptors under `system/integrations/` are
/// available; a matching `.credentials/<name>.json` marks one configured.
/// Sorted by name for stable output.
pub fn integrations(layout: &WorkspaceLayout) -> Vec<IntegrationStatus> {
    let mut found = Vec::new();

    let Ok(entries) = std::fs::read_dir(layout.integrations_dir()) else {
        return found;
    };

    for entry in entries.flatten() {
        if !entry.path().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let credential = layout.credentials_dir().join(format!("{name}.json"));
        found.push(IntegrationStatus {
            configured: credential.is_file(),
            available: true,
            name,
        });
    }

    found.sort_by(|a, b| a.name.cmp(&b.name));
    found
}
