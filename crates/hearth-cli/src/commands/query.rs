use serde_json::json;

use hearth_runtime::{ProjectSummary, SkillSummary, WorkspaceService};

use super::emit;

pub fn cmd_project(service: &WorkspaceService, id: &str) -> hearth_core::Result<()> {
    match service.project(id) {
        Some(detail) => emit(&detail),
        None => emit(&json!({ "error": format!("project '{id}' not found") })),
    }
}

pub fn cmd_skill(service: &WorkspaceService, name: &str) -> hearth_core::Result<()> {
    match service.skill(name) {
        Some(detail) => emit(&detail),
        None => emit(&json!({ "error": format!("skill '{name}' not found") })),
    }
}

pub fn cmd_list_projects(service: &WorkspaceService, full: bool) -> hearth_core::Result<()> {
    let (projects, warnings) = service.list_projects();
    if full {
        emit(&json!({ "projects": projects, "warnings": warnings }))
    } else {
        let rows: Vec<ProjectSummary> = projects.iter().map(ProjectSummary::from).collect();
        emit(&json!({ "projects": rows, "warnings": warnings }))
    }
}

pub fn cmd_list_skills(service: &WorkspaceService, full: bool) -> hearth_core::Result<()> {
    let (skills, warnings) = service.list_skills();
    if full {
        emit(&json!({ "skills": skills, "warnings": warnings }))
    } else {
        let rows: Vec<SkillSummary> = skills.iter().map(SkillSummary::from).collect();
        emit(&json!({ "skills": rows, "warnings": warnings }))
    }
}
