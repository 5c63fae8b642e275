use std::path::Path;

use hearth_core::WorkspaceLayout;
use hearth_registry::{ProjectStatus, Registry, SkillSource};

fn write_project(root: &Path, dir_name: &str, id: &str, name: &str, status: &str, tasks: &str) {
    let dir = root.join("projects").join(dir_name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("PROJECT.md"),
        format!(
            "---\nid: \"{id}\"\nname: {name}\nstatus: {status}\ndescription: A test project\n---\n\n# {name}\n"
        ),
    )
    .unwrap();
    if !tasks.is_empty() {
        std::fs::write(dir.join("TASKS.md"), tasks).unwrap();
    }
}

fn write_skill(root: &Path, scope: &str, name: &str, description: &str) {
    let base = match scope {
        "system" => root.join("system/skills"),
        _ => root.join("skills"),
    };
    let dir = base.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("SKILL.md"),
        format!("---\nname: {name}\ndescription: {description}\n---\n\nInstructions.\n"),
    )
    .unwrap();
}

#[test]
fn scan_projects_derives_progress() {
    let ws = tempfile::tempdir().unwrap();
    write_project(
        ws.path(),
        "01-launch",
        "01",
        "Launch",
        "IN_PROGRESS",
        "- [x] pick date\n- [x] draft announcement\n- [ ] send invites\n- [ ] rehearse\n",
    );

    let registry = Registry::new(WorkspaceLayout::new(ws.path()));
    let (projects, warnings) = registry.scan_projects();

    assert_eq!(projects.len(), 1);
    assert!(warnings.is_empty());
    let p = &projects[0];
    assert_eq!(p.id, "01");
    assert_eq!(p.status, ProjectStatus::InProgress);
    assert_eq!(p.tasks_total, 4);
    assert_eq!(p.tasks_completed, 2);
    assert_eq!(p.progress, 0.5);
    assert_eq!(p.current_task, "send invites");
    assert!(p.progress >= 0.0 && p.progress <= 1.0);
    assert!(p.tasks_completed <= p.tasks_total);
}

#[test]
fn malformed_record_warns_and_scan_continues() {
    let ws = tempfile::tempdir().unwrap();
    write_project(ws.path(), "01-good", "01", "Good", "PLANNING", "- [ ] a\n");

    // Overview with no frontmatter at all
    let bad = ws.path().join("projects/02-bad");
    std::fs::create_dir_all(&bad).unwrap();
    std::fs::write(bad.join("PROJECT.md"), "# No frontmatter here\n").unwrap();

    let registry = Registry::new(WorkspaceLayout::new(ws.path()));
    let (projects, warnings) = registry.scan_projects();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, "01");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].path.ends_with("02-bad/PROJECT.md"));
}

#[test]
fn missing_task_list_warns_and_counts_zero() {
    let ws = tempfile::tempdir().unwrap();
    write_project(ws.path(), "03-idle", "03", "Idle", "PLANNING", "");

    let registry = Registry::new(WorkspaceLayout::new(ws.path()));
    let (projects, warnings) = registry.scan_projects();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].tasks_total, 0);
    assert_eq!(projects[0].progress, 0.0);
    assert!(warnings.iter().any(|w| w.reason.contains("task list")));
}

#[test]
fn non_project_directories_skipped_silently() {
    let ws = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(ws.path().join("projects/notes")).unwrap();
    std::fs::create_dir_all(ws.path().join("projects/archive")).unwrap();

    let registry = Registry::new(WorkspaceLayout::new(ws.path()));
    let (projects, warnings) = registry.scan_projects();
    assert!(projects.is_empty());
    assert!(warnings.is_empty());
}

#[test]
fn missing_projects_root_is_empty_not_fatal() {
    let ws = tempfile::tempdir().unwrap();
    let registry = Registry::new(WorkspaceLayout::new(ws.path()));
    let (projects, warnings) = registry.scan_projects();
    assert!(projects.is_empty());
    assert!(warnings.is_empty());
}

#[test]
fn scanning_is_idempotent() {
    let ws = tempfile::tempdir().unwrap();
    write_project(ws.path(), "01-a", "01", "A", "PLANNING", "- [ ] x\n");
    write_project(ws.path(), "02-b", "02", "B", "COMPLETE", "- [x] y\n");
    write_skill(ws.path(), "system", "summarize", "System summarizer");
    write_skill(ws.path(), "user", "summarize", "User summarizer");

    let registry = Registry::new(WorkspaceLayout::new(ws.path()));

    let first = serde_json::to_string(&registry.scan_projects().0).unwrap();
    let second = serde_json::to_string(&registry.scan_projects().0).unwrap();
    assert_eq!(first, second);

    let first = serde_json::to_string(&registry.scan_skills().0).unwrap();
    let second = serde_json::to_string(&registry.scan_skills().0).unwrap();
    assert_eq!(first, second);
}

#[test]
fn user_skill_shadows_system_skill() {
    let ws = tempfile::tempdir().unwrap();
    write_skill(ws.path(), "system", "foo", "System flavor");
    write_skill(ws.path(), "user", "foo", "User flavor");
    write_skill(ws.path(), "system", "bar", "Only in system");

    let registry = Registry::new(WorkspaceLayout::new(ws.path()));
    let (skills, warnings) = registry.scan_skills();

    assert!(warnings.is_empty());
    let foos: Vec<_> = skills.iter().filter(|s| s.name == "foo").collect();
    assert_eq!(foos.len(), 1);
    assert_eq!(foos[0].source, SkillSource::User);
    assert_eq!(foos[0].description, "User flavor");

    let bar = skills.iter().find(|s| s.name == "bar").unwrap();
    assert_eq!(bar.source, SkillSource::System);
}

#[test]
fn skill_field_drift_degrades_to_warnings() {
    let ws = tempfile::tempdir().unwrap();
    let dir = ws.path().join("skills/drifty");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("SKILL.md"),
        "---\ndescription: Drifted from spec\nversion: 3\n---\nBody.\n",
    )
    .unwrap();

    let registry = Registry::new(WorkspaceLayout::new(ws.path()));
    let (skills, warnings) = registry.scan_skills();

    // Still loaded, name falls back to the directory
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].name, "drifty");
    assert!(warnings.iter().any(|w| w.reason.contains("missing name")));
    assert!(warnings.iter().any(|w| w.reason.contains("version")));
}

#[test]
fn lookup_by_id_and_name() {
    let ws = tempfile::tempdir().unwrap();
    write_project(ws.path(), "07-deep", "07", "Deep Work", "PLANNING", "- [ ] think\n");
    write_skill(ws.path(), "user", "outline", "Outline documents");

    let registry = Registry::new(WorkspaceLayout::new(ws.path()));
    assert_eq!(registry.project("07").unwrap().name, "Deep Work");
    assert!(registry.project("99").is_none());
    assert_eq!(registry.skill("outline").unwrap().source, SkillSource::User);
    assert!(registry.skill("absent").is_none());
}
