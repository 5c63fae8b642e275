//! The two path sets that bound every sync operation.

use std::path::Path;

use hearth_core::layout::{
    AGENTS_FILE, BACKUPS_DIR, CREDENTIALS_DIR, MEMORY_DIR, PROJECTS_DIR, SETTINGS_DIR, SYSTEM_DIR,
    USER_SKILLS_DIR, VERSION_FILE, WORKSPACE_DIR,
};

/// The only paths sync may ever modify: the framework directory and two
/// root-level files. Exactly these, no wildcard expansion.
pub const WHITELIST_PATHS: &[&str] = &[SYSTEM_DIR, AGENTS_FILE, VERSION_FILE];

/// Paths guaranteed untouched by any sync operation. Protection works by
/// never naming them; membership here backs the runtime assertion.
pub const PROTECTED_PATHS: &[&str] = &[
    MEMORY_DIR,
    PROJECTS_DIR,
    USER_SKILLS_DIR,
    WORKSPACE_DIR,
    CREDENTIALS_DIR,
    SETTINGS_DIR,
    BACKUPS_DIR,
];

/// True when `path` (workspace-relative) is a whitelist entry or inside
/// the whitelisted framework directory.
pub fn is_whitelisted(path: &Path) -> bool {
    WHITELIST_PATHS
        .iter()
        .any(|entry| path == Path::new(entry) || path.starts_with(entry))
}

/// True when `path` (workspace-relative) is inside the protected set.
pub fn is_protected(path: &Path) -> bool {
    PROTECTED_PATHS
        .iter()
        .any(|entry| path == Path::new(entry) || path.starts_with(entry))
}
