use tracing::info;

use hearth_runtime::WorkspaceService;

use super::emit;

/// Cheap upstream check. Degraded results (no url, no network) come back
/// as `checked=false` with an error field; the command itself succeeds.
pub fn cmd_check_update(service: &WorkspaceService) -> hearth_core::Result<()> {
    let info = service.sync_engine().check_update();
    emit(&info)
}

/// Selective sync. All failure modes (uncommitted changes, backup
/// failure, per-path errors) surface as structured fields in the report
/// rather than a non-zero exit, so a calling agent can keep its session.
pub fn cmd_sync(service: &WorkspaceService, dry_run: bool, force: bool) -> hearth_core::Result<()> {
    let report = service.sync_engine().perform_sync(dry_run, force);
    if report.success {
        info!(
            dry_run,
            updated = report.files_updated.len(),
            pending = report.files_to_update.len(),
            "sync finished"
        );
    }
    emit(&report)
}
