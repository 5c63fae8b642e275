use hearth_runtime::WorkspaceService;

use super::emit;

/// Registry + state detector + cheap update check, one JSON object.
/// Never blocks on the network and never fails on scan problems; those
/// surface inside the report as warnings.
pub fn cmd_startup(service: &WorkspaceService, menu: bool) -> hearth_core::Result<()> {
    let report = service.startup(menu);
    emit(&report)
}
