use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::paths::{WHITELIST_PATHS, is_protected, is_whitelisted};
use crate::vcs::{GitCli, VcsPort};
use hearth_config::UpstreamConfig;
use hearth_core::layout::VERSION_FILE;
use hearth_core::{HearthError, Result, WorkspaceLayout};

/// Outcome of the cheap upstream check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInfo {
    /// False when the check could not complete (no remote, no network).
    pub checked: bool,
    pub update_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub changed_files: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdateInfo {
    fn unchecked(local_version: Option<String>, error: String) -> Self {
        Self {
            checked: false,
            update_available: false,
            local_version,
            upstream_version: None,
            changed_files: Vec::new(),
            error: Some(error),
        }
    }
}

/// One whitelist path that failed to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a sync attempt. Every failure mode surfaces as structured
/// fields here, never as a panic or an unhandled error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub success: bool,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_version: Option<String>,
    /// Paths actually updated.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub files_updated: Vec<PathBuf>,
    /// Paths that would update (dry-run only).
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub files_to_update: Vec<PathBuf>,
    /// Per-path failures; paths listed here were backed up first.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub files_failed: Vec<SyncFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
    /// Populated when uncommitted local changes blocked the sync.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub uncommitted_paths: Vec<PathBuf>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncReport {
    fn new(dry_run: bool, local_version: Option<String>) -> Self {
        Self {
            success: false,
            dry_run,
            local_version,
            upstream_version: None,
            files_updated: Vec::new(),
            files_to_update: Vec::new(),
            files_failed: Vec::new(),
            backup_path: None,
            uncommitted_paths: Vec::new(),
            message: String::new(),
            error: None,
        }
    }
}

/// The selective sync engine. Generic over the version-control port so
/// the safety properties are testable against a fake.
pub struct SyncEngine<P: VcsPort> {
    layout: WorkspaceLayout,
    upstream: UpstreamConfig,
    port: P,
}

impl SyncEngine<GitCli> {
    /// Engine backed by the `git` binary at the workspace root.
    pub fn with_git(layout: WorkspaceLayout, upstream: UpstreamConfig) -> Self {
        let port = GitCli::new(layout.root());
        Self::new(layout, upstream, port)
    }
}

impl<P: VcsPort> SyncEngine<P> {
    pub fn new(layout: WorkspaceLayout, upstream: UpstreamConfig, port: P) -> Self {
        Self {
            layout,
            upstream,
            port,
        }
    }

    fn upstream_ref(&self) -> String {
        format!("{}/{}", self.upstream.remote, self.upstream.branch)
    }

    fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.fetch_timeout_secs)
    }

    /// Check whether upstream has changes for the whitelist. Fetches
    /// reference metadata only, never mutates the working tree, and
    /// never raises: any failure comes back as an unchecked result with
    /// the error field set.
    pub fn check_update(&self) -> UpdateInfo {
        let local_version = self.layout.local_version();

        let Some(url) = self.upstream.url.clone() else {
            return UpdateInfo::unchecked(local_version, "upstream.url is not configured".into());
        };
        if let Err(e) = self.port.ensure_remote(&self.upstream.remote, &url) {
            return UpdateInfo::unchecked(local_version, e.to_string());
        }
        if let Err(e) = self.port.fetch(&self.upstream.remote, self.fetch_timeout()) {
            return UpdateInfo::unchecked(local_version, e.to_string());
        }

        let refspec = self.upstream_ref();
        let changed_files = match self.changed_whitelist_paths(&refspec) {
            Ok(paths) => paths,
            Err(e) => return UpdateInfo::unchecked(local_version, e.to_string()),
        };
        let upstream_version = self.upstream_version(&refspec);

        UpdateInfo {
            checked: true,
            update_available: !changed_files.is_empty(),
            local_version,
            upstream_version,
            changed_files,
            error: None,
        }
    }

    /// Cheap flag for the startup path: no fetch, no network. Compares
    /// the version marker against whatever ref an earlier explicit
    /// check already fetched; anything missing degrades to false.
    pub fn update_available_cached(&self) -> bool {
        if !matches!(self.port.has_remote(&self.upstream.remote), Ok(true)) {
            return false;
        }
        let Ok(Some(upstream_raw)) = self.port.read_blob(&self.upstream_ref(), VERSION_FILE)
        else {
            return false;
        };
        let upstream = upstream_raw.lines().next().unwrap_or("").trim();
        match self.layout.local_version() {
            Some(local) => !upstream.is_empty() && version_newer(upstream, &local),
            None => false,
        }
    }

    /// Synchronize whitelist paths from upstream. See the crate docs for
    /// the invariants; the short version: uncommitted changes abort
    /// before any mutation, dry-run mutates nothing, every path is
    /// backed up before it changes, and per-path failures do not stop
    /// the remaining paths.
    pub fn perform_sync(&self, dry_run: bool, force: bool) -> SyncReport {
        match self.try_sync(dry_run, force) {
            Ok(report) => report,
            Err(e) => {
                let mut report = SyncReport::new(dry_run, self.layout.local_version());
                report.message = "sync aborted before any mutation".into();
                if let HearthError::UncommittedChanges(paths) = &e {
                    report.uncommitted_paths = paths.clone();
                }
                report.error = Some(e.to_string());
                report
            }
        }
    }

    fn try_sync(&self, dry_run: bool, force: bool) -> Result<SyncReport> {
        let url = self
            .upstream
            .url
            .clone()
            .ok_or_else(|| HearthError::Config("upstream.url is not configured".into()))?;
        self.port.ensure_remote(&self.upstream.remote, &url)?;
        self.port.fetch(&self.upstream.remote, self.fetch_timeout())?;

        // Precondition: no uncommitted local edits on whitelist paths,
        // so a sync never silently discards user changes.
        let modified = self.port.modified_paths(WHITELIST_PATHS)?;
        if !modified.is_empty() && !force {
            return Err(HearthError::UncommittedChanges(modified));
        }

        let refspec = self.upstream_ref();
        let changed = self.changed_whitelist_paths(&refspec)?;

        let mut report = SyncReport::new(dry_run, self.layout.local_version());
        report.upstream_version = self.upstream_version(&refspec);

        if changed.is_empty() {
            report.success = true;
            report.message = "already up to date".into();
            return Ok(report);
        }

        if dry_run {
            report.success = true;
            report.message = format!("dry run: {} path(s) would update", changed.len());
            report.files_to_update = changed;
            return Ok(report);
        }

        // Backup before anything is touched; a backup failure aborts the
        // whole sync while the tree is still pristine.
        let backup_path = self.create_backup(&changed)?;
        info!(backup = %backup_path.display(), "backed up {} path(s)", changed.len());
        report.backup_path = Some(backup_path);

        for path in changed {
            match self.port.checkout_path(&refspec, &path) {
                Ok(()) => {
                    info!(path = %path.display(), "updated");
                    report.files_updated.push(path);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "update failed, continuing");
                    report.files_failed.push(SyncFailure {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        // Record the applied paths so the next invocation's precondition
        // check sees a clean tree. A failed record keeps the sync result
        // intact; it only means the next run needs --force.
        if !report.files_updated.is_empty() {
            let message = match self.upstream_version(&refspec) {
                Some(v) => format!("sync: update framework to {v}"),
                None => "sync: update framework".into(),
            };
            if let Err(e) = self.port.commit_paths(&report.files_updated, &message) {
                warn!(error = %e, "could not record synced paths");
            }
        }

        report.success = report.files_failed.is_empty();
        report.local_version = self.layout.local_version();
        report.message = if report.success {
            format!("updated {} path(s)", report.files_updated.len())
        } else {
            let msg = format!(
                "partial sync: {} updated, {} failed",
                report.files_updated.len(),
                report.files_failed.len()
            );
            report.error = Some(msg.clone());
            msg
        };
        Ok(report)
    }

    /// Upstream diff restricted to the whitelist, with the runtime
    /// assertion on top: any path outside the whitelist or inside the
    /// protected set aborts before anything would touch it.
    fn changed_whitelist_paths(&self, refspec: &str) -> Result<Vec<PathBuf>> {
        let changed = self.port.diff_paths(refspec, WHITELIST_PATHS)?;
        for path in &changed {
            if !is_whitelisted(path) || is_protected(path) {
                return Err(HearthError::PathNotWhitelisted(path.clone()));
            }
        }
        Ok(changed)
    }

    fn upstream_version(&self, refspec: &str) -> Option<String> {
        let raw = self.port.read_blob(refspec, VERSION_FILE).ok()??;
        let line = raw.lines().next().unwrap_or("").trim();
        if line.is_empty() {
            None
        } else {
            Some(line.to_string())
        }
    }

    /// Copy the current on-disk content of each path into a fresh
    /// timestamped backup directory, preserving relative structure.
    /// Paths that do not exist locally yet (new upstream files) have
    /// nothing to back up.
    fn create_backup(&self, paths: &[PathBuf]) -> Result<PathBuf> {
        let dir = self.layout.backups_dir().join(backup_stamp());
        std::fs::create_dir_all(&dir)
            .map_err(|e| HearthError::Backup(format!("cannot create {}: {e}", dir.display())))?;

        for path in paths {
            let src = self.layout.root().join(path);
            if !src.is_file() {
                continue;
            }
            let dst = dir.join(path);
            if let Some(parent) = dst.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    HearthError::Backup(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
            std::fs::copy(&src, &dst).map_err(|e| {
                HearthError::Backup(format!("cannot copy {}: {e}", path.display()))
            })?;
        }
        Ok(dir)
    }
}

/// High-resolution timestamp plus pid. Two invocations racing to create
/// a backup directory is accepted; the suffix disambiguates without
/// cross-process locking.
fn backup_stamp() -> String {
    let now = chrono::Local::now();
    format!(
        "{}-{:06}-{}",
        now.format("%Y%m%d-%H%M%S"),
        now.timestamp_subsec_micros(),
        std::process::id()
    )
}

/// Is version `a` newer than `b`? Dotted numeric comparison; missing
/// segments count as zero.
pub fn version_newer(a: &str, b: &str) -> bool {
    let parse =
        |v: &str| -> Vec<u64> { v.split('.').filter_map(|s| s.parse::<u64>().ok()).collect() };
    let va = parse(a);
    let vb = parse(b);
    for i in 0..va.len().max(vb.len()) {
        let xa = va.get(i).copied().unwrap_or(0);
        let xb = vb.get(i).copied().unwrap_or(0);
        if xa > xb {
            return true;
        }
        if xa < xb {
            return false;
        }
    }
    false
}
