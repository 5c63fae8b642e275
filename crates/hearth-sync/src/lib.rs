//! # hearth-sync
//!
//! Synchronizes a whitelisted subset of workspace files from an upstream
//! git repository. The engine's two invariants:
//!
//! - Only whitelist paths are ever modified, and only by naming them
//!   literally in a checkout operation.
//! - Protected paths (user-owned data) are never named in any operation,
//!   and a runtime assertion refuses them as defense in depth.
//!
//! Every destructive step is preceded by a timestamped backup, dry-run
//! mutates nothing, and per-path failures are aggregated rather than
//! aborting the remaining paths.

pub mod engine;
pub mod paths;
pub mod vcs;

pub use engine::{SyncEngine, SyncFailure, SyncReport, UpdateInfo};
pub use paths::{PROTECTED_PATHS, WHITELIST_PATHS, is_protected, is_whitelisted};
pub use vcs::{GitCli, VcsPort};
