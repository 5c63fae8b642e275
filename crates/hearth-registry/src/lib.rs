//! # hearth-registry
//!
//! Reconstructs the state of a projects + skills workspace from
//! frontmatter-bearing markdown documents. All scans are read-only and
//! best-effort: a malformed record contributes a [`hearth_core::Warning`]
//! and never aborts the scan.

pub mod frontmatter;
pub mod project;
pub mod registry;
pub mod skill;

pub use frontmatter::Frontmatter;
pub use project::{Project, ProjectStatus, TaskProgress};
pub use registry::Registry;
pub use skill::{Skill, SkillSource};
