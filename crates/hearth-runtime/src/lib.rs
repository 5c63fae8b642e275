//! # hearth-runtime
//!
//! The service façade. Composes the registry, the state detector, and
//! the sync engine's cheap update check into one JSON-serializable
//! result per invocation. Stateless: everything is recomputed from the
//! filesystem on every call.

pub mod service;

pub use service::{
    Metadata, ProjectDetail, ProjectSummary, SkillDetail, SkillSummary, StartupReport, Stats,
    WorkspaceService,
};
