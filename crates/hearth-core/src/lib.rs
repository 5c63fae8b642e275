//! # hearth-core
//!
//! Core types, workspace layout, and error types for the Hearth workspace
//! orchestrator. This crate defines the shared vocabulary used by every
//! other crate in the workspace.

pub mod error;
pub mod layout;

pub use error::{HearthError, Result, Warning};
pub use layout::WorkspaceLayout;
