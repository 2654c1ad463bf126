// src/config/mod.rs

//! Workspace file loading and validation.
//!
//! This is the graph-construction side of the tool: it turns a TOML
//! workspace description into a [`ProjectGraph`](crate::dag::ProjectGraph).
//!
//! - [`model`]: the TOML-backed data model.
//! - [`loader`]: read a workspace file from disk.
//! - [`validate`]: basic invariants (projects present, cli binding, ...).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_from_str};
pub use model::{
    ConfigFile, DependencySpec, ProjectConfig, RawConfigFile, TargetConfig, WorkspaceSection,
};
pub use validate::validate_config;
