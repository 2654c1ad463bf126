// src/config/validate.rs

use std::collections::HashSet;

use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, TaskstageError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::TaskstageError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.workspace, raw.project))
    }
}

/// Validate an already-built [`ConfigFile`] again (e.g. after edits in tests).
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    let raw = RawConfigFile {
        workspace: cfg.workspace.clone(),
        project: cfg.project.clone(),
    };
    validate_raw_config(&raw)
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_projects(cfg)?;
    validate_workspace(cfg)?;
    validate_project_ids(cfg)?;
    warn_unknown_dependencies(cfg);
    Ok(())
}

fn ensure_has_projects(cfg: &RawConfigFile) -> Result<()> {
    if cfg.project.is_empty() {
        return Err(TaskstageError::ConfigError(
            "workspace must contain at least one [[project]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_workspace(cfg: &RawConfigFile) -> Result<()> {
    let ws = &cfg.workspace;

    if ws.cli.trim().is_empty() {
        return Err(TaskstageError::ConfigError(
            "[workspace].cli must not be empty".to_string(),
        ));
    }

    match ws.scripts.get(&ws.cli) {
        Some(cmd) if !cmd.trim().is_empty() => {}
        _ => {
            return Err(TaskstageError::ConfigError(format!(
                "[workspace.scripts] must contain a binding for the workspace cli, e.g. {cli} = \"{cli}\"",
                cli = ws.cli
            )));
        }
    }

    if ws.max_parallel == 0 {
        return Err(TaskstageError::ConfigError(
            "[workspace].max_parallel must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_project_ids(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for project in &cfg.project {
        if project.id.trim().is_empty() {
            return Err(TaskstageError::ConfigError(
                "every [[project]] needs a non-empty `id`".to_string(),
            ));
        }
        if !seen.insert(project.id.as_str()) {
            return Err(TaskstageError::ConfigError(format!(
                "project '{}' is declared more than once",
                project.id
            )));
        }
    }
    Ok(())
}

/// Unknown dependency targets are kept: the scheduler treats them as inert.
fn warn_unknown_dependencies(cfg: &RawConfigFile) {
    let known: HashSet<&str> = cfg.project.iter().map(|p| p.id.as_str()).collect();
    for project in &cfg.project {
        for dep in &project.dependencies {
            if !known.contains(dep.target()) {
                warn!(
                    project = %project.id,
                    dependency = %dep.target(),
                    "dependency on unknown project; it will be ignored when scheduling"
                );
            }
        }
    }
}
