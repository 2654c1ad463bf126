// src/dag/outputs.rs

//! Where a task writes its artifacts.

use std::collections::BTreeMap;

use crate::dag::model::{Project, ProjectGraph};
use crate::dag::task::Task;
use crate::errors::{Result, TaskstageError};

const OUTPUT_PATH_KEYS: &[&str] = &["outputPath", "output_path"];

/// Output paths of `task`.
///
/// Resolution order:
/// 1. explicit `outputs` on the target definition,
/// 2. an `outputPath` / `output_path` option, with the task's configuration
///    layered over the base options,
/// 3. `dist/<project root>` for `build`,
/// 4. nothing.
pub fn outputs_for_task(graph: &ProjectGraph, task: &Task) -> Result<Vec<String>> {
    let project = graph
        .project(task.project())
        .ok_or_else(|| TaskstageError::ProjectNotFound(task.project().to_string()))?;

    Ok(outputs_for_target(
        project,
        &task.target.target,
        task.target.configuration.as_deref(),
    ))
}

/// Output paths of `target` on `project` under an optional configuration.
pub fn outputs_for_target(project: &Project, target: &str, configuration: Option<&str>) -> Vec<String> {
    let def = project.targets.get(target);

    if let Some(outputs) = def.and_then(|d| d.outputs.as_ref()) {
        return outputs.clone();
    }

    let mut opts: BTreeMap<&str, &toml::Value> = BTreeMap::new();
    if let Some(def) = def {
        opts.extend(def.options.iter().map(|(k, v)| (k.as_str(), v)));
        if let Some(overlay) = configuration.and_then(|c| def.configurations.get(c)) {
            opts.extend(overlay.iter().map(|(k, v)| (k.as_str(), v)));
        }
    }

    let output_path = OUTPUT_PATH_KEYS
        .iter()
        .find_map(|key| opts.get(key).and_then(|v| v.as_str()));

    match output_path {
        Some(path) => vec![path.to_string()],
        None if target == "build" => vec![format!("dist/{}", project.root)],
        None => Vec::new(),
    }
}
