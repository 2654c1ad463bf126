// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::dag::{Project, ProjectGraph, TargetDef};
use crate::types::DependencyKind;

/// Top-level workspace file as read from TOML, before validation.
///
/// ```toml
/// [workspace]
/// cli = "nx"
/// staged_targets = ["build"]
///
/// [workspace.scripts]
/// nx = "npx nx"
///
/// [[project]]
/// id = "app1"
/// dependencies = ["common1", { target = "assets", kind = "implicit" }]
///
/// [project.targets.build]
/// options = { outputPath = "dist/app1" }
/// ```
///
/// Projects are an array of tables so their declaration order survives
/// parsing; that order decides the root order of the topological sort.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub workspace: WorkspaceSection,

    #[serde(default)]
    pub project: Vec<ProjectConfig>,
}

/// Validated workspace file. Construct via `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub workspace: WorkspaceSection,
    pub project: Vec<ProjectConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(workspace: WorkspaceSection, project: Vec<ProjectConfig>) -> Self {
        Self { workspace, project }
    }

    /// Build the project graph, preserving declaration order of projects and
    /// of each project's dependency list.
    pub fn to_graph(&self) -> ProjectGraph {
        let mut graph = ProjectGraph::new();

        for pc in &self.project {
            graph.add_project(pc.to_project());
        }

        for pc in &self.project {
            for dep in &pc.dependencies {
                debug!(
                    source = %pc.id,
                    dependency = %dep.target(),
                    kind = %dep.kind(),
                    "adding dependency edge"
                );
                graph.add_dependency(&pc.id, dep.target(), dep.kind());
            }
        }

        graph
    }

    /// Command prefix bound to `[workspace].cli` in `[workspace.scripts]`.
    ///
    /// Validation guarantees the binding exists.
    pub fn cli_program(&self) -> &str {
        self.workspace
            .scripts
            .get(&self.workspace.cli)
            .map(|s| s.as_str())
            .unwrap_or(self.workspace.cli.as_str())
    }
}

/// `[workspace]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceSection {
    /// Name of the workspace CLI; must have a binding in `scripts`.
    #[serde(default = "default_cli")]
    pub cli: String,

    /// Script bindings: name -> command prefix.
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,

    /// Targets whose tasks must respect project dependencies.
    #[serde(default = "default_staged_targets")]
    pub staged_targets: Vec<String>,

    /// Reject cyclic project graphs up front instead of tolerating them.
    #[serde(default)]
    pub detect_cycles: bool,

    /// Run the tasks of one stage concurrently.
    #[serde(default)]
    pub parallel: bool,

    /// Upper bound on concurrently running tasks when `parallel` is set.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
}

fn default_cli() -> String {
    "nx".to_string()
}

fn default_staged_targets() -> Vec<String> {
    vec!["build".to_string()]
}

fn default_max_parallel() -> usize {
    3
}

impl Default for WorkspaceSection {
    fn default() -> Self {
        Self {
            cli: default_cli(),
            scripts: BTreeMap::new(),
            staged_targets: default_staged_targets(),
            detect_cycles: false,
            parallel: false,
            max_parallel: default_max_parallel(),
        }
    }
}

/// `[[project]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub id: String,

    /// Root directory; defaults to the project id.
    #[serde(default)]
    pub root: Option<String>,

    /// Outgoing dependencies, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,

    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
}

impl ProjectConfig {
    pub fn to_project(&self) -> Project {
        let mut project = Project::new(self.id.clone());
        if let Some(root) = &self.root {
            project.root = root.clone();
        }
        project.targets = self
            .targets
            .iter()
            .map(|(name, tc)| (name.clone(), tc.to_target_def()))
            .collect();
        project
    }
}

/// A dependency entry: either a bare project id (static) or a table with
/// an explicit kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Name(String),
    Detailed {
        target: String,
        #[serde(default)]
        kind: DependencyKind,
    },
}

impl DependencySpec {
    pub fn target(&self) -> &str {
        match self {
            DependencySpec::Name(t) => t,
            DependencySpec::Detailed { target, .. } => target,
        }
    }

    pub fn kind(&self) -> DependencyKind {
        match self {
            DependencySpec::Name(_) => DependencyKind::Static,
            DependencySpec::Detailed { kind, .. } => *kind,
        }
    }
}

/// `[project.targets.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetConfig {
    #[serde(default)]
    pub options: BTreeMap<String, toml::Value>,

    #[serde(default)]
    pub configurations: BTreeMap<String, BTreeMap<String, toml::Value>>,

    #[serde(default)]
    pub outputs: Option<Vec<String>>,
}

impl TargetConfig {
    pub fn to_target_def(&self) -> TargetDef {
        TargetDef {
            options: self.options.clone(),
            configurations: self.configurations.clone(),
            outputs: self.outputs.clone(),
        }
    }
}
