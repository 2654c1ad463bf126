#![allow(dead_code)]

use taskstage::config::{
    ConfigFile, DependencySpec, ProjectConfig, RawConfigFile, TargetConfig, WorkspaceSection,
};
use taskstage::dag::{Overrides, Project, ProjectGraph, TargetDef, Task};
use taskstage::types::DependencyKind;

/// Builder for `ProjectGraph` to simplify test setup.
///
/// Projects and edges keep the order in which they are added.
pub struct GraphBuilder {
    graph: ProjectGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: ProjectGraph::new(),
        }
    }

    /// Add a project with a `build` target.
    pub fn project(mut self, id: &str) -> Self {
        let mut project = Project::new(id);
        project.targets.insert("build".to_string(), TargetDef::default());
        self.graph.add_project(project);
        self
    }

    /// Add a fully specified project.
    pub fn with_project(mut self, project: Project) -> Self {
        self.graph.add_project(project);
        self
    }

    /// Add a static edge `source -> target`, registering `source` if needed.
    pub fn dep(self, source: &str, target: &str) -> Self {
        self.dep_kind(source, target, DependencyKind::Static)
    }

    pub fn dep_kind(mut self, source: &str, target: &str, kind: DependencyKind) -> Self {
        self.graph.add_dependency(source, target, kind);
        self
    }

    pub fn build(self) -> ProjectGraph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The five-project workspace used across tests:
///
/// ```text
/// subapp2 -> app2 -> common2
/// app1 -> common1
/// ```
///
/// Declared in the order subapp2, app1, app2, common1, common2.
pub fn sample_graph() -> ProjectGraph {
    GraphBuilder::new()
        .project("subapp2")
        .project("app1")
        .project("app2")
        .project("common1")
        .project("common2")
        .dep("subapp2", "app2")
        .dep("app1", "common1")
        .dep("app2", "common2")
        .build()
}

/// A `build` task with no configuration or overrides.
pub fn build_task(project: &str) -> Task {
    task(project, "build")
}

pub fn task(project: &str, target: &str) -> Task {
    Task::new(project, target, None, Overrides::new())
}

/// `build` tasks for every project, in the given order.
pub fn build_tasks(projects: &[&str]) -> Vec<Task> {
    projects.iter().map(|p| build_task(p)).collect()
}

/// Builder for a validated `ConfigFile`.
///
/// The workspace cli binding (`nx = "nx"`) is set up front so the result
/// passes validation unless a test removes it.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut workspace = WorkspaceSection::default();
        workspace
            .scripts
            .insert(workspace.cli.clone(), workspace.cli.clone());
        Self {
            config: RawConfigFile {
                workspace,
                project: Vec::new(),
            },
        }
    }

    pub fn with_project(mut self, project: ProjectConfig) -> Self {
        self.config.project.push(project);
        self
    }

    pub fn with_script(mut self, name: &str, cmd: &str) -> Self {
        self.config
            .workspace
            .scripts
            .insert(name.to_string(), cmd.to_string());
        self
    }

    pub fn with_staged_targets(mut self, targets: &[&str]) -> Self {
        self.config.workspace.staged_targets = targets.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ProjectConfig`.
pub struct ProjectConfigBuilder {
    project: ProjectConfig,
}

impl ProjectConfigBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            project: ProjectConfig {
                id: id.to_string(),
                root: None,
                dependencies: vec![],
                targets: Default::default(),
            },
        }
    }

    pub fn root(mut self, root: &str) -> Self {
        self.project.root = Some(root.to_string());
        self
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        self.project
            .dependencies
            .push(DependencySpec::Name(dep.to_string()));
        self
    }

    pub fn depends_on_kind(mut self, dep: &str, kind: DependencyKind) -> Self {
        self.project.dependencies.push(DependencySpec::Detailed {
            target: dep.to_string(),
            kind,
        });
        self
    }

    pub fn target(mut self, name: &str) -> Self {
        self.project
            .targets
            .insert(name.to_string(), TargetConfig::default());
        self
    }

    pub fn build(self) -> ProjectConfig {
        self.project
    }
}
