// src/dag/model.rs

//! Passive project graph: projects plus their outgoing dependency edges.

use std::collections::{BTreeMap, HashMap};

use crate::dag::traversal::Vertex;
use crate::types::DependencyKind;

/// Canonical project identifier type.
pub type ProjectId = String;

/// A directed dependency edge: `source` requires the output of `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub source: ProjectId,
    pub target: ProjectId,
    pub kind: DependencyKind,
}

impl Dependency {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: DependencyKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

/// Definition of a single runnable target (e.g. `build`) of a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetDef {
    /// Base options for the target.
    pub options: BTreeMap<String, toml::Value>,
    /// Named option sets layered on top of `options`.
    pub configurations: BTreeMap<String, BTreeMap<String, toml::Value>>,
    /// Explicit output paths. When present they take precedence over
    /// anything derived from options.
    pub outputs: Option<Vec<String>>,
}

/// A named unit of the workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    /// Root directory relative to the workspace root.
    pub root: String,
    pub targets: BTreeMap<String, TargetDef>,
}

impl Project {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            root: id.clone(),
            id,
            targets: BTreeMap::new(),
        }
    }

    pub fn has_target(&self, target: &str) -> bool {
        self.targets.contains_key(target)
    }
}

/// Map from project id to its outgoing edges.
///
/// Keys iterate in the order they were first inserted, and each edge list
/// keeps insertion order. Both orders feed the topological sort, so they are
/// part of the observable behaviour.
#[derive(Debug, Clone, Default)]
pub struct DependencyMap {
    order: Vec<ProjectId>,
    edges: HashMap<ProjectId, Vec<Dependency>>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` as a key with an empty edge list if it is not known yet.
    pub fn ensure_key(&mut self, id: &str) {
        if !self.edges.contains_key(id) {
            self.order.push(id.to_string());
            self.edges.insert(id.to_string(), Vec::new());
        }
    }

    /// Append an edge to its source's list, registering the source if needed.
    pub fn push(&mut self, dep: Dependency) {
        self.ensure_key(&dep.source);
        if let Some(list) = self.edges.get_mut(&dep.source) {
            list.push(dep);
        }
    }

    /// Outgoing edges of `id`, or `None` if `id` is not a key.
    pub fn get(&self, id: &str) -> Option<&[Dependency]> {
        self.edges.get(id).map(|v| v.as_slice())
    }

    /// Resolve `id` to a traversal vertex. Returns `None` if `id` is not a key.
    pub fn vertex(&self, id: &str) -> Option<Vertex<'_>> {
        let (id, dependencies) = self.edges.get_key_value(id)?;
        Some(Vertex {
            id: id.as_str(),
            dependencies: dependencies.as_slice(),
        })
    }

    pub fn contains_key(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// `(key, edges)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Dependency])> {
        self.order.iter().map(move |k| {
            let edges = self.edges.get(k).map(|v| v.as_slice()).unwrap_or(&[]);
            (k.as_str(), edges)
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// The full workspace graph handed to the scheduler.
///
/// Built once per run by the config layer (or by tests) and treated as
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ProjectGraph {
    pub projects: HashMap<ProjectId, Project>,
    pub dependencies: DependencyMap,
}

impl ProjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project and register it as a dependency-map key.
    pub fn add_project(&mut self, project: Project) {
        self.dependencies.ensure_key(&project.id);
        self.projects.insert(project.id.clone(), project);
    }

    /// Add an edge `source -> target`.
    pub fn add_dependency(&mut self, source: &str, target: &str, kind: DependencyKind) {
        self.dependencies.push(Dependency::new(source, target, kind));
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    /// Project ids in dependency-map key order.
    pub fn project_ids(&self) -> impl Iterator<Item = &str> {
        self.dependencies.keys()
    }

    /// Immediate dependencies of a project (edge targets, in edge order).
    pub fn dependencies_of(&self, id: &str) -> impl Iterator<Item = &str> {
        self.dependencies
            .get(id)
            .unwrap_or(&[])
            .iter()
            .map(|d| d.target.as_str())
    }
}
