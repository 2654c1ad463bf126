// src/dag/analyzer.rs

//! Reachability and ordering queries over a [`ProjectGraph`].

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::dag::model::ProjectGraph;
use crate::dag::traversal::{depth_first_search, GraphVisitor, SeenGuard, Vertex};
use crate::errors::{Result, TaskstageError};

/// Read-only analysis helper borrowing a project graph.
#[derive(Debug, Clone, Copy)]
pub struct GraphAnalyzer<'g> {
    graph: &'g ProjectGraph,
}

impl<'g> GraphAnalyzer<'g> {
    pub fn new(graph: &'g ProjectGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g ProjectGraph {
        self.graph
    }

    /// Returns `true` if `source` transitively depends on `target`.
    ///
    /// `depends_on(a, a)` is only `true` when there is a path from `a` back to
    /// itself.
    pub fn depends_on(&self, source: &str, target: &str) -> bool {
        let mut path = Vec::new();
        self.depends_on_via(source, target, &mut path)
    }

    /// `path` holds the projects already entered along the current call
    /// chain. It guards against cycles only; nothing is memoized between
    /// sibling branches, so shared subgraphs are walked again.
    fn depends_on_via(&self, source: &str, target: &str, path: &mut Vec<&'g str>) -> bool {
        let graph: &'g ProjectGraph = self.graph;
        let Some(edges) = graph.dependencies.get(source) else {
            return false;
        };

        if edges.iter().any(|dep| dep.target == target) {
            return true;
        }

        for dep in edges {
            let next: &'g str = dep.target.as_str();
            if path.contains(&next) {
                continue;
            }
            path.push(next);
            let found = self.depends_on_via(next, target, path);
            path.pop();
            if found {
                return true;
            }
        }

        false
    }

    /// Order every dependency-map key so that a project's dependencies come
    /// before the project itself.
    ///
    /// Roots are taken in key insertion order and neighbours in edge order,
    /// so the result is deterministic. On cyclic input the result still
    /// contains every key exactly once, but some edge of the cycle will point
    /// forward.
    pub fn topological_sort(&self) -> Vec<Vertex<'g>> {
        let graph: &'g ProjectGraph = self.graph;
        let deps = &graph.dependencies;
        let mut sorter = TopoSorter {
            visited: HashSet::new(),
            sorted: Vec::with_capacity(deps.len()),
        };

        for root in deps.vertices() {
            if sorter.visited.contains(root.id) {
                continue;
            }
            debug!(project = %root.id, "topological sort: new search root");
            depth_first_search(deps, root, &mut sorter);
        }

        sorter.sorted
    }

    /// Convenience wrapper returning only the ids of [`topological_sort`].
    ///
    /// [`topological_sort`]: GraphAnalyzer::topological_sort
    pub fn topological_order(&self) -> Vec<&'g str> {
        self.topological_sort().into_iter().map(|v| v.id).collect()
    }

    /// Fail with [`TaskstageError::DependencyCycle`] if the graph has a cycle.
    ///
    /// Scheduling never calls this on its own; cyclic graphs are tolerated
    /// unless the caller opts in.
    pub fn ensure_acyclic(&self) -> Result<()> {
        // Edge direction: dependent -> dependency. Self-edges count as cycles.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for (id, edges) in self.graph.dependencies.iter() {
            graph.add_node(id);
            for dep in edges {
                graph.add_edge(dep.source.as_str(), dep.target.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(_order) => Ok(()),
            Err(cycle) => Err(TaskstageError::DependencyCycle(format!(
                "cycle detected in project graph involving project '{}'",
                cycle.node_id()
            ))),
        }
    }
}

/// Visitor used by [`GraphAnalyzer::topological_sort`].
///
/// `visited` spans the whole sort, not just one search, so each vertex is
/// entered at most once overall.
struct TopoSorter<'g> {
    visited: HashSet<&'g str>,
    sorted: Vec<Vertex<'g>>,
}

impl<'g> GraphVisitor<'g> for TopoSorter<'g> {
    fn enter_vertex(&mut self, current: Vertex<'g>, _previous: Option<Vertex<'g>>) {
        self.visited.insert(current.id);
    }

    fn leave_vertex(&mut self, current: Vertex<'g>, _previous: Option<Vertex<'g>>) {
        self.sorted.push(current);
    }

    fn allow_traversal(
        &mut self,
        next: Vertex<'g>,
        _current: Vertex<'g>,
        _previous: Option<Vertex<'g>>,
        _guard: &mut SeenGuard<'g>,
    ) -> bool {
        !self.visited.contains(next.id)
    }
}
