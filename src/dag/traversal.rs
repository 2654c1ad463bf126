// src/dag/traversal.rs

//! Generic depth-first traversal over a [`DependencyMap`].
//!
//! The traversal itself knows nothing about what it is computing. Callers
//! plug in a [`GraphVisitor`] with three hooks:
//!
//! - `enter_vertex`: called once per visit, before any child is visited.
//! - `leave_vertex`: called once per visit, after every child that was
//!   allowed has been fully visited (post-order).
//! - `allow_traversal`: gate deciding whether to descend into a neighbour.
//!
//! Children are visited in the order of the vertex's outgoing edge list.

use std::collections::HashSet;

use tracing::trace;

use crate::dag::model::{Dependency, DependencyMap};

/// A project as seen by the traversal: its id plus its outgoing edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex<'g> {
    pub id: &'g str,
    pub dependencies: &'g [Dependency],
}

impl DependencyMap {
    /// Every key as a vertex, in key insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex<'_>> {
        self.iter().map(|(id, dependencies)| Vertex { id, dependencies })
    }

    /// Neighbours of `vertex`, in edge order.
    ///
    /// Edges whose target is not a key of this map are skipped.
    pub fn neighbors<'g>(&'g self, vertex: Vertex<'g>) -> impl Iterator<Item = Vertex<'g>> + 'g {
        vertex.dependencies.iter().filter_map(move |edge| {
            let next = self.vertex(&edge.target);
            if next.is_none() {
                trace!(
                    source = %edge.source,
                    dependency = %edge.target,
                    "edge target is not a known project; not traversing"
                );
            }
            next
        })
    }
}

/// Per-call record of vertices already offered for traversal.
///
/// A fresh guard is created for every top-level [`depth_first_search`] call
/// and handed to [`GraphVisitor::allow_traversal`]. It only prevents the same
/// vertex from being offered twice within that one call.
#[derive(Debug, Default)]
pub struct SeenGuard<'g> {
    seen: HashSet<&'g str>,
}

impl<'g> SeenGuard<'g> {
    /// Returns `true` the first time `id` is offered, `false` afterwards.
    pub fn offer(&mut self, id: &'g str) -> bool {
        self.seen.insert(id)
    }
}

/// Hooks invoked by [`depth_first_search`].
///
/// Every method has a default. The default `allow_traversal` defers to the
/// per-call [`SeenGuard`]; visitors that need a guard spanning several
/// searches keep their own state and ignore the guard.
pub trait GraphVisitor<'g> {
    fn enter_vertex(&mut self, _current: Vertex<'g>, _previous: Option<Vertex<'g>>) {}

    fn leave_vertex(&mut self, _current: Vertex<'g>, _previous: Option<Vertex<'g>>) {}

    fn allow_traversal(
        &mut self,
        next: Vertex<'g>,
        _current: Vertex<'g>,
        _previous: Option<Vertex<'g>>,
        guard: &mut SeenGuard<'g>,
    ) -> bool {
        guard.offer(next.id)
    }
}

/// Depth-first search from `start`, driving `visitor`'s hooks.
pub fn depth_first_search<'g, V>(graph: &'g DependencyMap, start: Vertex<'g>, visitor: &mut V)
where
    V: GraphVisitor<'g> + ?Sized,
{
    let mut guard = SeenGuard::default();
    visit(graph, start, None, visitor, &mut guard);
}

fn visit<'g, V>(
    graph: &'g DependencyMap,
    current: Vertex<'g>,
    previous: Option<Vertex<'g>>,
    visitor: &mut V,
    guard: &mut SeenGuard<'g>,
) where
    V: GraphVisitor<'g> + ?Sized,
{
    visitor.enter_vertex(current, previous);

    for next in graph.neighbors(current) {
        if visitor.allow_traversal(next, current, previous, guard) {
            visit(graph, next, Some(current), visitor, guard);
        }
    }

    visitor.leave_vertex(current, previous);
}
