// src/dag/mod.rs

//! Project graph representation and stage scheduling.
//!
//! - [`model`] holds the passive project graph (projects + ordered edges).
//! - [`traversal`] is the generic depth-first visitor over that graph.
//! - [`analyzer`] answers reachability queries and produces a
//!   dependency-respecting order of all projects.
//! - [`task`] defines the unit of work handed to the scheduler.
//! - [`stages`] partitions tasks into dependency-free stages.
//! - [`outputs`] resolves where a task writes its artifacts.

pub mod analyzer;
pub mod model;
pub mod outputs;
pub mod stages;
pub mod task;
pub mod traversal;

pub use analyzer::GraphAnalyzer;
pub use model::{Dependency, DependencyMap, Project, ProjectGraph, ProjectId, TargetDef};
pub use outputs::outputs_for_task;
pub use stages::{topologically_sort_tasks, Stage, TaskOrderer};
pub use task::{Overrides, TargetRef, Task};
pub use traversal::{depth_first_search, GraphVisitor, SeenGuard, Vertex};
