// src/dag/stages.rs

//! Partitioning tasks into dependency-free stages.
//!
//! A stage is a batch of tasks in which no task's project depends, even
//! transitively, on another task's project in the same batch. Stages run one
//! after another; tasks inside a stage may run concurrently.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::dag::analyzer::GraphAnalyzer;
use crate::dag::model::ProjectGraph;
use crate::dag::task::Task;

/// Target names that are staged when nothing else is configured.
pub const DEFAULT_STAGED_TARGETS: &[&str] = &["build"];

/// One batch of mutually independent tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stage {
    tasks: Vec<Task>,
}

impl Stage {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Project ids of the tasks in this stage, in placement order.
    pub fn projects(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.project()).collect()
    }

    fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }
}

/// Splits tasks for one target into stages.
#[derive(Debug, Clone)]
pub struct TaskOrderer<'g> {
    target: String,
    analyzer: GraphAnalyzer<'g>,
    staged_targets: Vec<String>,
}

impl<'g> TaskOrderer<'g> {
    pub fn new(target: impl Into<String>, graph: &'g ProjectGraph) -> Self {
        Self {
            target: target.into(),
            analyzer: GraphAnalyzer::new(graph),
            staged_targets: DEFAULT_STAGED_TARGETS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the set of targets that are dependency-sensitive.
    pub fn with_staged_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.staged_targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Whether tasks for this orderer's target need dependency staging.
    pub fn is_staged(&self) -> bool {
        self.staged_targets.iter().any(|t| *t == self.target)
    }

    /// Partition `tasks` into stages.
    ///
    /// For staged targets, tasks are first put into dependency order and then
    /// placed greedily: each task goes into the first existing stage holding
    /// nothing it depends on, or into a new stage at the end. For any other
    /// target every task lands in one stage.
    pub fn split_into_stages(&self, tasks: Vec<Task>) -> Vec<Stage> {
        if tasks.is_empty() {
            return Vec::new();
        }

        if !self.is_staged() {
            debug!(
                run_target = %self.target,
                tasks = tasks.len(),
                "target is not dependency-sensitive; using a single stage"
            );
            return vec![Stage::new(tasks)];
        }

        let mut stages: Vec<Stage> = Vec::new();

        for task in topologically_sort_tasks(&self.analyzer, tasks) {
            let slot = stages
                .iter()
                .position(|stage| !self.task_depends_on_stage(&task, stage));

            match slot {
                Some(idx) => {
                    debug!(task = %task, stage = idx, "placing task in existing stage");
                    stages[idx].push(task);
                }
                None => {
                    debug!(task = %task, stage = stages.len(), "opening new stage for task");
                    stages.push(Stage::new(vec![task]));
                }
            }
        }

        stages
    }

    fn task_depends_on_stage(&self, task: &Task, stage: &Stage) -> bool {
        stage
            .tasks()
            .iter()
            .any(|dep| self.analyzer.depends_on(task.project(), dep.project()))
    }
}

/// Reorder `tasks` so that dependencies come before dependents.
///
/// Walks the graph's topological order and emits, for each project, the
/// tasks bound to it in their original relative order. Tasks whose project is
/// not part of the graph are dropped.
pub fn topologically_sort_tasks(analyzer: &GraphAnalyzer<'_>, tasks: Vec<Task>) -> Vec<Task> {
    let total = tasks.len();
    let mut by_project: HashMap<String, Vec<Task>> = HashMap::new();
    for task in tasks {
        by_project
            .entry(task.project().to_string())
            .or_default()
            .push(task);
    }

    let mut sorted = Vec::with_capacity(total);
    for vertex in analyzer.topological_sort() {
        if let Some(group) = by_project.remove(vertex.id) {
            sorted.extend(group);
        }
    }

    for (project, dropped) in by_project {
        for task in dropped {
            warn!(
                task = %task,
                project = %project,
                "project is not part of the dependency graph; task dropped from scheduling"
            );
        }
    }

    sorted
}
