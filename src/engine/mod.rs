// src/engine/mod.rs

//! Stage-by-stage execution driver.
//!
//! Stages are executed strictly one after another. Within a stage every task
//! is dispatched to the executor with "continue on error", so a failing task
//! never stops its siblings. Once a stage reports any failure, every task of
//! every later stage is reported as skipped and nothing else is dispatched.
//!
//! The pure state machine lives in [`core`]; the async/IO shell that talks to
//! an [`ExecutorBackend`](crate::exec::ExecutorBackend) and emits the outcome
//! stream is implemented in [`runtime`].

use crate::dag::Task;

/// Exit status of one executed command, as reported by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed(i32),
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success)
    }
}

/// Final status of a task in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// Executed and exited successfully.
    Succeeded,
    /// Executed and failed with the given exit code (`-1` if unknown).
    Failed(i32),
    /// Not executed because an earlier stage failed.
    Skipped,
}

impl From<TaskOutcome> for CompletionStatus {
    fn from(outcome: TaskOutcome) -> Self {
        match outcome {
            TaskOutcome::Success => CompletionStatus::Succeeded,
            TaskOutcome::Failed(code) => CompletionStatus::Failed(code),
        }
    }
}

/// One entry of the outcome stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCompleteEvent {
    pub task: Task,
    pub status: CompletionStatus,
}

impl TaskCompleteEvent {
    pub fn new(task: Task, status: CompletionStatus) -> Self {
        Self { task, status }
    }

    /// `true` only for tasks that ran and succeeded.
    pub fn succeeded(&self) -> bool {
        self.status == CompletionStatus::Succeeded
    }

    pub fn skipped(&self) -> bool {
        self.status == CompletionStatus::Skipped
    }
}

/// Options the driver forwards to the executor for every stage.
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Invocation prefix for the workspace CLI (e.g. `npx nx`).
    pub program: String,
    pub parallel: bool,
    pub max_parallel: usize,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;
pub mod summary;

pub use self::core::{DriverState, StageDriver};
pub use event_handlers::{CoreCommand, CoreStep, DriverEvent};
pub use runtime::{RunReport, TaskRunner};
pub use summary::RunSummary;
