// src/engine/event_handlers.rs

//! Event handling logic for the stage driver core.

use tracing::{info, warn};

use crate::dag::{Stage, Task};
use crate::engine::core::DriverState;
use crate::engine::{CompletionStatus, TaskCompleteEvent, TaskOutcome};

/// Inputs to the driver core.
#[derive(Debug, Clone)]
pub enum DriverEvent {
    /// Begin execution with the first stage.
    Start,
    /// The executor finished every task of `stage`; outcomes are in task order.
    StageCompleted {
        stage: usize,
        outcomes: Vec<TaskOutcome>,
    },
}

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Send the tasks of stage `index` to the executor.
    DispatchStage { index: usize, tasks: Vec<Task> },
    /// Publish these events on the outcome stream.
    Emit(Vec<TaskCompleteEvent>),
    /// All stages were attempted or aborted; close the outcome stream.
    Finish,
}

/// Decision returned by the core after handling a single `DriverEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer loop should wait for another stage to complete.
    pub keep_running: bool,
}

impl CoreStep {
    fn idle(state: DriverState) -> Self {
        Self {
            commands: Vec::new(),
            keep_running: !state.is_terminal(),
        }
    }
}

/// Handle the start of a run.
pub fn handle_start(stages: &[Stage], state: &mut DriverState) -> CoreStep {
    if *state != DriverState::Pending {
        warn!(?state, "start requested on a driver that already started; ignoring");
        return CoreStep::idle(*state);
    }

    match stages.first() {
        None => {
            info!("no stages to run");
            *state = DriverState::Done;
            CoreStep {
                commands: vec![CoreCommand::Finish],
                keep_running: false,
            }
        }
        Some(first) => {
            *state = DriverState::Running { stage: 0 };
            CoreStep {
                commands: vec![CoreCommand::DispatchStage {
                    index: 0,
                    tasks: first.tasks().to_vec(),
                }],
                keep_running: true,
            }
        }
    }
}

/// Handle completion of the currently running stage.
///
/// - Every task of the stage gets an event carrying its own outcome.
/// - Any failure aborts the run: tasks of all later stages are emitted as
///   `Skipped` and nothing else is dispatched.
/// - Otherwise the next stage is dispatched, or the run is done.
pub fn handle_stage_completed(
    stages: &[Stage],
    state: &mut DriverState,
    stage: usize,
    outcomes: Vec<TaskOutcome>,
) -> CoreStep {
    if *state != (DriverState::Running { stage }) {
        warn!(?state, stage, "completion for a stage that is not running; ignoring");
        return CoreStep::idle(*state);
    }

    let Some(current) = stages.get(stage) else {
        warn!(stage, "completion for unknown stage index; ignoring");
        return CoreStep::idle(*state);
    };

    if outcomes.len() != current.len() {
        warn!(
            stage,
            expected = current.len(),
            got = outcomes.len(),
            "executor returned a mismatched number of outcomes; missing ones count as failed"
        );
    }

    let mut events: Vec<TaskCompleteEvent> = current
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let outcome = outcomes.get(i).copied().unwrap_or(TaskOutcome::Failed(-1));
            TaskCompleteEvent::new(task.clone(), outcome.into())
        })
        .collect();

    let failed = events.iter().filter(|e| !e.succeeded()).count();

    if failed > 0 {
        let skipped: Vec<TaskCompleteEvent> = stages[stage + 1..]
            .iter()
            .flat_map(|s| s.tasks().iter())
            .map(|task| TaskCompleteEvent::new(task.clone(), CompletionStatus::Skipped))
            .collect();

        warn!(
            stage,
            failed,
            skipped = skipped.len(),
            "stage failed; skipping all remaining stages"
        );

        events.extend(skipped);
        *state = DriverState::Aborted { failed_stage: stage };
        return CoreStep {
            commands: vec![CoreCommand::Emit(events), CoreCommand::Finish],
            keep_running: false,
        };
    }

    let next = stage + 1;
    match stages.get(next) {
        Some(next_stage) => {
            info!(stage, next, "stage succeeded; advancing");
            *state = DriverState::Running { stage: next };
            CoreStep {
                commands: vec![
                    CoreCommand::Emit(events),
                    CoreCommand::DispatchStage {
                        index: next,
                        tasks: next_stage.tasks().to_vec(),
                    },
                ],
                keep_running: true,
            }
        }
        None => {
            info!(stages = stages.len(), "all stages succeeded");
            *state = DriverState::Done;
            CoreStep {
                commands: vec![CoreCommand::Emit(events), CoreCommand::Finish],
                keep_running: false,
            }
        }
    }
}
