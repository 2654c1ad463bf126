// src/engine/runtime.rs

use std::collections::VecDeque;
use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::dag::{Stage, Task};
use crate::errors::{Result, TaskstageError};
use crate::exec::{BatchOptions, CommandLine, ExecutorBackend};

use super::core::StageDriver;
use super::{CoreCommand, DriverEvent, RunnerOptions, TaskCompleteEvent, TaskOutcome};

/// Capacity of the outcome stream channel.
const EVENT_BUFFER: usize = 64;

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    /// One event per task, in emission order.
    pub events: Vec<TaskCompleteEvent>,
    /// Executor failure that cut a stage short, if any.
    pub error: Option<TaskstageError>,
}

impl RunReport {
    /// The events, or the executor error if there was one.
    pub fn into_result(self) -> Result<Vec<TaskCompleteEvent>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.events),
        }
    }
}

/// Runs stages through an `ExecutorBackend` and publishes one
/// [`TaskCompleteEvent`] per task.
///
/// This is a pure IO shell around [`StageDriver`], which holds all the
/// sequencing and failure-propagation rules.
pub struct TaskRunner<E: ExecutorBackend> {
    driver: StageDriver,
    executor: E,
    options: RunnerOptions,
}

impl<E: ExecutorBackend> fmt::Debug for TaskRunner<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRunner")
            .field("driver", &self.driver)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> TaskRunner<E> {
    pub fn new(stages: Vec<Stage>, executor: E, options: RunnerOptions) -> Self {
        Self {
            driver: StageDriver::new(stages),
            executor,
            options,
        }
    }

    /// Main loop.
    ///
    /// - Feeds driver events into the core.
    /// - Executes the commands it returns (dispatch a stage, emit events).
    /// - Returns once the core reports a terminal state; `events` is dropped
    ///   at that point, which closes the stream for the receiver.
    ///
    /// If the executor itself errors, the stage is treated as failed (so the
    /// stream stays complete) and the error is returned afterwards.
    pub async fn run(mut self, events: mpsc::Sender<TaskCompleteEvent>) -> Result<()> {
        info!(stages = self.driver.stages().len(), "task runner started");

        let mut pending = VecDeque::from([DriverEvent::Start]);
        let mut backend_error: Option<TaskstageError> = None;

        while let Some(event) = pending.pop_front() {
            let step = self.driver.step(event);

            for command in step.commands {
                match command {
                    CoreCommand::DispatchStage { index, tasks } => {
                        let outcomes = match self.dispatch(index, &tasks).await {
                            Ok(outcomes) => outcomes,
                            Err(e) => {
                                error!(stage = index, error = %e, "executor failed to run stage");
                                backend_error.get_or_insert(e);
                                vec![TaskOutcome::Failed(-1); tasks.len()]
                            }
                        };
                        pending.push_back(DriverEvent::StageCompleted {
                            stage: index,
                            outcomes,
                        });
                    }
                    CoreCommand::Emit(batch) => {
                        for event in batch {
                            debug!(task = %event.task, status = ?event.status, "task complete");
                            if events.send(event).await.is_err() {
                                warn!("outcome receiver dropped; stopping task runner");
                                return Ok(());
                            }
                        }
                    }
                    CoreCommand::Finish => {
                        info!(state = ?self.driver.state(), "task runner finished");
                    }
                }
            }

            if !step.keep_running {
                break;
            }
        }

        match backend_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Run every stage and collect the whole outcome stream.
    ///
    /// The events are kept even when the executor errored, so callers can
    /// still tell which tasks need another attempt.
    pub async fn run_to_completion(self) -> RunReport {
        let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);

        let collect = async move {
            let mut all = Vec::new();
            while let Some(event) = rx.recv().await {
                all.push(event);
            }
            all
        };

        let (result, events) = tokio::join!(self.run(tx), collect);
        RunReport {
            events,
            error: result.err(),
        }
    }

    async fn dispatch(&mut self, index: usize, tasks: &[Task]) -> Result<Vec<TaskOutcome>> {
        let commands: Vec<CommandLine> = tasks
            .iter()
            .map(|t| CommandLine::for_task(&self.options.program, t))
            .collect();

        let batch = BatchOptions {
            parallel: self.options.parallel,
            max_parallel: self.options.max_parallel,
            continue_on_error: true,
        };

        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        info!(stage = index, tasks = ?ids, "dispatching stage");

        self.executor.run_batch(commands, batch).await
    }
}

impl<E: ExecutorBackend + 'static> TaskRunner<E> {
    /// Run in the background and return the outcome stream.
    ///
    /// The receiver yields events as stages finish and closes once all
    /// stages were attempted or aborted.
    pub fn spawn(
        self,
    ) -> (
        mpsc::Receiver<TaskCompleteEvent>,
        tokio::task::JoinHandle<Result<()>>,
    ) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let handle = tokio::spawn(self.run(tx));
        (rx, handle)
    }
}
