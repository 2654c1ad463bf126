// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The stage driver talks to an `ExecutorBackend` instead of spawning
//! processes itself. This keeps the driver testable with a fake executor
//! while the production implementation lives here.
//!
//! - `RealExecutorBackend` spawns one OS process per command, bounded by the
//!   batch's parallelism cap.
//! - Tests can provide their own `ExecutorBackend` that, for example, records
//!   which batches were dispatched and fails chosen commands.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::engine::TaskOutcome;
use crate::errors::{Error, Result};
use crate::exec::command::CommandLine;
use crate::exec::output::OutputSink;
use crate::exec::task_runner::run_command;

/// How a batch of commands should be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Run commands concurrently (bounded by `max_parallel`).
    pub parallel: bool,
    /// Upper bound on concurrently running commands when `parallel` is set.
    pub max_parallel: usize,
    /// Keep launching remaining commands after one has failed.
    pub continue_on_error: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            max_parallel: 3,
            continue_on_error: true,
        }
    }
}

impl BatchOptions {
    /// Number of commands allowed to run at the same time.
    pub fn effective_parallelism(&self) -> usize {
        if self.parallel {
            self.max_parallel.max(1)
        } else {
            1
        }
    }
}

/// Trait abstracting how a batch of commands is executed.
///
/// Implementations must return exactly one outcome per command, in the same
/// order as `commands`.
pub trait ExecutorBackend: Send {
    fn run_batch(
        &mut self,
        commands: Vec<CommandLine>,
        options: BatchOptions,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TaskOutcome>>> + Send + '_>>;
}

/// Real executor backend used in production.
#[derive(Debug, Clone)]
pub struct RealExecutorBackend {
    sink: OutputSink,
}

impl RealExecutorBackend {
    pub fn new(sink: OutputSink) -> Self {
        Self { sink }
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn run_batch(
        &mut self,
        commands: Vec<CommandLine>,
        options: BatchOptions,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TaskOutcome>>> + Send + '_>> {
        let sink = self.sink.clone();

        Box::pin(async move {
            let semaphore = Arc::new(Semaphore::new(options.effective_parallelism()));
            let failed = Arc::new(AtomicBool::new(false));
            let mut outcomes: Vec<Option<TaskOutcome>> = vec![None; commands.len()];

            // Dropping the set aborts every command task, which kills its child.
            let mut running = JoinSet::new();

            for (index, command) in commands.into_iter().enumerate() {
                let permit = Arc::clone(&semaphore)
                    .acquire_owned()
                    .await
                    .map_err(Error::from)?;

                if !options.continue_on_error && failed.load(Ordering::SeqCst) {
                    debug!(task = %command.task_id, "earlier command failed; not launching");
                    continue;
                }

                let sink = sink.clone();
                let failed = Arc::clone(&failed);
                running.spawn(async move {
                    let outcome = run_command(command, sink).await;
                    if !outcome.is_success() {
                        failed.store(true, Ordering::SeqCst);
                    }
                    drop(permit);
                    (index, outcome)
                });
            }

            while let Some(joined) = running.join_next().await {
                match joined {
                    Ok((index, outcome)) => outcomes[index] = Some(outcome),
                    Err(e) => warn!(error = %e, "command task panicked or was cancelled"),
                }
            }

            // Unlaunched and panicked commands have no outcome.
            Ok(outcomes
                .into_iter()
                .map(|o| o.unwrap_or(TaskOutcome::Failed(-1)))
                .collect())
        })
    }
}
