use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use taskstage::engine::TaskOutcome;
use taskstage::errors::{Result, TaskstageError};
use taskstage::exec::{BatchOptions, CommandLine, ExecutorBackend};

/// A fake executor that:
/// - records every batch it was asked to run (task ids + options)
/// - reports `Failed(1)` for task ids registered with [`FakeExecutor::failing`]
///   and `Success` for everything else, without spawning anything
/// - errors out on any batch holding a task registered with
///   [`FakeExecutor::erroring`], as a broken backend would.
#[derive(Clone, Default)]
pub struct FakeExecutor {
    failing: HashSet<String>,
    erroring: HashSet<String>,
    batches: Arc<Mutex<Vec<Vec<String>>>>,
    options: Arc<Mutex<Vec<BatchOptions>>>,
    rendered: Arc<Mutex<Vec<String>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the task with this id fail.
    pub fn failing(mut self, task_id: &str) -> Self {
        self.failing.insert(task_id.to_string());
        self
    }

    /// Make the whole batch containing this task id fail at the executor level.
    pub fn erroring(mut self, task_id: &str) -> Self {
        self.erroring.insert(task_id.to_string());
        self
    }

    /// Task ids of every dispatched batch, in dispatch order.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }

    /// Options received with each batch.
    pub fn batch_options(&self) -> Vec<BatchOptions> {
        self.options.lock().unwrap().clone()
    }

    /// Every rendered command line, in dispatch order.
    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }

    /// Every task id that was executed.
    pub fn executed(&self) -> Vec<String> {
        self.batches().into_iter().flatten().collect()
    }
}

impl ExecutorBackend for FakeExecutor {
    fn run_batch(
        &mut self,
        commands: Vec<CommandLine>,
        options: BatchOptions,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<TaskOutcome>>> + Send + '_>> {
        Box::pin(async move {
            let ids: Vec<String> = commands.iter().map(|c| c.task_id.clone()).collect();
            self.batches.lock().unwrap().push(ids);
            self.options.lock().unwrap().push(options);
            self.rendered
                .lock()
                .unwrap()
                .extend(commands.iter().map(|c| c.to_string()));

            if let Some(bad) = commands.iter().find(|c| self.erroring.contains(&c.task_id)) {
                return Err(TaskstageError::Other(anyhow::anyhow!(
                    "executor unavailable for {}",
                    bad.task_id
                )));
            }

            Ok(commands
                .iter()
                .map(|c| {
                    if self.failing.contains(&c.task_id) {
                        TaskOutcome::Failed(1)
                    } else {
                        TaskOutcome::Success
                    }
                })
                .collect())
        })
    }
}
