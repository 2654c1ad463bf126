// src/engine/summary.rs

//! Aggregated view of an outcome stream, for final reporting.

use crate::engine::{CompletionStatus, TaskCompleteEvent};

/// Task ids grouped by how they ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    pub skipped: Vec<String>,
}

impl RunSummary {
    pub fn record(&mut self, event: &TaskCompleteEvent) {
        let id = event.task.id.clone();
        match event.status {
            CompletionStatus::Succeeded => self.succeeded.push(id),
            CompletionStatus::Failed(_) => self.failed.push(id),
            CompletionStatus::Skipped => self.skipped.push(id),
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.skipped.len()
    }

    /// `true` when nothing failed and nothing was skipped.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    /// Task ids that should be attempted again (failed first, then skipped).
    pub fn needs_rerun(&self) -> impl Iterator<Item = &str> {
        self.failed
            .iter()
            .chain(self.skipped.iter())
            .map(|s| s.as_str())
    }
}

impl<'a> FromIterator<&'a TaskCompleteEvent> for RunSummary {
    fn from_iter<I: IntoIterator<Item = &'a TaskCompleteEvent>>(iter: I) -> Self {
        let mut summary = RunSummary::default();
        for event in iter {
            summary.record(event);
        }
        summary
    }
}
