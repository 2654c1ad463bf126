// src/engine/core.rs

//! Pure stage driver state machine.
//!
//! This module contains a synchronous, deterministic core that consumes
//! [`DriverEvent`]s and produces:
//! - an updated [`DriverState`]
//! - a list of [`CoreCommand`]s describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::TaskRunner`) is responsible for
//! dispatching stages to the executor and publishing events.

use crate::dag::Stage;
use crate::engine::event_handlers::{handle_stage_completed, handle_start, CoreStep, DriverEvent};

/// Where the driver is in a run.
///
/// ```text
/// Pending --start--> Running{0} --ok--> Running{1} ... --ok--> Done
///                        |
///                        +--any failure--> Aborted{i}
/// ```
///
/// `Done` and `Aborted` are terminal; an aborted run never resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Pending,
    Running { stage: usize },
    Aborted { failed_stage: usize },
    Done,
}

impl DriverState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DriverState::Done | DriverState::Aborted { .. })
    }
}

/// Owns the stage list and the current [`DriverState`].
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct StageDriver {
    stages: Vec<Stage>,
    state: DriverState,
}

impl StageDriver {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self {
            stages,
            state: DriverState::Pending,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Handle a single event, updating state and returning the commands for
    /// the IO shell.
    pub fn step(&mut self, event: DriverEvent) -> CoreStep {
        match event {
            DriverEvent::Start => handle_start(&self.stages, &mut self.state),
            DriverEvent::StageCompleted { stage, outcomes } => {
                handle_stage_completed(&self.stages, &mut self.state, stage, outcomes)
            }
        }
    }
}
