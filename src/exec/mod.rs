// src/exec/mod.rs

//! Process execution layer.
//!
//! This is the concurrent-execution collaborator of the stage driver: it
//! takes a batch of rendered commands and reports one outcome per command.
//!
//! - [`command`] renders a task into a [`CommandLine`].
//! - [`backend`] provides the `ExecutorBackend` trait and the production
//!   `RealExecutorBackend`, which tests replace with a fake.
//! - [`task_runner`] runs a single command as a child process.
//! - [`output`] is where child stdout/stderr lines are forwarded.

pub mod backend;
pub mod command;
pub mod output;
pub mod task_runner;

pub use backend::{BatchOptions, ExecutorBackend, RealExecutorBackend};
pub use command::{CommandLine, COMMON_TARGETS};
pub use output::{OutputSink, Stream};
