// src/exec/command.rs

//! Rendering a [`Task`] into the command line the executor runs.

use std::borrow::Cow;
use std::fmt;

use shell_escape::escape;

use crate::dag::Task;

/// Targets with a positional shortcut on the workspace CLI.
pub const COMMON_TARGETS: &[&str] = &["build", "test", "lint", "e2e", "deploy"];

/// A fully rendered command for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Id of the task this command was rendered from.
    pub task_id: String,
    /// Prefix invoking the workspace CLI, e.g. `npx nx`.
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Render `task` against the workspace CLI invoked as `program`.
    ///
    /// - common targets: `<program> <target> <project> [--configuration <c>] [--flag=value ...]`
    /// - anything else: `<program> run <project>:<target>[:<c>] [--flag=value ...]`
    pub fn for_task(program: &str, task: &Task) -> Self {
        let t = &task.target;
        let mut args = Vec::new();

        if COMMON_TARGETS.contains(&t.target.as_str()) {
            args.push(t.target.clone());
            args.push(t.project.clone());
            if let Some(cfg) = &t.configuration {
                args.push("--configuration".to_string());
                args.push(cfg.clone());
            }
        } else {
            args.push("run".to_string());
            args.push(t.to_string());
        }

        args.extend(
            task.overrides
                .iter()
                .map(|(flag, value)| format!("--{flag}={value}")),
        );

        Self {
            task_id: task.id.clone(),
            program: program.trim().to_string(),
            args,
        }
    }
}

impl CommandLine {
    /// The line handed to the platform shell.
    ///
    /// `program` is a configured prefix and is passed through as written;
    /// every argument is quoted so the child receives it verbatim.
    pub fn shell_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&escape(Cow::Borrowed(arg.as_str())));
        }
        line
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
