// src/exec/task_runner.rs

//! Single command process runner.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::engine::TaskOutcome;
use crate::exec::command::CommandLine;
use crate::exec::output::{OutputSink, Stream};

/// Run one command to completion and report its outcome.
///
/// Any error while spawning or waiting for the child is logged and reported
/// as `Failed(-1)`; it never aborts the surrounding batch.
pub async fn run_command(command: CommandLine, sink: OutputSink) -> TaskOutcome {
    let task_id = command.task_id.clone();
    match run_command_inner(command, sink).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(task = %task_id, error = %err, "task execution error");
            TaskOutcome::Failed(-1)
        }
    }
}

async fn run_command_inner(command: CommandLine, sink: OutputSink) -> Result<TaskOutcome> {
    let line = command.shell_line();
    info!(task = %command.task_id, cmd = %command, "starting task process");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&line);
        c
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{}'", command.task_id))?;

    let stdout = child
        .stdout
        .take()
        .map(|s| forward_lines(s, Stream::Stdout, command.task_id.clone(), sink.clone()));
    let stderr = child
        .stderr
        .take()
        .map(|s| forward_lines(s, Stream::Stderr, command.task_id.clone(), sink.clone()));

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{}'", command.task_id))?;

    // Drain the readers so no trailing output is lost.
    for handle in [stdout, stderr].into_iter().flatten() {
        if let Err(e) = handle.await {
            debug!(task = %command.task_id, error = %e, "output forwarder ended abnormally");
        }
    }

    let code = status.code().unwrap_or(-1);
    info!(
        task = %command.task_id,
        exit_code = code,
        success = status.success(),
        "task process exited"
    );

    Ok(if status.success() {
        TaskOutcome::Success
    } else {
        TaskOutcome::Failed(code)
    })
}

fn forward_lines<R>(
    reader: R,
    stream: Stream,
    task_id: String,
    sink: OutputSink,
) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            sink.write_line(stream, &task_id, &line);
        }
    })
}
