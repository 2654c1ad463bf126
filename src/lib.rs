// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::model::ConfigFile;
use crate::dag::{outputs_for_task, GraphAnalyzer, Overrides, ProjectGraph, Stage, Task, TaskOrderer};
use crate::engine::{RunSummary, RunnerOptions, TaskRunner};
use crate::errors::TaskstageError;
use crate::exec::{CommandLine, OutputSink, RealExecutorBackend};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - workspace loading (and the opt-in cycle check)
/// - task selection from CLI arguments
/// - stage splitting
/// - stage-by-stage execution through the real executor
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<RunSummary> {
    let cfg = load_and_validate(&args.config)?;
    let graph = cfg.to_graph();

    if args.detect_cycles || cfg.workspace.detect_cycles {
        GraphAnalyzer::new(&graph).ensure_acyclic()?;
    }

    let tasks = select_tasks(&graph, &args)?;
    info!(run_target = %args.target, tasks = tasks.len(), "selected tasks");

    let stages = TaskOrderer::new(args.target.clone(), &graph)
        .with_staged_targets(cfg.workspace.staged_targets.iter().cloned())
        .split_into_stages(tasks);

    if args.dry_run {
        print_dry_run(&cfg, &graph, &stages);
        return Ok(RunSummary::default());
    }

    let options = RunnerOptions {
        program: cfg.cli_program().to_string(),
        parallel: args.parallel || cfg.workspace.parallel,
        max_parallel: args.max_parallel.unwrap_or(cfg.workspace.max_parallel).max(1),
    };

    let executor = RealExecutorBackend::new(OutputSink::stdio());
    let runner = TaskRunner::new(stages, executor, options);
    let (mut events, handle) = runner.spawn();

    let mut summary = RunSummary::default();
    let consume = async {
        while let Some(event) = events.recv().await {
            if !event.succeeded() {
                warn!(task = %event.task, status = ?event.status, "task did not succeed");
            }
            summary.record(&event);
        }
    };

    tokio::select! {
        _ = consume => {}
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(error = %e, "failed to listen for Ctrl+C");
            }
            // The runner owns every in-flight command; dropping it kills them.
            handle.abort();
            if let Err(e) = handle.await {
                debug!(error = %e, "runner stopped after interrupt");
            }
            bail!("interrupted");
        }
    }

    handle.await??;

    print_summary(&summary);
    Ok(summary)
}

/// Build the task list for this invocation.
///
/// With an explicit `--projects` list every id must exist; otherwise every
/// project defining the target is selected, in graph order.
fn select_tasks(graph: &ProjectGraph, args: &CliArgs) -> Result<Vec<Task>, TaskstageError> {
    let overrides: Overrides = args.overrides.iter().cloned().collect();

    let projects: Vec<String> = if args.projects.is_empty() {
        graph
            .project_ids()
            .filter(|id| graph.project(id).is_some_and(|p| p.has_target(&args.target)))
            .map(str::to_string)
            .collect()
    } else {
        for id in &args.projects {
            if graph.project(id).is_none() {
                return Err(TaskstageError::ProjectNotFound(id.clone()));
            }
        }
        args.projects.clone()
    };

    Ok(projects
        .into_iter()
        .map(|p| {
            Task::new(
                p,
                args.target.clone(),
                args.configuration.clone(),
                overrides.clone(),
            )
        })
        .collect())
}

/// Dry-run output: stages, commands and resolved outputs.
fn print_dry_run(cfg: &ConfigFile, graph: &ProjectGraph, stages: &[Stage]) {
    println!("taskstage dry-run");
    println!("  workspace.cli = {} ({})", cfg.workspace.cli, cfg.cli_program());
    println!("  workspace.staged_targets = {:?}", cfg.workspace.staged_targets);
    println!();

    println!("stages ({}):", stages.len());
    for (i, stage) in stages.iter().enumerate() {
        println!("  stage {i}:");
        for task in stage.tasks() {
            println!("    - {task}");
            println!("        cmd: {}", CommandLine::for_task(cfg.cli_program(), task));
            match outputs_for_task(graph, task) {
                Ok(outputs) if !outputs.is_empty() => println!("        outputs: {outputs:?}"),
                Ok(_) => {}
                Err(e) => println!("        outputs: <{e}>"),
            }
        }
    }

    debug!("dry-run complete (no execution)");
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!(
        "taskstage: {} succeeded, {} failed, {} skipped",
        summary.succeeded.len(),
        summary.failed.len(),
        summary.skipped.len()
    );
    if !summary.all_succeeded() {
        let rerun: Vec<&str> = summary.needs_rerun().collect();
        println!("  needs re-run: {}", rerun.join(", "));
    }
}
