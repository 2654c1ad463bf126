// tests/demos_workspace.rs

use std::error::Error;
use std::path::PathBuf;

use taskstage::config::{load_and_validate, ConfigFile};
use taskstage::dag::{outputs_for_task, GraphAnalyzer, Overrides, Task, TaskOrderer};
use taskstage::engine::{RunnerOptions, TaskRunner};
use taskstage_test_utils::builders::{build_tasks, task};
use taskstage_test_utils::fake_executor::FakeExecutor;
use taskstage_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn load_demo(name: &str) -> Result<ConfigFile, Box<dyn Error>> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    Ok(load_and_validate(manifest_dir.join("demos").join(name))?)
}

#[test]
fn nx_demo_builds_in_three_stages() -> TestResult {
    init_tracing();

    let cfg = load_demo("nx-workspace.toml")?;
    let graph = cfg.to_graph();

    let stages = TaskOrderer::new("build", &graph)
        .with_staged_targets(cfg.workspace.staged_targets.iter().cloned())
        .split_into_stages(build_tasks(&["app1", "app2", "subapp2", "common1", "common2"]));

    let projects: Vec<Vec<&str>> = stages.iter().map(|s| s.projects()).collect();
    assert_eq!(
        projects,
        vec![
            vec!["common2", "common1"],
            vec!["app2", "app1"],
            vec!["subapp2"],
        ]
    );

    Ok(())
}

#[test]
fn nx_demo_tests_run_in_one_stage() -> TestResult {
    let cfg = load_demo("nx-workspace.toml")?;
    let graph = cfg.to_graph();

    let tasks = vec![task("subapp2", "test"), task("common2", "test")];
    let stages = TaskOrderer::new("test", &graph)
        .with_staged_targets(cfg.workspace.staged_targets.iter().cloned())
        .split_into_stages(tasks);

    assert_eq!(stages.len(), 1);
    assert_eq!(stages[0].projects(), vec!["subapp2", "common2"]);

    Ok(())
}

#[test]
fn nx_demo_resolves_outputs() -> TestResult {
    let cfg = load_demo("nx-workspace.toml")?;
    let graph = cfg.to_graph();

    let prod = Task::new("app1", "build", Some("production".to_string()), Overrides::new());
    assert_eq!(outputs_for_task(&graph, &prod)?, vec!["dist/apps/app1-production"]);
    assert_eq!(
        outputs_for_task(&graph, &task("common1", "build"))?,
        vec!["dist/libs/common1", "dist/libs/common1-types"]
    );
    assert_eq!(
        outputs_for_task(&graph, &task("common2", "build"))?,
        vec!["dist/libs/common2"]
    );
    assert!(outputs_for_task(&graph, &task("app1", "serve"))?.is_empty());

    Ok(())
}

#[test]
fn echo_demo_is_acyclic_and_ordered() -> TestResult {
    let cfg = load_demo("local-echo.toml")?;
    assert!(cfg.workspace.detect_cycles);

    let graph = cfg.to_graph();
    let analyzer = GraphAnalyzer::new(&graph);
    analyzer.ensure_acyclic()?;

    assert_eq!(
        analyzer.topological_order(),
        vec!["utils", "ui", "models", "api", "web"]
    );
    assert!(analyzer.depends_on("web", "utils"));
    assert!(!analyzer.depends_on("ui", "api"));

    Ok(())
}

#[tokio::test]
async fn echo_demo_stages_e2e_through_the_driver() -> TestResult {
    let cfg = load_demo("local-echo.toml")?;
    let graph = cfg.to_graph();

    let tasks = vec![task("web", "e2e"), task("api", "e2e")];
    let stages = TaskOrderer::new("e2e", &graph)
        .with_staged_targets(cfg.workspace.staged_targets.iter().cloned())
        .split_into_stages(tasks);

    let fake = FakeExecutor::new();
    let options = RunnerOptions {
        program: cfg.cli_program().to_string(),
        parallel: cfg.workspace.parallel,
        max_parallel: cfg.workspace.max_parallel,
    };
    let events = TaskRunner::new(stages, fake.clone(), options)
        .run_to_completion()
        .await
        .into_result()?;

    assert_eq!(events.len(), 2);
    assert_eq!(
        fake.rendered(),
        vec!["echo ws e2e api", "echo ws e2e web"]
    );

    Ok(())
}
