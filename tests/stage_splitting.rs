// tests/stage_splitting.rs

use taskstage::dag::{topologically_sort_tasks, GraphAnalyzer, Overrides, Stage, Task, TaskOrderer};
use taskstage_test_utils::builders::{build_task, build_tasks, sample_graph, task, GraphBuilder};
use taskstage_test_utils::init_tracing;

fn ids(stages: &[Stage]) -> Vec<Vec<String>> {
    stages
        .iter()
        .map(|s| s.tasks().iter().map(|t| t.id.clone()).collect())
        .collect()
}

#[test]
fn no_tasks_means_no_stages() {
    let graph = sample_graph();

    let build = TaskOrderer::new("build", &graph).split_into_stages(Vec::new());
    assert!(build.is_empty());

    let test = TaskOrderer::new("test", &graph).split_into_stages(Vec::new());
    assert!(test.is_empty());
}

#[test]
fn sample_workspace_builds_in_three_stages() {
    init_tracing();

    let graph = sample_graph();
    let tasks = build_tasks(&["app1", "app2", "subapp2", "common1", "common2"]);

    let stages = TaskOrderer::new("build", &graph).split_into_stages(tasks);

    assert_eq!(
        ids(&stages),
        vec![
            vec!["common2:build", "common1:build"],
            vec!["app2:build", "app1:build"],
            vec!["subapp2:build"],
        ]
    );
    assert_eq!(stages[0].projects(), vec!["common2", "common1"]);
}

#[test]
fn only_selected_tasks_are_staged() {
    let graph = sample_graph();
    let tasks = build_tasks(&["app1", "subapp2"]);

    let stages = TaskOrderer::new("build", &graph).split_into_stages(tasks);

    assert_eq!(ids(&stages), vec![vec!["subapp2:build", "app1:build"]]);
}

#[test]
fn transitive_dependency_through_unselected_project_splits_stages() {
    let graph = sample_graph();
    let tasks = build_tasks(&["subapp2", "common2"]);

    let stages = TaskOrderer::new("build", &graph).split_into_stages(tasks);

    assert_eq!(
        ids(&stages),
        vec![vec!["common2:build"], vec!["subapp2:build"]]
    );
}

#[test]
fn unstaged_target_runs_everything_in_one_stage() {
    let graph = sample_graph();
    let tasks = vec![
        task("subapp2", "test"),
        task("common2", "test"),
        task("app2", "test"),
    ];

    let orderer = TaskOrderer::new("test", &graph);
    assert!(!orderer.is_staged());

    let stages = orderer.split_into_stages(tasks);
    assert_eq!(
        ids(&stages),
        vec![vec!["subapp2:test", "common2:test", "app2:test"]]
    );
}

#[test]
fn unstaged_target_keeps_tasks_for_unknown_projects() {
    let graph = sample_graph();
    let tasks = vec![task("ghost", "lint"), task("app1", "lint")];

    let stages = TaskOrderer::new("lint", &graph).split_into_stages(tasks);
    assert_eq!(ids(&stages), vec![vec!["ghost:lint", "app1:lint"]]);
}

#[test]
fn staged_targets_can_be_configured() {
    let graph = sample_graph();
    let tasks = vec![task("app2", "e2e"), task("common2", "e2e")];

    let orderer = TaskOrderer::new("e2e", &graph).with_staged_targets(["build", "e2e"]);
    assert!(orderer.is_staged());

    let stages = orderer.split_into_stages(tasks);
    assert_eq!(ids(&stages), vec![vec!["common2:e2e"], vec!["app2:e2e"]]);
}

#[test]
fn build_is_unstaged_when_removed_from_staged_targets() {
    let graph = sample_graph();
    let tasks = build_tasks(&["app2", "common2"]);

    let orderer = TaskOrderer::new("build", &graph).with_staged_targets(Vec::<String>::new());
    let stages = orderer.split_into_stages(tasks);

    assert_eq!(ids(&stages), vec![vec!["app2:build", "common2:build"]]);
}

#[test]
fn staged_tasks_for_unknown_projects_are_dropped() {
    let graph = sample_graph();
    let tasks = build_tasks(&["ghost", "common1", "app1"]);

    let stages = TaskOrderer::new("build", &graph).split_into_stages(tasks);

    assert_eq!(ids(&stages), vec![vec!["common1:build"], vec!["app1:build"]]);
}

#[test]
fn several_tasks_for_one_project_share_a_stage() {
    let graph = sample_graph();
    let prod = Task::new("app1", "build", Some("production".to_string()), Overrides::new());
    let tasks = vec![prod, build_task("app1"), build_task("common1")];

    let stages = TaskOrderer::new("build", &graph).split_into_stages(tasks);

    assert_eq!(
        ids(&stages),
        vec![
            vec!["common1:build"],
            vec!["app1:build:production", "app1:build"],
        ]
    );
}

#[test]
fn cyclic_graph_still_produces_stages() {
    let graph = GraphBuilder::new()
        .project("a")
        .project("b")
        .dep("a", "b")
        .dep("b", "a")
        .build();

    let stages = TaskOrderer::new("build", &graph).split_into_stages(build_tasks(&["a", "b"]));

    let total: usize = stages.iter().map(Stage::len).sum();
    assert_eq!(total, 2);
    assert_eq!(ids(&stages), vec![vec!["b:build"], vec!["a:build"]]);
}

#[test]
fn splitting_is_deterministic() {
    let graph = sample_graph();
    let orderer = TaskOrderer::new("build", &graph);
    let input = build_tasks(&["subapp2", "app1", "app2", "common1", "common2"]);

    let first = orderer.split_into_stages(input.clone());
    let second = orderer.split_into_stages(input);

    assert_eq!(first, second);
}

#[test]
fn task_sort_follows_project_order() {
    let graph = sample_graph();
    let analyzer = GraphAnalyzer::new(&graph);
    let tasks = build_tasks(&["app1", "subapp2", "common2"]);

    let sorted: Vec<String> = topologically_sort_tasks(&analyzer, tasks)
        .into_iter()
        .map(|t| t.id)
        .collect();

    assert_eq!(sorted, vec!["common2:build", "subapp2:build", "app1:build"]);
}
