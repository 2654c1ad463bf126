// tests/outputs.rs

use std::collections::BTreeMap;

use taskstage::dag::outputs::outputs_for_target;
use taskstage::dag::{outputs_for_task, Overrides, Project, Task, TargetDef};
use taskstage::errors::TaskstageError;
use taskstage_test_utils::builders::{build_task, task, GraphBuilder};

fn option(key: &str, value: &str) -> BTreeMap<String, toml::Value> {
    BTreeMap::from([(key.to_string(), toml::Value::String(value.to_string()))])
}

#[test]
fn build_defaults_to_dist_under_project_root() {
    let mut project = Project::new("app1");
    project.root = "apps/app1".to_string();
    project.targets.insert("build".to_string(), TargetDef::default());

    let graph = GraphBuilder::new().with_project(project).build();

    assert_eq!(
        outputs_for_task(&graph, &build_task("app1")).unwrap(),
        vec!["dist/apps/app1"]
    );
}

#[test]
fn other_targets_default_to_no_outputs() {
    let graph = GraphBuilder::new().project("app1").build();

    assert!(outputs_for_task(&graph, &task("app1", "lint")).unwrap().is_empty());
}

#[test]
fn explicit_outputs_win() {
    let mut project = Project::new("app1");
    project.targets.insert(
        "build".to_string(),
        TargetDef {
            options: option("outputPath", "dist/ignored"),
            outputs: Some(vec!["dist/a".to_string(), "coverage/a".to_string()]),
            ..TargetDef::default()
        },
    );

    assert_eq!(
        outputs_for_target(&project, "build", None),
        vec!["dist/a", "coverage/a"]
    );
}

#[test]
fn output_path_option_is_used() {
    let mut project = Project::new("lib");
    project.targets.insert(
        "package".to_string(),
        TargetDef {
            options: option("output_path", "out/lib"),
            ..TargetDef::default()
        },
    );

    assert_eq!(outputs_for_target(&project, "package", None), vec!["out/lib"]);
}

#[test]
fn configuration_overrides_base_options() {
    let mut project = Project::new("app1");
    project.targets.insert(
        "build".to_string(),
        TargetDef {
            options: option("outputPath", "dist/app1"),
            configurations: BTreeMap::from([(
                "production".to_string(),
                option("outputPath", "dist/app1-prod"),
            )]),
            outputs: None,
        },
    );

    assert_eq!(outputs_for_target(&project, "build", None), vec!["dist/app1"]);
    assert_eq!(
        outputs_for_target(&project, "build", Some("production")),
        vec!["dist/app1-prod"]
    );
    assert_eq!(
        outputs_for_target(&project, "build", Some("staging")),
        vec!["dist/app1"]
    );
}

#[test]
fn unknown_project_is_an_error() {
    let graph = GraphBuilder::new().project("app1").build();
    let ghost = Task::new("ghost", "build", None, Overrides::new());

    let err = outputs_for_task(&graph, &ghost).unwrap_err();
    assert!(matches!(err, TaskstageError::ProjectNotFound(ref id) if id == "ghost"));
}
