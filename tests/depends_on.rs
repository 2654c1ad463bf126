// tests/depends_on.rs

use taskstage::dag::GraphAnalyzer;
use taskstage_test_utils::builders::{sample_graph, GraphBuilder};

#[test]
fn direct_dependency_is_reported() {
    let graph = sample_graph();
    let analyzer = GraphAnalyzer::new(&graph);

    assert!(analyzer.depends_on("app2", "common2"));
    assert!(analyzer.depends_on("app1", "common1"));
}

#[test]
fn transitive_dependency_is_reported() {
    let graph = sample_graph();
    let analyzer = GraphAnalyzer::new(&graph);

    assert!(analyzer.depends_on("subapp2", "common2"));
}

#[test]
fn dependency_is_not_symmetric() {
    let graph = sample_graph();
    let analyzer = GraphAnalyzer::new(&graph);

    assert!(!analyzer.depends_on("common2", "app2"));
    assert!(!analyzer.depends_on("app2", "subapp2"));
}

#[test]
fn unrelated_projects_do_not_depend_on_each_other() {
    let graph = sample_graph();
    let analyzer = GraphAnalyzer::new(&graph);

    assert!(!analyzer.depends_on("app1", "app2"));
    assert!(!analyzer.depends_on("subapp2", "common1"));
}

#[test]
fn project_does_not_depend_on_itself_without_a_cycle() {
    let graph = sample_graph();
    let analyzer = GraphAnalyzer::new(&graph);

    for id in ["subapp2", "app1", "app2", "common1", "common2"] {
        assert!(!analyzer.depends_on(id, id), "{id} should not depend on itself");
    }
}

#[test]
fn unknown_source_depends_on_nothing() {
    let graph = sample_graph();
    let analyzer = GraphAnalyzer::new(&graph);

    assert!(!analyzer.depends_on("nope", "common2"));
}

#[test]
fn direct_edge_to_unknown_project_still_counts() {
    let graph = GraphBuilder::new().project("app").dep("app", "ghost").build();
    let analyzer = GraphAnalyzer::new(&graph);

    assert!(analyzer.depends_on("app", "ghost"));
}

#[test]
fn cycles_terminate_and_reach_back_to_the_start() {
    let graph = GraphBuilder::new()
        .project("a")
        .project("b")
        .project("c")
        .project("x")
        .dep("a", "b")
        .dep("b", "c")
        .dep("c", "a")
        .build();
    let analyzer = GraphAnalyzer::new(&graph);

    assert!(analyzer.depends_on("a", "a"));
    assert!(analyzer.depends_on("c", "b"));
    assert!(!analyzer.depends_on("a", "x"));
}

#[test]
fn diamond_is_resolved_through_either_branch() {
    let graph = GraphBuilder::new()
        .project("top")
        .project("left")
        .project("right")
        .project("base")
        .dep("top", "left")
        .dep("top", "right")
        .dep("left", "base")
        .dep("right", "base")
        .build();
    let analyzer = GraphAnalyzer::new(&graph);

    assert!(analyzer.depends_on("top", "base"));
    assert!(!analyzer.depends_on("left", "right"));
}
