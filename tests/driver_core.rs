// tests/driver_core.rs

use taskstage::dag::Stage;
use taskstage::engine::{
    CompletionStatus, CoreCommand, CoreStep, DriverEvent, DriverState, StageDriver, TaskOutcome,
};
use taskstage_test_utils::builders::build_tasks;

fn three_stages() -> Vec<Stage> {
    vec![
        Stage::new(build_tasks(&["common2", "common1"])),
        Stage::new(build_tasks(&["app2", "app1"])),
        Stage::new(build_tasks(&["subapp2"])),
    ]
}

fn dispatched(step: &CoreStep) -> Option<(usize, Vec<String>)> {
    step.commands.iter().find_map(|c| match c {
        CoreCommand::DispatchStage { index, tasks } => {
            Some((*index, tasks.iter().map(|t| t.id.clone()).collect()))
        }
        _ => None,
    })
}

fn emitted(step: &CoreStep) -> Vec<(String, CompletionStatus)> {
    step.commands
        .iter()
        .filter_map(|c| match c {
            CoreCommand::Emit(events) => Some(events),
            _ => None,
        })
        .flatten()
        .map(|e| (e.task.id.clone(), e.status))
        .collect()
}

fn finishes(step: &CoreStep) -> bool {
    step.commands.iter().any(|c| matches!(c, CoreCommand::Finish))
}

fn completed(stage: usize, outcomes: Vec<TaskOutcome>) -> DriverEvent {
    DriverEvent::StageCompleted { stage, outcomes }
}

#[test]
fn starts_pending() {
    let driver = StageDriver::new(three_stages());
    assert_eq!(driver.state(), DriverState::Pending);
    assert!(!driver.is_finished());
}

#[test]
fn no_stages_finishes_immediately() {
    let mut driver = StageDriver::new(Vec::new());

    let step = driver.step(DriverEvent::Start);

    assert!(finishes(&step));
    assert!(!step.keep_running);
    assert!(dispatched(&step).is_none());
    assert_eq!(driver.state(), DriverState::Done);
}

#[test]
fn start_dispatches_the_first_stage() {
    let mut driver = StageDriver::new(three_stages());

    let step = driver.step(DriverEvent::Start);

    assert!(step.keep_running);
    assert_eq!(
        dispatched(&step),
        Some((0, vec!["common2:build".to_string(), "common1:build".to_string()]))
    );
    assert_eq!(driver.state(), DriverState::Running { stage: 0 });
}

#[test]
fn successful_stages_advance_until_done() {
    use TaskOutcome::Success;

    let mut driver = StageDriver::new(three_stages());
    driver.step(DriverEvent::Start);

    let step = driver.step(completed(0, vec![Success, Success]));
    assert_eq!(
        emitted(&step),
        vec![
            ("common2:build".to_string(), CompletionStatus::Succeeded),
            ("common1:build".to_string(), CompletionStatus::Succeeded),
        ]
    );
    assert_eq!(dispatched(&step).map(|(i, _)| i), Some(1));
    assert_eq!(driver.state(), DriverState::Running { stage: 1 });

    let step = driver.step(completed(1, vec![Success, Success]));
    assert_eq!(dispatched(&step).map(|(i, _)| i), Some(2));

    let step = driver.step(completed(2, vec![Success]));
    assert_eq!(
        emitted(&step),
        vec![("subapp2:build".to_string(), CompletionStatus::Succeeded)]
    );
    assert!(finishes(&step));
    assert!(!step.keep_running);
    assert_eq!(driver.state(), DriverState::Done);
}

#[test]
fn failure_skips_every_later_stage() {
    use TaskOutcome::{Failed, Success};

    let mut driver = StageDriver::new(three_stages());
    driver.step(DriverEvent::Start);

    let step = driver.step(completed(0, vec![Failed(2), Success]));

    assert_eq!(
        emitted(&step),
        vec![
            ("common2:build".to_string(), CompletionStatus::Failed(2)),
            ("common1:build".to_string(), CompletionStatus::Succeeded),
            ("app2:build".to_string(), CompletionStatus::Skipped),
            ("app1:build".to_string(), CompletionStatus::Skipped),
            ("subapp2:build".to_string(), CompletionStatus::Skipped),
        ]
    );
    assert!(dispatched(&step).is_none());
    assert!(finishes(&step));
    assert!(!step.keep_running);
    assert_eq!(driver.state(), DriverState::Aborted { failed_stage: 0 });
}

#[test]
fn failure_in_last_stage_skips_nothing() {
    use TaskOutcome::{Failed, Success};

    let mut driver = StageDriver::new(three_stages());
    driver.step(DriverEvent::Start);
    driver.step(completed(0, vec![Success, Success]));
    driver.step(completed(1, vec![Success, Success]));

    let step = driver.step(completed(2, vec![Failed(1)]));

    assert_eq!(
        emitted(&step),
        vec![("subapp2:build".to_string(), CompletionStatus::Failed(1))]
    );
    assert_eq!(driver.state(), DriverState::Aborted { failed_stage: 2 });
}

#[test]
fn missing_outcomes_count_as_failures() {
    let mut driver = StageDriver::new(three_stages());
    driver.step(DriverEvent::Start);

    let step = driver.step(completed(0, vec![TaskOutcome::Success]));

    let statuses = emitted(&step);
    assert_eq!(statuses[1], ("common1:build".to_string(), CompletionStatus::Failed(-1)));
    assert_eq!(driver.state(), DriverState::Aborted { failed_stage: 0 });
}

#[test]
fn completion_for_another_stage_is_ignored() {
    let mut driver = StageDriver::new(three_stages());
    driver.step(DriverEvent::Start);

    let step = driver.step(completed(1, vec![TaskOutcome::Success, TaskOutcome::Success]));

    assert!(step.commands.is_empty());
    assert!(step.keep_running);
    assert_eq!(driver.state(), DriverState::Running { stage: 0 });
}

#[test]
fn aborted_run_never_resumes() {
    let mut driver = StageDriver::new(three_stages());
    driver.step(DriverEvent::Start);
    driver.step(completed(0, vec![TaskOutcome::Failed(1), TaskOutcome::Success]));

    let restart = driver.step(DriverEvent::Start);
    assert!(restart.commands.is_empty());
    assert!(!restart.keep_running);

    let late = driver.step(completed(1, vec![TaskOutcome::Success, TaskOutcome::Success]));
    assert!(late.commands.is_empty());
    assert_eq!(driver.state(), DriverState::Aborted { failed_stage: 0 });
}
