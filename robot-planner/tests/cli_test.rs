#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::instance_file;
use helpers::run_planner;
use robot_planner::ProblemInstance;
use robot_planner::Robot;
use robot_planner::Task;
use robot_planner::WeightedEdge;

fn delivery() -> ProblemInstance {
    ProblemInstance::new(
        vec![Robot { id: 0, start: 0 }, Robot { id: 1, start: 2 }],
        vec![
            Task {
                id: 0,
                start: 1,
                end: 2,
            },
            Task {
                id: 1,
                start: 2,
                end: 0,
            },
        ],
        3,
        vec![
            WeightedEdge {
                start: 0,
                end: 1,
                weight: 2,
            },
            WeightedEdge {
                start: 1,
                end: 2,
                weight: 1,
            },
        ],
        5,
    )
}

#[test]
fn satisfiable_instance_prints_every_decision_variable() {
    let instance = delivery();
    let path = instance_file("cli_satisfiable", &instance);

    let run = run_planner(&path, &["--verify", "--schedule", "--exactly-one", "auto"]);

    assert!(run.status.success(), "{}", run.stdout);
    assert_eq!(run.status_line(), Some("s SATISFIABLE"));
    // (rooms + 1) * robots * (T + 1) + (T + 1) * robots * tasks
    assert_eq!(run.assignment_lines().len(), 4 * 2 * 6 + 6 * 2 * 2);
    assert!(run
        .assignment_lines()
        .contains(&"robotID0_timeStep0_room0 = True"));
    assert!(run.stdout.contains("c t=0 robot0@room0 robot1@room2"));
}

#[test]
fn unsatisfiable_instance_prints_no_assignments() {
    let mut instance = delivery();
    instance.horizon = 1;
    let path = instance_file("cli_unsatisfiable", &instance);

    let run = run_planner(&path, &[]);

    assert!(run.status.success(), "{}", run.stdout);
    assert_eq!(run.status_line(), Some("s UNSATISFIABLE"));
    assert!(run.assignment_lines().is_empty());
}

#[test]
fn statistics_are_logged_on_request() {
    let path = instance_file("cli_statistics", &delivery());

    let run = run_planner(&path, &["--log-statistics", "--time-limit", "0"]);

    assert!(run.status.success(), "{}", run.stdout);
    assert!(run.stdout.contains("c numPropositions="), "{}", run.stdout);
    assert!(run.stdout.contains("c solveTimeMs="), "{}", run.stdout);
}

#[test]
fn malformed_instance_fails() {
    let mut instance = delivery();
    instance.tasks[0].end = 9;
    let path = instance_file("cli_malformed", &instance);

    let run = run_planner(&path, &[]);

    assert!(!run.status.success());
    assert_eq!(run.status_line(), None);
}
