//! Helpers to run the planner binary in integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;

use robot_planner::parser::write_instance;
use robot_planner::ProblemInstance;
use wait_timeout::ChildExt;

#[derive(Debug)]
pub(crate) struct PlannerRun {
    pub(crate) status: ExitStatus,
    pub(crate) stdout: String,
}

impl PlannerRun {
    /// The `s` line of the output.
    pub(crate) fn status_line(&self) -> Option<&str> {
        self.stdout.lines().find(|line| line.starts_with("s "))
    }

    /// The `name = value` lines of the output.
    pub(crate) fn assignment_lines(&self) -> Vec<&str> {
        self.stdout
            .lines()
            .filter(|line| line.contains(" = "))
            .collect()
    }
}

/// Writes `instance` to a file named `name` in the temporary directory of the tests.
pub(crate) fn instance_file(name: &str, instance: &ProblemInstance) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(format!("{name}.robots"));
    let file = File::create(&path).expect("Failed to create instance file.");
    write_instance(instance, file).expect("Failed to write instance file.");
    path
}

pub(crate) fn run_planner(instance_path: impl AsRef<Path>, args: &[&str]) -> PlannerRun {
    const TEST_TIMEOUT: Duration = Duration::from_secs(60);

    let instance_path = instance_path.as_ref();
    let planner = PathBuf::from(env!("CARGO_BIN_EXE_robot-planner"));
    let log_file_path = instance_path.with_extension("log");

    let mut child = Command::new(planner)
        .args(args)
        .arg(instance_path)
        .stdout(File::create(&log_file_path).expect("Failed to create log file."))
        .stderr(Stdio::null())
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run planner.");

    let status = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(Some(status)) => status,
        Ok(None) => panic!("planner took more than {} seconds", TEST_TIMEOUT.as_secs()),
        Err(e) => panic!("error starting planner: {e}"),
    };

    let stdout = std::fs::read_to_string(&log_file_path).expect("Failed to read log file.");
    std::fs::remove_file(&log_file_path).expect("Failed to remove log file.");

    PlannerRun { status, stdout }
}
