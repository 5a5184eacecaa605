use robot_planner::parser::ParseError;
use robot_planner::DecodeError;
use robot_planner::PlannerError;
use robot_planner::ScheduleViolation;
use thiserror::Error;

pub(crate) type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub(crate) enum CliError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The instance file {path} is invalid, more details: {source}")]
    InvalidInstance { path: String, source: ParseError },
    #[error("Planning failed, more details: {0}")]
    Planner(#[from] PlannerError),
    #[error("The model could not be decoded, more details: {0}")]
    Decode(#[from] DecodeError),
    #[error("The schedule is invalid, more details: {0}")]
    InvalidSchedule(#[from] ScheduleViolation),
}
