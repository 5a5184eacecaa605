use thiserror::Error;

use crate::EngineError;
use crate::InstanceError;

pub type PlannerResult<T> = Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("the instance is malformed: {0}")]
    Instance(#[from] InstanceError),

    #[error("the engine failed: {0}")]
    Engine(#[from] EngineError),
}
