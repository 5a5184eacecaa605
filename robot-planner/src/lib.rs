//! # robot-planner
//! Encodes multi-robot pickup-and-delivery scheduling as a Boolean satisfiability problem.
//!
//! Robots move through a graph of rooms whose edges carry a travel time, pick up tasks in their
//! source room and deliver them to their destination room. Every robot carries at most
//! `capacity` tasks at a time and every task has to be delivered within a fixed horizon.
//!
//! Planning happens in three stages which share a single variable space:
//! 1. the [`VariableModel`] allocates one proposition per location fact `(room, robot, time)` and
//!    one per holding fact `(time, robot, task)`;
//! 2. [`encoding::compile`] emits the constraints characterising valid schedules into a
//!    [`ConstraintStore`];
//! 3. [`solve`] hands the store to a [`SatEngine`] and extracts the model as a list of
//!    [`Assignment`]s.
//!
//! # Example
//! ```rust
//! # use robot_planner::ProblemInstance;
//! # use robot_planner::Robot;
//! # use robot_planner::Task;
//! # use robot_planner::PlannerOptions;
//! # use robot_planner::SolveStatus;
//! // A single robot in room 0 has to bring a task from room 0 to room 1.
//! let instance = ProblemInstance::new(
//!     vec![Robot { id: 0, start: 0 }],
//!     vec![Task { id: 0, start: 0, end: 1 }],
//!     2,
//!     vec![],
//!     2,
//! );
//!
//! let outcome = robot_planner::plan(&instance, &PlannerOptions::default()).unwrap();
//! assert_eq!(outcome.status(), SolveStatus::Satisfiable);
//!
//! // The assignments can be rendered in the `name = True|False` form.
//! for line in outcome.lines() {
//!     println!("{line}");
//! }
//! ```
//!
//! The satisfiability engine is a collaborator behind the [`SatEngine`] trait; the crate ships
//! [`PumpkinEngine`], which is backed by the Pumpkin solver.

pub mod encoding;
pub mod engine;
mod formula;
mod instance;
mod options;
pub mod parser;
mod result;
mod schedule;
mod solve;
pub mod statistics;
mod stopwatch;
mod store;
mod variables;

pub use encoding::Encoding;
pub use engine::pumpkin::PumpkinEngine;
pub use engine::CheckResult;
pub use engine::EngineError;
pub use engine::Model;
pub use engine::SatEngine;
pub use formula::Clause;
pub use formula::Formula;
pub use formula::FormulaError;
pub use formula::Literal;
pub use instance::InstanceError;
pub use instance::ProblemInstance;
pub use instance::Robot;
pub use instance::Task;
pub use instance::WeightedEdge;
pub use instance::DEFAULT_CAPACITY;
pub use options::ExactlyOneEncoding;
pub use options::PlannerOptions;
pub use options::DEFAULT_TIMEOUT;
pub use result::PlannerError;
pub use result::PlannerResult;
pub use schedule::DecodeError;
pub use schedule::Schedule;
pub use schedule::ScheduleViolation;
pub use solve::plan;
pub use solve::solve;
pub use solve::Assignment;
pub use solve::SolveOutcome;
pub use solve::SolveStatus;
pub use stopwatch::Stopwatch;
pub use store::ConstraintGroup;
pub use store::ConstraintStore;
pub use variables::ParseKeyError;
pub use variables::Proposition;
pub use variables::PropositionKey;
pub use variables::VariableModel;
