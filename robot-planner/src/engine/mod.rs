//! The boundary between the encoding and a satisfiability engine.
//!
//! An engine is used in a fixed order: every proposition is registered under its name, then the
//! formulas are asserted, and finally [`SatEngine::check`] is called once. A [`Model`] reports
//! the value of every registered proposition in registration order.

pub mod pumpkin;

use std::time::Duration;

use thiserror::Error;

use crate::Formula;
use crate::FormulaError;
use crate::Proposition;

/// A satisfiability engine which decides a set of asserted formulas.
pub trait SatEngine {
    /// Declares a Boolean variable for `proposition`, identified by `name` in the model.
    fn register_proposition(
        &mut self,
        proposition: Proposition,
        name: &str,
    ) -> Result<(), EngineError>;

    /// Adds `formula` to the set of constraints which must hold.
    ///
    /// Every proposition in the formula has to be registered beforehand.
    fn assert_formula(&mut self, formula: &Formula) -> Result<(), EngineError>;

    /// Limits the wall-clock time of [`SatEngine::check`]; `None` removes the limit.
    fn set_timeout(&mut self, timeout: Option<Duration>);

    /// Decides the asserted formulas.
    fn check(&mut self) -> Result<CheckResult, EngineError>;
}

/// The verdict of an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    Satisfiable(Model),
    Unsatisfiable,
    /// The engine ran out of time before reaching a verdict.
    Unknown,
}

/// A satisfying assignment of all registered propositions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    values: Vec<(String, bool)>,
}

impl Model {
    pub fn new(values: Vec<(String, bool)>) -> Model {
        Model { values }
    }

    /// The `(name, value)` pairs in the order in which the propositions were registered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }

    pub fn value(&self, name: &str) -> Option<bool> {
        self.values
            .iter()
            .find(|(other, _)| other == name)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0:?} was asserted before it was registered")]
    UnregisteredProposition(Proposition),

    #[error("proposition '{0}' was registered twice")]
    DuplicateRegistration(String),

    #[error("cardinality bound {0} does not fit the engine")]
    BoundTooLarge(u32),

    #[error(transparent)]
    Formula(#[from] FormulaError),
}
