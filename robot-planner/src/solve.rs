use std::fmt::Display;
use std::fmt::Formatter;
use std::time::Duration;

use log::info;

use crate::encoding;
use crate::statistics::log_encoding_statistics;
use crate::statistics::log_statistic;
use crate::CheckResult;
use crate::Encoding;
use crate::PlannerOptions;
use crate::PlannerResult;
use crate::ProblemInstance;
use crate::PropositionKey;
use crate::PumpkinEngine;
use crate::SatEngine;
use crate::Stopwatch;

/// The value of one named proposition in a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub value: bool,
}

impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let value = if self.value { "True" } else { "False" };
        write!(f, "{} = {value}", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Satisfiable,
    Unsatisfiable,
    /// The engine stopped before deciding the instance, e.g. because it ran out of time.
    Unknown,
}

impl Display for SolveStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Satisfiable => write!(f, "SATISFIABLE"),
            SolveStatus::Unsatisfiable => write!(f, "UNSATISFIABLE"),
            SolveStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// The verdict on an instance together with the schedule, if one was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    status: SolveStatus,
    assignments: Vec<Assignment>,
}

impl SolveOutcome {
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// The values of the location and holding propositions in allocation order; empty unless
    /// the instance is satisfiable.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn is_satisfiable(&self) -> bool {
        self.status == SolveStatus::Satisfiable
    }

    /// The assignments rendered as `name = True|False`.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.assignments.iter().map(Assignment::to_string)
    }
}

/// Decides `encoding` with `engine`.
///
/// All propositions are registered before the first formula is asserted, and the engine is
/// checked exactly once. Auxiliary propositions are not part of the outcome.
pub fn solve<Engine: SatEngine>(
    encoding: &Encoding,
    engine: &mut Engine,
    timeout: Option<Duration>,
) -> PlannerResult<SolveOutcome> {
    let variables = encoding.variables();
    for (proposition, key) in variables.iter() {
        engine.register_proposition(proposition, &key.to_string())?;
    }
    for formula in encoding.constraints().formulas() {
        engine.assert_formula(formula)?;
    }
    engine.set_timeout(timeout);

    let stopwatch = Stopwatch::starting_now();
    let result = engine.check()?;
    let elapsed = stopwatch.elapsed();

    let outcome = match result {
        CheckResult::Satisfiable(model) => SolveOutcome {
            status: SolveStatus::Satisfiable,
            assignments: model
                .iter()
                .filter(|(name, _)| {
                    name.parse::<PropositionKey>()
                        .is_ok_and(|key| key.is_decision())
                })
                .map(|(name, value)| Assignment {
                    name: name.to_owned(),
                    value,
                })
                .collect(),
        },
        CheckResult::Unsatisfiable => SolveOutcome {
            status: SolveStatus::Unsatisfiable,
            assignments: vec![],
        },
        CheckResult::Unknown => SolveOutcome {
            status: SolveStatus::Unknown,
            assignments: vec![],
        },
    };

    info!("Engine returned {} after {elapsed:?}", outcome.status);
    log_statistic("solveTimeMs", elapsed.as_millis());
    log_statistic("status", outcome.status);

    Ok(outcome)
}

/// Compiles `instance` and decides it with a [`PumpkinEngine`].
///
/// The time limit of `options` covers compilation as well as solving.
pub fn plan(instance: &ProblemInstance, options: &PlannerOptions) -> PlannerResult<SolveOutcome> {
    let stopwatch = Stopwatch::starting_now();

    let encoding = encoding::compile(instance, options)?;
    info!(
        "Compiled {} formulas over {} propositions in {:?}",
        encoding.constraints().len(),
        encoding.variables().len(),
        stopwatch.elapsed()
    );
    log_encoding_statistics(encoding.variables(), encoding.constraints());

    let mut engine = PumpkinEngine::new();
    let outcome = solve(&encoding, &mut engine, stopwatch.remaining(options.timeout))?;
    log_statistic("numClauses", engine.num_clauses());
    log_statistic("numCardinalities", engine.num_cardinalities());

    Ok(outcome)
}
