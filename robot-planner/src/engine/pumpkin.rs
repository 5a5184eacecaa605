use std::time::Duration;

use fnv::FnvHashMap;
use log::debug;
use log::info;
use pumpkin_solver::constraints;
use pumpkin_solver::proof::ConstraintTag;
use pumpkin_solver::results::ProblemSolution;
use pumpkin_solver::results::SatisfactionResult;
use pumpkin_solver::termination::TimeBudget;
use pumpkin_solver::variables::Literal as SolverLiteral;
use pumpkin_solver::Solver;

use super::CheckResult;
use super::EngineError;
use super::Model;
use super::SatEngine;
use crate::Clause;
use crate::Formula;
use crate::Proposition;

/// A [`SatEngine`] backed by the Pumpkin solver.
///
/// Every proposition becomes a named literal. Formulas are posted as clauses, except for
/// top-level cardinality constraints which are posted as a linear inequality over the literals.
#[derive(Debug)]
pub struct PumpkinEngine {
    solver: Solver,
    literals: FnvHashMap<Proposition, SolverLiteral>,
    /// The name and literal of every proposition, in registration order.
    registered: Vec<(String, SolverLiteral)>,
    constraint_tag: ConstraintTag,
    timeout: Option<Duration>,
    /// Set once a posted constraint is found to conflict at the root; the instance is then
    /// unsatisfiable without any search.
    is_root_inconsistent: bool,
    num_clauses: usize,
    num_cardinalities: usize,
}

impl Default for PumpkinEngine {
    fn default() -> Self {
        PumpkinEngine::new()
    }
}

impl PumpkinEngine {
    pub fn new() -> PumpkinEngine {
        let mut solver = Solver::default();
        let constraint_tag = solver.new_constraint_tag();

        PumpkinEngine {
            solver,
            literals: FnvHashMap::default(),
            registered: Vec::new(),
            constraint_tag,
            timeout: None,
            is_root_inconsistent: false,
            num_clauses: 0,
            num_cardinalities: 0,
        }
    }

    /// The number of clauses handed to the solver so far.
    pub fn num_clauses(&self) -> usize {
        self.num_clauses
    }

    /// The number of cardinality constraints handed to the solver so far.
    pub fn num_cardinalities(&self) -> usize {
        self.num_cardinalities
    }

    fn literal(&self, proposition: Proposition) -> Result<SolverLiteral, EngineError> {
        self.literals
            .get(&proposition)
            .copied()
            .ok_or(EngineError::UnregisteredProposition(proposition))
    }

    fn post_clause(&mut self, clause: &Clause) -> Result<(), EngineError> {
        let literals = clause
            .iter()
            .map(|literal| {
                let solver_literal = self.literal(literal.proposition())?;
                Ok(if literal.is_positive() {
                    solver_literal
                } else {
                    !solver_literal
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        self.num_clauses += 1;
        if literals.is_empty() {
            debug!("The empty clause was asserted");
            self.is_root_inconsistent = true;
            return Ok(());
        }

        let result = self
            .solver
            .add_constraint(constraints::clause(literals, self.constraint_tag))
            .post();
        if result.is_err() {
            debug!("A clause conflicts at the root");
            self.is_root_inconsistent = true;
        }

        Ok(())
    }

    fn post_at_most(&mut self, propositions: &[Proposition], bound: u32) -> Result<(), EngineError> {
        let literals = propositions
            .iter()
            .map(|&proposition| self.literal(proposition))
            .collect::<Result<Vec<_>, EngineError>>()?;

        if literals.len() <= bound as usize {
            return Ok(());
        }

        let rhs = i32::try_from(bound).map_err(|_| EngineError::BoundTooLarge(bound))?;
        let weights = vec![1; literals.len()];

        self.num_cardinalities += 1;
        let result = self
            .solver
            .add_constraint(constraints::boolean_less_than_or_equals(
                weights,
                literals,
                rhs,
                self.constraint_tag,
            ))
            .post();
        if result.is_err() {
            debug!("A cardinality constraint conflicts at the root");
            self.is_root_inconsistent = true;
        }

        Ok(())
    }
}

impl SatEngine for PumpkinEngine {
    fn register_proposition(
        &mut self,
        proposition: Proposition,
        name: &str,
    ) -> Result<(), EngineError> {
        if self.literals.contains_key(&proposition) {
            return Err(EngineError::DuplicateRegistration(name.to_owned()));
        }

        let literal = self.solver.new_named_literal(name.to_owned());
        let _ = self.literals.insert(proposition, literal);
        self.registered.push((name.to_owned(), literal));

        Ok(())
    }

    fn assert_formula(&mut self, formula: &Formula) -> Result<(), EngineError> {
        match formula {
            Formula::AtMost {
                propositions,
                bound,
            } => self.post_at_most(propositions, *bound),
            _ => formula
                .to_clauses()?
                .iter()
                .try_for_each(|clause| self.post_clause(clause)),
        }
    }

    fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    fn check(&mut self) -> Result<CheckResult, EngineError> {
        info!(
            "Solving {} propositions, {} clauses and {} cardinality constraints",
            self.registered.len(),
            self.num_clauses,
            self.num_cardinalities
        );

        if self.is_root_inconsistent {
            return Ok(CheckResult::Unsatisfiable);
        }

        let mut brancher = self.solver.default_brancher();
        let mut termination = self.timeout.map(TimeBudget::starting_now);

        let result = match self.solver.satisfy(&mut brancher, &mut termination) {
            SatisfactionResult::Satisfiable(satisfiable) => {
                let solution = satisfiable.solution();
                let values = self
                    .registered
                    .iter()
                    .map(|(name, literal)| (name.clone(), solution.get_literal_value(*literal)))
                    .collect();
                CheckResult::Satisfiable(Model::new(values))
            }
            SatisfactionResult::Unsatisfiable(..) => CheckResult::Unsatisfiable,
            SatisfactionResult::Unknown(..) => CheckResult::Unknown,
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProblemInstance;
    use crate::Robot;
    use crate::VariableModel;

    fn registered_engine() -> (PumpkinEngine, Proposition, Proposition, Proposition) {
        let model = VariableModel::allocate(&ProblemInstance::new(
            vec![Robot { id: 0, start: 0 }],
            vec![],
            2,
            vec![],
            0,
        ));
        let mut engine = PumpkinEngine::new();
        for (proposition, key) in model.iter() {
            engine
                .register_proposition(proposition, &key.to_string())
                .unwrap();
        }
        (
            engine,
            model.location(0, 0, 0),
            model.location(1, 0, 0),
            model.location(2, 0, 0),
        )
    }

    #[test]
    fn model_follows_the_asserted_clauses() {
        let (mut engine, a, b, c) = registered_engine();
        engine.assert_formula(&Formula::atom(a)).unwrap();
        engine
            .assert_formula(&Formula::implies(
                Formula::atom(a),
                Formula::negation(Formula::atom(b)),
            ))
            .unwrap();
        engine
            .assert_formula(&Formula::or([Formula::atom(b), Formula::atom(c)]))
            .unwrap();
        assert_eq!(engine.num_clauses(), 3);
        assert_eq!(engine.num_cardinalities(), 0);

        let CheckResult::Satisfiable(model) = engine.check().unwrap() else {
            panic!("expected a model");
        };
        assert_eq!(model.len(), 3);
        assert_eq!(model.value("robotID0_timeStep0_room0"), Some(true));
        assert_eq!(model.value("robotID0_timeStep0_room1"), Some(false));
        assert_eq!(model.value("robotID0_timeStep0_room2"), Some(true));
    }

    #[test]
    fn model_is_in_registration_order() {
        let (mut engine, ..) = registered_engine();

        let CheckResult::Satisfiable(model) = engine.check().unwrap() else {
            panic!("expected a model");
        };
        let names = model.iter().map(|(name, _)| name).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "robotID0_timeStep0_room0",
                "robotID0_timeStep0_room1",
                "robotID0_timeStep0_room2"
            ]
        );
    }

    #[test]
    fn cardinality_constraints_are_enforced() {
        let (mut engine, a, b, c) = registered_engine();
        engine.assert_formula(&Formula::at_most([a, b, c], 1)).unwrap();
        engine.assert_formula(&Formula::atom(a)).unwrap();
        engine.assert_formula(&Formula::atom(b)).unwrap();
        assert_eq!(engine.num_cardinalities(), 1);
        assert_eq!(engine.num_clauses(), 2);

        assert_eq!(engine.check().unwrap(), CheckResult::Unsatisfiable);
    }

    #[test]
    fn trivial_cardinality_constraints_are_skipped() {
        let (mut engine, a, b, _) = registered_engine();
        engine.assert_formula(&Formula::at_most([a, b], 2)).unwrap();

        assert_eq!(engine.num_cardinalities(), 0);
        assert!(matches!(engine.check().unwrap(), CheckResult::Satisfiable(_)));
    }

    #[test]
    fn the_empty_clause_is_unsatisfiable() {
        let (mut engine, ..) = registered_engine();
        engine.assert_formula(&Formula::or([])).unwrap();

        assert_eq!(engine.check().unwrap(), CheckResult::Unsatisfiable);
    }

    #[test]
    fn unregistered_propositions_are_rejected() {
        let (mut engine, ..) = registered_engine();
        let mut other = VariableModel::default();
        let unknown = (0..4).map(|_| other.new_auxiliary()).last().unwrap();

        assert!(matches!(
            engine.assert_formula(&Formula::atom(unknown)),
            Err(EngineError::UnregisteredProposition(_))
        ));
    }

    #[test]
    fn propositions_are_registered_once() {
        let (mut engine, a, ..) = registered_engine();

        assert!(matches!(
            engine.register_proposition(a, "again"),
            Err(EngineError::DuplicateRegistration(_))
        ));
    }
}
