use std::ops::Not;

use itertools::Itertools;
use thiserror::Error;

use crate::Proposition;

/// A proposition or its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    proposition: Proposition,
    is_positive: bool,
}

impl Literal {
    pub fn positive(proposition: Proposition) -> Literal {
        Literal {
            proposition,
            is_positive: true,
        }
    }

    pub fn negative(proposition: Proposition) -> Literal {
        Literal {
            proposition,
            is_positive: false,
        }
    }

    pub fn proposition(self) -> Proposition {
        self.proposition
    }

    pub fn is_positive(self) -> bool {
        self.is_positive
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            proposition: self.proposition,
            is_positive: !self.is_positive,
        }
    }
}

/// A disjunction of literals. The empty clause is false.
pub type Clause = Vec<Literal>;

/// A propositional formula, extended with a cardinality bound over propositions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    Atom(Proposition),
    Not(Box<Formula>),
    /// True if every conjunct is true; the empty conjunction is true.
    And(Vec<Formula>),
    /// True if some disjunct is true; the empty disjunction is false.
    Or(Vec<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    /// `sum(propositions) <= bound`, counting every true proposition as 1.
    AtMost {
        propositions: Vec<Proposition>,
        bound: u32,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormulaError {
    #[error("cardinality constraints can only be asserted at the top level of a formula")]
    NestedCardinality,
}

impl Formula {
    pub fn atom(proposition: Proposition) -> Formula {
        Formula::Atom(proposition)
    }

    pub fn negation(formula: Formula) -> Formula {
        Formula::Not(Box::new(formula))
    }

    pub fn and(conjuncts: impl IntoIterator<Item = Formula>) -> Formula {
        Formula::And(conjuncts.into_iter().collect())
    }

    pub fn or(disjuncts: impl IntoIterator<Item = Formula>) -> Formula {
        Formula::Or(disjuncts.into_iter().collect())
    }

    pub fn implies(premise: Formula, conclusion: Formula) -> Formula {
        Formula::Implies(Box::new(premise), Box::new(conclusion))
    }

    pub fn at_most(propositions: impl IntoIterator<Item = Proposition>, bound: u32) -> Formula {
        Formula::AtMost {
            propositions: propositions.into_iter().collect(),
            bound,
        }
    }

    /// Evaluates the formula under the given assignment of the propositions.
    pub fn evaluate(&self, value: &impl Fn(Proposition) -> bool) -> bool {
        match self {
            Formula::Atom(proposition) => value(*proposition),
            Formula::Not(formula) => !formula.evaluate(value),
            Formula::And(conjuncts) => conjuncts.iter().all(|conjunct| conjunct.evaluate(value)),
            Formula::Or(disjuncts) => disjuncts.iter().any(|disjunct| disjunct.evaluate(value)),
            Formula::Implies(premise, conclusion) => {
                !premise.evaluate(value) || conclusion.evaluate(value)
            }
            Formula::AtMost {
                propositions,
                bound,
            } => {
                let count = propositions
                    .iter()
                    .filter(|&&proposition| value(proposition))
                    .count();
                count <= *bound as usize
            }
        }
    }

    /// Converts a formula without cardinality constraints to conjunctive normal form.
    ///
    /// The conversion pushes negations to the atoms and distributes disjunctions over
    /// conjunctions without introducing new propositions, so it is only suited for the small
    /// formulas the encoding produces.
    pub fn to_clauses(&self) -> Result<Vec<Clause>, FormulaError> {
        self.clauses_with_polarity(true)
    }

    fn clauses_with_polarity(&self, is_positive: bool) -> Result<Vec<Clause>, FormulaError> {
        match self {
            Formula::Atom(proposition) => {
                let literal = Literal::positive(*proposition);
                Ok(vec![vec![if is_positive { literal } else { !literal }]])
            }
            Formula::Not(formula) => formula.clauses_with_polarity(!is_positive),
            Formula::And(conjuncts) if is_positive => Self::conjoin(conjuncts, true),
            Formula::And(conjuncts) => Self::disjoin(conjuncts, false),
            Formula::Or(disjuncts) if is_positive => Self::disjoin(disjuncts, true),
            Formula::Or(disjuncts) => Self::conjoin(disjuncts, false),
            Formula::Implies(premise, conclusion) => {
                // a -> b is !a \/ b, and !(a -> b) is a /\ !b
                let premise = premise.clauses_with_polarity(!is_positive)?;
                let conclusion = conclusion.clauses_with_polarity(is_positive)?;
                if is_positive {
                    Ok(Self::distribute(premise, conclusion))
                } else {
                    Ok(premise.into_iter().chain(conclusion).collect())
                }
            }
            Formula::AtMost { .. } => Err(FormulaError::NestedCardinality),
        }
    }

    fn conjoin(formulas: &[Formula], is_positive: bool) -> Result<Vec<Clause>, FormulaError> {
        formulas
            .iter()
            .map(|formula| formula.clauses_with_polarity(is_positive))
            .flatten_ok()
            .collect()
    }

    fn disjoin(formulas: &[Formula], is_positive: bool) -> Result<Vec<Clause>, FormulaError> {
        // The empty disjunction is the single empty clause.
        formulas.iter().try_fold(vec![vec![]], |clauses, formula| {
            Ok(Self::distribute(
                clauses,
                formula.clauses_with_polarity(is_positive)?,
            ))
        })
    }

    /// The clauses of `lhs \/ rhs` where both sides are in conjunctive normal form.
    fn distribute(lhs: Vec<Clause>, rhs: Vec<Clause>) -> Vec<Clause> {
        lhs.iter()
            .cartesian_product(rhs.iter())
            .map(|(left, right)| left.iter().chain(right).copied().collect())
            .collect()
    }
}
