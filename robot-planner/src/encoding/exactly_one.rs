//! At-most-one encodings over a set of propositions.

use itertools::Itertools;

use crate::Formula;
use crate::Proposition;
use crate::VariableModel;

/// `!(a /\ b)` for every unordered pair `{a, b}` of `propositions`.
pub(crate) fn pairwise(propositions: &[Proposition]) -> impl Iterator<Item = Formula> + '_ {
    propositions
        .iter()
        .tuple_combinations()
        .map(|(&first, &second)| {
            Formula::negation(Formula::and([
                Formula::atom(first),
                Formula::atom(second),
            ]))
        })
}

/// The sequential counter encoding.
///
/// The auxiliary `s_i` is forced true once one of `x_0, ..., x_i` is true, and `x_i` may only be
/// true if `s_{i-1}` is false. Uses `n - 1` auxiliaries and `3n - 4` binary clauses for `n > 1`
/// propositions.
///
/// Reference:
/// Sinz, Carsten. Towards an optimal CNF encoding of boolean cardinality constraints.
/// Principles and Practice of Constraint Programming, 2005, 827-831.
pub(crate) fn sequential(
    propositions: &[Proposition],
    variables: &mut VariableModel,
) -> Vec<Formula> {
    let n = propositions.len();
    if n <= 1 {
        return vec![];
    }

    let counters = (0..n - 1)
        .map(|_| variables.new_auxiliary())
        .collect::<Vec<_>>();

    let mut formulas = Vec::with_capacity(3 * n - 4);
    for (index, &proposition) in propositions.iter().enumerate() {
        if index < n - 1 {
            formulas.push(Formula::implies(
                Formula::atom(proposition),
                Formula::atom(counters[index]),
            ));
        }
        if index > 0 {
            formulas.push(Formula::implies(
                Formula::atom(proposition),
                Formula::negation(Formula::atom(counters[index - 1])),
            ));
        }
        if index > 0 && index < n - 1 {
            formulas.push(Formula::implies(
                Formula::atom(counters[index - 1]),
                Formula::atom(counters[index]),
            ));
        }
    }

    formulas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProblemInstance;
    use crate::Robot;

    fn rooms(num_rooms: u32) -> (VariableModel, Vec<Proposition>) {
        let model = VariableModel::allocate(&ProblemInstance::new(
            vec![Robot { id: 0, start: 0 }],
            vec![],
            num_rooms - 1,
            vec![],
            0,
        ));
        let propositions = (0..num_rooms)
            .map(|room| model.location(room, 0, 0))
            .collect();
        (model, propositions)
    }

    fn bits(mask: u32, len: usize) -> Vec<bool> {
        (0..len).map(|bit| mask & (1 << bit) != 0).collect()
    }

    /// Checks that an assignment of the constrained propositions extends to a model of the
    /// formulas, under some assignment of the auxiliaries, iff at most one of them is true.
    fn admits_exactly_the_assignments_with_at_most_one_true(
        formulas: &[Formula],
        propositions: &[Proposition],
        auxiliaries: &[Proposition],
    ) {
        for mask in 0..(1_u32 << propositions.len()) {
            let values = bits(mask, propositions.len());

            let is_extendable = (0..(1_u32 << auxiliaries.len())).any(|auxiliary_mask| {
                let auxiliary_values = bits(auxiliary_mask, auxiliaries.len());
                let value = |proposition: Proposition| {
                    propositions
                        .iter()
                        .position(|&other| other == proposition)
                        .map(|index| values[index])
                        .or_else(|| {
                            auxiliaries
                                .iter()
                                .position(|&other| other == proposition)
                                .map(|index| auxiliary_values[index])
                        })
                        .unwrap_or_else(|| panic!("{proposition:?} is not constrained"))
                };
                formulas.iter().all(|formula| formula.evaluate(&value))
            });

            assert_eq!(is_extendable, mask.count_ones() <= 1, "{values:?}");
        }
    }

    #[test]
    fn pairwise_forbids_every_pair() {
        let (_, propositions) = rooms(4);
        let formulas = pairwise(&propositions).collect::<Vec<_>>();

        assert_eq!(formulas.len(), 6);
        admits_exactly_the_assignments_with_at_most_one_true(&formulas, &propositions, &[]);
    }

    #[test]
    fn sequential_counts_true_propositions() {
        let (mut model, propositions) = rooms(5);
        let formulas = sequential(&propositions, &mut model);

        assert_eq!(model.num_auxiliaries(), 4);
        assert_eq!(formulas.len(), 3 * 5 - 4);

        let auxiliaries = model
            .iter()
            .filter(|(_, key)| !key.is_decision())
            .map(|(proposition, _)| proposition)
            .collect::<Vec<_>>();
        admits_exactly_the_assignments_with_at_most_one_true(
            &formulas,
            &propositions,
            &auxiliaries,
        );
    }

    #[test]
    fn small_domains_need_no_constraints() {
        let (mut model, propositions) = rooms(1);

        assert_eq!(pairwise(&propositions).count(), 0);
        assert!(sequential(&propositions, &mut model).is_empty());
        assert_eq!(model.num_auxiliaries(), 0);
    }
}
