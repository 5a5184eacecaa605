use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;

use convert_case::Case;
use convert_case::Casing;

use crate::Formula;

/// The concern a constraint encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintGroup {
    InitialPlacement,
    TaskCoverage,
    TerminalDropOff,
    SingleLocation,
    TravelTime,
    InitialPickup,
    ForwardContinuity,
    BackwardContinuity,
    Capacity,
    ExclusiveHolding,
    /// Constraints added on top of a compiled encoding.
    Additional,
}

impl Display for ConstraintGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format!("{self:?}").to_case(Case::Snake))
    }
}

/// An append-only collection of formulas, each tagged with the concern it encodes.
#[derive(Debug, Clone, Default)]
pub struct ConstraintStore {
    constraints: Vec<(ConstraintGroup, Formula)>,
}

impl ConstraintStore {
    pub fn new() -> ConstraintStore {
        ConstraintStore::default()
    }

    pub fn add(&mut self, group: ConstraintGroup, formula: Formula) {
        self.constraints.push((group, formula));
    }

    pub fn extend(&mut self, group: ConstraintGroup, formulas: impl IntoIterator<Item = Formula>) {
        self.constraints
            .extend(formulas.into_iter().map(|formula| (group, formula)));
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// The formulas in the order in which they were added.
    pub fn formulas(&self) -> impl Iterator<Item = &Formula> + '_ {
        self.constraints.iter().map(|(_, formula)| formula)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConstraintGroup, &Formula)> + '_ {
        self.constraints
            .iter()
            .map(|(group, formula)| (*group, formula))
    }

    pub fn group(&self, group: ConstraintGroup) -> impl Iterator<Item = &Formula> + '_ {
        self.iter()
            .filter(move |(other, _)| *other == group)
            .map(|(_, formula)| formula)
    }

    /// The number of formulas per group; groups without formulas are absent.
    pub fn count_by_group(&self) -> BTreeMap<ConstraintGroup, usize> {
        let mut counts = BTreeMap::new();
        for (group, _) in &self.constraints {
            *counts.entry(*group).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_are_named_in_snake_case() {
        assert_eq!(ConstraintGroup::TerminalDropOff.to_string(), "terminal_drop_off");
        assert_eq!(ConstraintGroup::Capacity.to_string(), "capacity");
    }

    #[test]
    fn formulas_keep_their_insertion_order() {
        let mut store = ConstraintStore::new();
        store.add(ConstraintGroup::Capacity, Formula::and([]));
        store.extend(
            ConstraintGroup::TaskCoverage,
            [Formula::or([]), Formula::and([])],
        );

        assert_eq!(store.len(), 3);
        assert_eq!(
            store.formulas().cloned().collect::<Vec<_>>(),
            vec![Formula::and([]), Formula::or([]), Formula::and([])]
        );
        assert_eq!(
            store.count_by_group(),
            BTreeMap::from([
                (ConstraintGroup::TaskCoverage, 2),
                (ConstraintGroup::Capacity, 1)
            ])
        );
        assert_eq!(store.group(ConstraintGroup::TaskCoverage).count(), 2);
    }
}
