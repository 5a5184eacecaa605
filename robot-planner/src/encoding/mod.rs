//! Compiles a [`ProblemInstance`] into the constraints which characterise its valid schedules.
//!
//! The constraints are grouped by the concern they encode (see [`ConstraintGroup`]):
//! - every robot starts in its start room;
//! - every task is held by some robot at some time-step before the horizon;
//! - no task is held at the horizon;
//! - every robot is in exactly one room per time-step;
//! - a robot cannot reach the other endpoint of an edge before the edge's weight has passed;
//! - holding a task is causally consistent with the location of the robot, i.e. a task is picked
//!   up in its source room and dropped in its destination room;
//! - a robot holds at most `capacity` tasks per time-step;
//! - a task is held by at most one robot per time-step.
//!
//! Compilation is a single pass which only appends to the [`ConstraintStore`]; instances without
//! robots or tasks are not treated specially.

mod exactly_one;

use itertools::Itertools;
use log::debug;

use crate::ConstraintGroup;
use crate::ConstraintStore;
use crate::ExactlyOneEncoding;
use crate::Formula;
use crate::InstanceError;
use crate::PlannerOptions;
use crate::ProblemInstance;
use crate::Proposition;
use crate::Task;
use crate::VariableModel;

/// The result of compiling an instance: the variable space and the constraints over it.
#[derive(Debug, Clone)]
pub struct Encoding {
    variables: VariableModel,
    constraints: ConstraintStore,
}

impl Encoding {
    pub fn variables(&self) -> &VariableModel {
        &self.variables
    }

    pub fn constraints(&self) -> &ConstraintStore {
        &self.constraints
    }

    /// Adds a constraint on top of the compiled ones, for example to fix part of a schedule.
    pub fn constrain(&mut self, formula: Formula) {
        self.constraints.add(ConstraintGroup::Additional, formula);
    }
}

/// Validates `instance` and compiles it into an [`Encoding`].
///
/// A malformed instance is rejected before any proposition is allocated.
pub fn compile(
    instance: &ProblemInstance,
    options: &PlannerOptions,
) -> Result<Encoding, InstanceError> {
    instance.validate()?;

    let mut compiler = ConstraintCompiler {
        instance,
        variables: VariableModel::allocate(instance),
        store: ConstraintStore::new(),
        exactly_one: options.exactly_one,
    };

    compiler.initial_placement();
    compiler.task_coverage();
    compiler.terminal_drop_off();
    compiler.single_location();
    compiler.travel_time();
    compiler.initial_pickup();
    compiler.holding_continuity();
    compiler.capacity();
    compiler.exclusive_holding();

    debug!(
        "Compiled {} constraints over {} propositions",
        compiler.store.len(),
        compiler.variables.len()
    );
    for (group, count) in compiler.store.count_by_group() {
        debug!("  {group}: {count}");
    }

    Ok(Encoding {
        variables: compiler.variables,
        constraints: compiler.store,
    })
}

struct ConstraintCompiler<'instance> {
    instance: &'instance ProblemInstance,
    variables: VariableModel,
    store: ConstraintStore,
    exactly_one: ExactlyOneEncoding,
}

impl ConstraintCompiler<'_> {
    fn at(&self, room: u32, robot: u32, time: u32) -> Formula {
        Formula::atom(self.variables.location(room, robot, time))
    }

    fn holds(&self, time: u32, robot: u32, task: u32) -> Formula {
        Formula::atom(self.variables.holding(time, robot, task))
    }

    fn initial_placement(&mut self) {
        let instance = self.instance;
        for robot in &instance.robots {
            let formula = self.at(robot.start, robot.id, 0);
            self.store.add(ConstraintGroup::InitialPlacement, formula);
        }
    }

    fn task_coverage(&mut self) {
        let instance = self.instance;
        for task in &instance.tasks {
            let formula = Formula::or(
                instance
                    .robots
                    .iter()
                    .cartesian_product(0..instance.horizon)
                    .map(|(robot, time)| self.holds(time, robot.id, task.id)),
            );
            self.store.add(ConstraintGroup::TaskCoverage, formula);
        }
    }

    fn terminal_drop_off(&mut self) {
        let instance = self.instance;
        for robot in &instance.robots {
            for task in &instance.tasks {
                let formula = Formula::negation(self.holds(instance.horizon, robot.id, task.id));
                self.store.add(ConstraintGroup::TerminalDropOff, formula);
            }
        }
    }

    fn single_location(&mut self) {
        let instance = self.instance;
        for time in instance.time_steps() {
            for robot in &instance.robots {
                let rooms = instance
                    .room_indices()
                    .map(|room| self.variables.location(room, robot.id, time))
                    .collect::<Vec<_>>();

                self.store.add(
                    ConstraintGroup::SingleLocation,
                    Formula::or(rooms.iter().copied().map(Formula::atom)),
                );
                self.at_most_one(ConstraintGroup::SingleLocation, &rooms);
            }
        }
    }

    fn at_most_one(&mut self, group: ConstraintGroup, propositions: &[Proposition]) {
        match self.exactly_one.for_domain_size(propositions.len()) {
            ExactlyOneEncoding::Sequential => {
                let formulas = exactly_one::sequential(propositions, &mut self.variables);
                self.store.extend(group, formulas);
            }
            _ => self.store.extend(group, exactly_one::pairwise(propositions)),
        }
    }

    fn travel_time(&mut self) {
        let instance = self.instance;
        for time in instance.time_steps() {
            for edge in &instance.edges {
                // An edge of weight w forbids arriving at the other endpoint during
                // [t + 1, t + w - 1]; the earliest arrival is t + w.
                let window_end = (u64::from(time) + u64::from(edge.weight))
                    .saturating_sub(1)
                    .min(u64::from(instance.horizon)) as u32;

                for later in time + 1..=window_end {
                    for robot in &instance.robots {
                        let forward = Formula::implies(
                            self.at(edge.start, robot.id, time),
                            Formula::negation(self.at(edge.end, robot.id, later)),
                        );
                        let backward = Formula::implies(
                            self.at(edge.end, robot.id, time),
                            Formula::negation(self.at(edge.start, robot.id, later)),
                        );
                        self.store
                            .extend(ConstraintGroup::TravelTime, [forward, backward]);
                    }
                }
            }
        }
    }

    fn initial_pickup(&mut self) {
        let instance = self.instance;
        for robot in &instance.robots {
            for task in &instance.tasks {
                let formula = Formula::implies(
                    self.holds(0, robot.id, task.id),
                    self.at(task.start, robot.id, 0),
                );
                self.store.add(ConstraintGroup::InitialPickup, formula);
            }
        }
    }

    fn holding_continuity(&mut self) {
        let instance = self.instance;
        for robot in &instance.robots {
            for task in &instance.tasks {
                self.forward_continuity(robot.id, task);
                self.backward_continuity(robot.id, task);
            }
        }
    }

    /// Holding a task means still holding it at the next time-step, or having arrived at its
    /// destination.
    fn forward_continuity(&mut self, robot: u32, task: &Task) {
        let horizon = self.instance.horizon;
        for time in 0..horizon {
            let formula = Formula::implies(
                self.holds(time, robot, task.id),
                Formula::or([
                    self.holds(time + 1, robot, task.id),
                    self.at(task.end, robot, time + 1),
                ]),
            );
            self.store.add(ConstraintGroup::ForwardContinuity, formula);
        }

        // Already implied by the terminal drop-off.
        if horizon >= 1 {
            let formula = Formula::implies(
                self.holds(horizon, robot, task.id),
                Formula::or([
                    self.holds(horizon - 1, robot, task.id),
                    self.at(task.end, robot, horizon),
                ]),
            );
            self.store.add(ConstraintGroup::ForwardContinuity, formula);
        }
    }

    /// Holding a task means having held it at the previous time-step, or picking it up now.
    fn backward_continuity(&mut self, robot: u32, task: &Task) {
        for time in 1..=self.instance.horizon {
            let formula = Formula::implies(
                self.holds(time, robot, task.id),
                Formula::or([
                    self.holds(time - 1, robot, task.id),
                    self.at(task.start, robot, time),
                ]),
            );
            self.store.add(ConstraintGroup::BackwardContinuity, formula);
        }
    }

    fn capacity(&mut self) {
        let instance = self.instance;
        for time in instance.time_steps() {
            for robot in &instance.robots {
                let formula = Formula::at_most(
                    instance
                        .tasks
                        .iter()
                        .map(|task| self.variables.holding(time, robot.id, task.id)),
                    instance.capacity,
                );
                self.store.add(ConstraintGroup::Capacity, formula);
            }
        }
    }

    fn exclusive_holding(&mut self) {
        let instance = self.instance;
        for time in instance.time_steps() {
            for task in &instance.tasks {
                let holders = instance
                    .robots
                    .iter()
                    .map(|robot| self.variables.holding(time, robot.id, task.id))
                    .collect::<Vec<_>>();
                self.store.extend(
                    ConstraintGroup::ExclusiveHolding,
                    exactly_one::pairwise(&holders),
                );
            }
        }
    }
}
