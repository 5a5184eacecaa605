//! Decodes the assignments of a satisfiable outcome into a schedule and checks the schedule
//! against its instance independently of the encoding.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;

use itertools::Itertools;
use thiserror::Error;

use crate::Assignment;
use crate::ParseKeyError;
use crate::ProblemInstance;
use crate::PropositionKey;

/// Where every robot is and what it holds at each time-step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    horizon: u32,
    /// `(robot, time) -> room`
    locations: BTreeMap<(u32, u32), u32>,
    /// `(task, time) -> robots`
    holders: BTreeMap<(u32, u32), Vec<u32>>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error(transparent)]
    Name(#[from] ParseKeyError),

    #[error("robot {robot} is in rooms {first} and {second} at time {time}")]
    AmbiguousLocation {
        robot: u32,
        time: u32,
        first: u32,
        second: u32,
    },
}

/// A property of a valid schedule which a decoded schedule does not have.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleViolation {
    #[error("robot {robot} has no room at time {time}")]
    MissingLocation { robot: u32, time: u32 },

    #[error("robot {robot} starts in room {actual} instead of room {expected}")]
    WrongStart {
        robot: u32,
        expected: u32,
        actual: u32,
    },

    #[error("robot {robot} moves from room {from} at time {departure} to room {to} at time {arrival}, faster than the edge allows")]
    TravelTooFast {
        robot: u32,
        from: u32,
        to: u32,
        departure: u32,
        arrival: u32,
    },

    #[error("robot {robot} holds {held} tasks at time {time}, but its capacity is {capacity}")]
    CapacityExceeded {
        robot: u32,
        time: u32,
        held: usize,
        capacity: u32,
    },

    #[error("task {task} is held by robots {robots:?} at time {time}")]
    SharedTask {
        task: u32,
        time: u32,
        robots: Vec<u32>,
    },

    #[error("task {task} is never held before the horizon")]
    TaskNotCovered { task: u32 },

    #[error("task {task} is still held at the horizon")]
    HeldAtHorizon { task: u32 },

    #[error("robot {robot} picks up task {task} at time {time} outside of room {source_room}")]
    PickupOutsideSource {
        task: u32,
        robot: u32,
        time: u32,
        source_room: u32,
    },

    #[error("robot {robot} drops task {task} at time {time} outside of room {destination}")]
    DropOutsideDestination {
        task: u32,
        robot: u32,
        time: u32,
        destination: u32,
    },
}

impl Schedule {
    /// Builds the schedule from the true location and holding assignments; auxiliary and false
    /// assignments are ignored.
    pub fn decode(assignments: &[Assignment]) -> Result<Schedule, DecodeError> {
        let mut schedule = Schedule::default();

        for assignment in assignments {
            let key = assignment.name.parse::<PropositionKey>()?;
            if !assignment.value {
                continue;
            }

            match key {
                PropositionKey::Location { room, robot, time } => {
                    schedule.horizon = schedule.horizon.max(time);
                    if let Some(&first) = schedule.locations.get(&(robot, time)) {
                        return Err(DecodeError::AmbiguousLocation {
                            robot,
                            time,
                            first,
                            second: room,
                        });
                    }
                    let _ = schedule.locations.insert((robot, time), room);
                }
                PropositionKey::Holding { time, robot, task } => {
                    schedule.horizon = schedule.horizon.max(time);
                    schedule.holders.entry((task, time)).or_default().push(robot);
                }
                PropositionKey::Auxiliary { .. } => {}
            }
        }

        Ok(schedule)
    }

    /// The last time-step which appears in the schedule.
    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    pub fn room_of(&self, robot: u32, time: u32) -> Option<u32> {
        self.locations.get(&(robot, time)).copied()
    }

    /// The robots which hold `task` at `time`.
    pub fn holders(&self, task: u32, time: u32) -> &[u32] {
        self.holders
            .get(&(task, time))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The tasks which `robot` holds at `time`, in increasing order.
    pub fn held_by(&self, robot: u32, time: u32) -> Vec<u32> {
        self.holders
            .iter()
            .filter(|((_, other_time), robots)| *other_time == time && robots.contains(&robot))
            .map(|((task, _), _)| *task)
            .collect()
    }

    fn holds(&self, robot: u32, task: u32, time: u32) -> bool {
        self.holders(task, time).contains(&robot)
    }

    /// Checks every property a schedule of `instance` has to satisfy, reporting the first
    /// violation found.
    pub fn verify(&self, instance: &ProblemInstance) -> Result<(), ScheduleViolation> {
        self.verify_locations(instance)?;
        self.verify_travel(instance)?;
        self.verify_holding(instance)?;
        self.verify_tasks(instance)
    }

    fn verify_locations(&self, instance: &ProblemInstance) -> Result<(), ScheduleViolation> {
        for robot in &instance.robots {
            for time in instance.time_steps() {
                let room = self
                    .room_of(robot.id, time)
                    .ok_or(ScheduleViolation::MissingLocation {
                        robot: robot.id,
                        time,
                    })?;

                if time == 0 && room != robot.start {
                    return Err(ScheduleViolation::WrongStart {
                        robot: robot.id,
                        expected: robot.start,
                        actual: room,
                    });
                }
            }
        }
        Ok(())
    }

    fn verify_travel(&self, instance: &ProblemInstance) -> Result<(), ScheduleViolation> {
        for robot in &instance.robots {
            for edge in &instance.edges {
                for departure in instance.time_steps() {
                    let last_forbidden = (u64::from(departure) + u64::from(edge.weight))
                        .saturating_sub(1)
                        .min(u64::from(instance.horizon)) as u32;

                    for arrival in departure + 1..=last_forbidden {
                        let from = self.room_of(robot.id, departure);
                        let to = self.room_of(robot.id, arrival);

                        for (start, end) in [(edge.start, edge.end), (edge.end, edge.start)] {
                            if from == Some(start) && to == Some(end) {
                                return Err(ScheduleViolation::TravelTooFast {
                                    robot: robot.id,
                                    from: start,
                                    to: end,
                                    departure,
                                    arrival,
                                });
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn verify_holding(&self, instance: &ProblemInstance) -> Result<(), ScheduleViolation> {
        for time in instance.time_steps() {
            for robot in &instance.robots {
                let held = self.held_by(robot.id, time).len();
                if held > instance.capacity as usize {
                    return Err(ScheduleViolation::CapacityExceeded {
                        robot: robot.id,
                        time,
                        held,
                        capacity: instance.capacity,
                    });
                }
            }

            for task in &instance.tasks {
                let robots = self.holders(task.id, time);
                if robots.len() > 1 {
                    return Err(ScheduleViolation::SharedTask {
                        task: task.id,
                        time,
                        robots: robots.to_vec(),
                    });
                }
            }
        }
        Ok(())
    }

    fn verify_tasks(&self, instance: &ProblemInstance) -> Result<(), ScheduleViolation> {
        let horizon = instance.horizon;

        for task in &instance.tasks {
            if !(0..horizon).any(|time| !self.holders(task.id, time).is_empty()) {
                return Err(ScheduleViolation::TaskNotCovered { task: task.id });
            }
            if !self.holders(task.id, horizon).is_empty() {
                return Err(ScheduleViolation::HeldAtHorizon { task: task.id });
            }

            for robot in &instance.robots {
                for time in instance.time_steps() {
                    if !self.holds(robot.id, task.id, time) {
                        continue;
                    }

                    let is_pickup = time == 0 || !self.holds(robot.id, task.id, time - 1);
                    if is_pickup && self.room_of(robot.id, time) != Some(task.start) {
                        return Err(ScheduleViolation::PickupOutsideSource {
                            task: task.id,
                            robot: robot.id,
                            time,
                            source_room: task.start,
                        });
                    }

                    let is_drop = time < horizon && !self.holds(robot.id, task.id, time + 1);
                    if is_drop && self.room_of(robot.id, time + 1) != Some(task.end) {
                        return Err(ScheduleViolation::DropOutsideDestination {
                            task: task.id,
                            robot: robot.id,
                            time: time + 1,
                            destination: task.end,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl Display for Schedule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let robots = self
            .locations
            .keys()
            .map(|&(robot, _)| robot)
            .unique()
            .collect::<Vec<_>>();

        for time in 0..=self.horizon {
            write!(f, "t={time}")?;
            for &robot in &robots {
                match self.room_of(robot, time) {
                    Some(room) => write!(f, " robot{robot}@room{room}")?,
                    None => write!(f, " robot{robot}@?")?,
                }
                let held = self.held_by(robot, time);
                if !held.is_empty() {
                    write!(f, "[{}]", held.iter().map(|task| format!("task{task}")).join(","))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Robot;
    use crate::Task;
    use crate::WeightedEdge;

    /// One robot in rooms 0..=2, moving 0 -> 1 -> 1 -> 0 and carrying task 0 from room 1 to
    /// room 0.
    fn instance() -> ProblemInstance {
        ProblemInstance::new(
            vec![Robot { id: 0, start: 0 }],
            vec![Task {
                id: 0,
                start: 1,
                end: 0,
            }],
            2,
            vec![WeightedEdge {
                start: 0,
                end: 1,
                weight: 1,
            }],
            3,
        )
    }

    fn assignments(rooms: &[u32], holding: &[u32]) -> Vec<Assignment> {
        let locations = rooms.iter().enumerate().map(|(time, &room)| Assignment {
            name: PropositionKey::Location {
                room,
                robot: 0,
                time: time as u32,
            }
            .to_string(),
            value: true,
        });
        let holdings = holding.iter().map(|&time| Assignment {
            name: PropositionKey::Holding {
                time,
                robot: 0,
                task: 0,
            }
            .to_string(),
            value: true,
        });
        locations.chain(holdings).collect()
    }

    #[test]
    fn valid_schedule_is_accepted() {
        let schedule = Schedule::decode(&assignments(&[0, 1, 1, 0], &[1, 2])).unwrap();

        assert_eq!(schedule.horizon(), 3);
        assert_eq!(schedule.room_of(0, 1), Some(1));
        assert_eq!(schedule.holders(0, 2), &[0]);
        assert_eq!(schedule.held_by(0, 1), vec![0]);
        assert_eq!(schedule.verify(&instance()), Ok(()));
    }

    #[test]
    fn false_assignments_are_ignored() {
        let mut assignments = assignments(&[0, 1, 1, 0], &[1, 2]);
        assignments.push(Assignment {
            name: "robotID0_timeStep1_room2".to_owned(),
            value: false,
        });

        let schedule = Schedule::decode(&assignments).unwrap();
        assert_eq!(schedule.room_of(0, 1), Some(1));
    }

    #[test]
    fn two_rooms_at_once_cannot_be_decoded() {
        let mut assignments = assignments(&[0, 1, 1, 0], &[]);
        assignments.push(Assignment {
            name: "robotID0_timeStep1_room2".to_owned(),
            value: true,
        });

        assert_eq!(
            Schedule::decode(&assignments),
            Err(DecodeError::AmbiguousLocation {
                robot: 0,
                time: 1,
                first: 1,
                second: 2
            })
        );
    }

    #[test]
    fn uncovered_tasks_are_reported() {
        let schedule = Schedule::decode(&assignments(&[0, 1, 1, 0], &[])).unwrap();

        assert_eq!(
            schedule.verify(&instance()),
            Err(ScheduleViolation::TaskNotCovered { task: 0 })
        );
    }

    #[test]
    fn pickup_must_happen_in_the_source_room() {
        let schedule = Schedule::decode(&assignments(&[0, 1, 1, 0], &[0, 1, 2])).unwrap();

        assert_eq!(
            schedule.verify(&instance()),
            Err(ScheduleViolation::PickupOutsideSource {
                task: 0,
                robot: 0,
                time: 0,
                source_room: 1
            })
        );
    }

    #[test]
    fn drop_must_happen_in_the_destination_room() {
        let schedule = Schedule::decode(&assignments(&[0, 1, 1, 0], &[1])).unwrap();

        assert_eq!(
            schedule.verify(&instance()),
            Err(ScheduleViolation::DropOutsideDestination {
                task: 0,
                robot: 0,
                time: 2,
                destination: 0
            })
        );
    }

    #[test]
    fn travel_time_is_respected() {
        let mut instance = instance();
        instance.edges[0].weight = 2;
        let schedule = Schedule::decode(&assignments(&[0, 1, 1, 0], &[1, 2])).unwrap();

        assert_eq!(
            schedule.verify(&instance),
            Err(ScheduleViolation::TravelTooFast {
                robot: 0,
                from: 0,
                to: 1,
                departure: 0,
                arrival: 1
            })
        );
    }

    #[test]
    fn wrong_start_is_reported() {
        let schedule = Schedule::decode(&assignments(&[1, 1, 1, 0], &[1, 2])).unwrap();

        assert_eq!(
            schedule.verify(&instance()),
            Err(ScheduleViolation::WrongStart {
                robot: 0,
                expected: 0,
                actual: 1
            })
        );
    }

    #[test]
    fn schedule_is_rendered_per_time_step() {
        let schedule = Schedule::decode(&assignments(&[0, 1, 1, 0], &[1, 2])).unwrap();

        assert_eq!(
            schedule.to_string(),
            "t=0 robot0@room0\nt=1 robot0@room1[task0]\nt=2 robot0@room1[task0]\nt=3 robot0@room0\n"
        );
    }
}
