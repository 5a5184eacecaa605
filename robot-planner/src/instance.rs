use std::ops::RangeInclusive;

use fnv::FnvHashSet;
use thiserror::Error;

/// The capacity of a robot when none is specified.
pub const DEFAULT_CAPACITY: u32 = 1;

/// A robot together with the room it occupies at time 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Robot {
    pub id: u32,
    pub start: u32,
}

/// A unit of work which has to be carried from the room `start` to the room `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Task {
    pub id: u32,
    pub start: u32,
    pub end: u32,
}

/// An undirected connection between two rooms. Moving from one endpoint to the other takes at
/// least `weight` time-steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeightedEdge {
    pub start: u32,
    pub end: u32,
    pub weight: u32,
}

/// A complete planning problem.
///
/// Rooms are identified by their index in `[0, rooms]`; the top index `rooms` is an extra room
/// which is always part of the location domain of a robot (see [`ProblemInstance::reserved_room`]).
/// Time ranges over `[0, horizon]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemInstance {
    pub robots: Vec<Robot>,
    pub tasks: Vec<Task>,
    pub rooms: u32,
    pub edges: Vec<WeightedEdge>,
    pub horizon: u32,
    pub capacity: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstanceError {
    #[error("robot {robot} starts in room {room}, but rooms range over [0, {max_room}]")]
    RobotStartOutOfRange { robot: u32, room: u32, max_room: u32 },

    #[error("task {task} refers to room {room}, but rooms range over [0, {max_room}]")]
    TaskRoomOutOfRange { task: u32, room: u32, max_room: u32 },

    #[error("edge ({start}, {end}) refers to a room outside of [0, {max_room}]")]
    EdgeOutOfRange { start: u32, end: u32, max_room: u32 },

    #[error("edge ({room}, {room}) with weight {weight} would forbid staying in room {room}")]
    SelfLoop { room: u32, weight: u32 },

    #[error("robot id {0} is used more than once")]
    DuplicateRobot(u32),

    #[error("task id {0} is used more than once")]
    DuplicateTask(u32),
}

impl ProblemInstance {
    /// Creates an instance where every robot has the [`DEFAULT_CAPACITY`].
    pub fn new(
        robots: Vec<Robot>,
        tasks: Vec<Task>,
        rooms: u32,
        edges: Vec<WeightedEdge>,
        horizon: u32,
    ) -> ProblemInstance {
        ProblemInstance {
            robots,
            tasks,
            rooms,
            edges,
            horizon,
            capacity: DEFAULT_CAPACITY,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> ProblemInstance {
        self.capacity = capacity;
        self
    }

    /// The extra room which is part of every location domain.
    ///
    /// A robot may start there, but nothing connects it to the other rooms unless an edge says
    /// so.
    pub fn reserved_room(&self) -> u32 {
        self.rooms
    }

    /// All room indices, including the [reserved room](ProblemInstance::reserved_room).
    pub fn room_indices(&self) -> RangeInclusive<u32> {
        0..=self.rooms
    }

    pub fn time_steps(&self) -> RangeInclusive<u32> {
        0..=self.horizon
    }

    /// Checks that every room reference lies in `[0, rooms]` and that ids are unique.
    ///
    /// An edge from a room to itself is only accepted with a weight of at most 1, since it
    /// otherwise forbids a robot in that room from being there one time-step later.
    pub fn validate(&self) -> Result<(), InstanceError> {
        let max_room = self.rooms;
        let in_range = |room: u32| room <= max_room;

        let mut robot_ids = FnvHashSet::default();
        for robot in &self.robots {
            if !robot_ids.insert(robot.id) {
                return Err(InstanceError::DuplicateRobot(robot.id));
            }
            if !in_range(robot.start) {
                return Err(InstanceError::RobotStartOutOfRange {
                    robot: robot.id,
                    room: robot.start,
                    max_room,
                });
            }
        }

        let mut task_ids = FnvHashSet::default();
        for task in &self.tasks {
            if !task_ids.insert(task.id) {
                return Err(InstanceError::DuplicateTask(task.id));
            }
            if let Some(room) = [task.start, task.end].into_iter().find(|&room| !in_range(room)) {
                return Err(InstanceError::TaskRoomOutOfRange {
                    task: task.id,
                    room,
                    max_room,
                });
            }
        }

        if let Some(edge) = self
            .edges
            .iter()
            .find(|edge| !in_range(edge.start) || !in_range(edge.end))
        {
            return Err(InstanceError::EdgeOutOfRange {
                start: edge.start,
                end: edge.end,
                max_room,
            });
        }

        if let Some(edge) = self
            .edges
            .iter()
            .find(|edge| edge.start == edge.end && edge.weight > 1)
        {
            return Err(InstanceError::SelfLoop {
                room: edge.start,
                weight: edge.weight,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> ProblemInstance {
        ProblemInstance::new(
            vec![Robot { id: 0, start: 0 }, Robot { id: 1, start: 2 }],
            vec![Task {
                id: 7,
                start: 1,
                end: 2,
            }],
            2,
            vec![WeightedEdge {
                start: 0,
                end: 1,
                weight: 2,
            }],
            4,
        )
    }

    #[test]
    fn default_capacity_is_one() {
        assert_eq!(instance().capacity, 1);
        assert_eq!(instance().with_capacity(3).capacity, 3);
    }

    #[test]
    fn reserved_room_is_a_valid_location() {
        let instance = instance();
        assert_eq!(instance.reserved_room(), 2);
        assert!(instance.room_indices().contains(&2));
        assert_eq!(instance.validate(), Ok(()));
    }

    #[test]
    fn robot_outside_of_rooms_is_rejected() {
        let mut instance = instance();
        instance.robots[1].start = 3;

        assert_eq!(
            instance.validate(),
            Err(InstanceError::RobotStartOutOfRange {
                robot: 1,
                room: 3,
                max_room: 2
            })
        );
    }

    #[test]
    fn task_destination_outside_of_rooms_is_rejected() {
        let mut instance = instance();
        instance.tasks[0].end = 10;

        assert_eq!(
            instance.validate(),
            Err(InstanceError::TaskRoomOutOfRange {
                task: 7,
                room: 10,
                max_room: 2
            })
        );
    }

    #[test]
    fn edge_outside_of_rooms_is_rejected() {
        let mut instance = instance();
        instance.edges.push(WeightedEdge {
            start: 5,
            end: 0,
            weight: 1,
        });

        assert_eq!(
            instance.validate(),
            Err(InstanceError::EdgeOutOfRange {
                start: 5,
                end: 0,
                max_room: 2
            })
        );
    }

    #[test]
    fn heavy_self_loop_is_rejected() {
        let mut instance = instance();
        instance.edges.push(WeightedEdge {
            start: 1,
            end: 1,
            weight: 1,
        });
        assert_eq!(instance.validate(), Ok(()));

        instance.edges.push(WeightedEdge {
            start: 1,
            end: 1,
            weight: 2,
        });
        assert_eq!(
            instance.validate(),
            Err(InstanceError::SelfLoop { room: 1, weight: 2 })
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut instance = instance();
        instance.robots[1].id = 0;
        assert_eq!(instance.validate(), Err(InstanceError::DuplicateRobot(0)));

        let mut instance = self::instance();
        instance.tasks.push(instance.tasks[0]);
        assert_eq!(instance.validate(), Err(InstanceError::DuplicateTask(7)));
    }
}
