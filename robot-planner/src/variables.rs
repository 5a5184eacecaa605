//! The shared variable space of the encoding.
//!
//! Every fact the encoding reasons about is a [`PropositionKey`]; the [`VariableModel`] maps each
//! key to a dense [`Proposition`] handle. The textual name of a key (its [`Display`] output) embeds
//! all ids and the time-step, and [`PropositionKey::from_str`] recovers the key from the name.
//! This allows a model that only reports `(name, value)` pairs to be decoded again.

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use fnv::FnvHashMap;
use thiserror::Error;

use crate::ProblemInstance;

/// A handle to a proposition allocated by a [`VariableModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Proposition(u32);

impl Proposition {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The fact a proposition stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropositionKey {
    /// `robot` occupies `room` at `time`.
    Location { room: u32, robot: u32, time: u32 },
    /// `robot` holds `task` at `time`.
    Holding { time: u32, robot: u32, task: u32 },
    /// A helper introduced by an encoding; it carries no meaning in a schedule.
    Auxiliary { index: u32 },
}

impl PropositionKey {
    /// Whether the proposition is part of the schedule, as opposed to an encoding auxiliary.
    pub fn is_decision(&self) -> bool {
        !matches!(self, PropositionKey::Auxiliary { .. })
    }
}

impl Display for PropositionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PropositionKey::Location { room, robot, time } => {
                write!(f, "robotID{robot}_timeStep{time}_room{room}")
            }
            PropositionKey::Holding { time, robot, task } => {
                write!(f, "taskID{task}_timeStep{time}_robotID{robot}")
            }
            PropositionKey::Auxiliary { index } => write!(f, "aux{index}"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not the name of a proposition")]
pub struct ParseKeyError(String);

impl FromStr for PropositionKey {
    type Err = ParseKeyError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let error = || ParseKeyError(name.to_owned());

        // Splits `{prefix}{number}` and parses the number.
        let field = |part: Option<&str>, prefix: &str| -> Result<u32, ParseKeyError> {
            part.and_then(|part| part.strip_prefix(prefix))
                .and_then(|number| number.parse::<u32>().ok())
                .ok_or_else(error)
        };

        if let Some(index) = name.strip_prefix("aux") {
            return index
                .parse::<u32>()
                .map(|index| PropositionKey::Auxiliary { index })
                .map_err(|_| error());
        }

        let mut parts = name.split('_');
        let (first, second, third) = (parts.next(), parts.next(), parts.next());
        if parts.next().is_some() {
            return Err(error());
        }

        if name.starts_with("robotID") {
            Ok(PropositionKey::Location {
                robot: field(first, "robotID")?,
                time: field(second, "timeStep")?,
                room: field(third, "room")?,
            })
        } else if name.starts_with("taskID") {
            Ok(PropositionKey::Holding {
                task: field(first, "taskID")?,
                time: field(second, "timeStep")?,
                robot: field(third, "robotID")?,
            })
        } else {
            Err(error())
        }
    }
}

/// Allocates and looks up the propositions of one encoding.
///
/// Allocation is total over the domains of an instance and injective: every key receives exactly
/// one proposition and no two keys share one.
#[derive(Debug, Clone, Default)]
pub struct VariableModel {
    keys: Vec<PropositionKey>,
    handles: FnvHashMap<PropositionKey, Proposition>,
    num_auxiliaries: u32,
}

impl VariableModel {
    /// Allocates all location propositions, in `(room, robot, time)` order, followed by all
    /// holding propositions, in `(time, robot, task)` order.
    pub fn allocate(instance: &ProblemInstance) -> VariableModel {
        let mut model = VariableModel::default();

        for room in instance.room_indices() {
            for robot in &instance.robots {
                for time in instance.time_steps() {
                    let _ = model.insert(PropositionKey::Location {
                        room,
                        robot: robot.id,
                        time,
                    });
                }
            }
        }

        for time in instance.time_steps() {
            for robot in &instance.robots {
                for task in &instance.tasks {
                    let _ = model.insert(PropositionKey::Holding {
                        time,
                        robot: robot.id,
                        task: task.id,
                    });
                }
            }
        }

        model
    }

    /// Allocates a fresh auxiliary proposition.
    pub fn new_auxiliary(&mut self) -> Proposition {
        let index = self.num_auxiliaries;
        self.num_auxiliaries += 1;
        self.insert(PropositionKey::Auxiliary { index })
    }

    fn insert(&mut self, key: PropositionKey) -> Proposition {
        let proposition = Proposition(self.keys.len() as u32);
        self.keys.push(key);

        let previous = self.handles.insert(key, proposition);
        debug_assert!(previous.is_none(), "{key} was allocated twice");

        proposition
    }

    pub fn get(&self, key: &PropositionKey) -> Option<Proposition> {
        self.handles.get(key).copied()
    }

    /// The proposition stating that `robot` is in `room` at `time`, if the triple lies inside
    /// of the domains the model was allocated for.
    pub fn find_location(&self, room: u32, robot: u32, time: u32) -> Option<Proposition> {
        self.get(&PropositionKey::Location { room, robot, time })
    }

    /// The proposition stating that `robot` holds `task` at `time`, if the triple lies inside
    /// of the domains the model was allocated for.
    pub fn find_holding(&self, time: u32, robot: u32, task: u32) -> Option<Proposition> {
        self.get(&PropositionKey::Holding { time, robot, task })
    }

    /// Like [`VariableModel::find_location`], for triples known to be allocated.
    ///
    /// # Panics
    /// If the triple lies outside of the domains the model was allocated for.
    pub(crate) fn location(&self, room: u32, robot: u32, time: u32) -> Proposition {
        self.handle(PropositionKey::Location { room, robot, time })
    }

    /// Like [`VariableModel::find_holding`], for triples known to be allocated.
    ///
    /// # Panics
    /// If the triple lies outside of the domains the model was allocated for.
    pub(crate) fn holding(&self, time: u32, robot: u32, task: u32) -> Proposition {
        self.handle(PropositionKey::Holding { time, robot, task })
    }

    fn handle(&self, key: PropositionKey) -> Proposition {
        self.get(&key)
            .unwrap_or_else(|| panic!("no proposition was allocated for {key}"))
    }

    /// The fact `proposition` stands for; `None` if it was allocated by another model.
    pub fn key(&self, proposition: Proposition) -> Option<PropositionKey> {
        self.keys.get(proposition.index()).copied()
    }

    pub fn name(&self, proposition: Proposition) -> Option<String> {
        self.key(proposition).map(|key| key.to_string())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn num_auxiliaries(&self) -> usize {
        self.num_auxiliaries as usize
    }

    /// All propositions in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (Proposition, PropositionKey)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .map(|(index, &key)| (Proposition(index as u32), key))
    }
}
