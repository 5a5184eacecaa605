//! Reads and writes planning instances in a line-oriented, DIMACS-like format:
//!
//! ```text
//! c a comment
//! p robots <rooms> <horizon> [capacity]
//! r <id> <start>
//! t <id> <start> <end>
//! e <start> <end> <weight>
//! ```
//!
//! The `p` header occurs exactly once and precedes every record. Blank lines and comments are
//! ignored. A parsed instance is validated before it is returned.
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;

use thiserror::Error;

use crate::InstanceError;
use crate::ProblemInstance;
use crate::Robot;
use crate::Task;
use crate::WeightedEdge;
use crate::DEFAULT_CAPACITY;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read instance")]
    Io(#[from] std::io::Error),

    #[error("missing 'p robots' header")]
    MissingHeader,

    #[error("line {line}: multiple headers found")]
    DuplicateHeader { line: usize },

    #[error("line {line}: '{header}' is an invalid header")]
    InvalidHeader { line: usize, header: String },

    #[error("line {line}: record found before the header")]
    RecordBeforeHeader { line: usize },

    #[error("line {line}: unknown record type '{kind}'")]
    UnknownRecord { line: usize, kind: String },

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: '{token}' is not a non-negative integer")]
    InvalidNumber { line: usize, token: String },

    #[error(transparent)]
    Invalid(#[from] InstanceError),
}

#[derive(Debug, Clone, Copy)]
struct Header {
    rooms: u32,
    horizon: u32,
    capacity: u32,
}

/// Parses and validates an instance from `source`.
pub fn parse_instance(source: impl Read) -> Result<ProblemInstance, ParseError> {
    let reader = BufReader::new(source);

    let mut header = None;
    let mut robots = vec![];
    let mut tasks = vec![];
    let mut edges = vec![];

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;

        let mut fields = line.split_whitespace();
        let Some(kind) = fields.next() else {
            continue;
        };
        if kind == "c" {
            continue;
        }

        let values = fields.collect::<Vec<_>>();
        if kind == "p" {
            if header.is_some() {
                return Err(ParseError::DuplicateHeader { line: line_number });
            }
            header = Some(parse_header(&values, &line, line_number)?);
            continue;
        }

        if header.is_none() {
            return Err(ParseError::RecordBeforeHeader { line: line_number });
        }

        match kind {
            "r" => {
                let [id, start] = numbers(&values, line_number)?;
                robots.push(Robot { id, start });
            }
            "t" => {
                let [id, start, end] = numbers(&values, line_number)?;
                tasks.push(Task { id, start, end });
            }
            "e" => {
                let [start, end, weight] = numbers(&values, line_number)?;
                edges.push(WeightedEdge { start, end, weight });
            }
            _ => {
                return Err(ParseError::UnknownRecord {
                    line: line_number,
                    kind: kind.to_owned(),
                })
            }
        }
    }

    let header = header.ok_or(ParseError::MissingHeader)?;
    let instance = ProblemInstance::new(robots, tasks, header.rooms, edges, header.horizon)
        .with_capacity(header.capacity);
    instance.validate()?;

    Ok(instance)
}

pub fn parse_instance_str(source: &str) -> Result<ProblemInstance, ParseError> {
    parse_instance(source.as_bytes())
}

/// Writes `instance` in the format accepted by [`parse_instance`].
pub fn write_instance(instance: &ProblemInstance, mut sink: impl Write) -> std::io::Result<()> {
    writeln!(
        sink,
        "p robots {} {} {}",
        instance.rooms, instance.horizon, instance.capacity
    )?;
    for robot in &instance.robots {
        writeln!(sink, "r {} {}", robot.id, robot.start)?;
    }
    for task in &instance.tasks {
        writeln!(sink, "t {} {} {}", task.id, task.start, task.end)?;
    }
    for edge in &instance.edges {
        writeln!(sink, "e {} {} {}", edge.start, edge.end, edge.weight)?;
    }
    Ok(())
}

fn parse_header(values: &[&str], line: &str, line_number: usize) -> Result<Header, ParseError> {
    let invalid = || ParseError::InvalidHeader {
        line: line_number,
        header: line.trim().to_owned(),
    };

    let Some((&"robots", numbers)) = values.split_first() else {
        return Err(invalid());
    };

    let numbers = numbers
        .iter()
        .map(|token| number(token, line_number))
        .collect::<Result<Vec<_>, _>>()?;

    match numbers.as_slice() {
        &[rooms, horizon] => Ok(Header {
            rooms,
            horizon,
            capacity: DEFAULT_CAPACITY,
        }),
        &[rooms, horizon, capacity] => Ok(Header {
            rooms,
            horizon,
            capacity,
        }),
        _ => Err(invalid()),
    }
}

fn numbers<const N: usize>(values: &[&str], line_number: usize) -> Result<[u32; N], ParseError> {
    if values.len() != N {
        return Err(ParseError::FieldCount {
            line: line_number,
            expected: N,
            found: values.len(),
        });
    }

    let mut numbers = [0; N];
    for (slot, token) in numbers.iter_mut().zip(values) {
        *slot = number(token, line_number)?;
    }
    Ok(numbers)
}

fn number(token: &str, line_number: usize) -> Result<u32, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidNumber {
        line: line_number,
        token: token.to_owned(),
    })
}
