//! Reports the size of an encoding and the effort spent on it as `{prefix} {name}={value}` lines.
//!
//! Nothing is written until [`configure_statistic_logging`] has been called; the first
//! configuration is the one which sticks.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::OnceLock;
use std::sync::RwLock;

use convert_case::Case;
use convert_case::Casing;

use crate::ConstraintStore;
use crate::VariableModel;

struct StatisticOptions {
    prefix: &'static str,
    casing: Option<Case>,
    writer: Box<dyn Write + Send + Sync>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("casing", &self.casing)
            .field("writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<RwLock<StatisticOptions>> = OnceLock::new();

/// Enables statistic logging with the given line prefix and name casing. Without a writer the
/// statistics go to stdout.
pub fn configure_statistic_logging(
    prefix: &'static str,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        RwLock::new(StatisticOptions {
            prefix,
            casing,
            writer: writer.unwrap_or_else(|| Box::new(stdout())),
        })
    });
}

pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}

pub fn log_statistic(name: impl Display, value: impl Display) {
    let Some(lock) = STATISTIC_OPTIONS.get() else {
        return;
    };
    let Ok(mut options) = lock.write() else {
        return;
    };

    let name = match options.casing {
        Some(casing) => name.to_string().to_case(casing),
        None => name.to_string(),
    };
    let prefix = options.prefix;
    let _ = writeln!(options.writer, "{prefix} {name}={value}");
}

/// Logs the number of propositions and, per constraint group, the number of formulas.
pub fn log_encoding_statistics(variables: &VariableModel, constraints: &ConstraintStore) {
    if !should_log_statistics() {
        return;
    }

    log_statistic("numPropositions", variables.len());
    log_statistic("numAuxiliaries", variables.num_auxiliaries());
    log_statistic("numFormulas", constraints.len());
    for (group, count) in constraints.count_by_group() {
        log_statistic(format!("{group:?}Formulas"), count);
    }
}
