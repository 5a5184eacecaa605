use std::time::Duration;
use std::time::Instant;

/// Measures the wall-clock time spent in a phase of planning.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    time_start: Instant,
}

impl Stopwatch {
    pub fn starting_now() -> Stopwatch {
        Stopwatch {
            time_start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.time_start.elapsed()
    }

    /// The part of `budget` which is left; `None` if there is no budget.
    pub fn remaining(&self, budget: Option<Duration>) -> Option<Duration> {
        budget.map(|budget| budget.saturating_sub(self.elapsed()))
    }
}
