use std::time::Duration;

use clap::ValueEnum;

/// The time the engine may spend on a single check when no other limit is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// How the "at most one room" half of the single-location constraint is encoded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExactlyOneEncoding {
    /// Forbid every unordered pair of rooms; quadratic in the number of rooms.
    #[default]
    Pairwise,
    /// The sequential counter of Sinz (2005); linear, but introduces auxiliary propositions.
    Sequential,
    /// Pairwise for small room counts, sequential otherwise.
    Auto,
}

impl ExactlyOneEncoding {
    /// Up to this many rooms [`ExactlyOneEncoding::Auto`] uses the pairwise encoding.
    pub const AUTO_PAIRWISE_THRESHOLD: usize = 6;

    /// Resolves [`ExactlyOneEncoding::Auto`] for a domain of `domain_size` propositions.
    pub(crate) fn for_domain_size(self, domain_size: usize) -> ExactlyOneEncoding {
        match self {
            ExactlyOneEncoding::Auto if domain_size <= Self::AUTO_PAIRWISE_THRESHOLD => {
                ExactlyOneEncoding::Pairwise
            }
            ExactlyOneEncoding::Auto => ExactlyOneEncoding::Sequential,
            encoding => encoding,
        }
    }
}

/// The options which influence how an instance is encoded and solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerOptions {
    /// The time budget of the engine; `None` lets it run until it reaches a verdict.
    pub timeout: Option<Duration>,
    pub exactly_one: ExactlyOneEncoding,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        PlannerOptions {
            timeout: Some(DEFAULT_TIMEOUT),
            exactly_one: ExactlyOneEncoding::default(),
        }
    }
}
