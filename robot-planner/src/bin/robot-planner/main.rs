mod result;

use std::fs::File;
use std::io::stdout;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use convert_case::Case;
use log::error;
use log::info;
use log::LevelFilter;
use result::CliError;
use result::CliResult;
use robot_planner::parser::parse_instance;
use robot_planner::statistics::configure_statistic_logging;
use robot_planner::ExactlyOneEncoding;
use robot_planner::PlannerOptions;
use robot_planner::Schedule;
use robot_planner::SolveOutcome;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The instance to plan for, given in the robots format:
    ///  - 'c <text>' is a comment,
    ///  - 'p robots <rooms> <horizon> [capacity]' is the header,
    ///  - 'r <id> <start>' is a robot,
    ///  - 't <id> <start> <end>' is a task,
    ///  - 'e <start> <end> <weight>' is an edge.
    #[clap(verbatim_doc_comment)]
    instance_path: PathBuf,

    /// The time budget for planning, given in milliseconds. A budget of 0 means no limit.
    ///
    /// Possible values: u64
    #[arg(
        short = 't',
        long = "time-limit",
        default_value_t = 600_000,
        verbatim_doc_comment
    )]
    time_limit: u64,

    /// How "every robot is in at most one room" is encoded.
    #[arg(long = "exactly-one", value_enum, default_value_t)]
    exactly_one: ExactlyOneEncoding,

    /// Overrides the capacity given in the instance file.
    ///
    /// Possible values: u32 (Optional)
    #[arg(long = "capacity", verbatim_doc_comment)]
    capacity: Option<u32>,

    /// Prints the schedule, one line per time-step, after the assignments.
    ///
    /// Possible values: bool
    #[arg(long = "schedule", verbatim_doc_comment)]
    schedule: bool,

    /// Checks the schedule against the instance and fails if it is invalid.
    ///
    /// Possible values: bool
    #[arg(long = "verify", verbatim_doc_comment)]
    verify: bool,

    /// Enables log message output.
    ///
    /// Possible values: bool
    #[arg(short = 'v', long = "verbose", verbatim_doc_comment)]
    verbose: bool,

    /// Enables logging of statistics about the encoding and the solve.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "log-statistics", verbatim_doc_comment)]
    log_statistics: bool,
}

fn configure_logging(verbose: bool, log_statistics: bool) {
    if log_statistics {
        configure_statistic_logging("c", Some(Case::Camel), None);
    }
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| writeln!(buf, "c {}", record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> CliResult<()> {
    let args = Args::parse();
    configure_logging(args.verbose, args.log_statistics);

    let mut instance =
        parse_instance(File::open(&args.instance_path)?).map_err(|source| {
            CliError::InvalidInstance {
                path: args.instance_path.display().to_string(),
                source,
            }
        })?;
    if let Some(capacity) = args.capacity {
        instance = instance.with_capacity(capacity);
    }

    let options = PlannerOptions {
        timeout: (args.time_limit > 0).then_some(Duration::from_millis(args.time_limit)),
        exactly_one: args.exactly_one,
    };

    let outcome = robot_planner::plan(&instance, &options)?;
    print_outcome(&outcome)?;

    if outcome.is_satisfiable() && (args.schedule || args.verify) {
        let schedule = Schedule::decode(outcome.assignments())?;
        if args.schedule {
            let mut out = stdout().lock();
            for line in schedule.to_string().lines() {
                writeln!(out, "c {line}")?;
            }
        }
        if args.verify {
            schedule.verify(&instance)?;
            info!("The schedule satisfies the instance");
        }
    }

    Ok(())
}

fn print_outcome(outcome: &SolveOutcome) -> std::io::Result<()> {
    let mut out = BufWriter::new(stdout().lock());
    writeln!(out, "s {}", outcome.status())?;
    for line in outcome.lines() {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
