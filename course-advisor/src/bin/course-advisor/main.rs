mod input;
mod result;

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use course_advisor::advisor_asserts::ADVISOR_ASSERT_LEVEL_DEFINITION;
use course_advisor::advisor_asserts::ADVISOR_ASSERT_MODERATE;
use course_advisor::convert_case::Case;
use course_advisor::generation::GeneratorOptions;
use course_advisor::generation::DEFAULT_GENERATOR_MAX_CREDITS;
use course_advisor::plan::Plan;
use course_advisor::plan::StudentContext;
use course_advisor::solver::solve_curriculum;
use course_advisor::solver::SolveMode;
use course_advisor::statistics::configure_statistic_logging;
use course_advisor::validation::ValidationOptions;
use course_advisor::validation::DEFAULT_HARD_MAX_CREDITS;
use course_advisor::validation::DEFAULT_MAX_CREDITS;
use course_advisor::PlanGenerator;
use course_advisor::PlanValidator;
use input::read_catalog;
use input::read_curriculum;
use input::read_json;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use result::AdvisorResult;

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
    #[command(subcommand)]
    command: Command,

    /// The course catalog, a JSON file with a list of `courses` and a list of `equivalences`.
    #[arg(long, global = true, default_value = "catalog.json")]
    catalog: PathBuf,

    /// The curriculum the plan is checked against, as a JSON block tree with its fillers and
    /// multiplicities.
    #[arg(long, global = true, default_value = "curriculum.json")]
    curriculum: PathBuf,

    /// The plan to validate or to complete, as JSON.
    #[arg(long, global = true, default_value = "plan.json")]
    plan: PathBuf,

    /// The student's progress: the current semester and the officially passed courses.
    ///
    /// Semesters before the current one are treated as history and are not checked for terms or
    /// prerequisites.
    #[arg(long, global = true)]
    student: Option<PathBuf>,

    /// Enables debug logging.
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Logs the statistics of the validator and the generator on exit.
    #[arg(short = 's', long = "log-statistics", global = true)]
    log_statistics: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Checks the plan and prints the diagnostics as JSON.
    Validate {
        /// Semesters above this many credits get a warning.
        #[arg(long, default_value_t = DEFAULT_MAX_CREDITS)]
        max_credits: u32,

        /// Semesters above this many credits are an error.
        #[arg(long, default_value_t = DEFAULT_HARD_MAX_CREDITS)]
        hard_max_credits: u32,

        /// Skips the curriculum checks.
        #[arg(long)]
        skip_curriculum: bool,

        /// Writes the solved curriculum as a Graphviz graph to this path.
        #[arg(long)]
        dot: Option<PathBuf>,
    },
    /// Completes the plan with the semesters needed to fulfil the curriculum and prints it as
    /// JSON.
    Generate {
        /// A plan whose choices for equivalences are carried over to the recommendation.
        #[arg(long)]
        reference: Option<PathBuf>,

        /// The recommended credit load of a generated semester.
        #[arg(long, default_value_t = DEFAULT_GENERATOR_MAX_CREDITS)]
        max_credits: u32,
    },
}

fn configure_logging(verbose: bool, log_statistics: bool) {
    if log_statistics {
        configure_statistic_logging(
            "% stat:",
            None,
            Some(Case::Camel),
            Some(Box::new(std::io::stderr())),
        );
    }
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| writeln!(buf, "% {}", record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
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

fn run() -> AdvisorResult<()> {
    let args = Args::parse();
    configure_logging(args.verbose, args.log_statistics);

    if ADVISOR_ASSERT_LEVEL_DEFINITION >= ADVISOR_ASSERT_MODERATE {
        warn!(
            "Potential performance degradation: the assert level is set to {ADVISOR_ASSERT_LEVEL_DEFINITION}, meaning many debug asserts are active."
        );
    }

    let catalog = read_catalog(&args.catalog)?;
    let curriculum = read_curriculum(&args.curriculum, &catalog)?;
    let plan: Plan = read_json(&args.plan)?;
    let student = args
        .student
        .as_deref()
        .map(read_json::<StudentContext>)
        .transpose()?;

    match args.command {
        Command::Validate {
            max_credits,
            hard_max_credits,
            skip_curriculum,
            dot,
        } => {
            let mut validator = PlanValidator::new(ValidationOptions {
                max_credits,
                hard_max_credits,
                check_curriculum: !skip_curriculum,
            });
            let result = validator.validate(&plan, &catalog, &curriculum, student.as_ref());
            println!("{}", serde_json::to_string_pretty(&result)?);

            if let Some(path) = dot {
                let solved = solve_curriculum(&curriculum, &catalog, &plan, SolveMode::TakenOnly);
                write_output(&path, &solved.to_dot(&curriculum))?;
            }
            if args.log_statistics {
                validator.log_statistics();
            }
        }
        Command::Generate {
            reference,
            max_credits,
        } => {
            let reference = reference
                .as_deref()
                .map(read_json::<Plan>)
                .transpose()?;
            let mut generator = PlanGenerator::new(GeneratorOptions {
                max_credits,
                ..GeneratorOptions::default()
            });
            let recommended = generator.generate(
                &plan,
                &catalog,
                &curriculum,
                reference.as_ref(),
                student.as_ref(),
            );
            println!("{}", serde_json::to_string_pretty(&recommended)?);

            if args.log_statistics {
                generator.log_statistics();
            }
        }
    }

    Ok(())
}

fn write_output(path: &Path, contents: &str) -> AdvisorResult<()> {
    std::fs::write(path, contents)?;
    info!("Wrote {}", path.display());
    Ok(())
}
