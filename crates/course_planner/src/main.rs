use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use course_planner::config::PlannerConfig;
use course_planner::search::{QueryIntent, SearchParams};
use course_planner::selection::Selection;
use course_planner::timecode::PeriodTable;
use course_planner::{
    check_schedule_conflict, format_conflict_message, parse_course_time, Course, PlannerError,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a raw class_time code and print its entries as JSON
    Parse { raw: String },

    /// Check one course against every other course in a file
    Check {
        /// JSON array of course records
        #[arg(long)]
        courses: PathBuf,
        /// Code of the course to check
        #[arg(long)]
        candidate: String,
    },

    /// Build a schedule from every course in a file and print its timetable
    Timetable {
        #[arg(long)]
        courses: PathBuf,
        /// JSON period table, overrides PLANNER_PERIOD_TABLE
        #[arg(long)]
        period_table: Option<PathBuf>,
    },

    /// Print the codes of matching courses
    Search {
        #[arg(long)]
        courses: PathBuf,
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        teacher: Option<String>,
    },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = PlannerConfig::load()?;

    match args.command {
        Command::Parse { raw } => {
            let entries = parse_course_time(&raw);
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Command::Check { courses, candidate } => run_check(&courses, &candidate)?,
        Command::Timetable {
            courses,
            period_table,
        } => {
            let table = match period_table {
                Some(path) => PeriodTable::load_from_file(&path)?,
                None => config.period_table()?,
            };
            run_timetable(&courses, &table, config.max_selected)?;
        }
        Command::Search {
            courses,
            keyword,
            code,
            name,
            teacher,
        } => {
            let params = SearchParams {
                keyword,
                course_code: code,
                course_name: name,
                teacher,
            };
            run_search(&courses, &params)?;
        }
    }

    Ok(())
}

fn load_courses(path: &Path) -> Result<Vec<Course>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read courses from {}", path.display()))?;
    let courses: Vec<Course> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse courses in {}", path.display()))?;

    info!("Loaded {} courses from {}", courses.len(), path.display());
    Ok(courses)
}

fn run_check(path: &Path, candidate_code: &str) -> Result<()> {
    let courses = load_courses(path)?;
    let Some(candidate) = courses.iter().find(|c| c.course_code == candidate_code) else {
        bail!("Course {candidate_code} not found in {}", path.display());
    };

    let info = check_schedule_conflict(&courses, candidate);
    println!("{}", serde_json::to_string_pretty(&info)?);

    let message = format_conflict_message(&info);
    if message.is_empty() {
        info!("{candidate_code} has no conflicts");
    } else {
        println!("{message}");
    }
    Ok(())
}

fn run_timetable(path: &Path, table: &PeriodTable, max_selected: usize) -> Result<()> {
    let courses = load_courses(path)?;
    let mut selection = Selection::new(max_selected);

    for course in courses {
        let code = course.course_code.clone();
        match selection.try_add(course.clone()) {
            Ok(()) => {}
            Err(PlannerError::ScheduleConflict { message, .. }) => {
                warn!("{code} kept despite conflict: {message}");
                selection.force_add(course)?;
            }
            Err(e) if e.is_selection_error() => warn!("Skipping {code}: {e}"),
            Err(e) => return Err(e.into()),
        }
    }

    for course in selection.courses() {
        println!("{} {}", course.course_code, course.course_name);
        match course.class_time() {
            Some(class_time) => {
                for entry in parse_course_time(class_time) {
                    println!("  {}", table.describe_entry(&entry));
                }
            }
            None => println!("  (no fixed meeting time)"),
        }
    }

    println!();
    for ((day, period), codes) in selection.weekly_grid() {
        println!("{}第{}節: {}", day.long_label(), period, codes.join(", "));
    }

    println!();
    println!("share key: {}", selection.share_key().as_str());
    Ok(())
}

fn run_search(path: &Path, params: &SearchParams) -> Result<()> {
    let courses = load_courses(path)?;
    let filter = QueryIntent::from_params(params).compile()?;

    for course in filter.filter(&courses) {
        println!("{}\t{}", course.course_code, course.course_name);
    }
    Ok(())
}
