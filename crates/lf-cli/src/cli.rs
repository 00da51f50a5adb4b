//! CLI argument definitions using clap derive API

use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Lateflow - late-arrival strike counting and penalty tooling
#[derive(Parser, Debug)]
#[command(name = "lf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override database path from the config
    #[arg(short, long, global = true)]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new Lateflow project
    Init(InitArgs),

    /// Show or change the late penalty policy
    Policy(PolicyArgs),

    /// Import attendance records from a CSV file
    Seed(SeedArgs),

    /// Save one attendance record and derive its strike fields
    Record(RecordArgs),

    /// Show an employee's late status as of a date
    Status(StatusArgs),

    /// Count an employee's late arrivals as of a date
    Count(CountArgs),

    /// Recompute strike fields for every record from a date forward
    Reprocess(ReprocessArgs),

    /// Summarize late arrivals for a month
    Report(ReportArgs),
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project name (also the directory created)
    pub name: String,

    /// Database file path written into lateflow.yml
    #[arg(long, default_value = "lateflow.duckdb")]
    pub database_path: String,
}

/// Arguments for the policy command
#[derive(Args, Debug)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommands,
}

/// Policy subcommands
#[derive(Subcommand, Debug)]
pub enum PolicyCommands {
    /// Print the saved policy
    Show(PolicyShowArgs),

    /// Validate and save a policy from a YAML file or flags
    Set(PolicySetArgs),

    /// Turn late penalties off, keeping the other settings
    Disable,
}

/// Arguments for `policy show`
#[derive(Args, Debug)]
pub struct PolicyShowArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for `policy set`
#[derive(Args, Debug)]
pub struct PolicySetArgs {
    /// YAML policy file
    #[arg(
        short,
        long,
        conflicts_with_all = ["threshold", "mode", "action", "from", "window", "off"]
    )]
    pub file: Option<PathBuf>,

    /// Strikes needed to trigger a penalty
    #[arg(long, allow_negative_numbers = true)]
    pub threshold: Option<i64>,

    /// Counting mode: cumulative or strictly consecutive
    #[arg(long)]
    pub mode: Option<String>,

    /// Penalty action: half-day or full-day
    #[arg(long)]
    pub action: Option<String>,

    /// First date the policy applies to (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Strike window: unbounded or monthly
    #[arg(long)]
    pub window: Option<String>,

    /// Save the settings with penalties switched off
    #[arg(long)]
    pub off: bool,
}

/// Arguments for the seed command
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// CSV file with id, employee_id, attendance_date and is_late columns
    pub file: PathBuf,
}

/// Arguments for the record command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("lateness").required(true).args(["late", "on_time"])))]
pub struct RecordArgs {
    /// Record identifier
    #[arg(long)]
    pub id: String,

    /// Employee identifier
    #[arg(short, long)]
    pub employee: String,

    /// Attendance date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// The employee arrived late
    #[arg(long)]
    pub late: bool,

    /// The employee arrived on time
    #[arg(long)]
    pub on_time: bool,

    /// Attendance status (present, half_day, absent, on_leave, work_from_home)
    #[arg(long)]
    pub status: Option<String>,

    /// Half-day type backed by a leave application (sets the status to half_day)
    #[arg(long)]
    pub half_day_type: Option<String>,

    /// Mark the half-day as genuine
    #[arg(long, requires = "half_day_type")]
    pub genuine: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Employee identifier
    #[arg(short, long)]
    pub employee: String,

    /// Date to evaluate (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the count command
#[derive(Args, Debug)]
pub struct CountArgs {
    /// Employee identifier
    #[arg(short, long)]
    pub employee: String,

    /// Date to count up to (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Leave this record's lateness out of the count
    #[arg(long)]
    pub exclude: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the reprocess command
#[derive(Args, Debug)]
pub struct ReprocessArgs {
    /// First date whose records are rewritten (YYYY-MM-DD)
    #[arg(long)]
    pub from: NaiveDate,

    /// Only reprocess this employee
    #[arg(short, long)]
    pub employee: Option<String>,

    /// Employees processed concurrently (default: reprocess.threads from config)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Suppress the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Month to summarize (YYYY-MM)
    #[arg(short, long, value_parser = parse_month)]
    pub month: (i32, u32),

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Parse `YYYY-MM` into a year and month
pub(crate) fn parse_month(value: &str) -> Result<(i32, u32), String> {
    let (year, month) = value
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM, got '{}'", value))?;
    let year: i32 = year
        .parse()
        .map_err(|_| format!("invalid year in '{}'", value))?;
    let month: u32 = month
        .parse()
        .map_err(|_| format!("invalid month in '{}'", value))?;
    if !(1..=12).contains(&month) {
        return Err(format!("month must be 1-12, got {}", month));
    }
    Ok((year, month))
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
