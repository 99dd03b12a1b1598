//! `occupancy` CLI: day segments, conflicts, and free-slot suggestions from the
//! command line.
//!
//! Input is a JSON document `{"tasks": [...], "events": [...]}` read from a file
//! or stdin. Results are printed as pretty JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Segment one day, highlighting the current task
//! occupancy segments -i week.json --date 2026-03-16 --current-task t1
//!
//! # Segment a 30-day month grid
//! occupancy segments -i week.json --date 2026-03-01 --days 30
//!
//! # Check a proposed slot for a task being rescheduled
//! occupancy conflicts -i week.json --start 2026-03-16T14:00:00 --end 2026-03-16T15:00:00 \
//!   --exclude-task t1
//!
//! # Suggest 90-minute slots over the next week, 08:00-22:00 only
//! cat week.json | occupancy suggest --duration 90 --window 8-22
//!
//! # Use engine settings from a TOML file
//! occupancy --config occupancy.toml suggest -i week.json --duration 45
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use occupancy_engine::commitment::{EventRecord, TaskRecord};
use occupancy_engine::freeslot::SlotPlacement;
use occupancy_engine::{
    build_commitments, find_conflicts, find_conflicts_for_task, search_free_slots, segment_days,
    ActivityWindow, ClassificationContext, EngineConfig, Interval, SearchRequest,
};
use serde::Deserialize;
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "occupancy",
    version,
    about = "Calendar occupancy, conflict and free-slot CLI"
)]
struct Cli {
    /// TOML file with engine settings (defaults apply if omitted)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split days into classified occupancy segments
    Segments {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// First day to segment (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Number of consecutive days
        #[arg(long, default_value_t = 1)]
        days: i64,
        /// Task id to classify as the current task
        #[arg(long)]
        current_task: Option<String>,
        /// Category id to classify as the current category
        #[arg(long)]
        current_category: Option<String>,
    },
    /// List commitments overlapping a candidate interval
    Conflicts {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Candidate start (RFC 3339, or naive time read as UTC)
        #[arg(long)]
        start: String,
        /// Candidate end (RFC 3339, or naive time read as UTC)
        #[arg(long)]
        end: String,
        /// Ignore this task's own commitment
        #[arg(long)]
        exclude_task: Option<String>,
    },
    /// Suggest free slots of a given duration
    Suggest {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Requested duration in minutes
        #[arg(long)]
        duration: i64,
        /// First day of the horizon (defaults to today)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Number of days to search (defaults to the configured horizon)
        #[arg(long)]
        days: Option<i64>,
        /// Daily activity window as START-END hours, e.g. 8-22
        #[arg(long)]
        window: Option<String>,
        /// Place each slot in the middle of its free run
        #[arg(long)]
        centered: bool,
        /// Maximum number of suggestions
        #[arg(long)]
        limit: Option<usize>,
        /// Treat this task's own commitment as free
        #[arg(long)]
        exclude_task: Option<String>,
    },
}

/// The records a caller hands over, as loaded from its repositories.
#[derive(Deserialize)]
struct InputDocument {
    #[serde(default)]
    tasks: Vec<TaskRecord>,
    #[serde(default)]
    events: Vec<EventRecord>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Segments {
            input,
            output,
            date,
            days,
            current_task,
            current_category,
        } => {
            let doc = read_document(input.as_deref())?;
            let commitments = build_commitments(&doc.tasks, &doc.events, &config);
            let ctx = ClassificationContext::new(current_task, current_category);

            let occupancy = segment_days(date, days, &commitments, &ctx);
            write_json(output.as_deref(), &occupancy)?;
        }
        Commands::Conflicts {
            input,
            output,
            start,
            end,
            exclude_task,
        } => {
            let doc = read_document(input.as_deref())?;
            let commitments = build_commitments(&doc.tasks, &doc.events, &config);
            let candidate = Interval::new(parse_datetime(&start)?, parse_datetime(&end)?)
                .context("Invalid candidate interval")?;

            let report = match exclude_task.as_deref() {
                Some(task_id) => find_conflicts_for_task(&candidate, &commitments, task_id),
                None => find_conflicts(&candidate, &commitments),
            };
            write_json(output.as_deref(), &report)?;
        }
        Commands::Suggest {
            input,
            output,
            duration,
            from,
            days,
            window,
            centered,
            limit,
            exclude_task,
        } => {
            let doc = read_document(input.as_deref())?;
            let commitments = build_commitments(&doc.tasks, &doc.events, &config);

            let start_date = from.unwrap_or_else(|| Utc::now().date_naive());
            let mut request = SearchRequest::new(&config, duration, start_date);
            if let Some(days) = days {
                request.horizon_days = days;
            }
            if let Some(raw) = window.as_deref() {
                request.window = parse_window(raw)?;
            }
            if centered {
                request.placement = SlotPlacement::Centered;
            }
            request.max_suggestions = limit;
            request.exclude_task_id = exclude_task;

            let result = search_free_slots(&commitments, &request);
            write_json(output.as_deref(), &result)?;
        }
    }

    Ok(())
}

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (e.g., "2026-03-16T14:00:00+00:00") and naive time
/// (e.g., "2026-03-16T14:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .with_context(|| format!("Invalid datetime '{}'", s))
}

/// Parse `START-END` hours, e.g. `8-22`.
fn parse_window(raw: &str) -> Result<ActivityWindow> {
    let (start, end) = raw
        .split_once('-')
        .with_context(|| format!("Invalid window '{}': expected START-END hours", raw))?;
    let start: u32 = start
        .trim()
        .parse()
        .with_context(|| format!("Invalid window start hour '{}'", start))?;
    let end: u32 = end
        .trim()
        .parse()
        .with_context(|| format!("Invalid window end hour '{}'", end))?;
    Ok(ActivityWindow::new(start, end)?)
}

fn read_document(path: Option<&str>) -> Result<InputDocument> {
    let text = read_input(path)?;
    let doc: InputDocument = serde_json::from_str(&text).context("Failed to parse input JSON")?;
    tracing::debug!(tasks = doc.tasks.len(), events = doc.events.len(), "loaded input");
    Ok(doc)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: serde::Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
