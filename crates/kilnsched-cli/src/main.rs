//! kilnsched CLI - Kiln Production Scheduling Engine
//!
//! Command-line interface for running the weekly scheduler, inspecting and
//! editing availability, and dry-running a plan without persisting it.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use kilnsched_core::AvailabilityUpdate;
use kilnsched_store::{MemoryStore, SchedulerStore, SqliteStore};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "kilnsched")]
#[command(author, version, about = "Kiln production scheduling engine", long_about = None)]
struct Cli {
    /// Path to the sqlite database file.
    #[arg(long, env = "KILNSCHED_DB_PATH", global = true, default_value = "kilnsched.db")]
    db_path: std::path::PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scheduler invocation, purging and replacing the pending plan.
    Run {
        /// Override "now" for the planning horizon (YYYY-MM-DD). Defaults to today.
        #[arg(long, value_name = "DATE")]
        as_of: Option<String>,
    },
    /// Inspect or edit day-by-day labour-hour availability.
    Availability {
        #[command(subcommand)]
        action: AvailabilityCommands,
    },
    /// Build a plan from the current orders and availability without writing it.
    Check {
        /// Override "now" for the planning horizon (YYYY-MM-DD). Defaults to today.
        #[arg(long, value_name = "DATE")]
        as_of: Option<String>,
    },
}

#[derive(Subcommand)]
enum AvailabilityCommands {
    /// Print availability for a date range, flagging weekday-default fallbacks.
    Show {
        /// Start of the range (YYYY-MM-DD).
        #[arg(value_name = "START")]
        start: String,
        /// End of the range (YYYY-MM-DD). Defaults to `start`.
        #[arg(value_name = "END")]
        end: Option<String>,
    },
    /// Persist an override for a single date.
    Set {
        /// Date to override (YYYY-MM-DD).
        #[arg(value_name = "DATE")]
        date: String,
        /// Labour-hours available that day.
        #[arg(value_name = "HOURS")]
        hours: f64,
        /// Optional free-text note.
        #[arg(long)]
        notes: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { as_of } => cmd_run(&cli.db_path, as_of.as_deref()),
        Commands::Availability { action } => match action {
            AvailabilityCommands::Show { start, end } => {
                cmd_availability_show(&cli.db_path, &start, end.as_deref())
            }
            AvailabilityCommands::Set { date, hours, notes } => {
                cmd_availability_set(&cli.db_path, &date, hours, notes)
            }
        },
        Commands::Check { as_of } => cmd_check(&cli.db_path, as_of.as_deref()),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Runs the dispatcher once against the real sqlite-backed store.
fn cmd_run(db_path: &std::path::Path, as_of: Option<&str>) -> Result<()> {
    let now = as_of.map(parse_date).transpose()?.unwrap_or_else(today);

    let mut store =
        SqliteStore::open(db_path).with_context(|| format!("opening '{}'", db_path.display()))?;
    kilnsched_solver::run(&mut store, now).context("scheduler run failed")?;

    println!("Scheduler run complete for {now} against '{}'.", db_path.display());
    Ok(())
}

fn cmd_availability_show(db_path: &std::path::Path, start: &str, end: Option<&str>) -> Result<()> {
    let start = parse_date(start)?;
    let end = end.map(parse_date).transpose()?.unwrap_or(start);

    let mut store =
        SqliteStore::open(db_path).with_context(|| format!("opening '{}'", db_path.display()))?;
    let mut service = kilnsched_solver::AvailabilityService::new(&mut store);
    let entries = service
        .for_range(start, end)
        .context("fetching availability")?;

    println!("{:<12} {:>6}  {}", "Date", "Hours", "Source");
    for entry in entries {
        println!(
            "{:<12} {:>6.1}  {}{}",
            entry.date,
            entry.available_hours,
            if entry.is_default { "weekday default" } else { "override" },
            entry.notes.map(|n| format!(" ({n})")).unwrap_or_default(),
        );
    }
    Ok(())
}

fn cmd_availability_set(
    db_path: &std::path::Path,
    date: &str,
    hours: f64,
    notes: Option<String>,
) -> Result<()> {
    let date = parse_date(date)?;

    let mut store =
        SqliteStore::open(db_path).with_context(|| format!("opening '{}'", db_path.display()))?;
    let mut service = kilnsched_solver::AvailabilityService::new(&mut store);
    let stored = service
        .upsert(vec![AvailabilityUpdate {
            date,
            available_hours: hours,
            notes,
        }])
        .context("saving availability override")?;

    for entry in stored {
        println!("Saved {}: {:.1}h", entry.date, entry.available_hours);
    }
    Ok(())
}

/// Builds a plan from the live orders and availability but runs it against a
/// throwaway `MemoryStore`, so nothing in `db_path` is modified.
fn cmd_check(db_path: &std::path::Path, as_of: Option<&str>) -> Result<()> {
    let now = as_of.map(parse_date).transpose()?.unwrap_or_else(today);

    let mut live =
        SqliteStore::open(db_path).with_context(|| format!("opening '{}'", db_path.display()))?;

    let (horizon_start, horizon_end) = kilnsched_solver::horizon_for(now);
    let mut orders = live.list_open_orders_with_deadlines().context("fetching deadline orders")?;
    orders.extend(
        live.list_open_orders_without_deadlines()
            .context("fetching non-deadline orders")?,
    );
    let availability = live
        .get_availability(horizon_start, horizon_end)
        .context("fetching availability")?;

    let mut snapshot = MemoryStore::with_orders(orders);
    snapshot.seed_availability(availability);

    kilnsched_solver::run(&mut snapshot, now).context("dry-run scheduler failed")?;

    let tasks = snapshot.all_tasks();
    println!(
        "Dry run for {now} (horizon {horizon_start}..{horizon_end}): {} task(s), nothing written to '{}'.",
        tasks.len(),
        db_path.display()
    );
    println!("{:<12} {:<14} {:<12} {:>6} {:>8} {}", "Date", "Order detail", "Task", "Qty", "Hours", "Late");
    for task in tasks {
        println!(
            "{:<12} {:<14} {:<12} {:>6} {:>8.1} {}",
            task.date,
            task.order_detail_id,
            task.task_type,
            task.quantity,
            task.estimated_hours,
            if task.is_late { "yes" } else { "" },
        );
    }
    Ok(())
}
