//! CLI argument parsing and command handling.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calendar::{self, MonthRef};
use crate::color::is_valid_hex;
use crate::picker::{IndexSource, SeededRandom, ThreadRandom, pick_distinct_hue};
use crate::types::{Range, RangeQuery};
use crate::{db, transfer};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Parser)]
#[command(
    name = "calmonger",
    version,
    about = "Calmonger - label date ranges with distinct colors"
)]
pub struct Cli {
    /// Path of the ranges database
    #[arg(long, global = true, env = "CALMONGER_DB")]
    pub db: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Save a labeled range of days (YYYY-MM-DD, both inclusive)
    Add {
        start: String,
        end: String,
        label: String,
        #[arg(short = 'c', long = "color")]
        color: Option<String>,
    },
    /// List saved ranges
    List {
        #[arg(short = 'm', long = "month", conflicts_with = "day")]
        month: Option<String>,
        #[arg(short = 'd', long = "day")]
        day: Option<String>,
    },
    /// Show the previous, selected and next month with their ranges
    Show {
        #[arg(short = 'm', long = "month")]
        month: Option<String>,
    },
    /// Print the color a new range in the month would get
    Pick {
        #[arg(short = 'm', long = "month")]
        month: Option<String>,
        #[arg(long = "seed")]
        seed: Option<u64>,
    },
    /// Delete a saved range by id
    Delete {
        id: String,
    },
    /// Remove every saved range
    Clear,
    /// Write all ranges as JSON (to stdout without a path)
    Export {
        path: Option<PathBuf>,
    },
    /// Read ranges from a JSON export
    Import {
        path: PathBuf,
        #[arg(long = "replace")]
        replace: bool,
    },
}

/// Execute a CLI command against the ranges store.
pub fn run(command: Command, conn: &Connection) -> Result<()> {
    match command {
        Command::Add {
            start,
            end,
            label,
            color,
        } => {
            handle_range_add(start, end, label, color, conn)?;
        }
        Command::List { month, day } => handle_list(month, day, conn)?,
        Command::Show { month } => handle_show(month, conn)?,
        Command::Pick { month, seed } => {
            let color = handle_pick(month, seed, conn)?;
            println!("{color}");
        }
        Command::Delete { id } => {
            handle_delete(&id, conn)?;
        }
        Command::Clear => {
            let removed = db::clear_ranges(conn)?;
            println!("Removed {removed} range(s).");
        }
        Command::Export { path } => handle_export(path, conn)?,
        Command::Import { path, replace } => handle_import(path, replace, conn)?,
    }
    Ok(())
}

fn handle_range_add(
    start: String,
    end: String,
    label: String,
    color_opt: Option<String>,
    conn: &Connection,
) -> Result<Option<Range>> {
    let label = label.trim().to_string();
    if label.is_empty() {
        println!("Label cannot be empty.");
        return Ok(None);
    }

    let first = calendar::parse_date(&start)?;
    let second = calendar::parse_date(&end)?;
    // Selections may be dragged backwards.
    let (first, last) = if first <= second {
        (first, second)
    } else {
        (second, first)
    };

    let color = if let Some(c) = color_opt {
        if !is_valid_hex(&c) {
            println!("Invalid color format. Please provide a hex code like #RRGGBB.");
            return Ok(None);
        }
        c.to_ascii_lowercase()
    } else {
        let existing = db::query_ranges(RangeQuery::All, conn)?;
        let month = MonthRef::of(first);
        pick_distinct_hue(&existing, month.year, month.month as i32, &mut ThreadRandom)
    };

    let range = Range {
        id: Uuid::new_v4().to_string(),
        start_date: calendar::day_start(first)?,
        end_date: calendar::day_end(last)?,
        label,
        color,
    };
    db::create_range(&range, conn)?;
    println!("Added {}", format_range(&range));
    Ok(Some(range))
}

fn handle_delete(id: &str, conn: &Connection) -> Result<Option<Range>> {
    let Some(range) = db::query_ranges(RangeQuery::ById(id.to_string()), conn)?
        .into_iter()
        .next()
    else {
        println!("Range '{id}' not found.");
        return Ok(None);
    };
    db::delete_range(id, conn)?;
    println!("Deleted {}", format_range(&range));
    Ok(Some(range))
}

fn handle_list(month: Option<String>, day: Option<String>, conn: &Connection) -> Result<()> {
    let query = match (month, day) {
        (Some(m), _) => RangeQuery::ByMonth(MonthRef::parse(&m)?),
        (None, Some(d)) => RangeQuery::OnDay(calendar::parse_date(&d)?),
        (None, None) => RangeQuery::All,
    };
    let ranges = db::query_ranges(query, conn)?;
    if ranges.is_empty() {
        println!("No ranges found.");
    }
    for range in &ranges {
        println!("{}", format_range(range));
    }
    Ok(())
}

fn handle_show(month: Option<String>, conn: &Connection) -> Result<()> {
    let selected = parse_month_or_current(month)?;
    for month in selected.strip() {
        let marker = if month == selected { "*" } else { " " };
        println!(
            "{marker} {} ({} days, starts {})",
            month.display_name(),
            month.days_in_month(),
            WEEKDAYS[month.first_weekday_offset() as usize]
        );
        let ranges = db::query_ranges(RangeQuery::ByMonth(month), conn)?;
        if ranges.is_empty() {
            println!("    (no ranges)");
        }
        for range in &ranges {
            if let Some((first, last)) = calendar::day_span_in(range, month) {
                println!(
                    "    {first:>2}-{last:<2} {}  {}  [{}]",
                    range.color, range.label, range.id
                );
            }
        }
    }
    Ok(())
}

fn handle_pick(month: Option<String>, seed: Option<u64>, conn: &Connection) -> Result<String> {
    let month = parse_month_or_current(month)?;
    let ranges = db::query_ranges(RangeQuery::All, conn)?;
    let mut source: Box<dyn IndexSource> = match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    };
    Ok(pick_distinct_hue(
        &ranges,
        month.year,
        month.month as i32,
        source.as_mut(),
    ))
}

fn handle_export(path: Option<PathBuf>, conn: &Connection) -> Result<()> {
    let ranges = db::query_ranges(RangeQuery::All, conn)?;
    match path {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            transfer::export_ranges(&ranges, &mut writer)?;
            writer.flush()?;
            println!("Exported {} range(s) to {}.", ranges.len(), path.display());
        }
        None => transfer::export_ranges(&ranges, std::io::stdout().lock())?,
    }
    Ok(())
}

fn handle_import(path: PathBuf, replace: bool, conn: &Connection) -> Result<()> {
    let file =
        File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    let ranges = transfer::import_ranges(BufReader::new(file))?;

    let tx = conn.unchecked_transaction()?;
    if replace {
        db::clear_ranges(&tx)?;
    }
    let mut imported = 0;
    for range in &ranges {
        if db::insert_range_if_absent(range, &tx)? {
            imported += 1;
        } else {
            warn!(id = %range.id, "skipping range with an existing id");
        }
    }
    tx.commit()?;

    info!(imported, total = ranges.len(), "imported ranges");
    println!(
        "Imported {imported} of {} range(s) from {}.",
        ranges.len(),
        path.display()
    );
    Ok(())
}

fn parse_month_or_current(month: Option<String>) -> Result<MonthRef> {
    match month {
        Some(m) => MonthRef::parse(&m),
        None => Ok(MonthRef::current()),
    }
}

fn format_range(range: &Range) -> String {
    format!(
        "{}  {} .. {}  {}  {}",
        range.id,
        range.start_date.format("%Y-%m-%d"),
        range.end_date.format("%Y-%m-%d"),
        range.color,
        range.label
    )
}
