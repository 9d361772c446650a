//! Range database queries.
use anyhow::Result;
use chrono::{DateTime, Local, SecondsFormat};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use tracing::info;

use crate::calendar::{covers_day, overlaps_window};
use crate::types::{Range, RangeQuery};

const SELECT_RANGES: &str = "SELECT id, label, color, start_date, end_date FROM ranges";

pub fn create_range(range: &Range, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO ranges (id, label, color, start_date, end_date) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            range.id,
            range.label,
            range.color,
            format_datetime(&range.start_date),
            format_datetime(&range.end_date),
        ],
    )?;
    info!(id = %range.id, label = %range.label, color = %range.color, "created range");
    Ok(())
}

/// Inserts the range unless one with the same id is already stored.
/// Returns whether it was inserted.
pub fn insert_range_if_absent(range: &Range, conn: &Connection) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO ranges (id, label, color, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            range.id,
            range.label,
            range.color,
            format_datetime(&range.start_date),
            format_datetime(&range.end_date),
        ],
    )?;
    Ok(inserted > 0)
}

pub fn query_ranges(query: RangeQuery, conn: &Connection) -> Result<Vec<Range>> {
    match query {
        RangeQuery::All => query_all_ranges(conn),
        RangeQuery::ById(id) => Ok(query_range_by_id(&id, conn)?.into_iter().collect()),
        RangeQuery::ByMonth(month) => {
            let Some((start, end)) = month.window() else {
                return Ok(Vec::new());
            };
            Ok(query_all_ranges(conn)?
                .into_iter()
                .filter(|range| overlaps_window(range, start, end))
                .collect())
        }
        RangeQuery::OnDay(date) => Ok(query_all_ranges(conn)?
            .into_iter()
            .filter(|range| covers_day(range, date))
            .collect()),
    }
}

// Stored offsets may differ between rows, so ordering and window filters
// run on parsed timestamps rather than in SQL.
fn query_all_ranges(conn: &Connection) -> Result<Vec<Range>> {
    let mut stmt = conn.prepare(SELECT_RANGES)?;
    let rows = stmt.query_map([], range_from_row)?;
    let mut ranges = Vec::new();
    for row in rows {
        ranges.push(row?);
    }
    ranges.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));
    Ok(ranges)
}

pub fn query_range_by_id(id: &str, conn: &Connection) -> Result<Option<Range>> {
    let mut stmt = conn.prepare(&format!("{SELECT_RANGES} WHERE id = ?1"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(range_from_row(row)?))
    } else {
        Ok(None)
    }
}

/// Returns whether a range was removed.
pub fn delete_range(id: &str, conn: &Connection) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM ranges WHERE id = ?1", [id])?;
    if deleted > 0 {
        info!(id, "deleted range");
    }
    Ok(deleted > 0)
}

/// Removes every range, returning how many were stored.
pub fn clear_ranges(conn: &Connection) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM ranges", [])?;
    info!(deleted, "cleared ranges");
    Ok(deleted)
}

fn range_from_row(row: &Row<'_>) -> rusqlite::Result<Range> {
    Ok(Range {
        id: row.get(0)?,
        label: row.get(1)?,
        color: row.get(2)?,
        start_date: parse_datetime_column(row, 3)?,
        end_date: parse_datetime_column(row, 4)?,
    })
}

fn format_datetime(dt: &DateTime<Local>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, false)
}

fn parse_datetime_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Local>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
