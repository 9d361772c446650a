//! Month arithmetic and local-time windows for ranges.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::Range;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month. `month` is 0-based (January = 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl MonthRef {
    /// Build a month, carrying out-of-range months into the year
    /// (month 12 is January of the next year, month -1 December of the previous).
    pub fn normalized(year: i32, month: i32) -> Self {
        MonthRef {
            year: year.saturating_add(month.div_euclid(12)),
            month: month.rem_euclid(12) as u32,
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        MonthRef {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    /// Parse `YYYY-MM` (1-based month, as typed by a user).
    pub fn parse(s: &str) -> Result<Self> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| anyhow!("Invalid month '{s}'. Expected YYYY-MM"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| anyhow!("Invalid year in '{s}'. Expected YYYY-MM"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| anyhow!("Invalid month in '{s}'. Expected YYYY-MM"))?;
        if !(1..=12).contains(&month) {
            return Err(anyhow!("Month must be between 01 and 12, got '{s}'"));
        }
        Ok(MonthRef {
            year,
            month: month - 1,
        })
    }

    pub fn prev(self) -> Self {
        Self::normalized(self.year, self.month as i32 - 1)
    }

    pub fn next(self) -> Self {
        Self::normalized(self.year, self.month as i32 + 1)
    }

    /// Previous, selected and next month, in display order.
    pub fn strip(self) -> [MonthRef; 3] {
        [self.prev(), self, self.next()]
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        self.next().first_day()?.pred_opt()
    }

    pub fn days_in_month(self) -> u32 {
        self.last_day().map(|d| d.day()).unwrap_or(0)
    }

    /// Column of day 1 in a Monday-first week (Monday = 0, Sunday = 6).
    pub fn first_weekday_offset(self) -> u32 {
        self.first_day()
            .map(|d| d.weekday().num_days_from_monday())
            .unwrap_or(0)
    }

    /// e.g. "February 2026".
    pub fn display_name(self) -> String {
        format!("{} {}", MONTH_NAMES[self.month as usize], self.year)
    }

    /// Local wall-clock window from midnight of day 1 to 23:59:59.999 of the last day.
    pub fn window(self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((
            self.first_day()?.and_time(NaiveTime::MIN),
            self.last_day()?.and_time(end_of_day_time()),
        ))
    }
}

/// Window of the month `month` (0-based, carried into `year` when out of range).
/// `None` when the year is outside the representable calendar.
pub fn month_window(year: i32, month: i32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    MonthRef::normalized(year, month).window()
}

fn end_of_day_time() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

fn to_local(naive: NaiveDateTime) -> Result<DateTime<Local>> {
    naive
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| anyhow!("{naive} does not exist in the local timezone"))
}

/// Local midnight at the start of `date`.
pub fn day_start(date: NaiveDate) -> Result<DateTime<Local>> {
    to_local(date.and_time(NaiveTime::MIN))
}

/// Local 23:59:59.999 at the end of `date`.
pub fn day_end(date: NaiveDate) -> Result<DateTime<Local>> {
    to_local(date.and_time(end_of_day_time()))
}

/// Parse `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date format '{s}'. Expected YYYY-MM-DD"))
}

/// Inclusive overlap of a range with a local wall-clock window.
pub fn overlaps_window(range: &Range, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    range.start_date.naive_local() <= end && range.end_date.naive_local() >= start
}

/// Whether any part of the range falls on the local day `date`.
pub fn covers_day(range: &Range, date: NaiveDate) -> bool {
    overlaps_window(
        range,
        date.and_time(NaiveTime::MIN),
        date.and_time(end_of_day_time()),
    )
}

/// First and last day of `month` the range covers, if any.
pub fn day_span_in(range: &Range, month: MonthRef) -> Option<(u32, u32)> {
    let (start, end) = month.window()?;
    if !overlaps_window(range, start, end) {
        return None;
    }
    let first = range.start_date.naive_local().max(start).day();
    let last = range.end_date.naive_local().min(end).day();
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn range_between(start: DateTime<Local>, end: DateTime<Local>) -> Range {
        Range {
            id: "r".to_string(),
            start_date: start,
            end_date: end,
            label: "Test".to_string(),
            color: "#f7d4d4".to_string(),
        }
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, s).earliest().unwrap()
    }

    #[test]
    fn test_normalized_carries_months() {
        assert_eq!(MonthRef::normalized(2026, 12), MonthRef { year: 2027, month: 0 });
        assert_eq!(MonthRef::normalized(2026, -1), MonthRef { year: 2025, month: 11 });
        assert_eq!(MonthRef::normalized(2026, 25), MonthRef { year: 2028, month: 1 });
        assert_eq!(MonthRef::normalized(2026, 5), MonthRef { year: 2026, month: 5 });
    }

    #[test]
    fn test_strip_wraps_year() {
        let jan = MonthRef { year: 2026, month: 0 };
        assert_eq!(
            jan.strip(),
            [
                MonthRef { year: 2025, month: 11 },
                jan,
                MonthRef { year: 2026, month: 1 },
            ]
        );
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(MonthRef { year: 2026, month: 1 }.days_in_month(), 28);
        assert_eq!(MonthRef { year: 2024, month: 1 }.days_in_month(), 29);
        assert_eq!(MonthRef { year: 2026, month: 11 }.days_in_month(), 31);
        assert_eq!(MonthRef { year: 2026, month: 3 }.days_in_month(), 30);
    }

    #[test]
    fn test_first_weekday_offset() {
        // 1 February 2026 is a Sunday, 1 June 2026 a Monday.
        assert_eq!(MonthRef { year: 2026, month: 1 }.first_weekday_offset(), 6);
        assert_eq!(MonthRef { year: 2026, month: 5 }.first_weekday_offset(), 0);
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(MonthRef::parse("2026-02").unwrap(), MonthRef { year: 2026, month: 1 });
        assert!(MonthRef::parse("2026-13").is_err());
        assert!(MonthRef::parse("2026").is_err());
        assert!(MonthRef::parse("feb-2026").is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(MonthRef { year: 2026, month: 1 }.display_name(), "February 2026");
    }

    #[test]
    fn test_month_window_bounds() {
        let (start, end) = month_window(2026, 1).unwrap();
        assert_eq!(start.to_string(), "2026-02-01 00:00:00");
        assert_eq!(end.to_string(), "2026-02-28 23:59:59.999");
        assert!(month_window(i32::MAX, 0).is_none());
    }

    #[test]
    fn test_overlap_is_inclusive_at_edges() {
        let (start, end) = month_window(2026, 1).unwrap();
        let feb_first = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let feb_last = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let ends_on_first = range_between(local(2026, 1, 20, 0, 0, 0), day_start(feb_first).unwrap());
        let starts_on_last = range_between(day_end(feb_last).unwrap(), local(2026, 3, 5, 0, 0, 0));
        let january_only = range_between(local(2026, 1, 2, 0, 0, 0), local(2026, 1, 31, 23, 59, 59));
        let march_only = range_between(local(2026, 3, 1, 0, 0, 0), local(2026, 3, 4, 0, 0, 0));
        assert!(overlaps_window(&ends_on_first, start, end));
        assert!(overlaps_window(&starts_on_last, start, end));
        assert!(!overlaps_window(&january_only, start, end));
        assert!(!overlaps_window(&march_only, start, end));
    }

    #[test]
    fn test_covers_day_and_span() {
        let range = range_between(local(2026, 1, 28, 0, 0, 0), local(2026, 2, 3, 12, 0, 0));
        assert!(covers_day(&range, NaiveDate::from_ymd_opt(2026, 2, 3).unwrap()));
        assert!(!covers_day(&range, NaiveDate::from_ymd_opt(2026, 2, 4).unwrap()));
        assert_eq!(day_span_in(&range, MonthRef { year: 2026, month: 0 }), Some((28, 31)));
        assert_eq!(day_span_in(&range, MonthRef { year: 2026, month: 1 }), Some((1, 3)));
        assert_eq!(day_span_in(&range, MonthRef { year: 2026, month: 2 }), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2026-02-09").unwrap(), NaiveDate::from_ymd_opt(2026, 2, 9).unwrap());
        assert!(parse_date("09/02/2026").is_err());
    }
}
