use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::MonthRef;

pub type RangeId = String;

/// A labeled, colored, closed span of days. Never modified after creation.
///
/// Serialized field names and order match the exported JSON
/// (`id, startDate, endDate, label, color`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub id: RangeId,
    /// Local midnight of the first day.
    pub start_date: DateTime<Local>,
    /// Local 23:59:59.999 of the last day.
    pub end_date: DateTime<Local>,
    pub label: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RangeQuery {
    All,
    ById(RangeId),
    ByMonth(MonthRef),
    OnDay(NaiveDate),
}
