use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::reports::{Row, parse_date_like, row_matches, stringify};

/// Fields consulted, in order, when a date filter needs a row's date.
pub const DATE_FIELD_PRIORITY: &[&str] = &[
    "date",
    "check_date",
    "pay_date",
    "work_date",
    "hire_date",
    "effective_date",
    "termination_date",
    "posted_date",
    "period_start",
    "period_end",
    "as_of_date",
    "created_at",
];

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PreviewFilters {
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl PreviewFilters {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.start_date.is_none() && self.end_date.is_none()
    }

    /// Text, then start date, then end date. Source order is preserved.
    #[must_use]
    pub fn apply<'a>(&self, rows: &'a [Row]) -> Vec<&'a Row> {
        rows.iter()
            .filter(|row| row_matches(row, &self.query))
            .filter(|row| self.start_date.is_none_or(|start| on_or_after(row, start)))
            .filter(|row| self.end_date.is_none_or(|end| on_or_before(row, end)))
            .collect()
    }
}

/// Date of the first priority field present on the row.
#[must_use]
pub fn detect_row_date(row: &Row) -> Option<NaiveDateTime> {
    let value = DATE_FIELD_PRIORITY.iter().find_map(|field| row.get(*field))?;
    parse_date_like(&stringify(value))
}

#[must_use]
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveDateTime::MAX)
}

// rows without a usable date are kept: the filter cannot place them
fn on_or_after(row: &Row, start: NaiveDate) -> bool {
    detect_row_date(row).is_none_or(|date| date >= start.and_time(chrono::NaiveTime::MIN))
}

fn on_or_before(row: &Row, end: NaiveDate) -> bool {
    detect_row_date(row).is_none_or(|date| date <= end_of_day(end))
}
