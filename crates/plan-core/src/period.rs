use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Where a calendar month sits relative to the reference month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Past,
    Current,
    Future,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Past => "past",
            Period::Current => "current",
            Period::Future => "future",
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "past" => Ok(Period::Past),
            "current" => Ok(Period::Current),
            "future" => Ok(Period::Future),
            other => Err(format!("unknown period '{other}'")),
        }
    }
}

/// The "now" used for classification. Always passed in; the core never reads a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceMonth {
    pub year: i32,
    pub month: u32,
}

impl ReferenceMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn classify(&self, year: i32, month: u32) -> Period {
        classify_period(year, month, *self)
    }
}

impl fmt::Display for ReferenceMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for ReferenceMonth {
    type Err = String;

    /// Parses `YYYY-MM` (or `YYYY-M`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got '{s}'"))?;
        let year = year
            .parse::<i32>()
            .map_err(|e| format!("invalid year in '{s}': {e}"))?;
        let month = month
            .parse::<u32>()
            .map_err(|e| format!("invalid month in '{s}': {e}"))?;
        if !(NaiveDate::MIN.year()..=NaiveDate::MAX.year()).contains(&year) {
            return Err(format!("year out of range in '{s}'"));
        }
        if !(1..=12).contains(&month) {
            return Err(format!("month out of range in '{s}'"));
        }
        Ok(Self::new(year, month))
    }
}

/// Strict chronological comparison of `(year, month)` against the reference.
///
/// Total over every integer pair; month values are not validated.
pub fn classify_period(year: i32, month: u32, reference: ReferenceMonth) -> Period {
    if year < reference.year || (year == reference.year && month < reference.month) {
        Period::Past
    } else if year == reference.year && month == reference.month {
        Period::Current
    } else {
        Period::Future
    }
}

/// `"{year}-{month}"` without zero padding, the key used by aggregated month maps.
pub fn month_key(year: i32, month: u32) -> String {
    format!("{year}-{month}")
}

/// One column of the reporting window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthInfo {
    pub year: i32,
    pub month: u32,
    pub label: String,
}

impl MonthInfo {
    pub fn new(year: i32, month: u32) -> Self {
        let label = match MONTH_ABBREVIATIONS.get((month as usize).wrapping_sub(1)) {
            Some(abbr) => format!("{abbr} {year}"),
            None => month_key(year, month),
        };
        Self { year, month, label }
    }

    pub fn key(&self) -> String {
        month_key(self.year, self.month)
    }

    pub fn period(&self, reference: ReferenceMonth) -> Period {
        classify_period(self.year, self.month, reference)
    }
}

/// Upper bound on the number of months a reporting window may span.
pub const MAX_WINDOW_MONTHS: usize = 120;

/// `count` consecutive months starting at `start`.
///
/// Stops early if the window would run past `i32::MAX`.
pub fn reporting_window(start: ReferenceMonth, count: usize) -> Vec<MonthInfo> {
    let mut months = Vec::with_capacity(count.min(MAX_WINDOW_MONTHS));
    let mut next = Some((start.year, start.month));
    while months.len() < count {
        let Some((year, month)) = next else {
            break;
        };
        months.push(MonthInfo::new(year, month));
        next = if month >= 12 {
            year.checked_add(1).map(|year| (year, 1))
        } else {
            Some((year, month + 1))
        };
    }
    months
}
