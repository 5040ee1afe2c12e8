use crate::calendar::WorkCalendar;
use crate::model::{WorklogEntry, WorklogRoleSummary};
use crate::period::month_key;
use chrono::Datelike;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Actual FTE per (position id, month key). Missing cells read as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActualsIndex {
    values: HashMap<(String, String), f64>,
}

impl ActualsIndex {
    /// Duplicate (position, month) rows are summed.
    pub fn from_summaries(summaries: &[WorklogRoleSummary]) -> Self {
        let mut values: HashMap<(String, String), f64> = HashMap::new();
        for summary in summaries {
            let key = (
                summary.position_id.to_string(),
                month_key(summary.year, summary.month),
            );
            *values.entry(key).or_insert(0.0) += summary.total_fte;
        }
        Self { values }
    }

    pub fn actual(&self, position_id: &str, year: i32, month: u32) -> f64 {
        self.values
            .get(&(position_id.to_string(), month_key(year, month)))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Rolls raw worklog hours up to FTE per position and month.
///
/// One FTE for a month is `working_days * hours_per_day` hours, with working
/// days taken from `calendar`. Months without capacity report zero.
pub fn summarize_worklogs(
    entries: &[WorklogEntry],
    calendar: &WorkCalendar,
    hours_per_day: f64,
) -> Vec<WorklogRoleSummary> {
    let mut hours: BTreeMap<(i64, i32, u32), f64> = BTreeMap::new();
    for entry in entries {
        let key = (
            entry.position_id,
            entry.work_date.year(),
            entry.work_date.month(),
        );
        *hours.entry(key).or_insert(0.0) += entry.hours;
    }

    let summaries: Vec<WorklogRoleSummary> = hours
        .into_iter()
        .map(|((position_id, year, month), logged)| {
            let capacity = calendar.capacity_hours(year, month, hours_per_day);
            let total_fte = if capacity > 0.0 {
                logged / capacity
            } else {
                0.0
            };
            WorklogRoleSummary {
                position_id,
                year,
                month,
                total_fte,
            }
        })
        .collect();

    debug!(
        entries = entries.len(),
        summaries = summaries.len(),
        "summarized worklogs"
    );
    summaries
}
