use crate::actuals;
use crate::calendar::WorkCalendar;
use crate::config::PlannerConfig;
use crate::error::PlanResult;
use crate::grouping::{self, BusinessAreaGroups};
use crate::hierarchy::{Hierarchy, InMemoryLoader};
use crate::model::WorklogRoleSummary;
use crate::period::{MonthInfo, ReferenceMonth, reporting_window};
use crate::resolve::NamePolicy;
use crate::source::{self, PlanSnapshot};
use crate::summary::{self, PlanVsActualReport};
use chrono::NaiveDate;
use tracing::info;

/// The current snapshot plus the settings every view is computed with.
///
/// Views are recomputed from the snapshot on each call; nothing derived is kept.
#[derive(Debug, Clone)]
pub struct PlanWorkspace {
    snapshot: PlanSnapshot,
    calendar: WorkCalendar,
    hours_per_day: f64,
    window_months: usize,
    name_policy: NamePolicy,
}

impl Default for PlanWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanWorkspace {
    pub fn new() -> Self {
        let config = PlannerConfig::default();
        Self {
            snapshot: PlanSnapshot::default(),
            calendar: WorkCalendar::default(),
            hours_per_day: config.hours_per_day,
            window_months: config.window_months,
            name_policy: config.name_policy,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> PlanResult<Self> {
        config.validate()?;
        Ok(Self {
            snapshot: PlanSnapshot::default(),
            calendar: config.work_calendar()?,
            hours_per_day: config.hours_per_day,
            window_months: config.window_months,
            name_policy: config.name_policy,
        })
    }

    pub fn snapshot(&self) -> &PlanSnapshot {
        &self.snapshot
    }

    /// Replaces the snapshot after validating it.
    pub fn set_snapshot(&mut self, snapshot: PlanSnapshot) -> PlanResult<()> {
        source::validate_snapshot(&snapshot)?;
        info!(
            plans = snapshot.resource_plans.len(),
            worklog_summaries = snapshot.worklog_summaries.len(),
            worklog_entries = snapshot.worklog_entries.len(),
            "snapshot replaced"
        );
        self.snapshot = snapshot;
        Ok(())
    }

    pub fn name_policy(&self) -> NamePolicy {
        self.name_policy
    }

    pub fn set_name_policy(&mut self, policy: NamePolicy) {
        self.name_policy = policy;
    }

    pub fn window_months(&self) -> usize {
        self.window_months
    }

    pub fn calendar(&self) -> &WorkCalendar {
        &self.calendar
    }

    /// Marks a non-working day; FTE derived from worklog entries follows.
    pub fn add_holiday(&mut self, date: NaiveDate) {
        info!(%date, "holiday added");
        self.calendar.add_holiday(date);
    }

    pub fn window(&self, start: ReferenceMonth) -> Vec<MonthInfo> {
        reporting_window(start, self.window_months)
    }

    /// Pre-aggregated summaries plus FTE derived from raw worklog entries.
    pub fn actual_summaries(&self) -> Vec<WorklogRoleSummary> {
        let mut summaries = self.snapshot.worklog_summaries.clone();
        if !self.snapshot.worklog_entries.is_empty() {
            summaries.extend(actuals::summarize_worklogs(
                &self.snapshot.worklog_entries,
                &self.calendar,
                self.hours_per_day,
            ));
        }
        summaries
    }

    pub fn groups(&self, months: &[MonthInfo]) -> BusinessAreaGroups {
        grouping::group_resource_plans(&self.snapshot.resource_plans, months, self.name_policy)
    }

    pub fn report(&self, months: &[MonthInfo], reference: ReferenceMonth) -> PlanVsActualReport {
        summary::summarize(
            &self.snapshot.resource_plans,
            &self.actual_summaries(),
            months,
            reference,
            self.name_policy,
        )
    }

    pub fn project_tree(&self) -> Hierarchy {
        Hierarchy::projects(&self.snapshot.business_units, &self.snapshot.product_lines)
    }

    pub fn org_tree(&self) -> Hierarchy {
        Hierarchy::organization(&self.snapshot.departments, &self.snapshot.sub_teams)
    }

    /// Lazy-level loader over the snapshot's projects and users.
    pub fn loader(&self) -> InMemoryLoader<'_> {
        InMemoryLoader {
            projects: &self.snapshot.projects,
            users: &self.snapshot.users,
        }
    }
}
