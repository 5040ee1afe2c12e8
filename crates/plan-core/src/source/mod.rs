use crate::error::{PlanError, PlanResult};
use crate::model::{
    BusinessUnit, Department, ProductLine, Project, ResourcePlanRecord, SubTeam, User,
    WorklogEntry, WorklogRoleSummary,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything the planning views read, as fetched from the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    #[serde(default)]
    pub resource_plans: Vec<ResourcePlanRecord>,
    #[serde(default)]
    pub worklog_summaries: Vec<WorklogRoleSummary>,
    #[serde(default)]
    pub worklog_entries: Vec<WorklogEntry>,
    #[serde(default)]
    pub business_units: Vec<BusinessUnit>,
    #[serde(default)]
    pub product_lines: Vec<ProductLine>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub sub_teams: Vec<SubTeam>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// Anything that can produce a [`PlanSnapshot`].
pub trait PlanSource {
    fn load_snapshot(&self) -> PlanResult<PlanSnapshot>;
}

pub fn validate_record(record: &ResourcePlanRecord) -> PlanResult<()> {
    if !(1..=12).contains(&record.month) {
        return Err(PlanError::InvalidData(format!(
            "resource plan {} has month {} (must be 1-12)",
            record.id, record.month
        )));
    }
    if !record.planned_hours.is_finite() || record.planned_hours < 0.0 {
        return Err(PlanError::InvalidData(format!(
            "resource plan {} has invalid planned_hours {}",
            record.id, record.planned_hours
        )));
    }
    Ok(())
}

/// Rejects malformed input before it reaches aggregation.
pub fn validate_snapshot(snapshot: &PlanSnapshot) -> PlanResult<()> {
    let mut seen_ids = HashSet::with_capacity(snapshot.resource_plans.len());
    for record in &snapshot.resource_plans {
        if !seen_ids.insert(record.id) {
            return Err(PlanError::InvalidData(format!(
                "duplicate resource plan id {}",
                record.id
            )));
        }
        validate_record(record)?;
    }
    for summary in &snapshot.worklog_summaries {
        if !(1..=12).contains(&summary.month) {
            return Err(PlanError::InvalidData(format!(
                "worklog summary for position {} has month {} (must be 1-12)",
                summary.position_id, summary.month
            )));
        }
        if !summary.total_fte.is_finite() {
            return Err(PlanError::InvalidData(format!(
                "worklog summary for position {} has non-finite total_fte",
                summary.position_id
            )));
        }
    }
    for entry in &snapshot.worklog_entries {
        if !entry.hours.is_finite() || entry.hours < 0.0 {
            return Err(PlanError::InvalidData(format!(
                "worklog entry for user {} on {} has invalid hours {}",
                entry.user_id, entry.work_date, entry.hours
            )));
        }
    }
    Ok(())
}

pub mod file;

pub use file::{
    JsonFileSource, load_plans_from_csv, load_snapshot_from_json, save_plans_to_csv,
    save_snapshot_to_json,
};
