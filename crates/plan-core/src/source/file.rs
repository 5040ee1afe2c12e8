use super::{PlanSnapshot, PlanSource};
use crate::error::{PlanError, PlanResult};
use crate::model::ResourcePlanRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn save_snapshot_to_json<P: AsRef<Path>>(snapshot: &PlanSnapshot, path: P) -> PlanResult<()> {
    super::validate_snapshot(snapshot)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, snapshot)?;
    Ok(())
}

pub fn load_snapshot_from_json<P: AsRef<Path>>(path: P) -> PlanResult<PlanSnapshot> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let snapshot: PlanSnapshot = serde_json::from_reader(file)?;
    super::validate_snapshot(&snapshot)?;
    info!(
        path = %path.display(),
        plans = snapshot.resource_plans.len(),
        worklogs = snapshot.worklog_summaries.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

/// A snapshot stored as a single JSON document.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PlanSource for JsonFileSource {
    fn load_snapshot(&self) -> PlanResult<PlanSnapshot> {
        load_snapshot_from_json(&self.path)
    }
}

/// Flat CSV row; optional fields are empty cells.
#[derive(Default, Serialize, Deserialize)]
struct PlanCsvRecord {
    id: i64,
    project_id: i64,
    #[serde(default)]
    business_unit_name: String,
    #[serde(default)]
    project_role_id: String,
    #[serde(default)]
    project_role_name: String,
    #[serde(default)]
    position_id: String,
    #[serde(default)]
    position_name: String,
    #[serde(default)]
    user_id: String,
    year: i32,
    month: u32,
    planned_hours: f64,
}

impl From<&ResourcePlanRecord> for PlanCsvRecord {
    fn from(record: &ResourcePlanRecord) -> Self {
        Self {
            id: record.id,
            project_id: record.project_id,
            business_unit_name: record.business_unit_name.clone().unwrap_or_default(),
            project_role_id: format_option_i64(record.project_role_id),
            project_role_name: record.project_role_name.clone().unwrap_or_default(),
            position_id: format_option_i64(record.position_id),
            position_name: record.position_name.clone().unwrap_or_default(),
            user_id: format_option_i64(record.user_id),
            year: record.year,
            month: record.month,
            planned_hours: record.planned_hours,
        }
    }
}

impl PlanCsvRecord {
    fn into_record(self) -> PlanResult<ResourcePlanRecord> {
        let record = ResourcePlanRecord {
            id: self.id,
            project_id: self.project_id,
            business_unit_name: parse_string_option(self.business_unit_name),
            project_role_id: parse_i64(&self.project_role_id)?,
            project_role_name: parse_string_option(self.project_role_name),
            position_id: parse_i64(&self.position_id)?,
            position_name: parse_string_option(self.position_name),
            user_id: parse_i64(&self.user_id)?,
            year: self.year,
            month: self.month,
            planned_hours: self.planned_hours,
        };
        super::validate_record(&record)?;
        Ok(record)
    }
}

pub fn save_plans_to_csv<P: AsRef<Path>>(
    records: &[ResourcePlanRecord],
    path: P,
) -> PlanResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(PlanCsvRecord::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_plans_from_csv<P: AsRef<Path>>(path: P) -> PlanResult<Vec<ResourcePlanRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for row in reader.deserialize::<PlanCsvRecord>() {
        records.push(row?.into_record()?);
    }
    info!(path = %path.display(), plans = records.len(), "loaded resource plans from csv");
    Ok(records)
}

fn format_option_i64(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_i64(input: &str) -> PlanResult<Option<i64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|e| PlanError::InvalidData(format!("invalid integer '{input}': {e}")))
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
