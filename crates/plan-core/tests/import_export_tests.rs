use std::io::Write;

use chrono::NaiveDate;
use resource_plan::{
    BusinessUnit, JsonFileSource, PlanError, PlanSnapshot, PlanSource, ProductLine,
    ResourcePlanRecord, WorklogEntry, WorklogRoleSummary, load_plans_from_csv,
    load_snapshot_from_json, save_plans_to_csv, save_snapshot_to_json, validate_snapshot,
};
use tempfile::NamedTempFile;

fn build_sample_snapshot() -> PlanSnapshot {
    PlanSnapshot {
        resource_plans: vec![
            ResourcePlanRecord::new(1, 10, 2025, 6, 0.5)
                .with_business_unit("VSS")
                .with_project_role(7, "PM")
                .with_user(100),
            ResourcePlanRecord::new(2, 12, 2025, 6, 1.0).with_position(5, "QA"),
        ],
        worklog_summaries: vec![WorklogRoleSummary {
            position_id: 7,
            year: 2025,
            month: 6,
            total_fte: 0.4,
        }],
        worklog_entries: vec![WorklogEntry {
            user_id: 100,
            position_id: 7,
            project_id: 10,
            work_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            hours: 6.5,
        }],
        business_units: vec![BusinessUnit {
            id: 1,
            name: "VSS".into(),
            code: Some("BU-VSS".into()),
        }],
        product_lines: vec![ProductLine {
            id: 10,
            business_unit_id: 1,
            name: "Cameras".into(),
            code: None,
        }],
        ..PlanSnapshot::default()
    }
}

#[test]
fn json_snapshot_persists_all_sections() {
    let snapshot = build_sample_snapshot();
    let tmp = NamedTempFile::new().expect("create temp file");

    save_snapshot_to_json(&snapshot, tmp.path()).expect("save json");
    let loaded = load_snapshot_from_json(tmp.path()).expect("load json");
    assert_eq!(loaded, snapshot);

    let via_source = JsonFileSource::new(tmp.path()).load_snapshot().unwrap();
    assert_eq!(via_source.resource_plans.len(), 2);
}

#[test]
fn json_snapshot_accepts_missing_sections() {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(
        tmp,
        r#"{{"resource_plans":[{{"id":1,"project_id":2,"year":2025,"month":3,"planned_hours":1.5}}]}}"#
    )
    .unwrap();
    let loaded = load_snapshot_from_json(tmp.path()).unwrap();
    assert_eq!(loaded.resource_plans.len(), 1);
    assert!(loaded.resource_plans[0].business_unit_name.is_none());
    assert!(loaded.departments.is_empty());
}

#[test]
fn csv_plans_keep_optional_fields() {
    let snapshot = build_sample_snapshot();
    let tmp = NamedTempFile::new().unwrap();

    save_plans_to_csv(&snapshot.resource_plans, tmp.path()).expect("save csv");
    let loaded = load_plans_from_csv(tmp.path()).expect("load csv");
    assert_eq!(loaded, snapshot.resource_plans);
    assert!(loaded[1].is_tbd());
    assert_eq!(loaded[1].position_name.as_deref(), Some("QA"));
}

#[test]
fn csv_rejects_bad_integer() {
    let mut tmp = NamedTempFile::new().unwrap();
    writeln!(
        tmp,
        "id,project_id,business_unit_name,project_role_id,project_role_name,position_id,position_name,user_id,year,month,planned_hours"
    )
    .unwrap();
    writeln!(tmp, "1,2,VSS,seven,PM,,,,2025,6,1.0").unwrap();
    let err = load_plans_from_csv(tmp.path()).unwrap_err();
    assert!(matches!(err, PlanError::InvalidData(_)), "{err}");
}

#[test]
fn validation_rejects_bad_records() {
    let mut snapshot = build_sample_snapshot();
    snapshot.resource_plans[1].id = 1;
    assert!(matches!(
        validate_snapshot(&snapshot),
        Err(PlanError::InvalidData(_))
    ));

    let mut snapshot = build_sample_snapshot();
    snapshot.resource_plans[0].month = 13;
    assert!(validate_snapshot(&snapshot).is_err());

    let mut snapshot = build_sample_snapshot();
    snapshot.resource_plans[0].planned_hours = -1.0;
    assert!(validate_snapshot(&snapshot).is_err());

    let mut snapshot = build_sample_snapshot();
    snapshot.worklog_summaries[0].total_fte = f64::NAN;
    assert!(validate_snapshot(&snapshot).is_err());

    let tmp = NamedTempFile::new().unwrap();
    let mut invalid = build_sample_snapshot();
    invalid.resource_plans[0].month = 0;
    assert!(save_snapshot_to_json(&invalid, tmp.path()).is_err());
}

#[test]
fn missing_file_is_io_error() {
    let err = load_snapshot_from_json("/nonexistent/snapshot.json").unwrap_err();
    assert!(matches!(err, PlanError::Io(_)));
}
