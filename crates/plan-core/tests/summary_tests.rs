use resource_plan::{
    NamePolicy, Period, ReferenceMonth, ResourcePlanRecord, UNASSIGNED_BUSINESS_UNIT, Variance,
    WorklogRoleSummary, reporting_window, summarize,
};

fn scenario_records() -> Vec<ResourcePlanRecord> {
    vec![
        ResourcePlanRecord::new(1, 10, 2025, 6, 0.5)
            .with_business_unit("VSS")
            .with_project_role(1, "PM")
            .with_user(100),
        ResourcePlanRecord::new(2, 11, 2025, 6, 0.3)
            .with_business_unit("VSS")
            .with_project_role(1, "PM")
            .with_user(101),
        ResourcePlanRecord::new(3, 12, 2025, 6, 1.0).with_project_role(2, "QA"),
    ]
}

#[test]
fn end_to_end_scenario() {
    let months = reporting_window(ReferenceMonth::new(2025, 1), 12);
    let reference = ReferenceMonth::new(2025, 7);
    let report = summarize(
        &scenario_records(),
        &[],
        &months,
        reference,
        NamePolicy::FirstSeen,
    );

    let names: Vec<&str> = report.units.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["VSS", UNASSIGNED_BUSINESS_UNIT]);

    let pm = report.unit("VSS").unwrap().role("1").unwrap();
    assert_eq!(pm.role_name, "PM");
    let june = pm.cell("2025-6").unwrap();
    assert_eq!(june.plan, 0.8);
    assert_eq!(june.period, Period::Past);
    assert_eq!(june.display.text, "0.8/-");

    let qa = report
        .unit(UNASSIGNED_BUSINESS_UNIT)
        .unwrap()
        .role("2")
        .unwrap();
    assert_eq!(qa.cell("2025-6").unwrap().plan, 1.0);

    let july = pm.cell("2025-7").unwrap();
    assert_eq!(july.period, Period::Current);
    assert_eq!(july.display.variance, Variance::Empty);
}

#[test]
fn actuals_merge_by_role_id() {
    let months = reporting_window(ReferenceMonth::new(2025, 5), 3);
    let actuals = vec![
        WorklogRoleSummary {
            position_id: 1,
            year: 2025,
            month: 6,
            total_fte: 1.0,
        },
        WorklogRoleSummary {
            position_id: 1,
            year: 2025,
            month: 7,
            total_fte: 0.5,
        },
    ];
    let report = summarize(
        &scenario_records(),
        &actuals,
        &months,
        ReferenceMonth::new(2025, 7),
        NamePolicy::FirstSeen,
    );

    let pm = report.unit("VSS").unwrap().role("1").unwrap();
    let june = pm.cell("2025-6").unwrap();
    assert_eq!(june.actual, 1.0);
    assert_eq!(june.display.text, "0.8/1.0");
    assert_eq!(june.display.variance, Variance::Over);

    let july = pm.cell("2025-7").unwrap();
    assert_eq!(july.display.text, "0.0/0.5");
    assert_eq!(july.display.variance, Variance::Current);

    let qa_june = report
        .unit(UNASSIGNED_BUSINESS_UNIT)
        .unwrap()
        .role("2")
        .unwrap()
        .cell("2025-6")
        .unwrap();
    assert_eq!(qa_june.actual, 0.0);
    assert_eq!(qa_june.display.text, "1.0/-");
}

#[test]
fn totals_and_tbd_rollups() {
    let months = reporting_window(ReferenceMonth::new(2025, 6), 2);
    let actuals = vec![WorklogRoleSummary {
        position_id: 2,
        year: 2025,
        month: 6,
        total_fte: 0.5,
    }];
    let report = summarize(
        &scenario_records(),
        &actuals,
        &months,
        ReferenceMonth::new(2025, 7),
        NamePolicy::FirstSeen,
    );

    let vss = report.unit("VSS").unwrap();
    assert_eq!(vss.totals[0].month_key, "2025-6");
    assert_eq!(vss.totals[0].plan, 0.8);
    assert_eq!(vss.tbd_planned, 0.0);

    let unassigned = report.unit(UNASSIGNED_BUSINESS_UNIT).unwrap();
    assert_eq!(unassigned.tbd_planned, 1.0);
    assert_eq!(unassigned.totals[0].actual, 0.5);

    assert_eq!(report.grand_totals[0].plan, 1.8);
    assert_eq!(report.grand_totals[0].actual, 0.5);
    assert_eq!(report.grand_totals[1].plan, 0.0);
}

#[test]
fn grand_actual_counts_shared_role_once() {
    let records = vec![
        ResourcePlanRecord::new(1, 1, 2025, 3, 1.0)
            .with_business_unit("A")
            .with_position(4, "Dev"),
        ResourcePlanRecord::new(2, 2, 2025, 3, 1.0)
            .with_business_unit("B")
            .with_position(4, "Dev"),
    ];
    let actuals = vec![WorklogRoleSummary {
        position_id: 4,
        year: 2025,
        month: 3,
        total_fte: 2.0,
    }];
    let months = reporting_window(ReferenceMonth::new(2025, 3), 1);
    let report = summarize(
        &records,
        &actuals,
        &months,
        ReferenceMonth::new(2025, 4),
        NamePolicy::FirstSeen,
    );
    assert_eq!(report.unit("A").unwrap().totals[0].actual, 2.0);
    assert_eq!(report.unit("B").unwrap().totals[0].actual, 2.0);
    assert_eq!(report.grand_totals[0].actual, 2.0);
    assert_eq!(report.grand_totals[0].plan, 2.0);
}

#[test]
fn empty_input_reports_no_data() {
    let months = reporting_window(ReferenceMonth::new(2025, 1), 12);
    let report = summarize(
        &[],
        &[],
        &months,
        ReferenceMonth::new(2025, 7),
        NamePolicy::FirstSeen,
    );
    assert!(report.is_empty());
    assert_eq!(report.grand_totals.len(), 12);
    assert!(report.grand_totals.iter().all(|t| t.plan == 0.0));
}
