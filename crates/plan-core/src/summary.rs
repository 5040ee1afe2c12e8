use crate::actuals::ActualsIndex;
use crate::grouping::{self, BusinessAreaGroups, NameConflict};
use crate::model::{ResourcePlanRecord, WorklogRoleSummary};
use crate::period::{MonthInfo, Period, ReferenceMonth};
use crate::resolve::{self, NamePolicy};
use crate::variance::{self, CellDisplay};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryCell {
    pub month_key: String,
    pub period: Period,
    pub plan: f64,
    pub actual: f64,
    #[serde(flatten)]
    pub display: CellDisplay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRow {
    pub role_id: String,
    pub role_name: String,
    #[serde(rename = "totalFte")]
    pub total_fte: f64,
    pub cells: Vec<SummaryCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month_key: String,
    pub label: String,
    pub plan: f64,
    pub actual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub name: String,
    pub roles: Vec<RoleRow>,
    /// Per-month plan and actual summed over the unit's roles.
    pub totals: Vec<MonthTotal>,
    /// Planned hours on records with no assigned person.
    pub tbd_planned: f64,
}

/// Plan-vs-actual view over a reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanVsActualReport {
    pub reference: ReferenceMonth,
    pub months: Vec<MonthInfo>,
    pub units: Vec<UnitSummary>,
    /// Plan summed over every unit; actual counted once per role id.
    pub grand_totals: Vec<MonthTotal>,
    pub name_conflicts: Vec<NameConflict>,
}

impl PlanVsActualReport {
    /// True when there is nothing to show; consumers render a "no data" state.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn unit(&self, name: &str) -> Option<&UnitSummary> {
        self.units.iter().find(|u| u.name == name)
    }
}

impl UnitSummary {
    pub fn role(&self, role_id: &str) -> Option<&RoleRow> {
        self.roles.iter().find(|r| r.role_id == role_id)
    }
}

impl RoleRow {
    pub fn cell(&self, month_key: &str) -> Option<&SummaryCell> {
        self.cells.iter().find(|c| c.month_key == month_key)
    }
}

/// Groups plans, merges actuals and renders every (role, month) cell of the window.
pub fn summarize(
    records: &[ResourcePlanRecord],
    actuals: &[WorklogRoleSummary],
    months: &[MonthInfo],
    reference: ReferenceMonth,
    policy: NamePolicy,
) -> PlanVsActualReport {
    let groups = grouping::group_resource_plans(records, months, policy);
    let index = ActualsIndex::from_summaries(actuals);
    let tbd = tbd_planned_by_unit(records);
    build_report(&groups, &index, &tbd, reference)
}

fn tbd_planned_by_unit(records: &[ResourcePlanRecord]) -> HashMap<String, f64> {
    let mut tbd: HashMap<String, f64> = HashMap::new();
    for record in records.iter().filter(|r| r.is_tbd()) {
        *tbd
            .entry(resolve::business_unit_of(record).to_string())
            .or_insert(0.0) += record.planned_hours;
    }
    tbd
}

fn build_report(
    groups: &BusinessAreaGroups,
    index: &ActualsIndex,
    tbd: &HashMap<String, f64>,
    reference: ReferenceMonth,
) -> PlanVsActualReport {
    let months = groups.months();
    let mut units = Vec::with_capacity(groups.units().len());
    let mut seen_roles = BTreeSet::new();

    for unit in groups.units() {
        let mut totals = empty_totals(months);
        let mut roles = Vec::with_capacity(unit.positions.len());
        for position in &unit.positions {
            seen_roles.insert(position.id.clone());
            let cells = months
                .iter()
                .zip(totals.iter_mut())
                .map(|(month, total)| {
                    let plan = position.value_for(month);
                    let actual = index.actual(&position.id, month.year, month.month);
                    total.plan += plan;
                    total.actual += actual;
                    let period = month.period(reference);
                    SummaryCell {
                        month_key: month.key(),
                        period,
                        plan,
                        actual,
                        display: variance::render_cell(plan, actual, period),
                    }
                })
                .collect();
            roles.push(RoleRow {
                role_id: position.id.clone(),
                role_name: position.name.clone(),
                total_fte: position.total_fte,
                cells,
            });
        }
        units.push(UnitSummary {
            name: unit.name.clone(),
            roles,
            totals,
            tbd_planned: tbd.get(&unit.name).copied().unwrap_or(0.0),
        });
    }

    let mut grand_totals = empty_totals(months);
    for (month, total) in months.iter().zip(grand_totals.iter_mut()) {
        total.plan = units
            .iter()
            .map(|u| {
                u.totals
                    .iter()
                    .find(|t| t.month_key == total.month_key)
                    .map(|t| t.plan)
                    .unwrap_or(0.0)
            })
            .sum();
        total.actual = seen_roles
            .iter()
            .map(|role| index.actual(role, month.year, month.month))
            .sum();
    }

    debug!(
        units = units.len(),
        months = months.len(),
        %reference,
        "built plan-vs-actual report"
    );

    PlanVsActualReport {
        reference,
        months: months.to_vec(),
        units,
        grand_totals,
        name_conflicts: groups.name_conflicts().to_vec(),
    }
}

fn empty_totals(months: &[MonthInfo]) -> Vec<MonthTotal> {
    months
        .iter()
        .map(|month| MonthTotal {
            month_key: month.key(),
            label: month.label.clone(),
            plan: 0.0,
            actual: 0.0,
        })
        .collect()
}
