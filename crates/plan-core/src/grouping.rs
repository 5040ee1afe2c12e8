use crate::model::ResourcePlanRecord;
use crate::period::{MonthInfo, month_key};
use crate::resolve::{self, NamePolicy, UNASSIGNED_BUSINESS_UNIT};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Planned hours of one role inside one business unit, summed per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPosition {
    pub id: String,
    pub name: String,
    /// `"year-month"` → summed planned hours.
    pub data: BTreeMap<String, f64>,
    #[serde(rename = "totalFte")]
    pub total_fte: f64,
}

impl AggregatedPosition {
    fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            data: BTreeMap::new(),
            total_fte: 0.0,
        }
    }

    fn accumulate(&mut self, key: String, hours: f64) {
        *self.data.entry(key).or_insert(0.0) += hours;
        self.total_fte += hours;
    }

    /// Planned hours for `month`, zero when nothing was planned.
    pub fn value_for(&self, month: &MonthInfo) -> f64 {
        self.value_at(month.year, month.month)
    }

    pub fn value_at(&self, year: i32, month: u32) -> f64 {
        self.data
            .get(&month_key(year, month))
            .copied()
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessAreaGroup {
    pub name: String,
    /// Sorted by `total_fte` descending; ties keep first-encounter order.
    pub positions: Vec<AggregatedPosition>,
}

impl BusinessAreaGroup {
    pub fn position(&self, role_id: &str) -> Option<&AggregatedPosition> {
        self.positions.iter().find(|p| p.id == role_id)
    }
}

/// Two records shared a role key but carried different display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameConflict {
    pub business_unit: String,
    pub role_id: String,
    pub existing: String,
    pub incoming: String,
    pub kept: String,
    pub record_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessAreaGroups {
    units: Vec<BusinessAreaGroup>,
    months: Vec<MonthInfo>,
    conflicts: Vec<NameConflict>,
    outside_window: usize,
}

impl BusinessAreaGroups {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Units in display order: alphabetical, `"Unassigned"` last.
    pub fn units(&self) -> &[BusinessAreaGroup] {
        &self.units
    }

    pub fn unit_names(&self) -> Vec<String> {
        self.units.iter().map(|u| u.name.clone()).collect()
    }

    pub fn unit(&self, name: &str) -> Option<&BusinessAreaGroup> {
        self.units.iter().find(|u| u.name == name)
    }

    pub fn position(&self, unit: &str, role_id: &str) -> Option<&AggregatedPosition> {
        self.unit(unit).and_then(|u| u.position(role_id))
    }

    pub fn months(&self) -> &[MonthInfo] {
        &self.months
    }

    pub fn name_conflicts(&self) -> &[NameConflict] {
        &self.conflicts
    }

    /// Records whose month is not part of the reporting window. They still count in the sums.
    pub fn outside_window(&self) -> usize {
        self.outside_window
    }

    /// Nested mapping `unit → role id → position`.
    pub fn to_mapping(&self) -> BTreeMap<String, BTreeMap<String, AggregatedPosition>> {
        self.units
            .iter()
            .map(|unit| {
                let roles = unit
                    .positions
                    .iter()
                    .map(|p| (p.id.clone(), p.clone()))
                    .collect();
                (unit.name.clone(), roles)
            })
            .collect()
    }
}

#[derive(Default)]
struct UnitAccumulator {
    positions: Vec<AggregatedPosition>,
    index: HashMap<String, usize>,
}

/// Partitions plan records into business unit → role → month buckets.
pub fn group_resource_plans(
    records: &[ResourcePlanRecord],
    months: &[MonthInfo],
    policy: NamePolicy,
) -> BusinessAreaGroups {
    let window: HashSet<String> = months.iter().map(MonthInfo::key).collect();
    let mut grouped: HashMap<String, UnitAccumulator> = HashMap::new();
    let mut conflicts = Vec::new();
    let mut outside_window = 0;

    for record in records {
        let bu = resolve::business_unit_of(record);
        let role_id = resolve::role_key_of(record);
        let role_name = resolve::role_name_of(record, &role_id);

        let unit = grouped.entry(bu.to_string()).or_default();
        let slot = match unit.index.get(&role_id) {
            Some(&slot) => {
                let current = &mut unit.positions[slot].name;
                let existing = current.clone();
                if policy.reconcile(current, &role_name) {
                    conflicts.push(NameConflict {
                        business_unit: bu.to_string(),
                        role_id: role_id.clone(),
                        existing,
                        incoming: role_name,
                        kept: current.clone(),
                        record_id: record.id,
                    });
                }
                slot
            }
            None => {
                unit.positions
                    .push(AggregatedPosition::new(role_id.clone(), role_name));
                unit.index.insert(role_id, unit.positions.len() - 1);
                unit.positions.len() - 1
            }
        };

        let key = month_key(record.year, record.month);
        if !window.is_empty() && !window.contains(&key) {
            outside_window += 1;
        }
        unit.positions[slot].accumulate(key, record.planned_hours);
    }

    let mut units: Vec<BusinessAreaGroup> = grouped
        .into_iter()
        .map(|(name, acc)| {
            let mut positions = acc.positions;
            for position in &mut positions {
                // Re-derived from `data` so both agree bit-for-bit.
                position.total_fte = position.data.values().sum();
            }
            positions.sort_by(|a, b| {
                b.total_fte
                    .partial_cmp(&a.total_fte)
                    .unwrap_or(Ordering::Equal)
            });
            BusinessAreaGroup { name, positions }
        })
        .collect();
    units.sort_by(|a, b| compare_unit_names(&a.name, &b.name));

    debug!(
        records = records.len(),
        units = units.len(),
        conflicts = conflicts.len(),
        outside_window,
        "grouped resource plans"
    );

    BusinessAreaGroups {
        units,
        months: months.to_vec(),
        conflicts,
        outside_window,
    }
}

/// Alphabetical, except `"Unassigned"` always sorts after every other name.
pub fn compare_unit_names(a: &str, b: &str) -> Ordering {
    let a_unassigned = a == UNASSIGNED_BUSINESS_UNIT;
    let b_unassigned = b == UNASSIGNED_BUSINESS_UNIT;
    a_unassigned.cmp(&b_unassigned).then_with(|| a.cmp(b))
}
