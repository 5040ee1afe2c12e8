pub mod actuals;
pub mod calendar;
#[cfg(feature = "rest_client")]
pub mod client;
pub mod config;
pub mod error;
pub mod grouping;
pub mod hierarchy;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod model;
pub mod period;
pub mod report;
pub mod resolve;
pub mod source;
pub mod summary;
pub mod telemetry;
pub mod variance;
pub mod workspace;

pub use actuals::{ActualsIndex, summarize_worklogs};
pub use calendar::{WorkCalendar, WorkCalendarConfig};
#[cfg(feature = "rest_client")]
pub use client::ApiClient;
pub use config::PlannerConfig;
pub use error::{PlanError, PlanResult};
pub use grouping::{
    AggregatedPosition, BusinessAreaGroup, BusinessAreaGroups, NameConflict, group_resource_plans,
};
pub use hierarchy::{
    ChildLoader, ExpansionState, Hierarchy, NodeKind, TreeNode, build_tree, filter_tree,
};
pub use model::{
    BusinessUnit, Department, ProductLine, Project, ResourcePlanRecord, SubTeam, User,
    WorklogEntry, WorklogRoleSummary,
};
pub use period::{
    MAX_WINDOW_MONTHS, MonthInfo, Period, ReferenceMonth, classify_period, month_key,
    reporting_window,
};
pub use report::{export_report_csv, render_text_table, report_dataframe};
pub use resolve::{NamePolicy, UNASSIGNED_BUSINESS_UNIT, UNKNOWN_ROLE};
pub use source::{
    JsonFileSource, PlanSnapshot, PlanSource, load_plans_from_csv, load_snapshot_from_json,
    save_plans_to_csv, save_snapshot_to_json, validate_snapshot,
};
pub use summary::{PlanVsActualReport, summarize};
pub use variance::{CellDisplay, Variance, render_cell};
pub use workspace::PlanWorkspace;
