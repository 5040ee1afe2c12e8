use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Planned allocation of one role to a project for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePlanRecord {
    pub id: i64,
    pub project_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_unit_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_role_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_role_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_name: Option<String>,
    /// Assigned person. `None` marks a TBD position (an unfilled headcount need).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub year: i32,
    pub month: u32,
    pub planned_hours: f64,
}

impl ResourcePlanRecord {
    pub fn new(id: i64, project_id: i64, year: i32, month: u32, planned_hours: f64) -> Self {
        Self {
            id,
            project_id,
            business_unit_name: None,
            project_role_id: None,
            project_role_name: None,
            position_id: None,
            position_name: None,
            user_id: None,
            year,
            month,
            planned_hours,
        }
    }

    pub fn with_business_unit(mut self, name: impl Into<String>) -> Self {
        self.business_unit_name = Some(name.into());
        self
    }

    pub fn with_project_role(mut self, id: i64, name: impl Into<String>) -> Self {
        self.project_role_id = Some(id);
        self.project_role_name = Some(name.into());
        self
    }

    pub fn with_position(mut self, id: i64, name: impl Into<String>) -> Self {
        self.position_id = Some(id);
        self.position_name = Some(name.into());
        self
    }

    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn is_tbd(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Actual effort logged for a position in one month, already expressed as FTE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorklogRoleSummary {
    pub position_id: i64,
    pub year: i32,
    pub month: u32,
    pub total_fte: f64,
}

/// One line of a weekly worklog sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorklogEntry {
    pub user_id: i64,
    pub position_id: i64,
    pub project_id: i64,
    pub work_date: NaiveDate,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessUnit {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLine {
    pub id: i64,
    pub business_unit_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub product_line_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTeam {
    pub id: i64,
    pub department_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub sub_team_id: i64,
    pub name: String,
    /// Employee number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
