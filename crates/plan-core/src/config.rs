use crate::calendar::{WorkCalendar, WorkCalendarConfig};
use crate::error::{PlanError, PlanResult};
use crate::period::MAX_WINDOW_MONTHS;
use crate::resolve::NamePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_PATH_VAR: &str = "RESOURCE_PLAN_CONFIG";
const ENV_PREFIX: &str = "RESOURCE_PLAN_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub http_addr: String,
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    /// JSON snapshot loaded at startup.
    pub snapshot_path: Option<String>,
    pub window_months: usize,
    pub hours_per_day: f64,
    pub log_level: String,
    pub name_policy: NamePolicy,
    pub calendar: WorkCalendarConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:3000".to_string(),
            api_base_url: None,
            api_token: None,
            snapshot_path: None,
            window_months: 12,
            hours_per_day: 8.0,
            log_level: "info".to_string(),
            name_policy: NamePolicy::default(),
            calendar: WorkCalendarConfig::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> PlanResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> PlanResult<Self> {
        let config: PlannerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the JSON file named by `RESOURCE_PLAN_CONFIG`, then
    /// `RESOURCE_PLAN_*` variables.
    pub fn from_env() -> PlanResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> PlanResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(|name| lookup(&format!("{ENV_PREFIX}{name}")))?;
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, var: F) -> PlanResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = var("HTTP_ADDR") {
            self.http_addr = addr;
        }
        if let Some(url) = var("API_URL") {
            self.api_base_url = Some(url);
        }
        if let Some(token) = var("API_TOKEN") {
            self.api_token = Some(token);
        }
        if let Some(path) = var("SNAPSHOT") {
            self.snapshot_path = Some(path);
        }
        if let Some(months) = var("WINDOW_MONTHS") {
            self.window_months = months.trim().parse().map_err(|e| {
                PlanError::Config(format!("invalid {ENV_PREFIX}WINDOW_MONTHS '{months}': {e}"))
            })?;
        }
        if let Some(hours) = var("HOURS_PER_DAY") {
            self.hours_per_day = hours.trim().parse().map_err(|e| {
                PlanError::Config(format!("invalid {ENV_PREFIX}HOURS_PER_DAY '{hours}': {e}"))
            })?;
        }
        if let Some(level) = var("LOG") {
            self.log_level = level;
        }
        if let Some(policy) = var("NAME_POLICY") {
            self.name_policy = policy.parse().map_err(PlanError::Config)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> PlanResult<()> {
        if self.window_months == 0 || self.window_months > MAX_WINDOW_MONTHS {
            return Err(PlanError::Config(format!(
                "window_months must be between 1 and {MAX_WINDOW_MONTHS} (got {})",
                self.window_months
            )));
        }
        if !self.hours_per_day.is_finite() || self.hours_per_day <= 0.0 {
            return Err(PlanError::Config(format!(
                "hours_per_day must be positive (got {})",
                self.hours_per_day
            )));
        }
        WorkCalendar::from_config(&self.calendar)?;
        Ok(())
    }

    pub fn work_calendar(&self) -> PlanResult<WorkCalendar> {
        WorkCalendar::from_config(&self.calendar)
    }
}
