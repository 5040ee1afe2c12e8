use crate::period::Period;
use serde::{Deserialize, Serialize};

/// Differences within this many hours are treated as noise, not variance.
pub const VARIANCE_DEAD_BAND: f64 = 0.1;

pub const EMPTY_CELL: &str = "-";

/// Styling tag attached to a rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variance {
    /// Nothing planned and nothing logged.
    Empty,
    /// Future month, plan only.
    Planned,
    /// Current month; informational, not pass/fail.
    Current,
    /// Past month within the dead band.
    Neutral,
    /// Past month where actual exceeded plan.
    Over,
    /// Past month where actual fell short of plan.
    Under,
}

impl Variance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variance::Empty => "empty",
            Variance::Planned => "planned",
            Variance::Current => "current",
            Variance::Neutral => "neutral",
            Variance::Over => "over",
            Variance::Under => "under",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellDisplay {
    pub text: String,
    pub variance: Variance,
}

impl CellDisplay {
    fn empty() -> Self {
        Self {
            text: EMPTY_CELL.to_string(),
            variance: Variance::Empty,
        }
    }
}

/// One decimal place.
pub fn format_hours(value: f64) -> String {
    format!("{value:.1}")
}

fn format_or_dash(value: f64) -> String {
    if value == 0.0 {
        EMPTY_CELL.to_string()
    } else {
        format_hours(value)
    }
}

/// Past-month classification of `actual` against `plan`.
pub fn classify_variance(plan: f64, actual: f64) -> Variance {
    if plan > 0.0 && actual > 0.0 {
        let diff = actual - plan;
        if diff > VARIANCE_DEAD_BAND {
            return Variance::Over;
        }
        if diff < -VARIANCE_DEAD_BAND {
            return Variance::Under;
        }
    }
    Variance::Neutral
}

/// Display text and variance tag for one (role, month) cell.
pub fn render_cell(plan: f64, actual: f64, period: Period) -> CellDisplay {
    match period {
        Period::Future => {
            if plan == 0.0 {
                CellDisplay::empty()
            } else {
                CellDisplay {
                    text: format_hours(plan),
                    variance: Variance::Planned,
                }
            }
        }
        Period::Current => {
            if plan == 0.0 && actual == 0.0 {
                return CellDisplay::empty();
            }
            CellDisplay {
                text: format!("{}/{}", format_hours(plan), format_hours(actual)),
                variance: Variance::Current,
            }
        }
        Period::Past => {
            if plan == 0.0 && actual == 0.0 {
                return CellDisplay::empty();
            }
            CellDisplay {
                text: format!("{}/{}", format_or_dash(plan), format_or_dash(actual)),
                variance: classify_variance(plan, actual),
            }
        }
    }
}
