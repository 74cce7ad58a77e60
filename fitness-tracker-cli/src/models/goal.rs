use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{format_number, number, Resource};

/// Fitness target tracked over a recurring period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub goal_type: String,
    #[serde(deserialize_with = "number::deserialize")]
    pub target_value: f64,
    /// Percent, maintained by the server
    #[serde(default, deserialize_with = "number::deserialize")]
    pub progress: f64,
    pub time_frame: TimeFrame,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    Weekly,
    Monthly,
}

/// Body of `POST /goals` and `PUT /goals/:id`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPayload {
    pub goal_type: String,
    pub target_value: f64,
    pub time_frame: TimeFrame,
}

impl Goal {
    pub fn target_label(&self) -> String {
        format_number(self.target_value)
    }

    pub fn progress_label(&self) -> String {
        format!("{}%", format_number(self.progress))
    }
}

impl TimeFrame {
    /// Wire values, in the order a picker offers them
    pub const CHOICES: &'static [&'static str] = &["weekly", "monthly"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Weekly => "weekly",
            TimeFrame::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TimeFrame {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(TimeFrame::Weekly),
            "monthly" => Ok(TimeFrame::Monthly),
            _ => Err(anyhow::anyhow!("Invalid time frame: {}", s)),
        }
    }
}

impl Resource for Goal {
    type Payload = GoalPayload;

    const PATH: &'static str = "/goals";
    const LABEL: &'static str = "Goal";

    fn id(&self) -> &str {
        &self.id
    }
}
