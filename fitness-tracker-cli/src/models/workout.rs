use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{format_number, number, Resource};

/// Logged exercise session as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub activity: String,
    /// Minutes
    #[serde(deserialize_with = "number::deserialize")]
    pub duration: f64,
    #[serde(deserialize_with = "number::deserialize")]
    pub calories_burned: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /workouts` and `PUT /workouts/:id`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPayload {
    pub activity: String,
    pub duration: f64,
    pub calories_burned: f64,
}

impl Workout {
    pub fn duration_label(&self) -> String {
        format!("{} mins", format_number(self.duration))
    }

    pub fn calories_label(&self) -> String {
        format_number(self.calories_burned)
    }
}

impl Resource for Workout {
    type Payload = WorkoutPayload;

    const PATH: &'static str = "/workouts";
    const LABEL: &'static str = "Workout";

    fn id(&self) -> &str {
        &self.id
    }
}
