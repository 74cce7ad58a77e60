pub mod goal;
pub mod statistics;
pub mod user;
pub mod workout;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use goal::{Goal, GoalPayload, TimeFrame};
pub use statistics::UserStatistics;
pub use user::{Role, User};
pub use workout::{Workout, WorkoutPayload};

/// An entity the backend exposes as a CRUD collection
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Body sent on create and update
    type Payload: Serialize + Send + Sync + 'static;

    /// Collection path relative to the API base URL
    const PATH: &'static str;

    /// Human readable name used in titles and messages
    const LABEL: &'static str;

    fn id(&self) -> &str;
}

/// Format a numeric value without a trailing `.0` for whole numbers
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Numeric fields that may arrive as JSON numbers or numeric strings.
///
/// Older clients sent raw form input, so stored documents can carry either.
pub(crate) mod number {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| de::Error::custom(format!("expected a number, found {:?}", s))),
        }
    }
}
