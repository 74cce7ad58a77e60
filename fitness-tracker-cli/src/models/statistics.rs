use serde::{Deserialize, Serialize};

use super::{Goal, User, Workout};

/// One entry of `GET /admin/statistics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatistics {
    pub user: User,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub workouts: Vec<Workout>,
}
