use super::ListPage;
use crate::api::{ApiClient, ApiError};
use crate::models::{Goal, Workout};

/// Read-only summary of the user's workouts and goals
#[derive(Debug, Default)]
pub struct DashboardPage {
    pub workouts: ListPage<Workout>,
    pub goals: ListPage<Goal>,
}

impl DashboardPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch both collections at once; the first error is handed back
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        let workouts_ticket = self.workouts.begin_fetch();
        let goals_ticket = self.goals.begin_fetch();

        let (workouts, goals) = tokio::join!(api.list::<Workout>(), api.list::<Goal>());

        let workouts = self.workouts.settle(workouts_ticket, workouts);
        let goals = self.goals.settle(goals_ticket, goals);
        workouts.and(goals)
    }

    pub fn is_loading(&self) -> bool {
        self.workouts.is_loading() || self.goals.is_loading()
    }

    pub fn leave(&mut self) {
        self.workouts.invalidate();
        self.goals.invalidate();
    }

    pub fn reset(&mut self) {
        self.workouts.reset();
        self.goals.reset();
    }
}
