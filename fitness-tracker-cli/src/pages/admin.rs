use super::ListPage;
use crate::api::{ApiClient, ApiError};
use crate::models::UserStatistics;

/// Every user's goals and workouts, fetched once per visit
#[derive(Debug, Default)]
pub struct AdminPage {
    pub statistics: ListPage<UserStatistics>,
}

impl AdminPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn refresh(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        let ticket = self.statistics.begin_fetch();
        let result = api.admin_statistics().await;
        self.statistics.settle(ticket, result)
    }

    pub fn leave(&mut self) {
        self.statistics.invalidate();
    }

    pub fn reset(&mut self) {
        self.statistics.reset();
    }
}
