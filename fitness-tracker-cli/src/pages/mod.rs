// Page state: what each screen shows and how it reacts to fetch results

mod admin;
mod dashboard;
mod entity;
mod profile;

use crate::api::ApiError;

pub use admin::AdminPage;
pub use dashboard::DashboardPage;
pub use entity::{EntityPage, GoalsPage, WorkoutsPage};
pub use profile::profile_rows;

pub const LOADING_MESSAGE: &str = "Loading...";
pub const NO_WORKOUTS: &str = "No workouts found.";
pub const NO_RECENT_GOALS: &str = "No recent goals found.";
pub const NO_RECENT_WORKOUTS: &str = "No recent workouts found.";
pub const NO_GOALS: &str = "No goals found.";
pub const NO_USERS: &str = "No users found.";
pub const NO_USER_GOALS: &str = "No goals available";
pub const NO_USER_WORKOUTS: &str = "No workouts available";

/// Identifies one fetch of a page. Only the most recent ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Loading,
    Empty,
    Ready(Vec<T>),
    Failed(String),
}

/// A collection fetched as a whole and shown as cards.
///
/// `Loading → Ready | Empty | Failed`; every refetch starts over at
/// `Loading`. Results are applied only when they belong to the latest
/// fetch, so a slow earlier response can never replace newer data.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    state: PageState<T>,
    generation: u64,
    /// Why the latest fetch failed
    error: Option<ApiError>,
}

impl<T> Default for ListPage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListPage<T> {
    pub fn new() -> Self {
        Self {
            state: PageState::Loading,
            generation: 0,
            error: None,
        }
    }

    pub fn state(&self) -> &PageState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PageState::Loading)
    }

    /// Error of the latest fetch when it failed
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Items currently shown; empty unless the page is `Ready`
    pub fn items(&self) -> &[T] {
        match &self.state {
            PageState::Ready(items) => items,
            _ => &[],
        }
    }

    /// Start a fetch: clear what is shown and hand out the new ticket
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = PageState::Loading;
        self.error = None;
        FetchTicket(self.generation)
    }

    /// Whether `ticket` belongs to the latest fetch
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Apply a fetch result. Returns `false` when the ticket is stale and
    /// the result was dropped.
    pub fn finish(&mut self, ticket: FetchTicket, result: Result<Vec<T>, ApiError>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                "Dropping stale response (ticket {}, current {})",
                ticket.0,
                self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(items) if items.is_empty() => PageState::Empty,
            Ok(items) => PageState::Ready(items),
            Err(e) => {
                tracing::warn!("Fetch failed: {}", e);
                let state = PageState::Failed(e.to_string());
                self.error = Some(e);
                state
            }
        };
        true
    }

    /// Apply a fetch result and hand back its error, if any
    pub fn settle(&mut self, ticket: FetchTicket, result: Result<Vec<T>, ApiError>) -> Result<(), ApiError> {
        let outcome = match &result {
            Ok(_) => Ok(()),
            Err(e) => Err(e.clone()),
        };
        self.finish(ticket, result);
        outcome
    }

    /// Forget in-flight fetches without touching what is shown
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Forget in-flight fetches and everything shown
    pub fn reset(&mut self) {
        self.invalidate();
        self.state = PageState::Loading;
        self.error = None;
    }
}
