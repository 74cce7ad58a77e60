use anyhow::{bail, Result};
use clap::Args;

use super::entity::print_page;
use super::goals::goal_line;
use super::prompt::with_spinner;
use super::workouts::workout_line;
use super::{check_session, Context};
use crate::nav::Route;
use crate::pages::{DashboardPage, NO_GOALS, NO_RECENT_WORKOUTS};

#[derive(Args)]
pub struct DashboardCommand {}

impl DashboardCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let mut session = ctx.session_for(Route::Dashboard)?;
        let date_format = session.config().ui.date_format.clone();

        if let Some(user) = session.user() {
            println!("Welcome, {}!", user.name);
            println!();
        }

        let mut page = DashboardPage::new();
        let result = with_spinner("Loading dashboard...", page.refresh(session.api())).await;
        check_session(&mut session, &result);

        let workouts = print_page("Recent Workouts", &page.workouts, NO_RECENT_WORKOUTS, |w| {
            workout_line(w, &date_format)
        });
        let goals = print_page("Goals", &page.goals, NO_GOALS, goal_line);

        if workouts.is_err() || goals.is_err() {
            bail!("Failed to load the dashboard");
        }
        Ok(())
    }
}
