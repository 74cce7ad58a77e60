use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::entity::print_page;
use super::prompt::with_spinner;
use super::{check_session, Context};
use crate::models::UserStatistics;
use crate::nav::Route;
use crate::pages::{AdminPage, NO_USERS, NO_USER_GOALS, NO_USER_WORKOUTS};

#[derive(Args)]
pub struct AdminCommand {}

/// One block per user: who they are, then their goals and workouts
fn user_block(stats: &UserStatistics) -> String {
    let mut lines = vec![
        format!("{} <{}> ({})", stats.user.name.bold(), stats.user.email, stats.user.role),
        "  Goals:".to_string(),
    ];

    if stats.goals.is_empty() {
        lines.push(format!("    {}", NO_USER_GOALS));
    }
    lines.extend(stats.goals.iter().map(|goal| {
        format!(
            "    {} - target {} ({}, {})",
            goal.goal_type,
            goal.target_label(),
            goal.time_frame,
            goal.progress_label()
        )
    }));

    lines.push("  Workouts:".to_string());
    if stats.workouts.is_empty() {
        lines.push(format!("    {}", NO_USER_WORKOUTS));
    }
    lines.extend(stats.workouts.iter().map(|workout| {
        format!(
            "    {} - {}, {} kcal",
            workout.activity,
            workout.duration_label(),
            workout.calories_label()
        )
    }));

    lines.push(String::new());
    lines.join("\n")
}

impl AdminCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let mut session = ctx.session_for(Route::Admin)?;

        let mut page = AdminPage::new();
        let result = with_spinner("Loading statistics...", page.refresh(session.api())).await;
        check_session(&mut session, &result);

        print_page("Admin Dashboard", &page.statistics, NO_USERS, user_block)
    }
}
