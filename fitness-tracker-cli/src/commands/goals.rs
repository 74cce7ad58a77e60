use anyhow::Result;
use clap::{Args, Subcommand};

use super::{entity, Context};
use crate::forms::GoalForm;
use crate::models::Goal;
use crate::nav::Route;
use crate::pages::NO_RECENT_GOALS;

#[derive(Subcommand)]
pub enum GoalsSubcommands {
    /// List your goals
    List,

    /// Create a new goal
    Add(GoalFields),

    /// Edit a goal
    Edit {
        /// Goal ID
        id: String,

        #[command(flatten)]
        fields: GoalFields,
    },

    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Field values; anything left out is prompted for
#[derive(Args)]
pub struct GoalFields {
    /// Goal type, e.g. "run-distance"
    #[arg(short = 'g', long)]
    goal_type: Option<String>,

    /// Numeric target
    #[arg(short, long)]
    target: Option<String>,

    /// weekly or monthly
    #[arg(short = 'f', long)]
    time_frame: Option<String>,
}

impl GoalFields {
    fn presets(self) -> entity::Presets {
        vec![
            (GoalForm::GOAL_TYPE, self.goal_type),
            (GoalForm::TARGET_VALUE, self.target),
            (GoalForm::TIME_FRAME, self.time_frame),
        ]
    }
}

pub fn goal_line(goal: &Goal) -> String {
    format!(
        "{} · target {} · {} · {} done\n  id: {}",
        goal.goal_type,
        goal.target_label(),
        goal.time_frame,
        goal.progress_label(),
        goal.id
    )
}

impl GoalsSubcommands {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        match self {
            GoalsSubcommands::List => {
                entity::list::<GoalForm>(ctx, Route::Goals, NO_RECENT_GOALS, goal_line).await
            }
            GoalsSubcommands::Add(fields) => {
                entity::add::<GoalForm>(ctx, Route::Goals, fields.presets()).await
            }
            GoalsSubcommands::Edit { id, fields } => {
                entity::edit::<GoalForm>(ctx, Route::Goals, &id, fields.presets()).await
            }
            GoalsSubcommands::Delete { id, force } => {
                entity::delete::<GoalForm>(ctx, Route::Goals, &id, force).await
            }
        }
    }
}
