use anyhow::Result;
use clap::{Args, Subcommand};

use super::{entity, Context};
use crate::forms::WorkoutForm;
use crate::models::Workout;
use crate::nav::Route;
use crate::pages::NO_WORKOUTS;

#[derive(Subcommand)]
pub enum WorkoutsSubcommands {
    /// List your workouts
    List,

    /// Log a new workout
    Add(WorkoutFields),

    /// Edit a workout
    Edit {
        /// Workout ID
        id: String,

        #[command(flatten)]
        fields: WorkoutFields,
    },

    /// Delete a workout
    Delete {
        /// Workout ID
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Field values; anything left out is prompted for
#[derive(Args)]
pub struct WorkoutFields {
    /// Activity, e.g. "Running"
    #[arg(short, long)]
    activity: Option<String>,

    /// Duration in minutes
    #[arg(short, long)]
    duration: Option<String>,

    /// Calories burned
    #[arg(short, long)]
    calories: Option<String>,
}

impl WorkoutFields {
    fn presets(self) -> entity::Presets {
        vec![
            (WorkoutForm::ACTIVITY, self.activity),
            (WorkoutForm::DURATION, self.duration),
            (WorkoutForm::CALORIES, self.calories),
        ]
    }
}

/// One line per workout as printed by `workouts list`
pub fn workout_line(workout: &Workout, date_format: &str) -> String {
    let logged = workout
        .created_at
        .map(|at| format!("  {}", at.format(date_format)))
        .unwrap_or_default();

    format!(
        "{} · {} · {} kcal{}\n  id: {}",
        workout.activity,
        workout.duration_label(),
        workout.calories_label(),
        logged,
        workout.id
    )
}

impl WorkoutsSubcommands {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        match self {
            WorkoutsSubcommands::List => {
                let date_format = ctx.load_config()?.ui.date_format;
                entity::list::<WorkoutForm>(ctx, Route::Workouts, NO_WORKOUTS, |w| {
                    workout_line(w, &date_format)
                })
                .await
            }
            WorkoutsSubcommands::Add(fields) => {
                entity::add::<WorkoutForm>(ctx, Route::Workouts, fields.presets()).await
            }
            WorkoutsSubcommands::Edit { id, fields } => {
                entity::edit::<WorkoutForm>(ctx, Route::Workouts, &id, fields.presets()).await
            }
            WorkoutsSubcommands::Delete { id, force } => {
                entity::delete::<WorkoutForm>(ctx, Route::Workouts, &id, force).await
            }
        }
    }
}
