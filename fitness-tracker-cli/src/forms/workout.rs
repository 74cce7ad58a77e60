use super::{EntityForm, Field, FieldKind, FieldSet, ValidationError};
use crate::models::{format_number, Workout, WorkoutPayload};

/// Longest session accepted, in minutes
const MAX_DURATION_MINUTES: f64 = 24.0 * 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutForm {
    fields: FieldSet,
    editing: Option<String>,
}

impl WorkoutForm {
    pub const ACTIVITY: usize = 0;
    pub const DURATION: usize = 1;
    pub const CALORIES: usize = 2;

    fn with_values(activity: String, duration: String, calories: String, editing: Option<String>) -> Self {
        Self {
            fields: FieldSet::new(vec![
                Field::new("Activity", FieldKind::Text).with_value(activity),
                Field::new("Duration (minutes)", FieldKind::Number).with_value(duration),
                Field::new("Calories Burned", FieldKind::Number).with_value(calories),
            ]),
            editing,
        }
    }
}

impl EntityForm for WorkoutForm {
    type Resource = Workout;

    fn blank() -> Self {
        Self::with_values(String::new(), String::new(), String::new(), None)
    }

    fn from_existing(workout: &Workout) -> Self {
        Self::with_values(
            workout.activity.clone(),
            format_number(workout.duration),
            format_number(workout.calories_burned),
            Some(workout.id.clone()),
        )
    }

    fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    fn fields(&self) -> &FieldSet {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut FieldSet {
        &mut self.fields
    }

    fn payload(&self) -> Result<WorkoutPayload, ValidationError> {
        Ok(WorkoutPayload {
            activity: self.fields.text(Self::ACTIVITY)?,
            duration: self.fields.number(
                Self::DURATION,
                |d| d > 0.0 && d <= MAX_DURATION_MINUTES,
                "between 0 and 1440 minutes",
            )?,
            calories_burned: self.fields.number(Self::CALORIES, |c| c >= 0.0, "0 or more")?,
        })
    }
}
