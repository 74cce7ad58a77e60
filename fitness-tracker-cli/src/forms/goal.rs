use super::{EntityForm, Field, FieldKind, FieldSet, ValidationError};
use crate::models::{format_number, Goal, GoalPayload, TimeFrame};

#[derive(Debug, Clone, PartialEq)]
pub struct GoalForm {
    fields: FieldSet,
    editing: Option<String>,
}

impl GoalForm {
    pub const GOAL_TYPE: usize = 0;
    pub const TARGET_VALUE: usize = 1;
    pub const TIME_FRAME: usize = 2;

    fn with_values(goal_type: String, target: String, time_frame: String, editing: Option<String>) -> Self {
        Self {
            fields: FieldSet::new(vec![
                Field::new("Goal Type", FieldKind::Text).with_value(goal_type),
                Field::new("Target Value", FieldKind::Number).with_value(target),
                Field::new("Time Frame", FieldKind::Choice(TimeFrame::CHOICES)).with_value(time_frame),
            ]),
            editing,
        }
    }
}

impl EntityForm for GoalForm {
    type Resource = Goal;

    fn blank() -> Self {
        Self::with_values(String::new(), String::new(), String::new(), None)
    }

    fn from_existing(goal: &Goal) -> Self {
        Self::with_values(
            goal.goal_type.clone(),
            format_number(goal.target_value),
            goal.time_frame.to_string(),
            Some(goal.id.clone()),
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

    fn payload(&self) -> Result<GoalPayload, ValidationError> {
        let goal_type = self.fields.text(Self::GOAL_TYPE)?;
        let target_value = self
            .fields
            .number(Self::TARGET_VALUE, |v| v > 0.0, "greater than 0")?;
        let time_frame = match self.fields.choice(Self::TIME_FRAME)? {
            "monthly" => TimeFrame::Monthly,
            _ => TimeFrame::Weekly,
        };

        Ok(GoalPayload {
            goal_type,
            target_value,
            time_frame,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::SubmitAction;

    #[test]
    fn test_goal_payload() {
        let mut form = GoalForm::blank();
        form.fields_mut().set(GoalForm::GOAL_TYPE, "run-distance");
        form.fields_mut().set(GoalForm::TARGET_VALUE, "10");
        form.fields_mut().set(GoalForm::TIME_FRAME, "weekly");

        let submission = form.prepare().unwrap();
        assert_eq!(submission.action, SubmitAction::Create);
        assert_eq!(
            submission.payload,
            GoalPayload {
                goal_type: "run-distance".to_string(),
                target_value: 10.0,
                time_frame: TimeFrame::Weekly,
            }
        );
    }

    #[test]
    fn test_time_frame_is_required() {
        let mut form = GoalForm::blank();
        form.fields_mut().set(GoalForm::GOAL_TYPE, "steps");
        form.fields_mut().set(GoalForm::TARGET_VALUE, "10000");

        assert_eq!(form.prepare().err(), Some(ValidationError::Missing("Time Frame")));
        assert_eq!(form.fields().error(), Some("Time Frame is required"));
    }

    #[test]
    fn test_existing_goal_prefills_fields() {
        let goal = Goal {
            id: "g7".to_string(),
            goal_type: "swim".to_string(),
            target_value: 2.5,
            progress: 40.0,
            time_frame: TimeFrame::Monthly,
            created_at: None,
        };

        let mut form = GoalForm::from_existing(&goal);
        assert_eq!(form.fields().value(GoalForm::TARGET_VALUE), "2.5");
        assert_eq!(form.fields().value(GoalForm::TIME_FRAME), "monthly");
        assert_eq!(
            form.prepare().unwrap().action,
            SubmitAction::Update("g7".to_string())
        );
    }
}
