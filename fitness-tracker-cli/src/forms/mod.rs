// Controlled input state for entity and credential forms

mod auth;
mod field;
mod goal;
mod workout;

use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::models::Resource;

pub use auth::{AuthForm, AuthMode, Credentials};
pub use field::{Field, FieldKind, FieldSet};
pub use goal::GoalForm;
pub use workout::WorkoutForm;

/// Input rejected before anything is sent
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must be a number")]
    NotANumber(&'static str),

    #[error("{field} must be {bound}")]
    OutOfRange {
        field: &'static str,
        bound: &'static str,
    },

    #[error("{field} must be one of: {allowed}")]
    InvalidChoice {
        field: &'static str,
        allowed: String,
    },
}

/// Why a submission did not go through
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    Create,
    Update(String),
}

/// A validated payload together with the request it should go out as
pub struct Submission<R: Resource> {
    pub action: SubmitAction,
    pub payload: R::Payload,
}

impl<R: Resource> Submission<R> {
    pub async fn send(self, api: &ApiClient) -> Result<R, ApiError> {
        match &self.action {
            SubmitAction::Create => {
                tracing::debug!("Creating {}", R::LABEL);
                api.create::<R>(&self.payload).await
            }
            SubmitAction::Update(id) => {
                tracing::debug!("Updating {} {}", R::LABEL, id);
                api.update::<R>(id, &self.payload).await
            }
        }
    }
}

/// Form editing one entity of a CRUD collection.
///
/// A form built with [`EntityForm::blank`] creates; one built with
/// [`EntityForm::from_existing`] updates the entity it was built from.
pub trait EntityForm: Send + Sized + 'static {
    type Resource: Resource;

    fn blank() -> Self;

    fn from_existing(item: &Self::Resource) -> Self;

    /// Id of the entity being edited, if any
    fn editing(&self) -> Option<&str>;

    fn fields(&self) -> &FieldSet;

    fn fields_mut(&mut self) -> &mut FieldSet;

    /// Coerce and check the current input
    fn payload(&self) -> Result<<Self::Resource as Resource>::Payload, ValidationError>;

    fn title(&self) -> String {
        let verb = if self.editing().is_some() { "Edit" } else { "Add" };
        format!("{} {}", verb, <Self::Resource as Resource>::LABEL)
    }

    fn submit_label(&self) -> String {
        let verb = if self.editing().is_some() { "Update" } else { "Add" };
        format!("{} {}", verb, <Self::Resource as Resource>::LABEL)
    }

    /// Validate and mark the form as submitting. A validation failure is
    /// recorded on the form and nothing is sent.
    fn prepare(&mut self) -> Result<Submission<Self::Resource>, ValidationError> {
        match self.payload() {
            Ok(payload) => {
                let action = match self.editing() {
                    Some(id) => SubmitAction::Update(id.to_string()),
                    None => SubmitAction::Create,
                };
                self.fields_mut().begin_submit();
                Ok(Submission { action, payload })
            }
            Err(e) => {
                self.fields_mut().fail(e.to_string());
                Err(e)
            }
        }
    }
}

/// Validate and send a form. On failure the form keeps its input and shows
/// the error.
pub async fn submit<F: EntityForm>(form: &mut F, api: &ApiClient) -> Result<F::Resource, FormError> {
    let submission = form.prepare()?;

    match submission.send(api).await {
        Ok(item) => {
            form.fields_mut().finish();
            Ok(item)
        }
        Err(e) => {
            tracing::warn!("{} submission failed: {}", <F::Resource as Resource>::LABEL, e);
            form.fields_mut().fail(e.to_string());
            Err(e.into())
        }
    }
}
