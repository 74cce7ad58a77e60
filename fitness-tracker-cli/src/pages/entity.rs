use super::ListPage;
use crate::api::{ApiClient, ApiError};
use crate::forms::{self, EntityForm, FormError, GoalForm, WorkoutForm};
use crate::models::Resource;

pub type WorkoutsPage = EntityPage<WorkoutForm>;
pub type GoalsPage = EntityPage<GoalForm>;

/// A page owning one collection: list, add, edit and delete.
///
/// Every successful mutation is followed by a full refetch.
pub struct EntityPage<F: EntityForm> {
    list: ListPage<F::Resource>,
    form: Option<F>,
    notice: Option<String>,
}

impl<F: EntityForm> Default for EntityPage<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: EntityForm> EntityPage<F> {
    pub fn new() -> Self {
        Self {
            list: ListPage::new(),
            form: None,
            notice: None,
        }
    }

    pub fn list(&self) -> &ListPage<F::Resource> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListPage<F::Resource> {
        &mut self.list
    }

    pub fn form(&self) -> Option<&F> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut F> {
        self.form.as_mut()
    }

    /// Error from the last failed mutation
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn open_add(&mut self) {
        self.notice = None;
        self.form = Some(F::blank());
    }

    /// Open the form pre-filled from a listed item. Returns `false` when no
    /// item with that id is shown.
    pub fn open_edit(&mut self, id: &str) -> bool {
        let Some(item) = self.list.items().iter().find(|item| item.id() == id) else {
            return false;
        };
        self.notice = None;
        self.form = Some(F::from_existing(item));
        true
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub async fn refresh(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        let ticket = self.list.begin_fetch();
        let result = api.list::<F::Resource>().await;
        self.list.settle(ticket, result)
    }

    /// Submit the open form; on success hide it and refetch. With no form
    /// open nothing happens.
    pub async fn submit(&mut self, api: &ApiClient) -> Result<Option<F::Resource>, FormError> {
        let Some(form) = self.form.as_mut() else {
            return Ok(None);
        };

        let item = forms::submit(form, api).await?;
        self.form_saved();
        // A failed refetch shows on the list
        let _ = self.refresh(api).await;
        Ok(Some(item))
    }

    /// Hide the form after its submission went through
    pub fn form_saved(&mut self) {
        self.form = None;
        self.notice = None;
    }

    /// Delete an item and refetch; a failure stays visible as the notice
    pub async fn delete(&mut self, api: &ApiClient, id: &str) -> Result<(), ApiError> {
        match api.remove::<F::Resource>(id).await {
            Ok(()) => {
                self.notice = None;
                let _ = self.refresh(api).await;
                Ok(())
            }
            Err(e) => {
                self.delete_failed(&e);
                Err(e)
            }
        }
    }

    pub fn delete_failed(&mut self, error: &ApiError) {
        let label = <F::Resource as Resource>::LABEL;
        tracing::warn!("Error deleting {}: {}", label.to_lowercase(), error);
        self.notice = Some(format!("Could not delete {}: {}", label.to_lowercase(), error));
    }

    /// Navigated away: in-flight fetches are dropped and the form discarded
    pub fn leave(&mut self) {
        self.list.invalidate();
        self.form = None;
        self.notice = None;
    }

    /// Session ended: nothing of the previous user stays on screen
    pub fn reset(&mut self) {
        self.list.reset();
        self.form = None;
        self.notice = None;
    }
}
