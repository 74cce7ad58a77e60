use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::future::Future;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::{ApiClient, ApiError, AuthResponse};
use crate::forms::{AuthForm, AuthMode, EntityForm, FieldSet};
use crate::models::{Goal, Resource, UserStatistics, Workout};
use crate::nav::{self, NavLink, Route};
use crate::pages::{AdminPage, DashboardPage, EntityPage, FetchTicket, GoalsPage, WorkoutsPage};
use crate::session::Session;

type Fetched<T> = Result<Vec<T>, ApiError>;

/// Completion of a background request, delivered back to the UI loop
#[derive(Debug)]
pub enum AppEvent {
    Workouts(FetchTicket, Fetched<Workout>),
    Goals(FetchTicket, Fetched<Goal>),
    DashboardWorkouts(FetchTicket, Fetched<Workout>),
    DashboardGoals(FetchTicket, Fetched<Goal>),
    Statistics(FetchTicket, Fetched<UserStatistics>),
    WorkoutSaved(Result<Workout, ApiError>),
    GoalSaved(Result<Goal, ApiError>),
    WorkoutDeleted(Result<(), ApiError>),
    GoalDeleted(Result<(), ApiError>),
    Authenticated(Result<AuthResponse, ApiError>),
}

/// An event tagged with the session it was requested under
#[derive(Debug)]
struct Envelope {
    epoch: u64,
    event: AppEvent,
}

/// Runs requests as tasks and sends their results back to the UI loop.
///
/// The epoch changes whenever a session starts or ends, so results of
/// requests made for a previous user are recognisable on arrival.
#[derive(Debug, Clone)]
struct Dispatcher {
    tx: UnboundedSender<Envelope>,
    epoch: u64,
}

impl Dispatcher {
    fn spawn<Fut>(&self, request: Fut)
    where
        Fut: Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            // The receiver is gone once the UI has shut down
            let _ = tx.send(Envelope {
                epoch,
                event: request.await,
            });
        });
    }
}

/// Application state for the interactive UI.
///
/// Requests never block the loop: they run as tasks and report back through
/// [`AppEvent`]s, which are applied in the order they arrive.
pub struct App {
    /// Should the application quit?
    pub should_quit: bool,
    /// Show help overlay
    pub show_help: bool,
    /// Selected card on the current page
    pub selected_index: usize,
    pub session: Session,
    pub route: Route,
    pub auth_form: AuthForm,
    pub dashboard: DashboardPage,
    pub workouts: WorkoutsPage,
    pub goals: GoalsPage,
    pub admin: AdminPage,
    /// Shown on the login screen after the server rejected the session
    pub session_notice: Option<String>,
    initial_route: Route,
    dispatcher: Dispatcher,
    events_rx: UnboundedReceiver<Envelope>,
}

/// What a key press did to an open form
enum FormInput {
    Submit,
    Cancel,
    Edited,
}

impl App {
    /// Create the app; nothing is fetched until [`App::start`]
    pub fn new(session: Session, initial_route: Route) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            should_quit: false,
            show_help: false,
            selected_index: 0,
            session,
            route: Route::Login,
            auth_form: AuthForm::login(),
            dashboard: DashboardPage::new(),
            workouts: WorkoutsPage::new(),
            goals: GoalsPage::new(),
            admin: AdminPage::new(),
            session_notice: None,
            initial_route,
            dispatcher: Dispatcher {
                tx: events_tx,
                epoch: 0,
            },
            events_rx,
        }
    }

    /// Enter the initial route. Must run inside a tokio runtime.
    pub fn start(&mut self) {
        self.navigate(self.initial_route);
    }

    pub fn nav_links(&self) -> Vec<NavLink> {
        nav::nav_links(self.session.user(), self.route.path())
    }

    /// Go to a route, subject to the session and role checks
    pub fn navigate(&mut self, requested: Route) {
        let route = nav::resolve(requested, self.session.user());
        if route != requested {
            tracing::debug!("Redirecting {} to {}", requested, route);
        }

        self.leave_current();
        self.route = route;
        self.selected_index = 0;

        match route {
            Route::Login if self.auth_form.mode() != AuthMode::Login => {
                self.auth_form = AuthForm::login()
            }
            Route::Signup if self.auth_form.mode() != AuthMode::Signup => {
                self.auth_form = AuthForm::signup()
            }
            _ => {}
        }

        self.load_route();
    }

    /// Refetch whatever the current route shows
    pub fn refresh(&mut self) {
        self.load_route();
    }

    fn leave_current(&mut self) {
        match self.route {
            Route::Dashboard => self.dashboard.leave(),
            Route::Workouts => self.workouts.leave(),
            Route::Goals => self.goals.leave(),
            Route::Admin => self.admin.leave(),
            Route::Login | Route::Signup | Route::Profile => {}
        }
    }

    fn load_route(&mut self) {
        let api = self.session.api().clone();
        let events = &self.dispatcher;

        match self.route {
            Route::Dashboard => {
                let ticket = self.dashboard.workouts.begin_fetch();
                let workouts_api = api.clone();
                events.spawn(async move {
                    AppEvent::DashboardWorkouts(ticket, workouts_api.list::<Workout>().await)
                });

                let ticket = self.dashboard.goals.begin_fetch();
                events.spawn(async move {
                    AppEvent::DashboardGoals(ticket, api.list::<Goal>().await)
                });
            }
            Route::Workouts => fetch_collection(&mut self.workouts, api, events, AppEvent::Workouts),
            Route::Goals => fetch_collection(&mut self.goals, api, events, AppEvent::Goals),
            Route::Admin => {
                let ticket = self.admin.statistics.begin_fetch();
                events.spawn(async move {
                    AppEvent::Statistics(ticket, api.admin_statistics().await)
                });
            }
            Route::Login | Route::Signup | Route::Profile => {}
        }
    }

    /// End the session and clear every page of the previous user's data
    pub fn logout(&mut self) {
        self.session.logout();
        self.dispatcher.epoch += 1;
        self.clear_pages();
        self.navigate(Route::Login);
    }

    fn clear_pages(&mut self) {
        self.dashboard.reset();
        self.workouts.reset();
        self.goals.reset();
        self.admin.reset();
    }

    /// Apply every event that has already arrived
    pub fn drain_events(&mut self) {
        while let Ok(envelope) = self.events_rx.try_recv() {
            self.receive(envelope);
        }
    }

    /// Wait for the next event and apply it
    pub async fn process_next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(envelope) => {
                self.receive(envelope);
                true
            }
            None => false,
        }
    }

    fn receive(&mut self, envelope: Envelope) {
        if envelope.epoch != self.dispatcher.epoch {
            tracing::debug!("Dropping response requested under an earlier session");
            return;
        }
        self.apply(envelope.event);
    }

    /// Apply one event to the current session's state. Fetch results whose
    /// ticket is no longer current are dropped before anything else.
    pub fn apply(&mut self, event: AppEvent) {
        if !self.is_current(&event) {
            tracing::debug!("Dropping stale response");
            return;
        }

        if let Some(error) = rejected_session(&event) {
            tracing::warn!("Session rejected by server: {}", error);
            self.logout();
            self.session_notice = Some("Your session has expired. Please log in again.".to_string());
            return;
        }

        match event {
            AppEvent::Workouts(ticket, result) => {
                self.workouts.list_mut().finish(ticket, result);
            }
            AppEvent::Goals(ticket, result) => {
                self.goals.list_mut().finish(ticket, result);
            }
            AppEvent::DashboardWorkouts(ticket, result) => {
                self.dashboard.workouts.finish(ticket, result);
            }
            AppEvent::DashboardGoals(ticket, result) => {
                self.dashboard.goals.finish(ticket, result);
            }
            AppEvent::Statistics(ticket, result) => {
                self.admin.statistics.finish(ticket, result);
            }
            AppEvent::WorkoutSaved(result) => {
                if form_saved(&mut self.workouts, result) && self.route == Route::Workouts {
                    self.refresh();
                }
            }
            AppEvent::GoalSaved(result) => {
                if form_saved(&mut self.goals, result) && self.route == Route::Goals {
                    self.refresh();
                }
            }
            AppEvent::WorkoutDeleted(result) => match result {
                Ok(()) if self.route == Route::Workouts => self.refresh(),
                Ok(()) => {}
                Err(e) => self.workouts.delete_failed(&e),
            },
            AppEvent::GoalDeleted(result) => match result {
                Ok(()) if self.route == Route::Goals => self.refresh(),
                Ok(()) => {}
                Err(e) => self.goals.delete_failed(&e),
            },
            AppEvent::Authenticated(result) => match result {
                Ok(response) => {
                    self.session.establish(response);
                    self.dispatcher.epoch += 1;
                    self.session_notice = None;
                    self.auth_form = AuthForm::login();
                    self.clear_pages();
                    self.navigate(Route::Dashboard);
                }
                Err(e) => {
                    tracing::warn!("{} failed: {}", self.auth_form.submit_label(), e);
                    self.auth_form.fields_mut().fail(e.to_string());
                }
            },
        }
    }

    /// Whether a fetch result belongs to the latest fetch of its page
    fn is_current(&self, event: &AppEvent) -> bool {
        match event {
            AppEvent::Workouts(ticket, _) => self.workouts.list().is_current(*ticket),
            AppEvent::Goals(ticket, _) => self.goals.list().is_current(*ticket),
            AppEvent::DashboardWorkouts(ticket, _) => self.dashboard.workouts.is_current(*ticket),
            AppEvent::DashboardGoals(ticket, _) => self.dashboard.goals.is_current(*ticket),
            AppEvent::Statistics(ticket, _) => self.admin.statistics.is_current(*ticket),
            _ => true,
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Help overlay takes precedence
        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        match self.route {
            Route::Login | Route::Signup => self.handle_auth_key(key.code),
            Route::Workouts if self.workouts.form().is_some() => {
                let api = self.session.api();
                handle_form_key(&mut self.workouts, key.code, api, &self.dispatcher, AppEvent::WorkoutSaved)
            }
            Route::Goals if self.goals.form().is_some() => {
                let api = self.session.api();
                handle_form_key(&mut self.goals, key.code, api, &self.dispatcher, AppEvent::GoalSaved)
            }
            _ => self.handle_page_key(key.code),
        }
    }

    fn handle_auth_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.should_quit = true,
            // Switch between the login and signup screens
            KeyCode::Left | KeyCode::Right if !self.auth_form.fields().is_pending() => {
                let other = match self.route {
                    Route::Login => Route::Signup,
                    _ => Route::Login,
                };
                self.navigate(other);
            }
            code => match edit_fields(self.auth_form.fields_mut(), code) {
                FormInput::Submit => self.submit_auth(),
                FormInput::Cancel | FormInput::Edited => {}
            },
        }
    }

    fn submit_auth(&mut self) {
        if self.auth_form.fields().is_pending() {
            return;
        }
        // A validation failure is already shown on the form
        let Ok(credentials) = self.auth_form.credentials() else {
            return;
        };

        let api = self.session.api().clone();
        self.dispatcher.spawn(async move {
            AppEvent::Authenticated(credentials.send(&api).await)
        });
    }

    fn handle_page_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') | KeyCode::Char('R') => self.refresh(),
            KeyCode::Char('x') | KeyCode::Char('X') => self.logout(),

            // Navigation bar
            KeyCode::Tab | KeyCode::Right => self.step_nav(true),
            KeyCode::BackTab | KeyCode::Left => self.step_nav(false),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(link) = self.nav_links().get(index) {
                    self.navigate(link.route);
                }
            }

            // Navigation within page
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_index + 1 < self.selectable_len() {
                    self.selected_index += 1;
                }
            }

            // Entity actions
            KeyCode::Char('a') => match self.route {
                Route::Workouts => self.workouts.open_add(),
                Route::Goals => self.goals.open_add(),
                _ => {}
            },
            KeyCode::Char('e') => match self.route {
                Route::Workouts => open_selected(&mut self.workouts, self.selected_index),
                Route::Goals => open_selected(&mut self.goals, self.selected_index),
                _ => {}
            },
            KeyCode::Char('d') => {
                let api = self.session.api();
                match self.route {
                    Route::Workouts => delete_selected(
                        &self.workouts,
                        self.selected_index,
                        api,
                        &self.dispatcher,
                        AppEvent::WorkoutDeleted,
                    ),
                    Route::Goals => delete_selected(
                        &self.goals,
                        self.selected_index,
                        api,
                        &self.dispatcher,
                        AppEvent::GoalDeleted,
                    ),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn step_nav(&mut self, forward: bool) {
        let links = self.nav_links();
        if links.is_empty() {
            return;
        }

        let current = links.iter().position(|l| l.active);
        let next = match current {
            Some(i) if forward => (i + 1) % links.len(),
            Some(i) => (i + links.len() - 1) % links.len(),
            None => 0,
        };
        if let Some(link) = links.get(next) {
            self.navigate(link.route);
        }
    }

    /// Number of selectable cards on the current page
    fn selectable_len(&self) -> usize {
        match self.route {
            Route::Workouts => self.workouts.list().items().len(),
            Route::Goals => self.goals.list().items().len(),
            Route::Admin => self.admin.statistics.items().len(),
            _ => 0,
        }
    }
}

fn fetch_collection<F: EntityForm>(
    page: &mut EntityPage<F>,
    api: ApiClient,
    events: &Dispatcher,
    wrap: fn(FetchTicket, Fetched<F::Resource>) -> AppEvent,
) {
    let ticket = page.list_mut().begin_fetch();
    events.spawn(async move { wrap(ticket, api.list::<F::Resource>().await) });
}

fn handle_form_key<F: EntityForm>(
    page: &mut EntityPage<F>,
    code: KeyCode,
    api: &ApiClient,
    events: &Dispatcher,
    wrap: fn(Result<F::Resource, ApiError>) -> AppEvent,
) {
    let Some(form) = page.form_mut() else {
        return;
    };

    match edit_fields(form.fields_mut(), code) {
        // The form stays until its pending submission has answered
        FormInput::Cancel if form.fields().is_pending() => {}
        FormInput::Cancel => page.close_form(),
        FormInput::Submit => {
            if form.fields().is_pending() {
                return;
            }
            // A validation failure is already shown on the form
            let Ok(submission) = form.prepare() else {
                return;
            };
            let api = api.clone();
            events.spawn(async move { wrap(submission.send(&api).await) });
        }
        FormInput::Edited => {}
    }
}

fn edit_fields(fields: &mut FieldSet, code: KeyCode) -> FormInput {
    match code {
        KeyCode::Enter => return FormInput::Submit,
        KeyCode::Esc => return FormInput::Cancel,
        KeyCode::Tab | KeyCode::Down => fields.focus_next(),
        KeyCode::BackTab | KeyCode::Up => fields.focus_prev(),
        KeyCode::Right => fields.cycle(true),
        KeyCode::Left => fields.cycle(false),
        KeyCode::Backspace => fields.backspace(),
        KeyCode::Char(c) => fields.input(c),
        _ => {}
    }
    FormInput::Edited
}

/// Apply a save result to the page's form; `true` when the list should be
/// refetched
fn form_saved<F: EntityForm>(page: &mut EntityPage<F>, result: Result<F::Resource, ApiError>) -> bool {
    let label = <F::Resource as Resource>::LABEL;
    // Only the form that is waiting on this result may be changed by it
    let submitting = page.form().is_some_and(|form| form.fields().is_pending());

    match result {
        Ok(item) => {
            tracing::info!("Saved {} {}", label, item.id());
            if submitting {
                page.form_saved();
            }
            true
        }
        Err(e) => {
            tracing::warn!("{} submission failed: {}", label, e);
            if let Some(form) = page.form_mut().filter(|_| submitting) {
                form.fields_mut().fail(e.to_string());
            }
            false
        }
    }
}

fn open_selected<F: EntityForm>(page: &mut EntityPage<F>, selected: usize) {
    let id = page.list().items().get(selected).map(|item| item.id().to_string());
    if let Some(id) = id {
        page.open_edit(&id);
    }
}

fn delete_selected<F: EntityForm>(
    page: &EntityPage<F>,
    selected: usize,
    api: &ApiClient,
    events: &Dispatcher,
    wrap: fn(Result<(), ApiError>) -> AppEvent,
) {
    let Some(id) = page.list().items().get(selected).map(|item| item.id().to_string()) else {
        return;
    };

    let api = api.clone();
    events.spawn(async move { wrap(api.remove::<F::Resource>(&id).await) });
}

/// The error of a request the server refused because the session is no
/// longer valid
fn rejected_session(event: &AppEvent) -> Option<&ApiError> {
    let error = match event {
        AppEvent::Workouts(_, Err(e))
        | AppEvent::Goals(_, Err(e))
        | AppEvent::DashboardWorkouts(_, Err(e))
        | AppEvent::DashboardGoals(_, Err(e))
        | AppEvent::Statistics(_, Err(e))
        | AppEvent::WorkoutSaved(Err(e))
        | AppEvent::GoalSaved(Err(e))
        | AppEvent::WorkoutDeleted(Err(e))
        | AppEvent::GoalDeleted(Err(e)) => e,
        _ => return None,
    };
    error.is_unauthorized().then_some(error)
}
