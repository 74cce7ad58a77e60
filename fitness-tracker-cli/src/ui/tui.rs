use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

use super::app::App;
use super::widgets;
use crate::forms::EntityForm;
use crate::nav::Route;
use crate::pages::{NO_GOALS, NO_RECENT_GOALS, NO_RECENT_WORKOUTS, NO_USERS, NO_WORKOUTS};

/// Tui manages the terminal lifecycle around an [`App`]
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
}

impl Tui {
    /// Take over the terminal
    pub fn new(app: App) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        Ok(Self { terminal, app })
    }

    /// Run the event loop until the user quits
    pub async fn run(&mut self) -> Result<()> {
        let tick_rate = Duration::from_millis(self.app.session.config().ui.tick_rate_ms.max(10));
        self.app.start();

        loop {
            self.app.drain_events();

            let app = &self.app;
            self.terminal.draw(|f| draw(f, app))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.app.handle_key(key);
                    }
                }
            }

            if self.app.should_quit {
                break;
            }

            // Let request tasks make progress between frames
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// Cleanup terminal on exit
    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to restore terminal")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;

        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Render the whole screen for the current route
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();
    let user = app.session.user();

    let notice = match app.route {
        Route::Workouts => app.workouts.notice(),
        Route::Goals => app.goals.notice(),
        _ => None,
    };

    // Nav bar + optional notice + page + status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(if notice.is_some() { 1 } else { 0 }),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    widgets::render_nav_bar(chunks[0], f.buffer_mut(), &app.nav_links(), user);
    if let Some(notice) = notice {
        widgets::render_notice(chunks[1], f.buffer_mut(), notice);
    }

    let body = chunks[2];
    let date_format = app.session.config().ui.date_format.as_str();
    let selected = Some(app.selected_index);

    match app.route {
        Route::Login | Route::Signup => {
            widgets::render_auth_form(
                centered_rect(60, 80, body),
                f.buffer_mut(),
                app.auth_form.title(),
                app.auth_form.submit_label(),
                app.auth_form.fields(),
                app.session_notice.as_deref(),
            );
        }
        Route::Dashboard => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(body);

            widgets::render_collection(
                columns[0],
                f.buffer_mut(),
                "Recent Workouts",
                &app.dashboard.workouts,
                NO_RECENT_WORKOUTS,
                None,
                |w| widgets::workout_card(w, date_format),
            );
            widgets::render_collection(
                columns[1],
                f.buffer_mut(),
                "Goals",
                &app.dashboard.goals,
                NO_GOALS,
                None,
                widgets::goal_card,
            );
        }
        Route::Workouts => {
            widgets::render_collection(
                body,
                f.buffer_mut(),
                "Workouts",
                app.workouts.list(),
                NO_WORKOUTS,
                selected,
                |w| widgets::workout_card(w, date_format),
            );
            if let Some(form) = app.workouts.form() {
                widgets::render_entity_form(
                    centered_rect(50, 70, body),
                    f.buffer_mut(),
                    &form.title(),
                    &form.submit_label(),
                    form.fields(),
                );
            }
        }
        Route::Goals => {
            widgets::render_collection(
                body,
                f.buffer_mut(),
                "Goals",
                app.goals.list(),
                NO_RECENT_GOALS,
                selected,
                widgets::goal_card,
            );
            if let Some(form) = app.goals.form() {
                widgets::render_entity_form(
                    centered_rect(50, 70, body),
                    f.buffer_mut(),
                    &form.title(),
                    &form.submit_label(),
                    form.fields(),
                );
            }
        }
        Route::Admin => {
            widgets::render_collection(
                body,
                f.buffer_mut(),
                "Admin Dashboard",
                &app.admin.statistics,
                NO_USERS,
                selected,
                widgets::user_statistics_card,
            );
        }
        Route::Profile => {
            if let Some(user) = user {
                widgets::render_profile(body, f.buffer_mut(), user);
            }
        }
    }

    widgets::render_status_bar(chunks[3], f.buffer_mut(), app.route, user);

    if app.show_help {
        widgets::render_help_overlay(centered_rect(60, 80, size), f.buffer_mut());
    }
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
