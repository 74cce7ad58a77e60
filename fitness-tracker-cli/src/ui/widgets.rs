use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::forms::{FieldKind, FieldSet};
use crate::models::{Goal, User, UserStatistics, Workout};
use crate::nav::{NavLink, Route};
use crate::pages::{
    profile_rows, ListPage, PageState, LOADING_MESSAGE, NO_USER_GOALS, NO_USER_WORKOUTS,
};

/// A titled box of lines, one per listed entity
pub struct Card {
    pub title: String,
    pub lines: Vec<Line<'static>>,
}

impl Card {
    fn height(&self) -> u16 {
        u16::try_from(self.lines.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
    }
}

fn label_value(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn muted(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::DarkGray)))
}

pub fn workout_card(workout: &Workout, date_format: &str) -> Card {
    let mut lines = vec![
        label_value("Duration", workout.duration_label()),
        label_value("Calories Burned", workout.calories_label()),
    ];
    if let Some(created) = workout.created_at {
        lines.push(label_value("Logged", created.format(date_format).to_string()));
    }

    Card {
        title: workout.activity.clone(),
        lines,
    }
}

pub fn goal_card(goal: &Goal) -> Card {
    Card {
        title: goal.goal_type.clone(),
        lines: vec![
            label_value("Target", goal.target_label()),
            label_value("Progress", goal.progress_label()),
            label_value("Time Frame", goal.time_frame.to_string()),
        ],
    }
}

/// One card per user with everything they have logged
pub fn user_statistics_card(stats: &UserStatistics) -> Card {
    let heading = Style::default().fg(Color::Cyan);
    let mut lines = vec![
        label_value("Email", stats.user.email.clone()),
        label_value("Role", stats.user.role.to_string()),
        Line::from(Span::styled("Goals", heading)),
    ];

    if stats.goals.is_empty() {
        lines.push(muted(format!("  {}", NO_USER_GOALS)));
    }
    lines.extend(stats.goals.iter().map(|goal| {
        Line::from(format!(
            "  {} - target {} ({}, {})",
            goal.goal_type,
            goal.target_label(),
            goal.time_frame,
            goal.progress_label()
        ))
    }));

    lines.push(Line::from(Span::styled("Workouts", heading)));
    if stats.workouts.is_empty() {
        lines.push(muted(format!("  {}", NO_USER_WORKOUTS)));
    }
    lines.extend(stats.workouts.iter().map(|workout| {
        Line::from(format!(
            "  {} - {}, {} kcal",
            workout.activity,
            workout.duration_label(),
            workout.calories_label()
        ))
    }));

    Card {
        title: stats.user.name.clone(),
        lines,
    }
}

/// Render the navigation bar; the active link is bracketed
pub fn render_nav_bar(area: Rect, buf: &mut Buffer, links: &[NavLink], user: Option<&User>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Fitness Tracker ")
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    block.render(area, buf);

    let mut spans = Vec::new();
    for (idx, link) in links.iter().enumerate() {
        let (text, style) = if link.active {
            (
                format!("[{}]", link.label),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (format!(" {} ", link.label), Style::default().fg(Color::White))
        };
        spans.push(Span::styled(
            format!("{} ", idx + 1),
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::styled(text, style));
        spans.push(Span::raw("  "));
    }

    if user.is_some() {
        spans.push(Span::styled("x Logout", Style::default().fg(Color::Red)));
    }

    Paragraph::new(Line::from(spans)).render(inner, buf);
}

/// Render a fetched collection: placeholder, empty message, error or cards
pub fn render_collection<T>(
    area: Rect,
    buf: &mut Buffer,
    title: &str,
    page: &ListPage<T>,
    empty_message: &str,
    selected: Option<usize>,
    card: impl Fn(&T) -> Card,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    block.render(area, buf);

    match page.state() {
        PageState::Loading => {
            Paragraph::new(LOADING_MESSAGE)
                .style(Style::default().fg(Color::Gray))
                .render(inner, buf);
        }
        PageState::Empty => {
            Paragraph::new(empty_message)
                .style(Style::default().fg(Color::Gray))
                .render(inner, buf);
        }
        PageState::Failed(message) => {
            let lines = vec![
                Line::from(Span::styled(
                    format!("Error: {}", message),
                    Style::default().fg(Color::Red),
                )),
                Line::from(""),
                muted("Press r to retry"),
            ];
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .render(inner, buf);
        }
        PageState::Ready(items) => {
            let cards: Vec<Card> = items.iter().map(card).collect();
            render_cards(inner, buf, &cards, selected);
        }
    }
}

/// Stack cards vertically, scrolled so the selected one is visible
pub fn render_cards(area: Rect, buf: &mut Buffer, cards: &[Card], selected: Option<usize>) {
    let selected_idx = selected.unwrap_or(0).min(cards.len().saturating_sub(1));

    // First card such that everything up to the selection fits
    let mut start = 0;
    while start < selected_idx {
        let needed: usize = cards[start..=selected_idx]
            .iter()
            .map(|card| usize::from(card.height()))
            .sum();
        if needed <= usize::from(area.height) {
            break;
        }
        start += 1;
    }

    let mut y = area.y;
    for (idx, card) in cards.iter().enumerate().skip(start) {
        let bottom = area.y.saturating_add(area.height);
        if y >= bottom {
            break;
        }

        let is_selected = selected == Some(idx);
        let border_style = if is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title_style = if is_selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        };

        let height = card.height().min(bottom - y);
        let card_area = Rect::new(area.x, y, area.width, height);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(format!(" {} ", card.title), title_style))
            .border_style(border_style);

        let inner = block.inner(card_area);
        block.render(card_area, buf);
        Paragraph::new(card.lines.clone()).render(inner, buf);

        y += height;
    }
}

/// Render the profile of the signed in user
pub fn render_profile(area: Rect, buf: &mut Buffer, user: &User) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", Route::Profile.title()))
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    block.render(area, buf);

    let lines: Vec<Line> = profile_rows(user)
        .into_iter()
        .map(|(label, value)| label_value(label, value))
        .collect();

    Paragraph::new(lines).render(inner, buf);
}

fn render_fields(fields: &FieldSet) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, field) in fields.fields().iter().enumerate() {
        let focused = idx == fields.focus();
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let value = match field.kind {
            FieldKind::Choice(_) if field.value.is_empty() => "< select >".to_string(),
            FieldKind::Choice(_) => format!("< {} >", field.value),
            _ if focused => format!("{}_", field.display_value()),
            _ => field.display_value(),
        };

        lines.push(Line::from(Span::styled(field.label.to_string(), label_style)));
        lines.push(Line::from(Span::styled(
            format!("  {}", value),
            Style::default().fg(Color::White),
        )));
    }

    lines.push(Line::from(""));
    if let Some(error) = fields.error() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    lines
}

fn submit_line(label: &str, pending: bool) -> Line<'static> {
    if pending {
        muted("Submitting...")
    } else {
        Line::from(Span::styled(
            format!("[Enter] {}", label),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ))
    }
}

/// Render the login or signup form
pub fn render_auth_form(
    area: Rect,
    buf: &mut Buffer,
    title: &str,
    submit_label: &str,
    fields: &FieldSet,
    notice: Option<&str>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    block.render(area, buf);

    let mut lines = Vec::new();
    if let Some(notice) = notice {
        lines.push(Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Yellow),
        )));
        lines.push(Line::from(""));
    }
    lines.extend(render_fields(fields));
    lines.push(submit_line(submit_label, fields.is_pending()));
    lines.push(muted("←/→ switch between Login and Sign Up"));

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(inner, buf);
}

/// Render an add/edit form as a popup over the page
pub fn render_entity_form(
    area: Rect,
    buf: &mut Buffer,
    title: &str,
    submit_label: &str,
    fields: &FieldSet,
) {
    Clear.render(area, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    block.render(area, buf);

    let mut lines = render_fields(fields);
    lines.push(submit_line(submit_label, fields.is_pending()));
    lines.push(muted("[Esc] Cancel"));

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(inner, buf);
}

/// Render a page level error banner
pub fn render_notice(area: Rect, buf: &mut Buffer, notice: &str) {
    Paragraph::new(Line::from(Span::styled(
        format!(" ! {} ", notice),
        Style::default().fg(Color::White).bg(Color::Red),
    )))
    .render(area, buf);
}

/// Render help overlay
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    Clear.render(area, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    block.render(area, buf);

    let section = Style::default().fg(Color::Cyan);
    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Navigation:", section)),
        Line::from("  Tab/→    - Next page"),
        Line::from("  Shift+Tab/← - Previous page"),
        Line::from("  1-9      - Jump to page"),
        Line::from("  ↑/k ↓/j  - Select card"),
        Line::from(""),
        Line::from(Span::styled("Workouts and Goals:", section)),
        Line::from("  a        - Add"),
        Line::from("  e        - Edit selected"),
        Line::from("  d        - Delete selected"),
        Line::from(""),
        Line::from(Span::styled("Other:", section)),
        Line::from("  r        - Refresh"),
        Line::from("  x        - Logout"),
        Line::from("  ?        - Toggle this help"),
        Line::from("  q        - Quit"),
        Line::from(""),
        muted("Press ? or ESC to close"),
    ];

    Paragraph::new(help_text).render(inner, buf);
}

/// Render status bar at bottom
pub fn render_status_bar(area: Rect, buf: &mut Buffer, route: Route, user: Option<&User>) {
    let who = match user {
        Some(user) => Span::styled(
            format!(" {} ({}) ", user.name, user.role),
            Style::default().fg(Color::Green).bg(Color::DarkGray),
        ),
        None => Span::styled(
            " Not logged in ",
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        ),
    };

    let location = Span::styled(
        format!(" {} ", route.path()),
        Style::default().fg(Color::White).bg(Color::DarkGray),
    );

    let help_hint = Span::styled(
        " Press ? for help ",
        Style::default().fg(Color::Gray).bg(Color::DarkGray),
    );

    Paragraph::new(Line::from(vec![who, location, help_hint])).render(area, buf);
}
