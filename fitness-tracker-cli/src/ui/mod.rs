// Terminal UI module using ratatui

mod app;
mod tui;
mod widgets;

pub use app::{App, AppEvent};
pub use tui::{draw, Tui};
