//! Main rendering logic for TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use super::state::{AppState, Popup};
use super::widgets::{
    render_detail, render_filter_bar, render_header, render_help, render_list, render_status_bar,
};

/// Main render function.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Length(1), // Location / filters
        Constraint::Min(3),    // Table
        Constraint::Length(1), // Status
    ])
    .split(area);

    render_header(frame, chunks[0], state);
    render_filter_bar(frame, chunks[1], state);
    render_list(frame, chunks[2], state);
    render_status_bar(frame, chunks[3], state);

    // Popups are rendered last to overlay everything
    let view = state.view();
    match &mut state.popup {
        Popup::None => {}
        Popup::Help { scroll } => render_help(frame, area, view, scroll),
        Popup::Detail { detail, scroll } => render_detail(frame, area, detail, scroll),
    }
}
