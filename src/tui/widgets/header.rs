//! Header widget showing view tabs and the data source.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::location::View;
use crate::tui::state::AppState;
use crate::tui::style::Styles;

/// Renders the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::horizontal([
        Constraint::Length(11), // Title
        Constraint::Min(20),    // Tabs
        Constraint::Length(40), // Source
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(" quantdesk").style(Styles::header()),
        chunks[0],
    );

    let tabs: Vec<Span> = View::all()
        .iter()
        .enumerate()
        .flat_map(|(i, view)| {
            let style = if *view == state.view() {
                Styles::tab_active()
            } else {
                Styles::tab_inactive()
            };
            let num = format!(" {}:", i + 1);
            let name = format!("{} ", view.name());
            vec![Span::styled(num, Styles::dim()), Span::styled(name, style)]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(tabs)).style(Styles::header()),
        chunks[1],
    );

    let source = Paragraph::new(format!("{} ", state.source_name))
        .alignment(Alignment::Right)
        .style(Styles::header());
    frame.render_widget(source, chunks[2]);
}
