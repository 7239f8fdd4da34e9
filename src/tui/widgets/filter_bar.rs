//! Location line: input while editing, otherwise active filters,
//! ordering and page position.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::state::{AppState, InputMode};
use crate::tui::style::Styles;

fn filters_line(state: &AppState) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!(" /{} ", state.view().path()),
        Styles::accent(),
    )];
    let active = state.active_filters();
    if active.is_empty() {
        spans.push(Span::styled("no filters", Styles::dim()));
    }
    for (key, value) in active {
        spans.push(Span::styled(format!("{}=", key), Styles::dim()));
        spans.push(Span::raw(format!("{}  ", value)));
    }
    Line::from(spans)
}

fn position_text(state: &AppState) -> String {
    let ordering = state.ordering_label();
    match state.page {
        Some(info) => format!(
            "{}  page {}/{}  {} total  ({}/page) ",
            ordering, info.page, info.page_count, info.total, info.page_size
        ),
        None => format!("{} ", ordering),
    }
}

pub fn render_filter_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let prompt = match state.input_mode {
        InputMode::Search => Some("Search: "),
        InputMode::Location => Some("Go to: "),
        InputMode::Normal => None,
    };
    if let Some(prompt) = prompt {
        let line = Line::from(vec![
            Span::styled(format!(" {}", prompt), Styles::accent()),
            Span::styled(format!("{}█", state.input), Styles::input()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let chunks = Layout::horizontal([Constraint::Min(20), Constraint::Length(52)]).split(area);
    frame.render_widget(Paragraph::new(filters_line(state)), chunks[0]);
    frame.render_widget(
        Paragraph::new(position_text(state))
            .alignment(Alignment::Right)
            .style(Styles::dim()),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use crate::storage::LayoutStore;
    use crate::tui::state::PageInfo;

    fn state(start: &str) -> AppState {
        AppState::new(Location::parse(start), LayoutStore::in_memory()).unwrap()
    }

    #[test]
    fn filters_line_shows_non_default_filters() {
        let state = state("experiences?outcome=success&page=2");
        assert_eq!(
            filters_line(&state).to_string(),
            " /experiences outcome=success  "
        );
        let state = self::state("notes");
        assert_eq!(filters_line(&state).to_string(), " /notes no filters");
    }

    #[test]
    fn position_includes_page_info_once_loaded() {
        let mut state = state("factors");
        assert_eq!(position_text(&state), "Created ▼ ");
        state.page = Some(PageInfo {
            page: 2,
            page_size: 20,
            total: 36,
            page_count: 2,
        });
        assert_eq!(
            position_text(&state),
            "Created ▼  page 2/2  36 total  (20/page) "
        );
    }
}
