//! Bottom line: errors and messages on the left, cache counters and key
//! hints on the right.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::state::AppState;
use crate::tui::style::Styles;

fn message_line(state: &AppState) -> Line<'static> {
    if let Some(err) = &state.last_error {
        return Line::from(vec![
            Span::styled(format!(" {} ", err), Styles::error()),
            Span::styled("(press r to retry)", Styles::dim()),
        ]);
    }
    match &state.status_message {
        Some(msg) => Line::from(Span::styled(format!(" {}", msg), Styles::warning())),
        None => Line::from(""),
    }
}

fn hints_line(state: &AppState) -> Line<'static> {
    let mut spans = Vec::new();
    if let Some(stats) = state.cache_stats {
        spans.push(Span::styled(
            format!("cache {}/{} ", stats.hits, stats.hits + stats.misses),
            Styles::dim(),
        ));
    }
    for (key, action) in [("?", "help"), ("/", "search"), ("q", "quit")] {
        spans.push(Span::styled(format!(" {}", key), Styles::help_key()));
        spans.push(Span::styled(format!(" {}", action), Styles::help()));
    }
    spans.push(Span::raw(" "));
    Line::from(spans)
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::horizontal([Constraint::Min(10), Constraint::Length(44)]).split(area);
    frame.render_widget(Paragraph::new(message_line(state)), chunks[0]);
    frame.render_widget(
        Paragraph::new(hints_line(state)).alignment(Alignment::Right),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, CacheStats};
    use crate::location::Location;
    use crate::storage::LayoutStore;

    fn state() -> AppState {
        AppState::new(Location::parse("factors"), LayoutStore::in_memory()).unwrap()
    }

    #[test]
    fn error_takes_precedence_over_status_message() {
        let mut state = state();
        state.status_message = Some("Already on the last page".into());
        assert_eq!(message_line(&state).to_string(), " Already on the last page");

        state.last_error = Some(ApiError::Network("connection refused".into()));
        let text = message_line(&state).to_string();
        assert!(text.contains("connection refused"));
        assert!(text.ends_with("(press r to retry)"));
    }

    #[test]
    fn hints_show_cache_hits() {
        let mut state = state();
        assert!(!hints_line(&state).to_string().contains("cache"));
        state.cache_stats = Some(CacheStats {
            hits: 3,
            misses: 2,
            entries: 2,
        });
        assert!(hints_line(&state).to_string().starts_with("cache 3/5 "));
    }
}
