//! Help popup with keybindings and per-view query parameters.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};

use super::popup::{render_popup_frame, section};
use crate::filters::{ExperienceFilters, FactorFilters, FilterCodec, NoteFilters, StrategyFilters};
use crate::location::View;
use crate::tui::style::Styles;

const KEYS: &[(&str, &str)] = &[
    ("1-4 Tab", "switch view"),
    ("↑/↓ j/k", "select row"),
    ("Home/End", "first / last row"),
    ("Enter", "open record"),
    ("←/→ [ ]", "previous / next page"),
    ("+ / -", "page size"),
    ("s / S", "next sort field / flip direction"),
    ("/", "search"),
    ("a", "toggle archived"),
    ("g", "edit location (view?query)"),
    ("Bksp Alt-←", "back"),
    ("Alt-→", "forward"),
    ("r", "refresh"),
    ("?", "this help"),
    ("q", "quit"),
];

const MOUSE: &[(&str, &str)] = &[
    ("click label", "sort by column (again to flip)"),
    ("drag │", "resize column"),
    ("click row", "open record"),
];

fn binding(key: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), Styles::help_key()),
        Span::raw(action.to_string()),
    ])
}

fn build_content(view: View) -> Vec<Line<'static>> {
    let mut lines = vec![section("Keys")];
    lines.extend(KEYS.iter().map(|(k, a)| binding(k, a)));
    lines.push(Line::from(""));
    lines.push(section("Mouse"));
    lines.extend(MOUSE.iter().map(|(k, a)| binding(k, a)));
    lines.push(Line::from(""));
    lines.push(section(&format!("{} query parameters", view.name())));

    let keys = match view {
        View::Factors => FactorFilters::KEYS,
        View::Strategies => StrategyFilters::KEYS,
        View::Experiences => ExperienceFilters::KEYS,
        View::Notes => NoteFilters::KEYS,
    };
    lines.push(Line::from(Span::styled(
        format!("  {}", keys.join(", ")),
        Styles::help(),
    )));
    lines
}

pub fn render_help(frame: &mut Frame, area: Rect, view: View, scroll: &mut usize) {
    // 60% width, 80% height, clamped to 40-80 x 10-30
    let popup_width = (area.width * 60 / 100).clamp(40, 80).min(area.width);
    let popup_height = (area.height * 80 / 100).clamp(10, 30).min(area.height);
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    render_popup_frame(frame, popup_area, "Help", build_content(view), scroll);
}
