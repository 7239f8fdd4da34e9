//! Record detail popup.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;

use super::popup::{centered_rect, kv, render_popup_frame, section};
use crate::tui::pane::Detail;

fn build_content(detail: &Detail) -> Vec<Line<'static>> {
    let mut lines = vec![section("Fields")];
    lines.extend(detail.fields.iter().map(|(key, value)| kv(key, value)));
    if let Some(body) = &detail.body {
        lines.push(Line::from(""));
        lines.push(section("Content"));
        lines.extend(body.lines().map(|l| Line::from(l.to_string())));
    }
    lines
}

pub fn render_detail(frame: &mut Frame, area: Rect, detail: &Detail, scroll: &mut usize) {
    let popup_area = centered_rect(80, 85, area);
    render_popup_frame(frame, popup_area, &detail.title, build_content(detail), scroll);
}
