//! Record table for the active view.
//!
//! The header row is drawn cell by cell from the table's `HeaderLayout` so
//! that what the user sees matches what `header_pointer_down` hit-tests,
//! including the `│` resize handle after each column.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use crate::table::{Align, HeaderLayout, TableBody};
use crate::tui::pane::{HeaderCell, ListPane};
use crate::tui::state::{AppState, TableGeometry};
use crate::tui::style::Styles;

fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Center => Alignment::Center,
        Align::Right => Alignment::Right,
    }
}

/// First visible row index that keeps `selected` on screen, moving as
/// little as possible from `previous`.
fn scroll_offset(previous: usize, selected: usize, height: usize, len: usize) -> usize {
    if height == 0 || len == 0 {
        return 0;
    }
    let offset = previous.min(len.saturating_sub(height));
    if selected < offset {
        selected
    } else if selected >= offset + height {
        selected + 1 - height
    } else {
        offset
    }
}

fn render_header_row(
    frame: &mut Frame,
    area: Rect,
    layout: &HeaderLayout,
    cells: &[HeaderCell],
    resizing: Option<&str>,
) {
    frame.render_widget(Paragraph::new("").style(Styles::table_header()), area);

    for (span, cell) in layout.spans.iter().zip(cells) {
        let label_area = Rect::new(span.start, area.y, span.width, 1);
        let label = Paragraph::new(Line::from(cell.label.clone()).alignment(alignment(cell.align)))
            .style(Styles::table_header());
        frame.render_widget(label, label_area);

        let handle = span.handle();
        if handle < area.right() {
            let style = if resizing == Some(span.key) {
                Styles::resize_handle_active()
            } else {
                Styles::resize_handle()
            };
            frame.render_widget(
                Paragraph::new(Span::styled("│", style)),
                Rect::new(handle, area.y, 1, 1),
            );
        }
    }
}

fn render_placeholder(frame: &mut Frame, area: Rect, state: &AppState, message: &str) {
    let lines = match &state.last_error {
        Some(err) => vec![
            Line::from(Span::styled(format!("Failed to load: {}", err), Styles::error())),
            Line::from(Span::styled("press r to retry", Styles::dim())),
        ],
        None => vec![Line::from(Span::styled(message.to_string(), Styles::dim()))],
    };
    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let target = Rect::new(
        area.x,
        area.y + top,
        area.width,
        area.height.saturating_sub(top),
    );
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), target);
}

fn render_rows(
    frame: &mut Frame,
    area: Rect,
    pane: &dyn ListPane,
    layout: &HeaderLayout,
    cells: &[HeaderCell],
    rows: Vec<Vec<String>>,
    offset: usize,
) {
    let selected = pane.selected();
    let visible: Vec<Row> = rows
        .into_iter()
        .enumerate()
        .skip(offset)
        .take(area.height as usize)
        .map(|(index, texts)| {
            let style = if index == selected {
                Styles::selected()
            } else if pane.dimmed(index) {
                Styles::dim()
            } else {
                Styles::default()
            };
            let row_cells = texts
                .into_iter()
                .zip(cells)
                .take(layout.spans.len())
                .map(|(text, cell)| Cell::from(Line::from(text).alignment(alignment(cell.align))));
            Row::new(row_cells).style(style).height(1)
        })
        .collect();

    let constraints: Vec<Constraint> = layout
        .spans
        .iter()
        .map(|span| Constraint::Length(span.width))
        .collect();
    let table = Table::new(visible, constraints).column_spacing(1);
    frame.render_widget(table, area);
}

/// Renders the active view's table and records its geometry for mouse routing.
pub fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let view = state.view();
    let title = match state.page {
        Some(info) => format!(" {} ({}) ", view.name(), info.total),
        None => format!(" {} ", view.name()),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Styles::default());
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height < 2 {
        state.geometry = TableGeometry::default();
        return;
    }
    let header = Rect { height: 1, ..inner };
    let body = Rect {
        y: inner.y + 1,
        height: inner.height - 1,
        ..inner
    };

    let previous = state.geometry.offset;
    let pane = state.pane();
    let layout = pane.header_layout(header.x, header.width);
    let cells = pane.header_cells();
    render_header_row(frame, header, &layout, &cells, pane.resizing_key());

    let offset = match pane.body() {
        TableBody::Empty { message, .. } => {
            render_placeholder(frame, body, state, &message);
            0
        }
        TableBody::Rows(rows) => {
            let offset = scroll_offset(
                previous,
                pane.selected(),
                body.height as usize,
                rows.len(),
            );
            render_rows(frame, body, pane, &layout, &cells, rows, offset);
            offset
        }
    };

    state.geometry = TableGeometry {
        header,
        body,
        offset,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_follows_selection() {
        assert_eq!(scroll_offset(0, 3, 10, 50), 0);
        assert_eq!(scroll_offset(0, 12, 10, 50), 3);
        assert_eq!(scroll_offset(5, 2, 10, 50), 2);
        assert_eq!(scroll_offset(5, 9, 10, 50), 5);
    }

    #[test]
    fn offset_is_clamped_to_data() {
        // Fewer rows after a reload.
        assert_eq!(scroll_offset(40, 2, 10, 8), 0);
        assert_eq!(scroll_offset(40, 15, 10, 20), 10);
        assert_eq!(scroll_offset(3, 0, 0, 20), 0);
    }
}
