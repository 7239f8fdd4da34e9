//! Resizable/sortable table state machine.
//!
//! The widget owns column widths, the resize session and the last known sort
//! state. It never reorders rows: sort clicks are reported to the owner,
//! which supplies rows already in the requested order.

use std::collections::HashMap;

use super::column::{ColumnDescriptor, ColumnSet, TableRow};
use super::resize::{PointerCapture, ResizeSession};
use super::sort::SortState;
use super::widths::ColumnWidths;

/// Message shown in place of rows when there is no data.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No data";

pub type ResizeHandler = Box<dyn FnMut(&str, u16)>;
pub type SortHandler = Box<dyn FnMut(&SortState)>;
pub type RowClickHandler<R> = Box<dyn FnMut(usize, &R)>;

/// Outbound notifications. Absent handlers disable the matching behavior.
pub struct TableHandlers<R> {
    pub on_column_resize: Option<ResizeHandler>,
    pub on_sort: Option<SortHandler>,
    pub on_row_click: Option<RowClickHandler<R>>,
}

impl<R> Default for TableHandlers<R> {
    fn default() -> Self {
        Self {
            on_column_resize: None,
            on_sort: None,
            on_row_click: None,
        }
    }
}

/// Whether an input event was handled by the table and must not bubble
/// further (to a sort toggle or a row click).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Consumed,
    Ignored,
}

/// Render model for the table body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    /// Cell text per row, visible columns only.
    Rows(Vec<Vec<String>>),
    /// Single placeholder row spanning every visible column.
    Empty { message: String, colspan: usize },
}

/// Horizontal extent of one visible column in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub key: &'static str,
    pub start: u16,
    pub width: u16,
}

impl ColumnSpan {
    /// Resize handle: the one-cell gap right after the column.
    pub fn handle(&self) -> u16 {
        self.start.saturating_add(self.width)
    }
}

/// What a pointer position in the header lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderHit {
    Label(&'static str),
    Handle(&'static str),
}

/// Positions of visible columns, clipped to the available width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderLayout {
    pub spans: Vec<ColumnSpan>,
}

impl HeaderLayout {
    /// Lays out visible columns left to right from `origin`, one cell of
    /// spacing between columns. Columns past `available` are dropped; the
    /// last partially visible one is truncated.
    pub fn compute<R>(
        columns: &ColumnSet<R>,
        widths: &ColumnWidths,
        origin: u16,
        available: u16,
    ) -> Self {
        let mut spans = Vec::new();
        let mut offset: u16 = 0;
        for column in columns.visible() {
            if offset >= available {
                break;
            }
            let width = widths.get_or(column.key, column.width);
            let fitted = width.min(available - offset);
            spans.push(ColumnSpan {
                key: column.key,
                start: origin.saturating_add(offset),
                width: fitted,
            });
            offset = offset.saturating_add(fitted).saturating_add(1);
        }
        Self { spans }
    }

    pub fn hit(&self, x: u16) -> Option<HeaderHit> {
        for span in &self.spans {
            if x == span.handle() {
                return Some(HeaderHit::Handle(span.key));
            }
            if x >= span.start && x < span.handle() {
                return Some(HeaderHit::Label(span.key));
            }
        }
        None
    }
}

/// Table widget state.
pub struct ResizableTable<R> {
    columns: ColumnSet<R>,
    widths: ColumnWidths,
    data: Vec<R>,
    sort: Option<SortState>,
    session: Option<ResizeSession>,
    capture: PointerCapture,
    handlers: TableHandlers<R>,
    empty_message: String,
    disabled: Option<fn(&R) -> bool>,
    selected: usize,
    tracked_id: Option<u64>,
}

impl<R: TableRow> ResizableTable<R> {
    pub fn new(columns: ColumnSet<R>) -> Self {
        let widths = ColumnWidths::from_columns(&columns);
        Self {
            columns,
            widths,
            data: Vec::new(),
            sort: None,
            session: None,
            capture: PointerCapture::new(),
            handlers: TableHandlers::default(),
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            disabled: None,
            selected: 0,
            tracked_id: None,
        }
    }

    pub fn with_handlers(mut self, handlers: TableHandlers<R>) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Rows for which the predicate returns true cannot be clicked.
    pub fn with_disabled(mut self, predicate: fn(&R) -> bool) -> Self {
        self.disabled = Some(predicate);
        self
    }

    /// Shares a capture flag with the host instead of a private one.
    pub fn with_capture(mut self, capture: PointerCapture) -> Self {
        self.capture = capture;
        self
    }

    pub fn columns(&self) -> &ColumnSet<R> {
        &self.columns
    }

    pub fn widths(&self) -> &ColumnWidths {
        &self.widths
    }

    /// Rendered width of a column: its current width, or the base width.
    pub fn width_of(&self, column: &ColumnDescriptor<R>) -> u16 {
        self.widths.get_or(column.key, column.width)
    }

    pub fn apply_width_overrides(&mut self, overrides: &HashMap<String, u16>) {
        self.widths.apply_overrides(&self.columns, overrides);
    }

    /// Replaces the column set. Customized widths of surviving keys are kept;
    /// a resize of a column that disappeared is cancelled.
    pub fn set_columns(&mut self, columns: ColumnSet<R>) {
        self.widths.reconcile(&columns);
        if let Some(session) = &self.session
            && columns.get(&session.key).is_none()
        {
            self.session = None;
        }
        self.columns = columns;
    }

    pub fn data(&self) -> &[R] {
        &self.data
    }

    /// Replaces rows (already ordered by the owner) and keeps the selection
    /// on the same row id when it is still present.
    pub fn set_data(&mut self, data: Vec<R>) {
        self.data = data;
        self.resolve_selection();
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Pushes the owner's current sort state.
    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort;
    }

    pub fn capture(&self) -> &PointerCapture {
        &self.capture
    }

    pub fn is_resizing(&self) -> bool {
        self.session.is_some()
    }

    pub fn resizing_key(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.key.as_str())
    }

    // ------------------------------------------------------------------
    // Resize
    // ------------------------------------------------------------------

    /// Opens a resize session on `key`. Ignored while another session is open.
    pub fn begin_resize(&mut self, key: &str, pointer_x: i32) -> Propagation {
        if self.session.is_some() {
            return Propagation::Consumed;
        }
        let Some(column) = self.columns.get(key) else {
            return Propagation::Ignored;
        };
        let Some(guard) = self.capture.acquire() else {
            return Propagation::Consumed;
        };
        let start_width = self.widths.get_or(key, column.width);
        self.session = Some(ResizeSession::new(key, pointer_x, start_width, guard));
        Propagation::Consumed
    }

    /// Updates the width of the column being resized.
    pub fn continue_resize(&mut self, pointer_x: i32) {
        let Some(session) = &self.session else {
            return;
        };
        let Some(column) = self.columns.get(&session.key) else {
            return;
        };
        let width = column.clamp(session.candidate_width(pointer_x));
        self.widths.set(&session.key, width);
    }

    /// Reports the final width and closes the session. No-op without a session.
    pub fn end_resize(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let width = self.widths.get_or(&session.key, session.start_width);
        if let Some(handler) = self.handlers.on_column_resize.as_mut() {
            handler(&session.key, width);
        }
    }

    /// Drops an open session without reporting a width. Releases the capture.
    pub fn cancel_resize(&mut self) {
        if let Some(session) = self.session.take() {
            self.widths.set(&session.key, session.start_width);
        }
    }

    // ------------------------------------------------------------------
    // Sort
    // ------------------------------------------------------------------

    /// Header click on `key`. Flips the direction of the current field or
    /// selects a new field descending, then notifies the owner.
    pub fn toggle_sort(&mut self, key: &str) -> Propagation {
        let Some(handler) = self.handlers.on_sort.as_mut() else {
            return Propagation::Ignored;
        };
        match self.columns.get(key) {
            Some(column) if column.sortable => {}
            _ => return Propagation::Ignored,
        }
        let next = SortState::toggled(self.sort.as_ref(), key);
        handler(&next);
        self.sort = Some(next);
        Propagation::Consumed
    }

    // ------------------------------------------------------------------
    // Pointer routing
    // ------------------------------------------------------------------

    pub fn header_layout(&self, origin: u16, available: u16) -> HeaderLayout {
        HeaderLayout::compute(&self.columns, &self.widths, origin, available)
    }

    /// Pointer-down in the header: a handle starts a resize, a label toggles sort.
    /// Swallowed while a resize is in progress.
    pub fn header_pointer_down(&mut self, x: u16, layout: &HeaderLayout) -> Propagation {
        if self.session.is_some() {
            return Propagation::Consumed;
        }
        match layout.hit(x) {
            Some(HeaderHit::Handle(key)) => self.begin_resize(key, x as i32),
            Some(HeaderHit::Label(key)) => self.toggle_sort(key),
            None => Propagation::Ignored,
        }
    }

    pub fn pointer_move(&mut self, x: u16) -> Propagation {
        if self.session.is_none() {
            return Propagation::Ignored;
        }
        self.continue_resize(x as i32);
        Propagation::Consumed
    }

    pub fn pointer_up(&mut self) -> Propagation {
        if self.session.is_none() {
            return Propagation::Ignored;
        }
        self.end_resize();
        Propagation::Consumed
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    pub fn is_disabled(&self, index: usize) -> bool {
        match (self.disabled, self.data.get(index)) {
            (Some(predicate), Some(row)) => predicate(row),
            _ => false,
        }
    }

    /// Selects the row and notifies the row-click handler.
    pub fn click_row(&mut self, index: usize) -> Propagation {
        if index >= self.data.len() || self.is_disabled(index) {
            return Propagation::Ignored;
        }
        self.selected = index;
        self.tracked_id = Some(self.data[index].id());
        if let Some(handler) = self.handlers.on_row_click.as_mut() {
            handler(index, &self.data[index]);
        }
        Propagation::Consumed
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&R> {
        self.data.get(self.selected)
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.track_selected();
    }

    pub fn select_down(&mut self) {
        let max = self.data.len().saturating_sub(1);
        self.selected = (self.selected + 1).min(max);
        self.track_selected();
    }

    pub fn home(&mut self) {
        self.selected = 0;
        self.track_selected();
    }

    pub fn end(&mut self) {
        self.selected = self.data.len().saturating_sub(1);
        self.track_selected();
    }

    fn track_selected(&mut self) {
        self.tracked_id = self.data.get(self.selected).map(|row| row.id());
    }

    fn resolve_selection(&mut self) {
        if self.data.is_empty() {
            self.selected = 0;
            self.tracked_id = None;
            return;
        }
        if let Some(tid) = self.tracked_id
            && let Some(pos) = self.data.iter().position(|row| row.id() == tid)
        {
            self.selected = pos;
        }
        self.selected = self.selected.min(self.data.len() - 1);
        self.track_selected();
    }

    // ------------------------------------------------------------------
    // Render model
    // ------------------------------------------------------------------

    /// Header text of a column, with the sort arrow when it is the sorted field.
    pub fn header_label(&self, column: &ColumnDescriptor<R>) -> String {
        match &self.sort {
            Some(sort) if sort.field == column.key => {
                format!("{} {}", column.label, sort.direction.arrow())
            }
            _ => column.label.to_string(),
        }
    }

    pub fn body(&self) -> TableBody {
        if self.data.is_empty() {
            return TableBody::Empty {
                message: self.empty_message.clone(),
                colspan: self.columns.visible_count(),
            };
        }
        let rows = self
            .data
            .iter()
            .map(|row| {
                self.columns
                    .visible()
                    .map(|column| column.renderer.render(column.key, row))
                    .collect()
            })
            .collect();
        TableBody::Rows(rows)
    }
}
