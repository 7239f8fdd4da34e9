//! Object-safe view over the four typed tables.
//!
//! Input routing and rendering only need a handful of operations that do
//! not depend on the row type, so they go through `dyn ListPane`.

use crate::table::{Align, HeaderLayout, Propagation, ResizableTable, TableBody};
use crate::view::ResearchRecord;

/// Header cell of a visible column, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: &'static str,
    pub label: String,
    pub align: Align,
}

/// Content of the detail popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub title: String,
    pub fields: Vec<(&'static str, String)>,
    pub body: Option<String>,
}

pub trait ListPane {
    fn header_layout(&self, origin: u16, available: u16) -> HeaderLayout;
    fn header_cells(&self) -> Vec<HeaderCell>;
    fn body(&self) -> TableBody;
    /// Rows rendered dimmed (archived records).
    fn dimmed(&self, index: usize) -> bool;
    fn resizing_key(&self) -> Option<&str>;

    fn row_count(&self) -> usize;
    fn selected(&self) -> usize;
    fn select_up(&mut self);
    fn select_down(&mut self);
    fn home(&mut self);
    fn end(&mut self);

    fn header_pointer_down(&mut self, x: u16, layout: &HeaderLayout) -> Propagation;
    fn pointer_move(&mut self, x: u16) -> Propagation;
    fn pointer_up(&mut self) -> Propagation;
    fn click_row(&mut self, index: usize) -> Propagation;

    fn detail(&self, index: usize) -> Option<Detail>;
}

impl<R: ResearchRecord> ListPane for ResizableTable<R> {
    fn header_layout(&self, origin: u16, available: u16) -> HeaderLayout {
        ResizableTable::header_layout(self, origin, available)
    }

    fn header_cells(&self) -> Vec<HeaderCell> {
        self.columns()
            .visible()
            .map(|column| HeaderCell {
                key: column.key,
                label: self.header_label(column),
                align: column.align,
            })
            .collect()
    }

    fn body(&self) -> TableBody {
        ResizableTable::body(self)
    }

    fn dimmed(&self, index: usize) -> bool {
        self.data().get(index).is_some_and(|row| row.is_archived())
    }

    fn resizing_key(&self) -> Option<&str> {
        ResizableTable::resizing_key(self)
    }

    fn row_count(&self) -> usize {
        self.data().len()
    }

    fn selected(&self) -> usize {
        ResizableTable::selected(self)
    }

    fn select_up(&mut self) {
        ResizableTable::select_up(self)
    }

    fn select_down(&mut self) {
        ResizableTable::select_down(self)
    }

    fn home(&mut self) {
        ResizableTable::home(self)
    }

    fn end(&mut self) {
        ResizableTable::end(self)
    }

    fn header_pointer_down(&mut self, x: u16, layout: &HeaderLayout) -> Propagation {
        ResizableTable::header_pointer_down(self, x, layout)
    }

    fn pointer_move(&mut self, x: u16) -> Propagation {
        ResizableTable::pointer_move(self, x)
    }

    fn pointer_up(&mut self) -> Propagation {
        ResizableTable::pointer_up(self)
    }

    fn click_row(&mut self, index: usize) -> Propagation {
        ResizableTable::click_row(self, index)
    }

    fn detail(&self, index: usize) -> Option<Detail> {
        let row = self.data().get(index)?;
        Some(Detail {
            title: row.title().to_string(),
            fields: row.detail(),
            body: row.body().map(str::to_string),
        })
    }
}
