//! Generic table widget state: column widths, drag-to-resize, sort toggling.
//!
//! Rendering is left to the host (see `tui::widgets::table`); this module is
//! pure state and has no terminal dependency.

mod column;
mod resize;
mod sort;
mod widget;
mod widths;

pub use column::{Align, CellRenderer, ColumnDescriptor, ColumnError, ColumnSet, Pin, TableRow};
pub use resize::{
    CaptureGuard, DEFAULT_MAX_WIDTH, DEFAULT_MIN_WIDTH, PointerCapture, ResizeSession, clamp_width,
};
pub use sort::{SortDirection, SortState};
pub use widget::{
    ColumnSpan, DEFAULT_EMPTY_MESSAGE, HeaderHit, HeaderLayout, Propagation, ResizableTable,
    ResizeHandler, RowClickHandler, SortHandler, TableBody, TableHandlers,
};
pub use widths::ColumnWidths;
