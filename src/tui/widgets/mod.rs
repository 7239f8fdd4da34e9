//! TUI widgets for quantdesk.

mod detail;
mod filter_bar;
mod header;
mod help;
mod list;
mod popup;
mod status_bar;

pub use detail::render_detail;
pub use filter_bar::render_filter_bar;
pub use header::render_header;
pub use help::render_help;
pub use list::render_list;
pub use status_bar::render_status_bar;
