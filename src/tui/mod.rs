//! Terminal User Interface for quantdesk.
//!
//! One table per research view, a location line that mirrors the active
//! filters, and popups for help and record details.

mod app;
mod event;
mod input;
mod pane;
mod render;
mod state;
mod style;
mod widgets;

pub use app::App;
pub use event::Event;
pub use input::KeyAction;
pub use pane::{Detail, HeaderCell, ListPane};
pub use state::{AppState, InputMode, PageInfo, Popup, TableEvent, TableGeometry};
