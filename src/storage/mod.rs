//! On-disk state kept between sessions.

mod layout;

pub use layout::{LayoutError, LayoutStore};
