//! quantdesk - terminal client library for a quant research platform.
//!
//! This library provides:
//! - `table` - resizable, sortable table widget state
//! - `filters` - URL query ⇄ filter object codecs for each list view
//! - `location` - `view?query` locations and navigation history
//! - `api` - backend client, sample data source and response cache
//! - `tui` - the interactive `quantdesk` viewer

pub mod api;
pub mod filters;
pub mod location;
pub mod storage;
pub mod table;
pub mod tui;
pub mod view;
