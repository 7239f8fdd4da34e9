//! In-app location (`view?query`) and navigation history.
//!
//! The location plays the role of a browser URL: list filters live only in
//! its query string, so they survive view switches and can be copied out
//! and passed back in on the command line.

use std::fmt;

/// List views of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Factors,
    Strategies,
    Experiences,
    Notes,
}

impl View {
    pub fn all() -> &'static [View] {
        &[View::Factors, View::Strategies, View::Experiences, View::Notes]
    }

    /// Path segment, also the REST resource name.
    pub fn path(&self) -> &'static str {
        match self {
            View::Factors => "factors",
            View::Strategies => "strategies",
            View::Experiences => "experiences",
            View::Notes => "notes",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            View::Factors => "Factors",
            View::Strategies => "Strategies",
            View::Experiences => "Experiences",
            View::Notes => "Notes",
        }
    }

    pub fn from_path(path: &str) -> Option<View> {
        let path = path.trim().trim_matches('/');
        View::all().iter().copied().find(|v| v.path() == path)
    }

    pub fn next(&self) -> View {
        match self {
            View::Factors => View::Strategies,
            View::Strategies => View::Experiences,
            View::Experiences => View::Notes,
            View::Notes => View::Factors,
        }
    }

    pub fn prev(&self) -> View {
        match self {
            View::Factors => View::Notes,
            View::Strategies => View::Factors,
            View::Experiences => View::Strategies,
            View::Notes => View::Experiences,
        }
    }
}

/// Error for a location typed by the user that names no view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationError {
    pub input: String,
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown view in '{}' (expected factors, strategies, experiences or notes)",
            self.input
        )
    }
}

impl std::error::Error for LocationError {}

/// A view plus its query string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub view: View,
    pub query: String,
}

impl Location {
    pub fn new(view: View, query: impl Into<String>) -> Self {
        Self {
            view,
            query: query.into(),
        }
    }

    /// Parses `view?query`; an unknown view falls back to factors.
    pub fn parse(input: &str) -> Self {
        Self::try_parse(input).unwrap_or_else(|_| {
            let query = input.split_once('?').map(|(_, q)| q).unwrap_or("");
            Location::new(View::default(), query)
        })
    }

    /// Strict variant used for user-typed locations.
    pub fn try_parse(input: &str) -> Result<Self, LocationError> {
        let input = input.trim();
        let (path, query) = input.split_once('?').unwrap_or((input, ""));
        let view = View::from_path(path).ok_or_else(|| LocationError {
            input: input.to_string(),
        })?;
        Ok(Location::new(view, query))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            write!(f, "{}", self.view.path())
        } else {
            write!(f, "{}?{}", self.view.path(), self.query)
        }
    }
}

/// Current location with back/forward history.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: Location,
    back: Vec<Location>,
    forward: Vec<Location>,
    /// Last query seen per view, restored when switching back to it.
    remembered: Vec<(View, String)>,
}

/// Upper bound on retained back entries.
const MAX_HISTORY: usize = 100;

impl Navigator {
    pub fn new(start: Location) -> Self {
        Self {
            current: start,
            ..Self::default()
        }
    }

    pub fn current(&self) -> &Location {
        &self.current
    }

    /// Navigates to a new location, recording the current one.
    pub fn push(&mut self, location: Location) {
        if location == self.current {
            return;
        }
        self.remember();
        let previous = std::mem::replace(&mut self.current, location);
        self.back.push(previous);
        if self.back.len() > MAX_HISTORY {
            self.back.remove(0);
        }
        self.forward.clear();
    }

    /// Replaces the current location without a history entry.
    pub fn replace(&mut self, location: Location) {
        self.current = location;
    }

    /// Replaces the query of the current view.
    pub fn replace_query(&mut self, query: String) {
        self.current.query = query;
    }

    pub fn back(&mut self) -> bool {
        let Some(previous) = self.back.pop() else {
            return false;
        };
        self.remember();
        let current = std::mem::replace(&mut self.current, previous);
        self.forward.push(current);
        true
    }

    pub fn forward(&mut self) -> bool {
        let Some(next) = self.forward.pop() else {
            return false;
        };
        self.remember();
        let current = std::mem::replace(&mut self.current, next);
        self.back.push(current);
        true
    }

    /// Switches view, restoring the query last used there.
    pub fn switch_view(&mut self, view: View) {
        if view == self.current.view {
            return;
        }
        let query = self
            .remembered
            .iter()
            .find(|(v, _)| *v == view)
            .map(|(_, q)| q.clone())
            .unwrap_or_default();
        self.push(Location::new(view, query));
    }

    fn remember(&mut self) {
        let view = self.current.view;
        let query = self.current.query.clone();
        match self.remembered.iter_mut().find(|(v, _)| *v == view) {
            Some(entry) => entry.1 = query,
            None => self.remembered.push((view, query)),
        }
    }
}
