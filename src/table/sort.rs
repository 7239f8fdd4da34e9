//! Single-column sort state.

use std::fmt;

/// Sort direction. A newly chosen column starts descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Header arrow.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Field and direction of the current ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortState {
    pub field: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// State after a header click on `key`, given the current state.
    pub fn toggled(current: Option<&SortState>, key: &str) -> SortState {
        match current {
            Some(state) if state.field == key => SortState::new(key, state.direction.flip()),
            _ => SortState::new(key, SortDirection::default()),
        }
    }
}
