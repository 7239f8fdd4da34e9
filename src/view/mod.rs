//! Page definitions: column sets and row adapters for each list view.
//!
//! Each sub-module declares the columns of one view and implements
//! [`TableRow`] and [`ResearchRecord`] for its record type. Sortable column
//! keys are exactly the view's `order_by` tokens, so a header click maps
//! straight onto the query string.

pub mod experiences;
pub mod factors;
pub mod format;
pub mod notes;
pub mod strategies;

use crate::table::TableRow;

/// A record that can be listed and opened in the detail popup.
pub trait ResearchRecord: TableRow {
    /// Popup title.
    fn title(&self) -> &str;

    /// Labelled fields, in display order.
    fn detail(&self) -> Vec<(&'static str, String)>;

    /// Free text shown below the fields.
    fn body(&self) -> Option<&str> {
        None
    }

    /// Archived rows are rendered dimmed.
    fn is_archived(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::filters::{
        ExperienceOrderBy, FactorOrderBy, NoteOrderBy, QueryEnum, StrategyOrderBy,
    };
    use crate::table::ColumnSet;

    fn sortable_keys<R>(columns: &ColumnSet<R>) -> Vec<&'static str> {
        columns
            .iter()
            .filter(|c| c.sortable)
            .map(|c| c.key)
            .collect()
    }

    fn assert_sortable_in<E: QueryEnum>(keys: &[&str]) {
        for key in keys {
            assert!(
                E::from_param(key).is_some(),
                "sortable column '{}' is not an order_by value",
                key
            );
        }
    }

    #[test]
    fn sortable_columns_are_order_by_members() {
        assert_sortable_in::<FactorOrderBy>(&sortable_keys(&super::factors::columns().unwrap()));
        assert_sortable_in::<StrategyOrderBy>(&sortable_keys(
            &super::strategies::columns().unwrap(),
        ));
        assert_sortable_in::<ExperienceOrderBy>(&sortable_keys(
            &super::experiences::columns().unwrap(),
        ));
        assert_sortable_in::<NoteOrderBy>(&sortable_keys(&super::notes::columns().unwrap()));
    }

    #[test]
    fn non_sortable_columns_are_not_order_by_members() {
        let columns = super::factors::columns().unwrap();
        for column in columns.iter().filter(|c| !c.sortable) {
            assert!(FactorOrderBy::from_param(column.key).is_none());
        }
    }
}
