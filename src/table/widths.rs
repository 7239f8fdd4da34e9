//! Per-column width state.

use std::collections::{HashMap, HashSet};

use super::column::ColumnSet;

/// Current width of every column, keyed by column key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnWidths {
    widths: HashMap<String, u16>,
    /// Keys whose width came from a drag or a persisted override rather
    /// than the descriptor.
    customized: HashSet<String>,
}

impl ColumnWidths {
    /// Seeds every column with its declared base width.
    pub fn from_columns<R>(columns: &ColumnSet<R>) -> Self {
        let widths = columns
            .iter()
            .map(|c| (c.key.to_string(), c.width))
            .collect();
        Self {
            widths,
            customized: HashSet::new(),
        }
    }

    /// Applies previously persisted widths. Unknown keys are ignored and
    /// values are clamped into each column's bounds.
    pub fn apply_overrides<R>(&mut self, columns: &ColumnSet<R>, overrides: &HashMap<String, u16>) {
        for (key, &width) in overrides {
            if let Some(column) = columns.get(key) {
                self.widths
                    .insert(key.clone(), column.clamp(width as i64));
                self.customized.insert(key.clone());
            }
        }
    }

    /// Brings the map in line with a new column set: customized keys that
    /// survive keep their width, every other key gets the new base width,
    /// removed keys are dropped.
    pub fn reconcile<R>(&mut self, columns: &ColumnSet<R>) {
        let mut next = HashMap::with_capacity(columns.len());
        for column in columns.iter() {
            let width = match self.widths.get(column.key) {
                Some(&width) if self.customized.contains(column.key) => width,
                _ => column.width,
            };
            next.insert(column.key.to_string(), width);
        }
        self.customized.retain(|key| next.contains_key(key));
        self.widths = next;
    }

    pub fn is_customized(&self, key: &str) -> bool {
        self.customized.contains(key)
    }

    pub fn get(&self, key: &str) -> Option<u16> {
        self.widths.get(key).copied()
    }

    /// Width for `key`, or `base` when the key is unknown.
    pub fn get_or(&self, key: &str, base: u16) -> u16 {
        self.get(key).unwrap_or(base)
    }

    pub(crate) fn set(&mut self, key: &str, width: u16) {
        if let Some(slot) = self.widths.get_mut(key) {
            *slot = width;
            self.customized.insert(key.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn as_map(&self) -> &HashMap<String, u16> {
        &self.widths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column::ColumnDescriptor;

    #[derive(Debug)]
    struct Row;

    fn columns(keys: &[(&'static str, u16)]) -> ColumnSet<Row> {
        ColumnSet::new(
            keys.iter()
                .map(|&(key, width)| ColumnDescriptor::new(key, key, width))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn seeds_from_base_widths() {
        let widths = ColumnWidths::from_columns(&columns(&[("a", 100), ("b", 80)]));
        assert_eq!(widths.get("a"), Some(100));
        assert_eq!(widths.get("b"), Some(80));
        assert_eq!(widths.get_or("zzz", 42), 42);
    }

    #[test]
    fn reconcile_keeps_customized_and_seeds_new() {
        let mut widths = ColumnWidths::from_columns(&columns(&[("a", 100), ("b", 100)]));
        widths.set("a", 120);
        widths.set("b", 80);

        widths.reconcile(&columns(&[("a", 100), ("c", 90)]));

        assert_eq!(widths.get("a"), Some(120));
        assert_eq!(widths.get("c"), Some(90));
        assert_eq!(widths.get("b"), None);
        assert_eq!(widths.len(), 2);
    }

    #[test]
    fn reconcile_reseeds_untouched_columns_from_new_base() {
        let mut widths = ColumnWidths::from_columns(&columns(&[("a", 100), ("c", 90)]));
        widths.set("a", 130);

        widths.reconcile(&columns(&[("a", 60), ("c", 77)]));

        assert_eq!(widths.get("a"), Some(130));
        assert_eq!(widths.get("c"), Some(77));
        assert!(widths.is_customized("a"));
        assert!(!widths.is_customized("c"));
    }

    #[test]
    fn overrides_count_as_customized_and_dropped_keys_forget_it() {
        let mut widths = ColumnWidths::from_columns(&columns(&[("a", 100), ("b", 100)]));
        widths.apply_overrides(
            &columns(&[("a", 100), ("b", 100)]),
            &HashMap::from([("b".to_string(), 40)]),
        );
        assert!(widths.is_customized("b"));

        widths.reconcile(&columns(&[("a", 100)]));
        widths.reconcile(&columns(&[("a", 100), ("b", 55)]));
        assert_eq!(widths.get("b"), Some(55));
    }

    #[test]
    fn reconcile_to_empty_set_does_not_panic() {
        let mut widths = ColumnWidths::from_columns(&columns(&[("a", 100)]));
        widths.reconcile(&columns(&[]));
        assert!(widths.is_empty());
    }

    #[test]
    fn overrides_are_clamped_and_filtered() {
        let set = ColumnSet::new(vec![
            ColumnDescriptor::<Row>::new("a", "A", 10).bounds(5, 30),
            ColumnDescriptor::new("b", "B", 10),
        ])
        .unwrap();
        let mut widths = ColumnWidths::from_columns(&set);
        let overrides = HashMap::from([
            ("a".to_string(), 999),
            ("b".to_string(), 60),
            ("gone".to_string(), 10),
        ]);
        widths.apply_overrides(&set, &overrides);

        assert_eq!(widths.get("a"), Some(30));
        assert_eq!(widths.get("b"), Some(60));
        assert_eq!(widths.get("gone"), None);
    }

    #[test]
    fn set_ignores_unknown_keys() {
        let mut widths = ColumnWidths::from_columns(&columns(&[("a", 100)]));
        widths.set("nope", 10);
        assert_eq!(widths.len(), 1);
    }
}
