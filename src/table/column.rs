//! Column descriptors and the validated column set.

use std::collections::HashSet;
use std::fmt;

use super::resize::{DEFAULT_MAX_WIDTH, DEFAULT_MIN_WIDTH};

/// Horizontal text alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Side a column asks to be pinned to. Carried for callers, not applied by layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pin {
    Left,
    Right,
}

/// Row type displayed by the table widget.
pub trait TableRow {
    /// Stable identifier, used to keep the selection on the same row across reloads.
    fn id(&self) -> u64;

    /// Default text for the column with the given key.
    fn cell(&self, key: &str) -> String;
}

/// How a column turns a row into cell text.
pub enum CellRenderer<R> {
    /// Stringify via [`TableRow::cell`].
    Text,
    /// Custom formatter.
    Format(fn(&R) -> String),
}

impl<R> Clone for CellRenderer<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for CellRenderer<R> {}

impl<R> fmt::Debug for CellRenderer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellRenderer::Text => write!(f, "Text"),
            CellRenderer::Format(_) => write!(f, "Format(..)"),
        }
    }
}

impl<R: TableRow> CellRenderer<R> {
    pub fn render(&self, key: &str, row: &R) -> String {
        match self {
            CellRenderer::Text => row.cell(key),
            CellRenderer::Format(format) => format(row),
        }
    }
}

/// Static configuration of one table column.
#[derive(Debug)]
pub struct ColumnDescriptor<R> {
    pub key: &'static str,
    pub label: &'static str,
    /// Base width, used until the user resizes the column.
    pub width: u16,
    pub min_width: Option<u16>,
    pub max_width: Option<u16>,
    pub renderer: CellRenderer<R>,
    pub align: Align,
    pub sortable: bool,
    pub pin: Option<Pin>,
    pub hidden: bool,
}

impl<R> Clone for ColumnDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            label: self.label,
            width: self.width,
            min_width: self.min_width,
            max_width: self.max_width,
            renderer: self.renderer,
            align: self.align,
            sortable: self.sortable,
            pin: self.pin,
            hidden: self.hidden,
        }
    }
}

impl<R> ColumnDescriptor<R> {
    pub fn new(key: &'static str, label: &'static str, width: u16) -> Self {
        Self {
            key,
            label,
            width,
            min_width: None,
            max_width: None,
            renderer: CellRenderer::Text,
            align: Align::Left,
            sortable: false,
            pin: None,
            hidden: false,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn bounds(mut self, min: u16, max: u16) -> Self {
        self.min_width = Some(min);
        self.max_width = Some(max);
        self
    }

    pub fn format(mut self, format: fn(&R) -> String) -> Self {
        self.renderer = CellRenderer::Format(format);
        self
    }

    pub fn pin(mut self, pin: Pin) -> Self {
        self.pin = Some(pin);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Effective lower bound.
    pub fn min(&self) -> u16 {
        self.min_width.unwrap_or(DEFAULT_MIN_WIDTH)
    }

    /// Effective upper bound.
    pub fn max(&self) -> u16 {
        self.max_width.unwrap_or(DEFAULT_MAX_WIDTH)
    }

    /// Clamps a width into this column's bounds.
    pub fn clamp(&self, width: i64) -> u16 {
        width.clamp(self.min() as i64, self.max() as i64) as u16
    }
}

/// Error building a [`ColumnSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnError {
    /// Two descriptors share the same key.
    DuplicateKey(String),
    /// `min_width` exceeds `max_width`.
    InvalidBounds { key: String, min: u16, max: u16 },
}

impl fmt::Display for ColumnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnError::DuplicateKey(key) => write!(f, "duplicate column key '{}'", key),
            ColumnError::InvalidBounds { key, min, max } => {
                write!(f, "column '{}' has min width {} > max width {}", key, min, max)
            }
        }
    }
}

impl std::error::Error for ColumnError {}

/// Ordered list of column descriptors with unique keys.
#[derive(Debug)]
pub struct ColumnSet<R> {
    columns: Vec<ColumnDescriptor<R>>,
}

impl<R> Clone for ColumnSet<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<R> ColumnSet<R> {
    pub fn new(columns: Vec<ColumnDescriptor<R>>) -> Result<Self, ColumnError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key) {
                return Err(ColumnError::DuplicateKey(column.key.to_string()));
            }
            if column.min() > column.max() {
                return Err(ColumnError::InvalidBounds {
                    key: column.key.to_string(),
                    min: column.min(),
                    max: column.max(),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn get(&self, key: &str) -> Option<&ColumnDescriptor<R>> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor<R>> {
        self.columns.iter()
    }

    /// Columns that are not hidden, in declaration order.
    pub fn visible(&self) -> impl Iterator<Item = &ColumnDescriptor<R>> {
        self.columns.iter().filter(|c| !c.hidden)
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row;

    impl TableRow for Row {
        fn id(&self) -> u64 {
            1
        }

        fn cell(&self, key: &str) -> String {
            format!("<{}>", key)
        }
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let result = ColumnSet::<Row>::new(vec![
            ColumnDescriptor::new("a", "A", 10),
            ColumnDescriptor::new("a", "A again", 12),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ColumnError::DuplicateKey("a".to_string())
        );
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let result = ColumnSet::<Row>::new(vec![ColumnDescriptor::new("a", "A", 10).bounds(20, 5)]);
        assert!(matches!(
            result,
            Err(ColumnError::InvalidBounds { min: 20, max: 5, .. })
        ));
    }

    #[test]
    fn default_bounds_apply_when_undeclared() {
        let column = ColumnDescriptor::<Row>::new("a", "A", 100);
        assert_eq!(column.min(), 50);
        assert_eq!(column.max(), 800);
        assert_eq!(column.clamp(-3), 50);
        assert_eq!(column.clamp(10_000), 800);
    }

    #[test]
    fn renderer_falls_back_to_row_cell() {
        let text = ColumnDescriptor::<Row>::new("name", "Name", 10);
        assert_eq!(text.renderer.render(text.key, &Row), "<name>");

        let custom = ColumnDescriptor::<Row>::new("name", "Name", 10).format(|_| "custom".into());
        assert_eq!(custom.renderer.render(custom.key, &Row), "custom");
    }

    #[test]
    fn visible_skips_hidden_columns() {
        let set = ColumnSet::<Row>::new(vec![
            ColumnDescriptor::new("a", "A", 10),
            ColumnDescriptor::new("b", "B", 10).hidden(),
            ColumnDescriptor::new("c", "C", 10),
        ])
        .unwrap();
        let keys: Vec<_> = set.visible().map(|c| c.key).collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(set.len(), 3);
    }
}
