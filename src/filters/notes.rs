//! Research note list filters.

use std::collections::BTreeMap;

use super::params::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, FilterCodec, ParamWriter, read_bool, read_enum, read_flag,
    read_opt_enum, read_page, read_page_size, read_text,
};
use super::query::QueryReader;
use crate::table::SortDirection;

query_enum! {
    pub enum NoteType {
        Observation => ("observation", "Observation"),
        Hypothesis => ("hypothesis", "Hypothesis"),
        Experiment => ("experiment", "Experiment"),
        Summary => ("summary", "Summary"),
        Idea => ("idea", "Idea"),
    }
}

query_enum! {
    pub enum NoteOrderBy {
        UpdatedAt => ("updated_at", "Updated"),
        CreatedAt => ("created_at", "Created"),
        Title => ("title", "Title"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFilters {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub note_type: Option<NoteType>,
    pub tag: Option<String>,
    pub is_pinned: Option<bool>,
    pub is_archived: bool,
    pub order_by: NoteOrderBy,
    pub order: SortDirection,
}

impl Default for NoteFilters {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            note_type: None,
            tag: None,
            is_pinned: None,
            is_archived: false,
            order_by: NoteOrderBy::UpdatedAt,
            order: SortDirection::Desc,
        }
    }
}

impl FilterCodec for NoteFilters {
    const KEYS: &'static [&'static str] = &[
        "page",
        "page_size",
        "search",
        "note_type",
        "tag",
        "is_pinned",
        "is_archived",
        "order_by",
        "order",
    ];

    fn decode(q: &impl QueryReader) -> Self {
        let defaults = Self::default();
        Self {
            page: read_page(q),
            page_size: read_page_size(q),
            search: read_text(q, "search"),
            note_type: read_opt_enum(q, "note_type"),
            tag: read_text(q, "tag"),
            is_pinned: read_bool(q, "is_pinned"),
            is_archived: read_flag(q, "is_archived", defaults.is_archived),
            order_by: read_enum(q, "order_by", defaults.order_by),
            order: read_enum(q, "order", defaults.order),
        }
    }

    fn encode(&self) -> BTreeMap<String, String> {
        ParamWriter::new()
            .number("page", self.page)
            .number("page_size", self.page_size)
            .text("search", self.search.as_deref())
            .opt_value("note_type", self.note_type)
            .text("tag", self.tag.as_deref())
            .opt_flag("is_pinned", self.is_pinned)
            .flag("is_archived", self.is_archived)
            .value("order_by", self.order_by)
            .value("order", self.order)
            .finish()
    }
}

list_filters!(NoteFilters, NoteOrderBy);
