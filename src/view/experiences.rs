//! Research experience (lessons learned) page.

use chrono::Utc;

use super::ResearchRecord;
use super::format;
use crate::api::Experience;
use crate::table::{ColumnDescriptor, ColumnError, ColumnSet, TableRow};

pub fn columns() -> Result<ColumnSet<Experience>, ColumnError> {
    ColumnSet::new(vec![
        ColumnDescriptor::new("title", "Title", 32).sortable().bounds(10, 80),
        ColumnDescriptor::new("research_type", "Type", 16).bounds(6, 24),
        ColumnDescriptor::new("outcome", "Outcome", 8).bounds(6, 12),
        ColumnDescriptor::new("importance", "Importance", 10)
            .sortable()
            .bounds(5, 12)
            .format(|e: &Experience| format::stars(e.importance)),
        ColumnDescriptor::new("tags", "Tags", 16).bounds(4, 40),
        ColumnDescriptor::new("updated_at", "Updated", 10)
            .sortable()
            .bounds(8, 24),
    ])
}

impl TableRow for Experience {
    fn id(&self) -> u64 {
        self.id
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "title" => self.title.clone(),
            "research_type" => self.research_type.to_string(),
            "outcome" => self.outcome.to_string(),
            "importance" => self.importance.to_string(),
            "tags" => format::tags(&self.tags),
            "updated_at" => format::relative(self.updated_at, Utc::now()),
            "created_at" => format::relative(self.created_at, Utc::now()),
            _ => String::new(),
        }
    }
}

impl ResearchRecord for Experience {
    fn title(&self) -> &str {
        &self.title
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Research type", self.research_type.to_string()),
            ("Outcome", self.outcome.to_string()),
            ("Importance", format::stars(self.importance)),
            ("Tags", format::tags(&self.tags)),
            ("Created", format::timestamp(self.created_at)),
            ("Updated", format::timestamp(self.updated_at)),
        ]
    }

    fn body(&self) -> Option<&str> {
        Some(self.content.as_str()).filter(|c| !c.is_empty())
    }

    fn is_archived(&self) -> bool {
        self.is_archived
    }
}
