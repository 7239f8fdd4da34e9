//! Research notes page.

use chrono::Utc;

use super::ResearchRecord;
use super::format;
use crate::api::Note;
use crate::table::{Align, ColumnDescriptor, ColumnError, ColumnSet, TableRow};

pub fn columns() -> Result<ColumnSet<Note>, ColumnError> {
    ColumnSet::new(vec![
        ColumnDescriptor::new("is_pinned", "Pin", 3)
            .align(Align::Center)
            .bounds(3, 5)
            .format(|n: &Note| if n.is_pinned { "●" } else { "" }.to_string()),
        ColumnDescriptor::new("title", "Title", 36).sortable().bounds(10, 80),
        ColumnDescriptor::new("note_type", "Type", 12).bounds(6, 16),
        ColumnDescriptor::new("tags", "Tags", 18).bounds(4, 40),
        ColumnDescriptor::new("updated_at", "Updated", 10)
            .sortable()
            .bounds(8, 24),
        ColumnDescriptor::new("created_at", "Created", 10)
            .sortable()
            .bounds(8, 24)
            .hidden(),
    ])
}

impl TableRow for Note {
    fn id(&self) -> u64 {
        self.id
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "title" => self.title.clone(),
            "note_type" => self.note_type.to_string(),
            "tags" => format::tags(&self.tags),
            "is_pinned" => format::flag(self.is_pinned),
            "updated_at" => format::relative(self.updated_at, Utc::now()),
            "created_at" => format::relative(self.created_at, Utc::now()),
            _ => String::new(),
        }
    }
}

impl ResearchRecord for Note {
    fn title(&self) -> &str {
        &self.title
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Type", self.note_type.to_string()),
            ("Tags", format::tags(&self.tags)),
            ("Pinned", if self.is_pinned { "yes" } else { "no" }.to_string()),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::NoteType;
    use crate::table::TableBody;
    use crate::table::ResizableTable;
    use chrono::DateTime;

    #[test]
    fn hidden_column_is_not_rendered() {
        let ts = DateTime::from_timestamp(1_704_153_600, 0).unwrap();
        let mut table = ResizableTable::new(columns().unwrap());
        table.set_data(vec![Note {
            id: 1,
            title: "Weekly recap".into(),
            note_type: NoteType::Summary,
            tags: vec!["risk".into(), "us".into()],
            content: String::new(),
            is_pinned: false,
            is_archived: false,
            created_at: ts,
            updated_at: ts,
        }]);
        let TableBody::Rows(rows) = table.body() else {
            panic!("expected rows");
        };
        assert_eq!(rows[0].len(), 5);
        assert_eq!(rows[0][1], "Weekly recap");
        assert_eq!(rows[0][3], "risk, us");
    }
}
