//! Text table of a collection's fields

use std::fmt;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use super::field::Field;

const CHECK: &str = "✔";

/// Renders fields as a table: one row per field, flags as check marks
pub struct FieldTable<'a> {
    fields: &'a [Field],
}

impl<'a> FieldTable<'a> {
    pub fn new(fields: &'a [Field]) -> Self {
        Self { fields }
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                "Name",
                "Type",
                "Kind",
                "Indexed",
                "Unique",
                "Nullable",
                "Primary key",
                "Auto increment",
                "Required",
            ]);

        for field in self.fields {
            table.add_row(vec![
                field.name.clone(),
                field.field_type.to_string(),
                field.kind().to_string(),
                mark(field.is_indexed),
                mark(field.is_unique),
                mark(field.is_nullable),
                mark(field.is_primary_key),
                mark(field.has_auto_increment),
                mark(field.is_required),
            ]);
        }

        table
    }
}

fn mark(flag: bool) -> String {
    if flag {
        CHECK.to_string()
    } else {
        String::new()
    }
}

impl fmt::Display for FieldTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_table())
    }
}
