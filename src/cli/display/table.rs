//! Table builder wrapper around comfy-table for consistent display.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};

/// Create a two-column key/value table with the given headers.
///
/// Uses the NOTHING preset (no borders) for a clean CLI aesthetic.
pub fn detail_table(key_header: &str, value_header: &str) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header([key_header, value_header].iter().map(|h| {
            Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)
        }));
    table
}

/// Append a key/value row.
pub fn add_detail_row(table: &mut Table, key: &str, value: impl Into<String>) {
    table.add_row(vec![Cell::new(key), Cell::new(value.into())]);
}
