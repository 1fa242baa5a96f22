//! Comment threads via the `edges` table.

use rusqlite::Connection;

use hnshard_core::models::{Item, ItemId};

use super::items::parse_item_row;
use super::{has_table, ITEM_COLUMNS};

/// Direct children of `parent_id` with their sibling order.
/// Shards without an `edges` table have no thread data and return nothing.
pub fn get_children(conn: &Connection, parent_id: ItemId) -> rusqlite::Result<Vec<(i64, Item)>> {
    if !has_table(conn, "edges")? {
        return Ok(Vec::new());
    }
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS}, e.ord
         FROM edges e
         JOIN items i ON e.child_id = i.id
         WHERE e.parent_id = ?1
         ORDER BY e.ord, i.id"
    ))?;
    let rows = stmt.query_map([parent_id], |row| {
        let item = parse_item_row(row)?;
        let ord: Option<i64> = row.get(9)?;
        Ok((ord.unwrap_or(0), item))
    })?;
    rows.collect()
}
