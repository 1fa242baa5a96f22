//! SQL executed against a single shard connection.
//!
//! Functions here return `rusqlite::Result`; the accessor owns the mapping
//! to `ShardError::Unavailable`.

pub mod items;
pub mod threads;

pub use items::{get_item, search_items};
pub use threads::get_children;

/// Column list shared by every item query, in `parse_item_row` order.
pub(crate) const ITEM_COLUMNS: &str = "i.id, i.type, i.time, i.by, i.title, i.text, i.url, i.score, i.parent";

/// True if `table` exists in the connected shard.
pub fn has_table(conn: &rusqlite::Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [table],
        |row| row.get(0),
    )
}
