//! Keyword search and point lookup over the `items` table.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use hnshard_core::constants::LIKE_ESCAPE;
use hnshard_core::models::{Item, ItemId, ItemKind, ShardPredicate};

use super::ITEM_COLUMNS;

/// Map one `ITEM_COLUMNS` row. Missing score or time read as 0.
pub fn parse_item_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    let kind: Option<String> = row.get(1)?;
    Ok(Item {
        id: row.get(0)?,
        kind: ItemKind::from(kind.unwrap_or_default()),
        time: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
        author: row.get(3)?,
        title: row.get(4)?,
        text: row.get(5)?,
        url: row.get(6)?,
        score: row.get::<_, Option<i64>>(7)?.unwrap_or(0),
        parent: row.get(8)?,
    })
}

/// Turn a keyword into a literal-substring `LIKE` pattern.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Build the WHERE/ORDER/LIMIT statement and its positional parameters.
pub fn build_search_sql(predicate: &ShardPredicate) -> (String, Vec<Value>) {
    let mut params: Vec<Value> = Vec::with_capacity(predicate.terms.len() + 4);
    let mut keyword_clauses = Vec::with_capacity(predicate.terms.len());
    for term in &predicate.terms {
        params.push(Value::Text(like_pattern(term)));
        let n = params.len();
        keyword_clauses.push(format!(
            "i.title LIKE ?{n} ESCAPE '{LIKE_ESCAPE}' OR i.text LIKE ?{n} ESCAPE '{LIKE_ESCAPE}'"
        ));
    }

    let mut conditions = vec![format!("({})", keyword_clauses.join(" OR "))];

    // Score 0 is "no filter": items with a NULL score (comments) stay in.
    if predicate.min_score > 0 {
        params.push(Value::Integer(predicate.min_score));
        conditions.push(format!("COALESCE(i.score, 0) >= ?{}", params.len()));
    }
    if let Some(kind) = &predicate.item_kind {
        params.push(Value::Text(kind.as_str().to_string()));
        conditions.push(format!("i.type = ?{}", params.len()));
    }
    if let Some(range) = &predicate.time_range {
        params.push(Value::Integer(range.start));
        let start = params.len();
        params.push(Value::Integer(range.end));
        let end = params.len();
        conditions.push(format!("COALESCE(i.time, 0) BETWEEN ?{start} AND ?{end}"));
    }

    params.push(Value::Integer(i64::try_from(predicate.limit).unwrap_or(i64::MAX)));
    let sql = format!(
        "SELECT {ITEM_COLUMNS}
         FROM items i
         WHERE {}
         ORDER BY COALESCE(i.score, 0) DESC, COALESCE(i.time, 0) DESC, i.id ASC
         LIMIT ?{}",
        conditions.join(" AND "),
        params.len()
    );
    (sql, params)
}

/// Items matching `predicate`, already in ranking order, at most `limit`.
pub fn search_items(conn: &Connection, predicate: &ShardPredicate) -> rusqlite::Result<Vec<Item>> {
    if predicate.terms.is_empty() || predicate.limit == 0 {
        return Ok(Vec::new());
    }
    let (sql, params) = build_search_sql(predicate);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params.iter()), parse_item_row)?;
    rows.collect()
}

/// Fetch one item by id.
pub fn get_item(conn: &Connection, id: ItemId) -> rusqlite::Result<Option<Item>> {
    conn.query_row(
        &format!("SELECT {ITEM_COLUMNS} FROM items i WHERE i.id = ?1"),
        [id],
        parse_item_row,
    )
    .optional()
}
