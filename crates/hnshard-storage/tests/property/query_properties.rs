use hnshard_core::models::{Item, ItemKind, ShardPredicate};
use hnshard_storage::queries::search_items;
use proptest::prelude::*;
use rusqlite::{params, Connection};

fn shard_with(titles: &[(String, i64)]) -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE items (id INTEGER PRIMARY KEY, type TEXT, time INTEGER, by TEXT,
                             title TEXT, text TEXT, url TEXT, score INTEGER, parent INTEGER)",
    )
    .unwrap();
    for (id, (title, score)) in titles.iter().enumerate() {
        conn.execute(
            "INSERT INTO items (id, type, time, title, score) VALUES (?1, 'story', ?2, ?3, ?4)",
            params![id as i64, 100 + id as i64, title, score],
        )
        .unwrap();
    }
    conn
}

fn as_item(id: usize, title: &str, score: i64) -> Item {
    Item {
        id: id as i64,
        kind: ItemKind::Story,
        author: None,
        title: Some(title.to_string()),
        text: None,
        url: None,
        score,
        time: 100 + id as i64,
        parent: None,
    }
}

// ── SQL evaluation agrees with in-process matching ─────────────────────────

proptest! {
    #[test]
    fn sql_agrees_with_predicate_matches(
        titles in prop::collection::vec(("[abAB%_\\\\ ]{0,8}", 0i64..5), 0..20),
        term in "[ab%_\\\\]{1,3}",
        min_score in 0i64..4,
    ) {
        let conn = shard_with(&titles);
        let predicate = ShardPredicate {
            terms: vec![term],
            min_score,
            item_kind: None,
            time_range: None,
            limit: 100,
        };

        let mut expected: Vec<Item> = titles
            .iter()
            .enumerate()
            .map(|(id, (title, score))| as_item(id, title, *score))
            .filter(|item| predicate.matches(item))
            .collect();
        expected.sort_by(Item::rank_cmp);

        let got = search_items(&conn, &predicate).unwrap();
        prop_assert_eq!(
            got.iter().map(|i| i.id).collect::<Vec<_>>(),
            expected.iter().map(|i| i.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn per_shard_limit_is_respected(
        count in 0usize..40,
        limit in 1usize..10,
    ) {
        let titles: Vec<(String, i64)> = (0..count).map(|n| ("rust".to_string(), n as i64)).collect();
        let conn = shard_with(&titles);
        let predicate = ShardPredicate {
            terms: vec!["rust".to_string()],
            min_score: 0,
            item_kind: None,
            time_range: None,
            limit,
        };
        let got = search_items(&conn, &predicate).unwrap();
        prop_assert_eq!(got.len(), count.min(limit));
        prop_assert!(got.windows(2).all(|w| w[0].rank_cmp(&w[1]).is_lt()));
    }
}
