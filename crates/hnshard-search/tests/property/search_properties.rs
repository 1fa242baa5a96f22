use hnshard_core::cancellation::CancellationToken;
use hnshard_core::models::{Item, ItemKind, Query};
use hnshard_core::HnShardConfig;
use hnshard_fixtures::ArchiveBuilder;
use hnshard_search::aggregator::merge_ranked;
use hnshard_search::planner::build_predicate;
use hnshard_search::SearchEngine;
use proptest::prelude::*;

const WORDS: [&str; 5] = ["rust", "keyboard", "sqlite", "shard", "vim"];

fn arb_item() -> impl Strategy<Value = (i64, i64, i64, usize, bool)> {
    // (id, score, time, word, title-or-text)
    (0i64..40, 0i64..8, 0i64..5, 0usize..WORDS.len(), any::<bool>())
}

fn build_item((id, score, time, word, in_title): (i64, i64, i64, usize, bool)) -> Item {
    let body = format!("about {}", WORDS[word]);
    Item {
        id,
        kind: if in_title { ItemKind::Story } else { ItemKind::Comment },
        author: None,
        title: in_title.then(|| body.clone()),
        text: (!in_title).then_some(body),
        url: None,
        score,
        time: 1_000 + time,
        parent: None,
    }
}

fn is_ranked(items: &[Item]) -> bool {
    items.windows(2).all(|w| w[0].rank_cmp(&w[1]).is_lt())
}

// ── Aggregation: distinct ids, bounded length, total order ────────────────

proptest! {
    #[test]
    fn merged_results_are_distinct_bounded_and_ranked(
        partials in prop::collection::vec(prop::collection::vec(arb_item(), 0..12), 0..5),
        limit in 1usize..20,
    ) {
        let partials: Vec<Vec<Item>> = partials
            .into_iter()
            .map(|p| p.into_iter().map(build_item).collect())
            .collect();
        let distinct: std::collections::HashSet<i64> =
            partials.iter().flatten().map(|i| i.id).collect();

        let merged = merge_ranked(partials, limit);

        prop_assert!(merged.items.len() <= limit);
        prop_assert_eq!(merged.total_candidates, distinct.len());
        prop_assert_eq!(merged.items.len(), distinct.len().min(limit));
        let ids: std::collections::HashSet<i64> = merged.items.iter().map(|i| i.id).collect();
        prop_assert_eq!(ids.len(), merged.items.len());
        prop_assert!(is_ranked(&merged.items));
    }

    #[test]
    fn merge_ignores_partial_arrival_order(
        partials in prop::collection::vec(prop::collection::vec(arb_item(), 0..8), 1..5),
        limit in 1usize..20,
    ) {
        // Unique ids so "first occurrence wins" cannot depend on order.
        let mut next_id = 0;
        let partials: Vec<Vec<Item>> = partials
            .into_iter()
            .map(|p| {
                p.into_iter()
                    .map(|raw| {
                        let mut item = build_item(raw);
                        item.id = next_id;
                        next_id += 1;
                        item
                    })
                    .collect()
            })
            .collect();
        let mut reversed = partials.clone();
        reversed.reverse();

        prop_assert_eq!(merge_ranked(partials, limit), merge_ranked(reversed, limit));
    }
}

// ── Facade: agrees with a brute-force scan and is idempotent ──────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn search_matches_brute_force(
        raw in prop::collection::vec(arb_item(), 1..30),
        shards in 1usize..4,
        word in 0usize..WORDS.len(),
        min_score in 0i64..6,
        limit in 1i64..15,
    ) {
        let mut items: Vec<Item> = raw.into_iter().map(build_item).collect();
        for (n, item) in items.iter_mut().enumerate() {
            item.id = n as i64;
        }

        let mut builder = ArchiveBuilder::new();
        for shard in 0..shards {
            let slice: Vec<Item> = items.iter().skip(shard).step_by(shards).cloned().collect();
            builder = builder.plain(slice);
        }
        let archive = builder.build();

        let mut config = HnShardConfig::for_root(archive.root());
        config.search.concurrency = 2;
        let engine = SearchEngine::open(config).unwrap();

        let query = Query::new([WORDS[word].to_uppercase()], limit).with_min_score(min_score);
        let predicate = build_predicate(&query);
        let mut expected: Vec<Item> = items.iter().filter(|i| predicate.matches(i)).cloned().collect();
        expected.sort_by(Item::rank_cmp);
        expected.truncate(limit as usize);

        let first = engine.search(&query, &CancellationToken::new()).unwrap();
        let second = engine.search(&query, &CancellationToken::new()).unwrap();

        prop_assert_eq!(first.ids(), expected.iter().map(|i| i.id).collect::<Vec<_>>());
        prop_assert_eq!(&first.items, &second.items);
        prop_assert!(first.is_complete());
    }
}
