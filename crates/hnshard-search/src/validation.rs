//! Caller-input checks. Everything here runs before any shard is touched.

use hnshard_core::constants::MAX_KEYWORDS;
use hnshard_core::errors::SearchError;
use hnshard_core::models::Query;

/// Reject malformed queries. `max_limit` comes from `SearchConfig`.
pub fn validate_query(query: &Query, max_limit: usize) -> Result<(), SearchError> {
    if query.keywords.is_empty() {
        return Err(SearchError::EmptyKeywords);
    }
    if let Some(index) = query.keywords.iter().position(|k| k.trim().is_empty()) {
        return Err(SearchError::BlankKeyword { index });
    }
    if query.keywords.len() > MAX_KEYWORDS {
        return Err(SearchError::TooManyKeywords {
            count: query.keywords.len(),
            max: MAX_KEYWORDS,
        });
    }

    if query.limit <= 0 {
        return Err(SearchError::InvalidLimit { limit: query.limit });
    }
    if query.limit as u64 > max_limit as u64 {
        return Err(SearchError::LimitTooLarge {
            limit: query.limit,
            max: max_limit,
        });
    }

    if query.min_score < 0 {
        return Err(SearchError::NegativeMinScore {
            min_score: query.min_score,
        });
    }

    if let Some(range) = &query.time_range {
        if range.start > range.end {
            return Err(SearchError::InvalidTimeRange {
                start: range.start,
                end: range.end,
            });
        }
    }

    if query.max_shards == Some(0) {
        return Err(SearchError::InvalidMaxShards);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use hnshard_core::models::TimeRange;

    use super::*;

    fn query(keywords: &[&str], limit: i64) -> Query {
        Query::new(keywords.iter().copied(), limit)
    }

    #[test]
    fn accepts_a_plain_query() {
        assert!(validate_query(&query(&["keyboard"], 10), 1000).is_ok());
    }

    #[test]
    fn rejects_empty_and_blank_keywords() {
        assert!(matches!(
            validate_query(&query(&[], 10), 1000),
            Err(SearchError::EmptyKeywords)
        ));
        assert!(matches!(
            validate_query(&query(&["rust", "  "], 10), 1000),
            Err(SearchError::BlankKeyword { index: 1 })
        ));
    }

    #[test]
    fn rejects_too_many_keywords() {
        let many: Vec<String> = (0..=MAX_KEYWORDS).map(|i| format!("k{i}")).collect();
        let q = Query::new(many, 10);
        assert!(matches!(
            validate_query(&q, 1000),
            Err(SearchError::TooManyKeywords { .. })
        ));
    }

    #[test]
    fn limit_must_be_positive_and_bounded() {
        for limit in [0, -1, i64::MIN] {
            assert!(matches!(
                validate_query(&query(&["a"], limit), 1000),
                Err(SearchError::InvalidLimit { .. })
            ));
        }
        assert!(matches!(
            validate_query(&query(&["a"], 1001), 1000),
            Err(SearchError::LimitTooLarge { .. })
        ));
        assert!(validate_query(&query(&["a"], 1000), 1000).is_ok());
    }

    #[test]
    fn negative_min_score_is_rejected() {
        let q = query(&["a"], 10).with_min_score(-5);
        assert!(matches!(
            validate_query(&q, 1000),
            Err(SearchError::NegativeMinScore { min_score: -5 })
        ));
    }

    #[test]
    fn inverted_time_range_and_zero_max_shards_are_rejected() {
        let q = query(&["a"], 10).with_time_range(TimeRange::new(20, 10));
        assert!(matches!(
            validate_query(&q, 1000),
            Err(SearchError::InvalidTimeRange { .. })
        ));
        let q = query(&["a"], 10).with_max_shards(0);
        assert!(matches!(
            validate_query(&q, 1000),
            Err(SearchError::InvalidMaxShards)
        ));
    }
}
