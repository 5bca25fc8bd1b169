//! Query Builder Tests
//!
//! End-to-end checks of the public query API:
//! - filters compose into the Directus filter object
//! - explain output is deterministic
//! - parsed filters round back to the same object

use directus_client::query::{Filter, Logic, Operator, QueryError, SortKey};
use directus_client::{field, Query};
use serde_json::json;

// =============================================================================
// Filter Composition
// =============================================================================

#[test]
fn test_and_or_composition() {
    let query = Query::new("books")
        .filter(field("rating").gte(4))
        .filter(field("in_print").eq(true))
        .or_filter(field("tags").contains("classic"));

    assert_eq!(
        query.to_filter_json(),
        json!({"_or": [
            {"_and": [
                {"rating": {"_gte": 4}},
                {"in_print": {"_eq": true}}
            ]},
            {"tags": {"_contains": "classic"}}
        ]})
    );
}

#[test]
fn test_range_on_one_field() {
    let filter = field("pages").gt(100).and(field("pages").lt(400));
    assert_eq!(filter.to_json(), json!({"pages": {"_gt": 100, "_lt": 400}}));
}

#[test]
fn test_chained_filter_on_same_operator_keeps_last_value() {
    let query = Query::new("books")
        .filter(field("rating").gt(1))
        .filter(field("rating").gt(3));
    assert_eq!(query.to_filter_json(), json!({"rating": {"_gt": 3}}));
}

#[test]
fn test_parse_and_render_filter() {
    let raw = json!({"_or": [
        {"title": {"_icontains": "robot"}},
        {"published": {"_between": ["1950-01-01", "1960-01-01"]}}
    ]});

    let filter = Filter::from_json(&raw).unwrap();
    assert!(matches!(filter, Filter::Group { logic: Logic::Or, .. }));
    assert_eq!(filter.conditions().len(), 2);
    assert_eq!(filter.to_json(), raw);
}

#[test]
fn test_parse_rejects_unknown_operator() {
    let err = Filter::from_json(&json!({"title": {"_like": "x"}})).unwrap_err();
    assert!(matches!(err, QueryError::UnknownOperator(_)));
}

#[test]
fn test_operand_shapes_checked() {
    let filter = Filter::from(field("pages").op(Operator::In, 3));
    assert!(filter.validate_operands().is_err());

    let filter = Filter::from(field("pages").in_([1, 2, 3]));
    assert!(filter.validate_operands().is_ok());
}

// =============================================================================
// Params & Sort
// =============================================================================

#[test]
fn test_sort_list_parsing() {
    let keys = SortKey::parse_list("-rating, title").unwrap();
    assert_eq!(keys, vec![SortKey::desc("rating"), SortKey::asc("title")]);
    assert!(SortKey::parse_list("-rating,-").is_err());
}

#[test]
fn test_params_order_is_stable() {
    let query = Query::new("books")
        .select(["title"])
        .filter(field("title").nnull())
        .sort("-rating,title")
        .limit(-1)
        .offset(20)
        .search("robot");

    let keys: Vec<String> = query.to_params().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["fields", "filter", "sort", "limit", "offset", "search"]);
}

// =============================================================================
// Explain
// =============================================================================

#[test]
fn test_explain_title_search() {
    let explain = Query::new("books")
        .select(["title"])
        .filter(field("title").contains("Robots"))
        .sort_desc("rating")
        .limit(10)
        .explain();

    assert!(explain.sql.starts_with("SELECT title"));
    assert!(explain.sql.contains("FROM books"));
    assert!(explain.sql.contains("WHERE title LIKE '%Robots%'"));
    assert!(explain.sql.contains("ORDER BY rating DESC"));
    assert!(explain.sql.contains("LIMIT 10"));

    assert_eq!(
        explain.english,
        "Select title from books where title contains \"Robots\", sorted by rating descending, limited to 10 items."
    );
}

#[test]
fn test_explain_is_deterministic() {
    let build = || {
        Query::new("books")
            .filter(field("rating").gte(4).or(field("pages").lt(300)))
            .sort("title")
            .explain()
            .to_string()
    };
    assert_eq!(build(), build());
    assert!(build().starts_with("=== EXPLAIN QUERY ==="));
}

#[test]
fn test_explain_quotes_literals() {
    let explain = Query::new("books")
        .filter(field("title").eq("Robots' Dawn"))
        .explain();
    assert!(explain.sql.contains("'Robots'' Dawn'"));
}
