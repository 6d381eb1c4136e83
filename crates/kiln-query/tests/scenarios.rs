//! End-to-end listing scenarios over a forum-like collection.

use kiln_query::{
    query, ClauseKind, FieldType, ListQuery, Number, QueryError, Schema, Timestamp, Value,
};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone)]
struct ForumPost {
    id: u32,
    title: String,
    category_name: String,
    tags: Vec<String>,
    comment_count: u32,
    like_count: u32,
    is_pinned: bool,
    last_activity_at: Option<String>,
}

fn accessor<'a>(post: &'a ForumPost, field: &str) -> Value<'a> {
    match field {
        "id" => Value::Number(Number::from(post.id)),
        "title" => Value::Text(&post.title),
        "categoryName" => Value::Text(&post.category_name),
        "tags" => Value::TextList(post.tags.iter().map(String::as_str).collect()),
        "commentCount" => Value::Number(Number::from(post.comment_count)),
        "likeCount" => Value::Number(Number::from(post.like_count)),
        "isPinned" => Value::Bool(post.is_pinned),
        "lastActivityAt" => {
            Value::from(post.last_activity_at.as_deref().and_then(Timestamp::parse))
        }
        _ => Value::None,
    }
}

fn schema() -> Schema {
    Schema::new()
        .field("id", FieldType::Number)
        .searchable("title", FieldType::Text)
        .field("categoryName", FieldType::Text)
        .searchable("tags", FieldType::TextList)
        .field("commentCount", FieldType::Number)
        .field("likeCount", FieldType::Number)
        .field("isPinned", FieldType::Bool)
        .field("lastActivityAt", FieldType::Timestamp)
}

const CATEGORIES: [&str; 5] = ["Events", "Discussion", "How To", "Showcase", "Feedback"];

/// 25 posts; post `n` was last active `n` hours before 2025-08-22T00:00:00Z,
/// so activity order is id order. Input order is shuffled.
fn twenty_five_posts() -> Vec<ForumPost> {
    let base = Timestamp::parse("2025-08-22T00:00:00Z").unwrap().as_millis();
    let mut posts: Vec<ForumPost> = (1..=25u32)
        .map(|n| ForumPost {
            id: n,
            title: format!("Studio update #{n}"),
            category_name: CATEGORIES[(n as usize) % CATEGORIES.len()].to_string(),
            tags: vec![if n % 2 == 0 { "technique" } else { "question" }.to_string()],
            comment_count: n * 3 % 7,
            like_count: n * 11 % 13,
            is_pinned: n == 25,
            last_activity_at: Some(iso(base - i64::from(n) * 3_600_000)),
        })
        .collect();
    // deterministic shuffle
    posts.sort_by_key(|p| (p.id * 7) % 25);
    posts
}

fn iso(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .unwrap()
        .to_rfc3339()
}

fn ids(items: &[&ForumPost]) -> Vec<u32> {
    items.iter().map(|p| p.id).collect()
}

// ============================================================================
// Acceptance scenarios
// ============================================================================

#[test]
fn second_page_of_most_recent_activity() {
    let posts = twenty_five_posts();
    let spec = ListQuery::new()
        .sort_desc("lastActivityAt")
        .page(2)
        .page_size(10)
        .build();

    let page = query(&posts, &schema(), &spec, accessor).unwrap();

    assert_eq!(ids(&page.items), (11..=20).collect::<Vec<_>>());
    assert_eq!(page.total_matched, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 2);
    assert!(page.has_next());
    assert!(page.has_previous());
}

#[test]
fn search_matches_title_case_insensitively() {
    let mut posts = twenty_five_posts();
    posts.push(ForumPost {
        id: 100,
        title: "Glazing Techniques for Beginners".to_string(),
        category_name: "How To".to_string(),
        tags: vec![],
        comment_count: 0,
        like_count: 0,
        is_pinned: false,
        last_activity_at: None,
    });
    posts.push(ForumPost {
        id: 101,
        title: "Tea Bowl Set".to_string(),
        category_name: "Showcase".to_string(),
        tags: vec!["celadon".to_string()],
        comment_count: 0,
        like_count: 0,
        is_pinned: false,
        last_activity_at: None,
    });

    let spec = ListQuery::new().search("glazing").build();
    let page = spec.run(&posts, &schema(), accessor).unwrap();

    assert_eq!(ids(&page.items), vec![100]);
    assert_eq!(page.total_matched, 1);
}

#[test]
fn zero_page_size_is_invalid() {
    let posts = twenty_five_posts();
    let err = ListQuery::new()
        .page_size(0)
        .run(&posts, &schema(), accessor)
        .unwrap_err();

    assert!(matches!(err, QueryError::InvalidQuery { .. }));
}

#[test]
fn unknown_sort_field_is_rejected() {
    let posts = twenty_five_posts();
    let err = ListQuery::new()
        .sort_asc("nonexistentField")
        .run(&posts, &schema(), accessor)
        .unwrap_err();

    assert_eq!(
        err,
        QueryError::UnknownField {
            field: "nonexistentField".to_string(),
            clause: ClauseKind::Sort,
        }
    );
    assert_eq!(
        err.to_string(),
        "unknown field 'nonexistentField' in sort clause"
    );
}

#[test]
fn empty_collection_yields_empty_pages() {
    let posts: Vec<ForumPost> = Vec::new();
    for page_number in [1, 2, 50] {
        let page = ListQuery::new()
            .sort_desc("lastActivityAt")
            .page(page_number)
            .run(&posts, &schema(), accessor)
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_matched, 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
    }
}

// ============================================================================
// Listing behavior
// ============================================================================

#[test]
fn category_filter_and_unpinned_listing() {
    let posts = twenty_five_posts();
    let spec = ListQuery::new()
        .filter_eq("isPinned", false)
        .filter_eq("categoryName", "Events")
        .sort_desc("lastActivityAt")
        .build();

    let page = spec.run(&posts, &schema(), accessor).unwrap();

    // ids divisible by 5, minus the pinned 25
    assert_eq!(ids(&page.items), vec![5, 10, 15, 20]);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn page_past_the_end_keeps_counts() {
    let posts = twenty_five_posts();
    let page = ListQuery::new()
        .page(4)
        .page_size(10)
        .run(&posts, &schema(), accessor)
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_matched, 25);
    assert_eq!(page.total_pages, 3);
}

#[test]
fn same_query_is_deterministic() {
    let posts = twenty_five_posts();
    let spec = ListQuery::new()
        .search("technique")
        .sort_desc("commentCount")
        .page_size(4)
        .build();

    let first = spec.run(&posts, &schema(), accessor).unwrap();
    let second = spec.run(&posts, &schema(), accessor).unwrap();
    assert_eq!(ids(&first.items), ids(&second.items));
}

#[test]
fn ties_keep_input_order() {
    let posts = twenty_five_posts();
    let page = ListQuery::new()
        .sort_asc("commentCount")
        .page_size(25)
        .run(&posts, &schema(), accessor)
        .unwrap();

    let positions: std::collections::HashMap<u32, usize> =
        posts.iter().enumerate().map(|(i, p)| (p.id, i)).collect();

    for pair in page.items.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.comment_count == b.comment_count {
            assert!(positions[&a.id] < positions[&b.id]);
        } else {
            assert!(a.comment_count < b.comment_count);
        }
    }
}

#[test]
fn missing_sort_values_go_last_in_both_directions() {
    let mut posts = twenty_five_posts();
    posts[0].last_activity_at = None;
    posts[1].last_activity_at = Some("yesterday-ish".to_string());
    let missing = [posts[0].id, posts[1].id];

    for spec in [
        ListQuery::new().sort_asc("lastActivityAt").page_size(25),
        ListQuery::new().sort_desc("lastActivityAt").page_size(25),
    ] {
        let page = spec.run(&posts, &schema(), accessor).unwrap();
        let tail = ids(&page.items[23..]);
        assert_eq!(tail, missing.to_vec());
    }
}

#[test]
fn filters_on_unknown_field_report_filter_clause() {
    let posts = twenty_five_posts();
    let err = ListQuery::new()
        .filter_eq("category", "Events")
        .run(&posts, &schema(), accessor)
        .unwrap_err();

    assert!(matches!(
        err,
        QueryError::UnknownField {
            clause: ClauseKind::Filter,
            ..
        }
    ));
}

#[test]
fn timestamps_returned_as_text_follow_declared_type() {
    // this accessor hands back the raw ISO string; the schema says Timestamp
    fn raw_accessor<'a>(post: &'a ForumPost, field: &str) -> Value<'a> {
        match field {
            "lastActivityAt" => Value::from(post.last_activity_at.as_deref()),
            other => accessor(post, other),
        }
    }

    let mut posts = twenty_five_posts();
    posts.truncate(2);
    posts[0].id = 1;
    posts[0].last_activity_at = Some("2025-08-21T10:00:00-07:00".to_string());
    posts[1].id = 2;
    posts[1].last_activity_at = Some("2025-08-21T16:00:00Z".to_string());

    // 10:00-07:00 is 17:00Z, an hour after post 2 despite sorting lower as text
    let page = ListQuery::new()
        .sort_desc("lastActivityAt")
        .run(&posts, &schema(), raw_accessor)
        .unwrap();
    assert_eq!(ids(&page.items), vec![1, 2]);

    let since = Timestamp::parse("2025-08-21T16:30:00Z").unwrap();
    let page = ListQuery::new()
        .filter_after("lastActivityAt", since)
        .run(&posts, &schema(), raw_accessor)
        .unwrap();
    assert_eq!(page.total_matched, 1);
    assert_eq!(ids(&page.items), vec![1]);

    let page = ListQuery::new()
        .filter_after("lastActivityAt", Timestamp::parse("2025-08-01").unwrap())
        .run(&posts, &schema(), raw_accessor)
        .unwrap();
    assert_eq!(page.total_matched, 2);
}

#[test]
fn numbers_returned_as_text_compare_numerically() {
    fn raw_accessor<'a>(post: &'a ForumPost, field: &str) -> Value<'a> {
        match field {
            "likeCount" => Value::Text(&post.title),
            other => accessor(post, other),
        }
    }

    let mut posts = twenty_five_posts();
    posts.truncate(3);
    for (post, likes) in posts.iter_mut().zip(["9", "10", "lots"]) {
        post.title = likes.to_string();
    }
    let expected: Vec<u32> = vec![posts[1].id, posts[0].id, posts[2].id];

    // "9" > "10" as text; unparseable "lots" is missing and sorts last
    let page = ListQuery::new()
        .sort_desc("likeCount")
        .run(&posts, &schema(), raw_accessor)
        .unwrap();
    assert_eq!(ids(&page.items), expected);

    let page = ListQuery::new()
        .filter_gte("likeCount", 10u32)
        .run(&posts, &schema(), raw_accessor)
        .unwrap();
    assert_eq!(ids(&page.items), vec![posts[1].id]);
}
