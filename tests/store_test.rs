//! Integration tests for the post store

use threadsmith::core::PostStore;
use threadsmith::models::Post;

fn seeded_store() -> PostStore {
    let mut store = PostStore::new();
    store.replace_all(vec![
        Post::new("上班好累", vec!["社畜".to_string()]),
        Post::new("週五晚上喝一杯", vec!["TGIF".to_string(), "放鬆".to_string()]),
        Post::new("Deadline is COMING", vec!["工作".to_string()]),
        Post::new("半夜睡不著", vec!["失眠".to_string(), "Emo".to_string()]),
    ]);
    store
}

#[test]
fn test_filter_returns_exact_matching_subsequence() {
    let store = seeded_store();

    // Content match, case-insensitive
    let hits = store.filter("coming");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "Deadline is COMING");

    // Tag match, case-insensitive
    let hits = store.filter("emo");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "半夜睡不著");

    // No match
    assert!(store.filter("不存在的字串").is_empty());
}

#[test]
fn test_filter_empty_query_is_identity() {
    let store = seeded_store();
    let all = store.filter("");
    assert_eq!(all.len(), 4);
    let contents: Vec<&str> = all.iter().map(|p| p.content.as_str()).collect();
    assert_eq!(
        contents,
        ["上班好累", "週五晚上喝一杯", "Deadline is COMING", "半夜睡不著"]
    );
}

#[test]
fn test_filter_is_repeatable_and_order_preserving() {
    let store = seeded_store();
    let first: Vec<String> = store.filter("週五").iter().map(|p| p.content.clone()).collect();
    let second: Vec<String> = store.filter("週五").iter().map(|p| p.content.clone()).collect();
    assert_eq!(first, second);
    assert_eq!(store.posts().len(), 4);
}

#[test]
fn test_schedule_lifecycle() {
    let mut store = seeded_store();

    let id_a = store.schedule(0, "2025-03-10 09:00").unwrap().id.clone();
    let id_b = store.schedule(1, "2025-03-11 12:00").unwrap().id.clone();
    assert_ne!(id_a, id_b);
    assert_eq!(store.scheduled().len(), 2);
    assert_eq!(store.scheduled()[0].id, id_b);

    assert!(store.unschedule(&id_a));
    assert_eq!(store.scheduled().len(), 1);

    // Removing again, or removing a never-issued id, is a no-op
    assert!(!store.unschedule(&id_a));
    assert!(!store.unschedule("never-issued"));
    assert_eq!(store.scheduled().len(), 1);
}

#[test]
fn test_scheduling_does_not_mutate_original_post() {
    let mut store = seeded_store();
    let original = store.posts()[0].clone();

    store.schedule(0, "2025-03-10 09:00");
    assert_eq!(store.posts()[0], original);

    // Editing the source post later leaves the scheduled copy alone
    store.edit_post(0, "整個改掉", "新標籤");
    assert_eq!(store.scheduled()[0].post.content, "上班好累");
}

#[test]
fn test_edit_post_tag_normalization_property() {
    let mut store = seeded_store();
    store.edit_post(0, "內容", "#foo, ,bar");
    assert_eq!(store.posts()[0].tags, vec!["foo", "bar"]);

    store.edit_post(0, "內容", "  ");
    assert!(store.posts()[0].tags.is_empty());

    store.edit_post(0, "內容", "#a,#b #c");
    assert_eq!(store.posts()[0].tags, vec!["a", "b", "c"]);
    // No leading markers, no empty strings survive
    assert!(store.posts()[0].tags.iter().all(|t| !t.starts_with('#') && !t.is_empty()));
}

#[test]
fn test_stale_completion_never_overwrites_newer_result() {
    let mut store = PostStore::new();

    // Two overlapping generations: the later request resolves first
    let stale = store.begin_generation();
    let fresh = store.begin_generation();

    assert!(store.apply_generation(fresh, vec![Post::new("新結果", vec![])]));
    assert!(!store.apply_generation(stale, vec![Post::new("舊結果", vec![])]));

    assert_eq!(store.posts().len(), 1);
    assert_eq!(store.posts()[0].content, "新結果");
}
