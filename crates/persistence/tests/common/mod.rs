//! Test infrastructure for the persistence layer.
//!
//! Every backend runs the same behavioural checks so that the query semantics
//! stay identical across SQLite, PostgreSQL, MySQL and MongoDB.

#![allow(dead_code)]

use fruits_persistence::core::FruitStore;
use fruits_persistence::error::StorageError;
use fruits_persistence::fixtures::FixtureSet;
use fruits_persistence::types::{DEFAULT_EMOJI, Fruit, FruitId, NewFruit};

/// Names of the built-in fixtures in name order.
pub const SORTED_FIXTURE_NAMES: [&str; 9] = [
    "Apple",
    "Banana",
    "Blueberry",
    "Lemon",
    "Mango",
    "Orange",
    "Pear",
    "Strawberry",
    "Watermelon",
];

/// Replaces the store contents with the nine built-in fixtures.
pub async fn seed<S: FruitStore + ?Sized>(store: &S) -> Vec<Fruit> {
    FixtureSet::builtin()
        .expect("builtin fixtures parse")
        .load_into(store)
        .await
        .expect("Failed to load fixtures")
}

pub fn names(fruits: &[Fruit]) -> Vec<&str> {
    fruits.iter().map(|f| f.name.as_str()).collect()
}

// ============================================================================
// Behavioural checks
// ============================================================================

pub async fn check_empty_store_lists_nothing<S: FruitStore + ?Sized>(store: &S) {
    store.delete_all().await.unwrap();
    let fruits = store.list_all().await.unwrap();
    assert!(fruits.is_empty());
}

pub async fn check_insert_then_list<S: FruitStore + ?Sized>(store: &S) {
    store.delete_all().await.unwrap();

    let input = NewFruit::new("Kiwi", "Winter").with_emoji("U+1F95D");
    let created = store.insert(input.clone()).await.unwrap();
    assert!(created.same_content(&input));
    assert!(created.created_at.is_some());

    let listed = store.list_all().await.unwrap();
    let matching: Vec<_> = listed.iter().filter(|f| f.same_content(&input)).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, created.id);
}

pub async fn check_default_emoji<S: FruitStore + ?Sized>(store: &S) {
    store.delete_all().await.unwrap();

    let created = store.insert(NewFruit::new("Fig", "Summer")).await.unwrap();
    assert_eq!(created.emoji.as_deref(), Some(DEFAULT_EMOJI));

    let stored = store.find_by_name("fig").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].emoji.as_deref(), Some(DEFAULT_EMOJI));
}

pub async fn check_blank_fields_are_rejected<S: FruitStore + ?Sized>(store: &S) {
    let err = store.insert(NewFruit::new("", "Summer")).await.unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)));

    let err = store.insert(NewFruit::new("Fig", "  ")).await.unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)));
}

pub async fn check_list_all_sorted<S: FruitStore + ?Sized>(store: &S) {
    seed(store).await;
    let fruits = store.list_all().await.unwrap();
    assert_eq!(names(&fruits), SORTED_FIXTURE_NAMES);
}

pub async fn check_name_search_ignores_case<S: FruitStore + ?Sized>(store: &S) {
    seed(store).await;

    let expected = store.find_by_name("apple").await.unwrap();
    assert_eq!(names(&expected), ["Apple"]);

    for query in ["APPLE", "ApPlE"] {
        let found = store.find_by_name(query).await.unwrap();
        assert_eq!(found, expected, "query {:?}", query);
    }

    let partial = store.find_by_name("an").await.unwrap();
    assert_eq!(names(&partial), ["Banana", "Mango", "Orange"]);

    assert!(store.find_by_name("durian").await.unwrap().is_empty());
}

pub async fn check_name_search_treats_wildcards_literally<S: FruitStore + ?Sized>(store: &S) {
    seed(store).await;

    assert!(store.find_by_name("%").await.unwrap().is_empty());
    assert!(store.find_by_name("_").await.unwrap().is_empty());
    assert!(store.find_by_name(".*").await.unwrap().is_empty());
}

pub async fn check_season_search_is_exact<S: FruitStore + ?Sized>(store: &S) {
    seed(store).await;

    let summer = store.find_by_season("summer").await.unwrap();
    assert_eq!(names(&summer), ["Banana", "Blueberry", "Watermelon"]);

    let fall = store.find_by_season("FALL").await.unwrap();
    assert_eq!(names(&fall), ["Apple", "Pear"]);

    assert!(store.find_by_season("sum").await.unwrap().is_empty());
}

pub async fn check_delete_removes<S: FruitStore + ?Sized>(store: &S) {
    let seeded = seed(store).await;
    let blueberry = seeded
        .iter()
        .find(|f| f.name == "Blueberry")
        .expect("Blueberry is seeded");

    assert!(store.exists(&blueberry.id).await.unwrap());
    store.delete_by_id(&blueberry.id).await.unwrap();
    assert!(!store.exists(&blueberry.id).await.unwrap());

    let remaining = store.list_all().await.unwrap();
    assert_eq!(remaining.len(), 8);
    assert!(!names(&remaining).contains(&"Blueberry"));
}

pub async fn check_delete_missing_is_not_found<S: FruitStore + ?Sized>(
    store: &S,
    missing: &[FruitId],
) {
    seed(store).await;

    for id in missing {
        let err = store.delete_by_id(id).await.unwrap_err();
        assert!(err.is_not_found(), "id {} gave {:?}", id, err);
    }
    assert_eq!(store.list_all().await.unwrap().len(), 9);
}

pub async fn check_delete_all<S: FruitStore + ?Sized>(store: &S) {
    seed(store).await;
    assert_eq!(store.delete_all().await.unwrap(), 9);
    assert!(store.list_all().await.unwrap().is_empty());
}

/// Runs every check in sequence against one store.
pub async fn run_repository_checks<S: FruitStore + ?Sized>(store: &S, missing: &[FruitId]) {
    check_empty_store_lists_nothing(store).await;
    check_insert_then_list(store).await;
    check_default_emoji(store).await;
    check_blank_fields_are_rejected(store).await;
    check_list_all_sorted(store).await;
    check_name_search_ignores_case(store).await;
    check_name_search_treats_wildcards_literally(store).await;
    check_season_search_is_exact(store).await;
    check_delete_removes(store).await;
    check_delete_missing_is_not_found(store, missing).await;
    check_delete_all(store).await;
}
