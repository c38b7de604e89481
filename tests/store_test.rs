//! `MemoryStore` query semantics, paging and the management operations.

mod common;

use chrono::{TimeZone, Utc};
use serde_json::json;

use chronox_admin::models::list_state::ListState;
use chronox_admin::models::post;
use chronox_admin::models::user::{self, UserStatus};
use chronox_admin::store::memory::MemoryStore;
use chronox_admin::store::{self, Collection, DocumentStore, Query, StoreError};
use common::*;

fn many_users(n: usize) -> MemoryStore {
    let store = MemoryStore::new();
    for i in 0..n {
        let date = format!("2024-01-{:02}", i % 28 + 1);
        store.insert(Collection::Users, user_doc(&format!("u{i:03}"), &format!("user{i:03}"), &date));
    }
    store
}

// ============================================================================
// QUERIES
// ============================================================================

#[tokio::test]
async fn test_total_is_counted_before_pagination() {
    let store = many_users(30);
    let page = store
        .list_documents(Collection::Users, &Query::new().limit(5).offset(25))
        .await
        .unwrap();
    assert_eq!(page.total, 30);
    assert_eq!(page.documents.len(), 5);
}

#[tokio::test]
async fn test_list_all_walks_every_page() {
    let store = many_users(230);
    let users: Vec<user::User> = store::list_all(&store, Collection::Users, &Query::new()).await.unwrap();
    assert_eq!(users.len(), 230);
}

#[tokio::test]
async fn test_created_range_filters_are_inclusive() {
    let store = seeded_store();
    let from = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();
    let until = Utc.with_ymd_and_hms(2024, 3, 3, 10, 0, 0).unwrap();

    let between = store::count(&store, Collection::Users, &Query::new().created_between(from, until))
        .await
        .unwrap();
    assert_eq!(between, 2);

    let after = store::count(&store, Collection::Users, &Query::new().created_after(from)).await.unwrap();
    assert_eq!(after, 1);
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let store = seeded_store();
    let query = Query::new().search("username", "AL");
    let found: Vec<user::User> = store::list(&store, Collection::Users, &query).await.unwrap().documents;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "alice");
}

// ============================================================================
// MANAGEMENT
// ============================================================================

#[tokio::test]
async fn test_user_page_is_newest_first_with_five_rows() {
    let store = many_users(12);
    let page = user::find_page(&store, &ListState::default()).await.unwrap();

    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total, 12);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items[0].id, "u011");

    let last = user::find_page(&store, &ListState::default().with_page(3)).await.unwrap();
    assert_eq!(last.items.len(), 2);
    assert_eq!(last.page, 3);
}

#[tokio::test]
async fn test_search_resets_to_first_page() {
    let store = seeded_store();
    let state = ListState::default().with_page(4).with_search(Some("  bo "));
    assert_eq!(state.page, 1);

    let page = user::find_page(&store, &state).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].username, "bob");
}

#[tokio::test]
async fn test_update_status_and_delete_user() {
    let store = seeded_store();

    let updated = user::update_status(&store, "u2", UserStatus::Blocked).await.unwrap();
    assert_eq!(updated.status.as_deref(), Some("blocked"));
    assert!(updated.updated_at.is_some());

    user::delete(&store, "u2").await.unwrap();
    assert!(user::find_by_id(&store, "u2").await.unwrap().is_none());
    assert!(matches!(user::delete(&store, "u2").await, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn test_post_search_and_delete() {
    let store = seeded_store();
    let state = ListState::default().with_search(Some("second"));
    let page = post::find_page(&store, &state).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, "p2");

    post::delete(&store, "p2").await.unwrap();
    assert_eq!(store.len(Collection::Posts), 2);
}

#[tokio::test]
async fn test_update_unknown_document_is_not_found() {
    let store = seeded_store();
    let result = store
        .update_document(Collection::Users, "nobody", json!({ "status": "online" }))
        .await;
    assert!(matches!(result, Err(StoreError::NotFound)));
}
