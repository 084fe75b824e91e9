//! Substring search over titles and descriptions

use taskpad_core::test_utils::{create_test_database, seed_task};
use taskpad_core::CreateTaskRequest;

#[tokio::test]
async fn search_matches_title_and_description() {
    let (_file, db) = create_test_database().await.unwrap();
    seed_task(&db, "Buy milk").await.unwrap();
    db.create_task(&CreateTaskRequest {
        title: "Errands".to_string(),
        description: Some("pick up milk and eggs".to_string()),
        priority: None,
    })
    .await
    .unwrap();
    seed_task(&db, "Write report").await.unwrap();

    let results = db.search_tasks("milk").await.unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn search_skips_soft_deleted_tasks() {
    let (_file, db) = create_test_database().await.unwrap();
    let id = seed_task(&db, "Buy milk").await.unwrap();
    seed_task(&db, "Buy milkshake").await.unwrap();

    db.batch_soft_delete_tasks(&[id]).await.unwrap();

    let results = db.search_tasks("milk").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Buy milkshake");
}

#[tokio::test]
async fn blank_query_is_rejected() {
    let (_file, db) = create_test_database().await.unwrap();
    seed_task(&db, "anything").await.unwrap();

    assert!(db.search_tasks("").await.unwrap_err().is_validation());
    assert!(db.search_tasks("   ").await.unwrap_err().is_validation());
}

#[tokio::test]
async fn no_matches_returns_an_empty_list() {
    let (_file, db) = create_test_database().await.unwrap();
    seed_task(&db, "Buy milk").await.unwrap();

    let results = db.search_tasks("zebra").await.unwrap();
    assert!(results.is_empty());
}
