//! All-or-nothing batch delete, soft delete, and restore

use taskpad_core::test_utils::{create_test_database, seed_tasks};
use taskpad_core::TaskpadError;

#[tokio::test]
async fn batch_soft_delete_then_restore_round_trip() {
    let (_file, db) = create_test_database().await.unwrap();
    let ids = seed_tasks(&db, 3).await.unwrap();

    let deleted = db.batch_soft_delete_tasks(&ids).await.unwrap();
    assert_eq!(deleted.len(), 3);
    for task in &deleted {
        assert!(db.get_task(task.id).await.unwrap_err().is_not_found());
    }

    let restored = db.batch_restore_tasks(&ids).await.unwrap();
    assert_eq!(restored.len(), 3);
    for id in &ids {
        let task = db.get_task(*id).await.unwrap();
        assert!(task.deleted_at.is_none());
    }
}

#[tokio::test]
async fn batch_with_missing_id_fails_and_modifies_nothing() {
    let (_file, db) = create_test_database().await.unwrap();
    let ids = seed_tasks(&db, 2).await.unwrap();

    let request = vec![ids[0], ids[1], 999];
    let result = db.batch_soft_delete_tasks(&request).await;
    match result.unwrap_err() {
        TaskpadError::TasksNotFound { ids: missing } => assert_eq!(missing, vec![999]),
        other => panic!("expected TasksNotFound, got {other:?}"),
    }

    // The valid ids were not touched
    for id in &ids {
        let task = db.get_task(*id).await.unwrap();
        assert!(task.deleted_at.is_none());
    }
}

#[tokio::test]
async fn batch_hard_delete_removes_rows_permanently() {
    let (_file, db) = create_test_database().await.unwrap();
    let ids = seed_tasks(&db, 3).await.unwrap();

    let snapshots = db.batch_delete_tasks(&ids[..2]).await.unwrap();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].id, ids[0]);
    assert_eq!(snapshots[1].id, ids[1]);

    assert!(db.get_task(ids[0]).await.unwrap_err().is_not_found());
    assert!(db.get_task(ids[2]).await.is_ok());

    // Hard-deleted rows are gone from the trash too
    let deleted = db.list_deleted_tasks(None, None).await.unwrap();
    assert!(deleted.items.is_empty());
}

#[tokio::test]
async fn batch_snapshots_preserve_input_order() {
    let (_file, db) = create_test_database().await.unwrap();
    let ids = seed_tasks(&db, 3).await.unwrap();

    let request = vec![ids[2], ids[0], ids[1]];
    let snapshots = db.batch_soft_delete_tasks(&request).await.unwrap();

    let returned: Vec<i64> = snapshots.iter().map(|t| t.id).collect();
    assert_eq!(returned, request);
}

#[tokio::test]
async fn duplicate_ids_are_deduplicated() {
    let (_file, db) = create_test_database().await.unwrap();
    let ids = seed_tasks(&db, 1).await.unwrap();

    let snapshots = db
        .batch_soft_delete_tasks(&[ids[0], ids[0], ids[0]])
        .await
        .unwrap();
    assert_eq!(snapshots.len(), 1);
}

#[tokio::test]
async fn soft_deleting_an_already_deleted_task_is_a_no_op() {
    let (_file, db) = create_test_database().await.unwrap();
    let ids = seed_tasks(&db, 1).await.unwrap();

    db.batch_soft_delete_tasks(&ids).await.unwrap();
    // The row still exists, so the second pass succeeds
    let again = db.batch_soft_delete_tasks(&ids).await.unwrap();
    assert_eq!(again.len(), 1);
    assert!(again[0].deleted_at.is_some());
}

#[tokio::test]
async fn restoring_an_active_task_is_a_no_op() {
    let (_file, db) = create_test_database().await.unwrap();
    let ids = seed_tasks(&db, 1).await.unwrap();

    let restored = db.batch_restore_tasks(&ids).await.unwrap();
    assert_eq!(restored.len(), 1);
    assert!(db.get_task(ids[0]).await.is_ok());
}

#[tokio::test]
async fn empty_and_invalid_batches_are_rejected() {
    let (_file, db) = create_test_database().await.unwrap();

    assert!(db.batch_delete_tasks(&[]).await.unwrap_err().is_validation());
    assert!(db
        .batch_soft_delete_tasks(&[1, 0, -2])
        .await
        .unwrap_err()
        .is_validation());
}
