//! Category management and task-category links

use taskpad_core::test_utils::{create_test_database, seed_category, seed_task};
use taskpad_core::{CreateCategoryRequest, TaskpadError};

#[tokio::test]
async fn create_and_list_categories_sorted_by_name() {
    let (_file, db) = create_test_database().await.unwrap();
    seed_category(&db, "Work", "#0000FF").await.unwrap();
    seed_category(&db, "Home", "#00FF00").await.unwrap();

    let categories = db.list_categories().await.unwrap();
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Home", "Work"]);
}

#[tokio::test]
async fn category_name_is_trimmed_and_required() {
    let (_file, db) = create_test_database().await.unwrap();

    let category = db
        .create_category(&CreateCategoryRequest {
            name: "  Errands  ".to_string(),
            color: "#FF0000".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(category.name, "Errands");

    let blank = db
        .create_category(&CreateCategoryRequest {
            name: "   ".to_string(),
            color: "#FF0000".to_string(),
        })
        .await;
    assert!(blank.unwrap_err().is_validation());
}

#[tokio::test]
async fn attach_is_idempotent() {
    let (_file, db) = create_test_database().await.unwrap();
    let task_id = seed_task(&db, "Chores").await.unwrap();
    let home = seed_category(&db, "Home", "#00FF00").await.unwrap();

    db.add_category_to_task(task_id, home).await.unwrap();
    let task = db.add_category_to_task(task_id, home).await.unwrap();

    assert_eq!(task.categories.len(), 1);
    assert_eq!(task.categories[0].id, home);
}

#[tokio::test]
async fn attach_to_missing_task_or_category_fails() {
    let (_file, db) = create_test_database().await.unwrap();
    let task_id = seed_task(&db, "Lonely").await.unwrap();
    let home = seed_category(&db, "Home", "#00FF00").await.unwrap();

    let no_task = db.add_category_to_task(999, home).await;
    assert!(matches!(
        no_task.unwrap_err(),
        TaskpadError::TaskNotFound { id: 999 }
    ));

    let no_category = db.add_category_to_task(task_id, 999).await;
    assert!(matches!(
        no_category.unwrap_err(),
        TaskpadError::CategoryNotFound { id: 999 }
    ));
}

#[tokio::test]
async fn detach_removes_the_link_and_tolerates_absence() {
    let (_file, db) = create_test_database().await.unwrap();
    let task_id = seed_task(&db, "Chores").await.unwrap();
    let home = seed_category(&db, "Home", "#00FF00").await.unwrap();
    db.add_category_to_task(task_id, home).await.unwrap();

    let task = db.remove_category_from_task(task_id, home).await.unwrap();
    assert!(task.categories.is_empty());

    // Detaching a link that does not exist is not an error
    let task = db.remove_category_from_task(task_id, home).await.unwrap();
    assert!(task.categories.is_empty());
}

#[tokio::test]
async fn deleting_a_category_cascades_to_links() {
    let (_file, db) = create_test_database().await.unwrap();
    let task_id = seed_task(&db, "Chores").await.unwrap();
    let home = seed_category(&db, "Home", "#00FF00").await.unwrap();
    db.add_category_to_task(task_id, home).await.unwrap();

    assert!(db.delete_category(home).await.unwrap());

    let task = db.get_task(task_id).await.unwrap();
    assert!(task.categories.is_empty());

    // Deleting again reports nothing was removed
    assert!(!db.delete_category(home).await.unwrap());
}

#[tokio::test]
async fn links_survive_soft_delete_and_restore() {
    let (_file, db) = create_test_database().await.unwrap();
    let task_id = seed_task(&db, "Buy milk").await.unwrap();
    let home = seed_category(&db, "Home", "#00FF00").await.unwrap();
    db.add_category_to_task(task_id, home).await.unwrap();

    db.batch_soft_delete_tasks(&[task_id]).await.unwrap();
    assert!(db.get_task(task_id).await.unwrap_err().is_not_found());

    let trash = db.list_deleted_tasks(None, None).await.unwrap();
    assert_eq!(trash.items.len(), 1);
    assert_eq!(trash.items[0].categories.len(), 1);

    db.batch_restore_tasks(&[task_id]).await.unwrap();
    let task = db.get_task(task_id).await.unwrap();
    assert_eq!(task.categories.len(), 1);
    assert_eq!(task.categories[0].name, "Home");
}

#[tokio::test]
async fn hard_delete_snapshot_carries_categories() {
    let (_file, db) = create_test_database().await.unwrap();
    let task_id = seed_task(&db, "Purge me").await.unwrap();
    let home = seed_category(&db, "Home", "#00FF00").await.unwrap();
    db.add_category_to_task(task_id, home).await.unwrap();

    let snapshots = db.batch_delete_tasks(&[task_id]).await.unwrap();
    assert_eq!(snapshots[0].categories.len(), 1);

    // The category itself survives; only the link is gone
    assert_eq!(db.list_categories().await.unwrap().len(), 1);
}
