//! Store tests against a real PostgreSQL instance.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

use document_service::config::{DatabaseConfig, ModulePolicy};
use document_service::models::{DocumentChanges, NewDocument};
use document_service::services::{Database, DocumentStore};
use service_core::error::AppError;

async fn connect() -> Database {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = Database::connect(&DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
    })
    .await
    .expect("Failed to connect to PostgreSQL");
    db.run_migrations().await.expect("Failed to run migrations");
    db
}

async fn seed_module(db: &Database, responsible: &str) -> i32 {
    let responsible_id: i32 =
        sqlx::query_scalar("INSERT INTO responsibles (name) VALUES ($1) RETURNING id")
            .bind(responsible)
            .fetch_one(db.pool())
            .await
            .unwrap();

    sqlx::query_scalar("INSERT INTO modules (name, responsible_id) VALUES ($1, $2) RETURNING id")
        .bind(format!("{} module", responsible))
        .bind(responsible_id)
        .fetch_one(db.pool())
        .await
        .unwrap()
}

fn new_document(name: &str, module_id: i32) -> NewDocument {
    NewDocument {
        name: name.to_string(),
        link: format!("http://docs.test/{}", name),
        module_id,
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn create_then_get_returns_joined_view() {
    let db = connect().await;
    let module_id = seed_module(&db, "Alice").await;

    let created = db
        .create_document(&new_document("Syllabus", module_id), ModulePolicy::Strict)
        .await
        .unwrap();
    let fetched = db.get_document(created.id).await.unwrap().unwrap();

    assert_eq!(fetched, created);
    let module = fetched.module.unwrap();
    assert_eq!(module.id, module_id);
    assert_eq!(module.responsible.unwrap().name, "Alice");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn by_module_filters_on_module_id() {
    let db = connect().await;
    let ours = seed_module(&db, "Carol").await;
    let theirs = seed_module(&db, "Dave").await;

    let mine = db
        .create_document(&new_document("mine", ours), ModulePolicy::Strict)
        .await
        .unwrap();
    db.create_document(&new_document("theirs", theirs), ModulePolicy::Strict)
        .await
        .unwrap();

    let documents = db.list_documents_by_module(ours).await.unwrap();
    assert_eq!(documents, vec![mine]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn strict_create_rolls_back_on_unknown_module() {
    let db = connect().await;

    let result = db
        .create_document(&new_document("orphan", i32::MAX), ModulePolicy::Strict)
        .await;

    assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn lenient_create_stores_null_module() {
    let db = connect().await;

    let created = db
        .create_document(&new_document("orphan", i32::MAX), ModulePolicy::Lenient)
        .await
        .unwrap();

    assert!(created.module.is_none());
    assert!(db.document_exists(created.id).await.unwrap());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn update_and_delete_report_missing_rows() {
    let db = connect().await;
    let module_id = seed_module(&db, "Erin").await;
    let created = db
        .create_document(&new_document("draft", module_id), ModulePolicy::Strict)
        .await
        .unwrap();

    let changes = DocumentChanges {
        name: "final".to_string(),
        link: "http://docs.test/final".to_string(),
    };
    assert!(db.update_document(created.id, &changes).await.unwrap());
    assert!(db.delete_document(created.id).await.unwrap());
    assert!(!db.delete_document(created.id).await.unwrap());
    assert!(!db.update_document(created.id, &changes).await.unwrap());
}
