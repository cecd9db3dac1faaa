//! PostgreSQL store for document-service.

use crate::config::{DatabaseConfig, ModulePolicy};
use crate::models::{DocumentChanges, DocumentRow, DocumentView, NewDocument};
use crate::services::metrics::record_db_query;
use crate::services::store::DocumentStore;
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::{Duration, Instant};
use tracing::{info, instrument};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(config), fields(service = "document-service"))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&config.url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for Database {
    #[instrument(skip(self))]
    async fn list_documents(&self) -> Result<Vec<DocumentView>, AppError> {
        let started = Instant::now();

        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT d.id, d.name, d.link,
                   m.id AS module_id, m.name AS module_name,
                   r.id AS responsible_id, r.name AS responsible_name, r.email AS responsible_email
            FROM documents d
            LEFT JOIN modules m ON m.id = d.module_id
            LEFT JOIN responsibles r ON r.id = m.responsible_id
            ORDER BY d.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list documents: {}", e)))?;

        record_db_query("list_documents", started);

        Ok(rows.into_iter().map(DocumentView::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_document(&self, id: i32) -> Result<Option<DocumentView>, AppError> {
        let started = Instant::now();

        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT d.id, d.name, d.link,
                   m.id AS module_id, m.name AS module_name,
                   r.id AS responsible_id, r.name AS responsible_name, r.email AS responsible_email
            FROM documents d
            LEFT JOIN modules m ON m.id = d.module_id
            LEFT JOIN responsibles r ON r.id = m.responsible_id
            WHERE d.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get document: {}", e)))?;

        record_db_query("get_document", started);

        Ok(row.map(DocumentView::from))
    }

    #[instrument(skip(self))]
    async fn list_documents_by_module(
        &self,
        module_id: i32,
    ) -> Result<Vec<DocumentView>, AppError> {
        let started = Instant::now();

        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT d.id, d.name, d.link,
                   m.id AS module_id, m.name AS module_name,
                   r.id AS responsible_id, r.name AS responsible_name, r.email AS responsible_email
            FROM documents d
            INNER JOIN modules m ON m.id = d.module_id
            LEFT JOIN responsibles r ON r.id = m.responsible_id
            WHERE m.id = $1
            ORDER BY d.id
            "#,
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!(
                "Failed to list documents for module {}: {}",
                module_id,
                e
            ))
        })?;

        record_db_query("list_documents_by_module", started);

        Ok(rows.into_iter().map(DocumentView::from).collect())
    }

    #[instrument(skip(self, input), fields(module_id = input.module_id))]
    async fn create_document(
        &self,
        input: &NewDocument,
        policy: ModulePolicy,
    ) -> Result<DocumentView, AppError> {
        let started = Instant::now();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let found: Option<i32> =
            sqlx::query_scalar("SELECT id FROM modules WHERE id = $1 LIMIT 1")
                .bind(input.module_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to look up module: {}", e))
                })?;

        let module_id = policy.resolve(input.module_id, found)?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO documents (name, link, module_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.link)
        .bind(module_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create document: {}", e)))?;

        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT d.id, d.name, d.link,
                   m.id AS module_id, m.name AS module_name,
                   r.id AS responsible_id, r.name AS responsible_name, r.email AS responsible_email
            FROM documents d
            LEFT JOIN modules m ON m.id = d.module_id
            LEFT JOIN responsibles r ON r.id = m.responsible_id
            WHERE d.id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to read created document: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit document: {}", e))
        })?;

        record_db_query("create_document", started);

        info!(document_id = id, "Document created");

        Ok(DocumentView::from(row))
    }

    #[instrument(skip(self))]
    async fn document_exists(&self, id: i32) -> Result<bool, AppError> {
        let started = Instant::now();

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM documents WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to check document existence: {}",
                        e
                    ))
                })?;

        record_db_query("document_exists", started);

        Ok(exists)
    }

    #[instrument(skip(self, changes))]
    async fn update_document(&self, id: i32, changes: &DocumentChanges) -> Result<bool, AppError> {
        let started = Instant::now();

        let result = sqlx::query("UPDATE documents SET name = $2, link = $3 WHERE id = $1")
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.link)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to update document: {}", e))
            })?;

        record_db_query("update_document", started);

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_document(&self, id: i32) -> Result<bool, AppError> {
        let started = Instant::now();

        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete document: {}", e))
            })?;

        record_db_query("delete_document", started);

        Ok(result.rows_affected() > 0)
    }

    /// Check database health.
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }
}
