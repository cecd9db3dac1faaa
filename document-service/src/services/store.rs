use crate::config::ModulePolicy;
use crate::models::{DocumentChanges, DocumentView, NewDocument};
use async_trait::async_trait;
use service_core::error::AppError;

/// Persistence seam for documents.
///
/// Every read returns [`DocumentView`]s with module and responsible attached.
/// Each call is one unit of work against the backing store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in id order.
    async fn list_documents(&self) -> Result<Vec<DocumentView>, AppError>;

    async fn get_document(&self, id: i32) -> Result<Option<DocumentView>, AppError>;

    /// Documents whose module id equals `module_id`, in id order. Empty when
    /// the module has no documents or does not exist.
    async fn list_documents_by_module(&self, module_id: i32)
        -> Result<Vec<DocumentView>, AppError>;

    /// Look up the module, apply `policy`, insert, and return the stored view.
    async fn create_document(
        &self,
        input: &NewDocument,
        policy: ModulePolicy,
    ) -> Result<DocumentView, AppError>;

    async fn document_exists(&self, id: i32) -> Result<bool, AppError>;

    /// Returns `false` when no document has that id.
    async fn update_document(&self, id: i32, changes: &DocumentChanges)
        -> Result<bool, AppError>;

    /// Returns `false` when no document has that id.
    async fn delete_document(&self, id: i32) -> Result<bool, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
