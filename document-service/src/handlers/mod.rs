pub mod documents;
pub mod health;

pub use documents::{
    create_document, delete_document, get_document, get_module_documents, list_documents,
    update_document,
};
pub use health::{health_check, metrics_endpoint, readiness_check};
