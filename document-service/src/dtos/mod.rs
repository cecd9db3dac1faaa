pub mod documents;

pub use documents::{
    CreateDocumentRequest, DocumentResponse, ModuleResponse, ResponsibleResponse,
    UpdateDocumentRequest,
};
