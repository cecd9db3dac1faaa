//! Domain models for document-service.

mod document;

pub use document::{
    DocumentChanges, DocumentRow, DocumentView, Module, NewDocument, Responsible,
};
