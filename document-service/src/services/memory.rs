//! In-process store backed by ordered maps.
//!
//! Used for local runs without PostgreSQL and by the integration tests.
//! Modules and responsibles are seeded through [`MemoryStore::insert_module`]
//! and [`MemoryStore::insert_responsible`]; documents go through the
//! [`DocumentStore`] operations like any other backend.

use crate::config::ModulePolicy;
use crate::models::{DocumentChanges, DocumentView, Module, NewDocument, Responsible};
use crate::services::store::DocumentStore;
use async_trait::async_trait;
use service_core::error::AppError;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct ModuleRecord {
    name: String,
    responsible_id: Option<i32>,
}

#[derive(Debug, Clone)]
struct DocumentRecord {
    name: String,
    link: String,
    module_id: Option<i32>,
}

#[derive(Debug, Default)]
struct Tables {
    responsibles: BTreeMap<i32, Responsible>,
    modules: BTreeMap<i32, ModuleRecord>,
    documents: BTreeMap<i32, DocumentRecord>,
    // Ids are never reused, even after deletes.
    next_responsible_id: i32,
    next_module_id: i32,
    next_document_id: i32,
}

impl Tables {
    fn module(&self, id: i32) -> Option<Module> {
        self.modules.get(&id).map(|record| Module {
            id,
            name: record.name.clone(),
            responsible: record
                .responsible_id
                .and_then(|rid| self.responsibles.get(&rid).cloned()),
        })
    }

    fn view(&self, id: i32, record: &DocumentRecord) -> DocumentView {
        DocumentView {
            id,
            name: record.name.clone(),
            link: record.link.clone(),
            module: record.module_id.and_then(|mid| self.module(mid)),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_responsible(&self, name: &str, email: Option<&str>) -> i32 {
        let mut tables = self.tables.write().await;
        tables.next_responsible_id += 1;
        let id = tables.next_responsible_id;
        tables.responsibles.insert(
            id,
            Responsible {
                id,
                name: name.to_string(),
                email: email.map(str::to_string),
            },
        );
        id
    }

    pub async fn insert_module(&self, name: &str, responsible_id: Option<i32>) -> i32 {
        let mut tables = self.tables.write().await;
        tables.next_module_id += 1;
        let id = tables.next_module_id;
        tables.modules.insert(
            id,
            ModuleRecord {
                name: name.to_string(),
                responsible_id,
            },
        );
        id
    }

    pub async fn document_count(&self) -> usize {
        self.tables.read().await.documents.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(&self) -> Result<Vec<DocumentView>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .documents
            .iter()
            .map(|(id, record)| tables.view(*id, record))
            .collect())
    }

    async fn get_document(&self, id: i32) -> Result<Option<DocumentView>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.documents.get(&id).map(|record| tables.view(id, record)))
    }

    async fn list_documents_by_module(
        &self,
        module_id: i32,
    ) -> Result<Vec<DocumentView>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .documents
            .iter()
            .filter(|(_, record)| record.module_id == Some(module_id))
            .map(|(id, record)| tables.view(*id, record))
            .collect())
    }

    async fn create_document(
        &self,
        input: &NewDocument,
        policy: ModulePolicy,
    ) -> Result<DocumentView, AppError> {
        let mut tables = self.tables.write().await;

        let found = tables
            .modules
            .contains_key(&input.module_id)
            .then_some(input.module_id);
        let module_id = policy.resolve(input.module_id, found)?;

        tables.next_document_id += 1;
        let id = tables.next_document_id;
        let record = DocumentRecord {
            name: input.name.clone(),
            link: input.link.clone(),
            module_id,
        };
        let view = tables.view(id, &record);
        tables.documents.insert(id, record);

        Ok(view)
    }

    async fn document_exists(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tables.read().await.documents.contains_key(&id))
    }

    async fn update_document(&self, id: i32, changes: &DocumentChanges) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables.documents.get_mut(&id) {
            Some(record) => {
                record.name = changes.name.clone();
                record.link = changes.link.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_document(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tables.write().await.documents.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
