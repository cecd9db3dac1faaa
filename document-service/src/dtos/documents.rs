use crate::models::{DocumentChanges, DocumentView, Module, NewDocument, Responsible};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/documents`.
///
/// Field names are camelCase; the PascalCase spellings older clients send are
/// accepted too. Missing fields fall back to empty strings and module 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDocumentRequest {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Link")]
    pub link: String,
    #[serde(alias = "ModuleId")]
    pub module_id: i32,
}

impl From<CreateDocumentRequest> for NewDocument {
    fn from(req: CreateDocumentRequest) -> Self {
        Self {
            name: req.name,
            link: req.link,
            module_id: req.module_id,
        }
    }
}

/// Body of `PUT /api/documents/{id}`. `id` must match the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDocumentRequest {
    #[serde(alias = "Id")]
    pub id: i32,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Link")]
    pub link: String,
}

impl From<UpdateDocumentRequest> for DocumentChanges {
    fn from(req: UpdateDocumentRequest) -> Self {
        Self {
            name: req.name,
            link: req.link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsibleResponse {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleResponse {
    pub id: i32,
    pub name: String,
    pub responsible: Option<ResponsibleResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: i32,
    pub name: String,
    pub link: String,
    pub module: Option<ModuleResponse>,
}

impl From<Responsible> for ResponsibleResponse {
    fn from(r: Responsible) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
        }
    }
}

impl From<Module> for ModuleResponse {
    fn from(m: Module) -> Self {
        Self {
            id: m.id,
            name: m.name,
            responsible: m.responsible.map(ResponsibleResponse::from),
        }
    }
}

impl From<DocumentView> for DocumentResponse {
    fn from(doc: DocumentView) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            link: doc.link,
            module: doc.module.map(ModuleResponse::from),
        }
    }
}
