use sqlx::FromRow;

/// The party accountable for a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Responsible {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
}

/// Parent grouping for documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: i32,
    pub name: String,
    pub responsible: Option<Responsible>,
}

/// A document with its module and the module's responsible attached.
///
/// Every read path returns this shape. `module` is `None` only for documents
/// created under the lenient module policy with an id that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub id: i32,
    pub name: String,
    pub link: String,
    pub module: Option<Module>,
}

impl DocumentView {
    pub fn module_id(&self) -> Option<i32> {
        self.module.as_ref().map(|m| m.id)
    }
}

/// Input for creating a document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub name: String,
    pub link: String,
    pub module_id: i32,
}

/// Fields an update may touch. The module reference is fixed at creation.
#[derive(Debug, Clone)]
pub struct DocumentChanges {
    pub name: String,
    pub link: String,
}

/// Flat row produced by the documents/modules/responsibles join.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: i32,
    pub name: String,
    pub link: String,
    pub module_id: Option<i32>,
    pub module_name: Option<String>,
    pub responsible_id: Option<i32>,
    pub responsible_name: Option<String>,
    pub responsible_email: Option<String>,
}

impl From<DocumentRow> for DocumentView {
    fn from(row: DocumentRow) -> Self {
        let responsible = row.responsible_id.map(|id| Responsible {
            id,
            name: row.responsible_name.unwrap_or_default(),
            email: row.responsible_email,
        });

        let module = row.module_id.map(|id| Module {
            id,
            name: row.module_name.unwrap_or_default(),
            responsible,
        });

        Self {
            id: row.id,
            name: row.name,
            link: row.link,
            module,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> DocumentRow {
        DocumentRow {
            id: 7,
            name: "Syllabus".to_string(),
            link: "http://a/b".to_string(),
            module_id: Some(1),
            module_name: Some("Databases".to_string()),
            responsible_id: Some(3),
            responsible_name: Some("Alice".to_string()),
            responsible_email: None,
        }
    }

    #[test]
    fn joined_row_nests_module_and_responsible() {
        let view = DocumentView::from(row());

        let module = view.module.expect("module attached");
        assert_eq!(module.id, 1);
        assert_eq!(module.name, "Databases");
        let responsible = module.responsible.expect("responsible attached");
        assert_eq!(responsible.name, "Alice");
    }

    #[test]
    fn missing_module_yields_no_responsible_either() {
        let mut row = row();
        row.module_id = None;
        row.module_name = None;
        row.responsible_id = None;
        row.responsible_name = None;

        let view = DocumentView::from(row);
        assert!(view.module.is_none());
        assert_eq!(view.module_id(), None);
    }

    #[test]
    fn module_without_responsible() {
        let mut row = row();
        row.responsible_id = None;
        row.responsible_name = None;

        let view = DocumentView::from(row);
        assert_eq!(view.module_id(), Some(1));
        assert!(view.module.unwrap().responsible.is_none());
    }
}
