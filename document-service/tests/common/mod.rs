#![allow(dead_code)]

use async_trait::async_trait;
use document_service::config::{DocumentConfig, ModulePolicy, StoreBackend, StoreConfig};
use document_service::dtos::DocumentResponse;
use document_service::models::{DocumentChanges, DocumentView, NewDocument};
use document_service::services::{DocumentStore, MemoryStore};
use document_service::startup::Application;
use serde_json::json;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

pub fn test_config(module_policy: ModulePolicy) -> DocumentConfig {
    DocumentConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        service_name: "document-service".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        store: StoreConfig {
            backend: StoreBackend::Memory,
            database: None,
        },
        module_policy,
        allowed_origins: vec!["*".to_string()],
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_policy(ModulePolicy::Strict).await
    }

    pub async fn spawn_with_policy(module_policy: ModulePolicy) -> Self {
        let store = Arc::new(MemoryStore::new());
        let (address, port) = start_app(test_config(module_policy), store.clone()).await;

        TestApp {
            address,
            port,
            store,
            client: reqwest::Client::new(),
        }
    }

    /// Seed a module owned by a new responsible party. Returns the module id.
    pub async fn seed_module(&self, module_name: &str, responsible_name: &str) -> i32 {
        let responsible = self.store.insert_responsible(responsible_name, None).await;
        self.store.insert_module(module_name, Some(responsible)).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/documents{}", self.address, path)
    }

    pub async fn post_document(&self, name: &str, link: &str, module_id: i32) -> reqwest::Response {
        self.client
            .post(self.url(""))
            .json(&json!({ "name": name, "link": link, "moduleId": module_id }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a document and return the parsed body, asserting 201.
    pub async fn create_document(&self, name: &str, link: &str, module_id: i32) -> DocumentResponse {
        let response = self.post_document(name, link, module_id).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse JSON")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_documents(&self, path: &str) -> Vec<DocumentResponse> {
        let response = self.get(path).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("Failed to parse JSON")
    }
}

/// Build the application over `store` on a random port and wait until it
/// answers. Returns the base address and the bound port.
pub async fn start_app(config: DocumentConfig, store: Arc<dyn DocumentStore>) -> (String, u16) {
    let app = Application::build_with_store(config, store)
        .await
        .expect("Failed to build test application");

    let port = app.port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });

    // Wait for HTTP server to be ready by polling health endpoint
    let client = reqwest::Client::new();
    let health_url = format!("{}/health", address);
    for _ in 0..50 {
        if client.get(&health_url).send().await.is_ok() {
            break;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    }

    (address, port)
}

/// Store whose every operation fails as if the database were unreachable.
pub struct UnavailableStore;

fn unavailable() -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("connection refused"))
}

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn list_documents(&self) -> Result<Vec<DocumentView>, AppError> {
        Err(unavailable())
    }

    async fn get_document(&self, _id: i32) -> Result<Option<DocumentView>, AppError> {
        Err(unavailable())
    }

    async fn list_documents_by_module(
        &self,
        _module_id: i32,
    ) -> Result<Vec<DocumentView>, AppError> {
        Err(unavailable())
    }

    async fn create_document(
        &self,
        _input: &NewDocument,
        _policy: ModulePolicy,
    ) -> Result<DocumentView, AppError> {
        Err(unavailable())
    }

    async fn document_exists(&self, _id: i32) -> Result<bool, AppError> {
        Err(unavailable())
    }

    async fn update_document(
        &self,
        _id: i32,
        _changes: &DocumentChanges,
    ) -> Result<bool, AppError> {
        Err(unavailable())
    }

    async fn delete_document(&self, _id: i32) -> Result<bool, AppError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}
