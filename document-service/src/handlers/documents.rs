use crate::dtos::{CreateDocumentRequest, DocumentResponse, UpdateDocumentRequest};
use crate::models::{DocumentChanges, NewDocument};
use crate::services::metrics::record_document_created;
use crate::startup::{AppState, DOCUMENTS_ROUTE};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;

pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentResponse>>, AppError> {
    let documents = state.store.list_documents().await?;

    Ok(Json(
        documents.into_iter().map(DocumentResponse::from).collect(),
    ))
}

/// A missing document is a bare 404 with no body.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    match state.store.get_document(id).await? {
        Some(document) => Ok(Json(DocumentResponse::from(document)).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// An unknown module id yields an empty list, never 404.
pub async fn get_module_documents(
    State(state): State<AppState>,
    Path(module_id): Path<i32>,
) -> Result<Json<Vec<DocumentResponse>>, AppError> {
    let documents = state.store.list_documents_by_module(module_id).await?;

    Ok(Json(
        documents.into_iter().map(DocumentResponse::from).collect(),
    ))
}

pub async fn create_document(
    State(state): State<AppState>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = NewDocument::from(request);
    let policy = state.config.module_policy;

    let document = state
        .store
        .create_document(&input, policy)
        .await
        .map_err(|e| {
            tracing::warn!(
                module_id = input.module_id,
                module_policy = policy.as_str(),
                error = %e,
                "Document creation failed"
            );
            e
        })?;

    record_document_created(document.module.is_some());

    tracing::info!(
        document_id = document.id,
        module_id = ?document.module_id(),
        "Document created"
    );

    let location = format!("{}/{}", DOCUMENTS_ROUTE, document.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(DocumentResponse::from(document)),
    ))
}

pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateDocumentRequest>,
) -> Result<StatusCode, AppError> {
    if request.id != id {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Path id {} does not match body id {}",
            id,
            request.id
        )));
    }

    if !state.store.document_exists(id).await? {
        return Ok(StatusCode::NOT_FOUND);
    }

    let changes = DocumentChanges::from(request);
    // The row can disappear between the existence check and the update.
    if !state.store.update_document(id, &changes).await? {
        return Ok(StatusCode::NOT_FOUND);
    }

    tracing::info!(document_id = id, "Document updated");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_document(id).await? {
        return Ok(StatusCode::NOT_FOUND);
    }

    tracing::info!(document_id = id, "Document deleted");

    Ok(StatusCode::NO_CONTENT)
}
