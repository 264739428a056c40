//! Folder handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use mediavault_entity::folder::Folder;

use crate::dto::request::{
    BulkDeleteRequest, CreateFolderRequest, FolderListQuery, UpdateFolderRequest, validate_body,
};
use crate::dto::response::{BulkDeleteResponse, FolderListResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /upload/folders?parent=root|<id>
pub async fn list_folders(
    State(state): State<AppState>,
    Query(query): Query<FolderListQuery>,
) -> Result<Json<FolderListResponse>, ApiError> {
    let scope = query.scope()?;
    let results = state.folder_service.list_folders(scope).await?;
    Ok(Json(FolderListResponse { results }))
}

/// GET /upload/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Folder>, ApiError> {
    let folder = state.folder_service.get_folder(id).await?;
    Ok(Json(folder))
}

/// POST /upload/folders
pub async fn create_folder(
    State(state): State<AppState>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<Folder>), ApiError> {
    validate_body(&req)?;
    let folder = state
        .folder_service
        .create_folder(&req.name, req.parent)
        .await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// PUT /upload/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateFolderRequest>,
) -> Result<Json<Folder>, ApiError> {
    validate_body(&req)?;
    let folder = state.folder_service.update_folder(id, req.into()).await?;
    Ok(Json(folder))
}

/// POST /upload/actions/bulk-delete
pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>, ApiError> {
    let deleted = state.folder_service.bulk_delete(&req.folder_ids).await?;
    Ok(Json(BulkDeleteResponse { deleted }))
}
