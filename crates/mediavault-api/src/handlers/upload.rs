//! Upload and file handlers.

use axum::Json;
use axum::extract::{Multipart, Path, State};

use mediavault_core::error::AppError;
use mediavault_entity::file::EntityRef;
use mediavault_service::{UploadBlob, UploadTarget};

use crate::dto::response::FileResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// The non-file parts of an upload form.
#[derive(Debug, Default)]
struct UploadForm {
    folder: Option<String>,
    ref_id: Option<String>,
    ref_type: Option<String>,
    field: Option<String>,
}

impl UploadForm {
    /// Decide where the upload goes.
    ///
    /// A `folder` wins; otherwise all of `refId`, `ref` and `field` attach
    /// the upload to an entry, and none of them is a standalone upload.
    fn target(self) -> Result<UploadTarget, AppError> {
        let has_ref = self.ref_id.is_some() || self.ref_type.is_some() || self.field.is_some();

        if let Some(raw) = self.folder {
            if has_ref {
                return Err(AppError::validation(
                    "folder cannot be combined with refId, ref, or field",
                ));
            }
            let folder_id = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| AppError::validation(format!("Invalid folder: '{raw}'")))?;
            return Ok(UploadTarget::Explicit { folder_id });
        }

        match (self.ref_id, self.ref_type, self.field) {
            (Some(ref_id), Some(ref_type), Some(field)) => Ok(UploadTarget::Attach(EntityRef {
                ref_id,
                ref_type,
                field,
            })),
            (None, None, None) => Ok(UploadTarget::Standalone),
            _ => Err(AppError::validation(
                "refId, ref, and field must be given together",
            )),
        }
    }
}

/// POST /upload (multipart)
///
/// File parts are named `files`; optional text parts are `folder`, `refId`,
/// `ref`, and `field`.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let mut form = UploadForm::default();
    let mut blobs = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "files" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let mime_type = field.content_type().map(String::from);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
            blobs.push(UploadBlob {
                file_name,
                mime_type,
                data,
            });
            continue;
        }

        let slot = match name.as_str() {
            "folder" => &mut form.folder,
            "refId" => &mut form.ref_id,
            "ref" => &mut form.ref_type,
            "field" => &mut form.field,
            _ => continue,
        };
        let text = field
            .text()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
        *slot = Some(text);
    }

    let target = form.target()?;
    let files = state.upload_service.handle_uploads(blobs, target).await?;

    let mut response: Vec<FileResponse> = Vec::with_capacity(files.len());
    for file in files {
        response.push(state.file_service.get_file(file.id).await?.into());
    }
    Ok(Json(response))
}

/// GET /upload/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FileResponse>, ApiError> {
    let details = state.file_service.get_file(id).await?;
    Ok(Json(details.into()))
}
