//! Handlers for the file upload proxy.
//!
//! Files are validated here and forwarded to the external upload service;
//! nothing is stored locally.

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use beatstore_core::uploads::UploadKind;
use beatstore_services::uploads::UploadRequest;
use beatstore_services::UploadProxy;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Request body for `POST /uploads/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteUpload {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteUploadResponse {
    pub deleted: bool,
}

/// POST /api/v1/uploads
///
/// Multipart form with `file`, `type` (audio, image, document, video) and an
/// optional `folder`.
pub async fn upload_file(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let proxy = proxy(&state)?;

    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut kind: Option<UploadKind> = None;
    let mut folder: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            Some("type") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid type field: {e}")))?;
                kind = Some(text.trim().parse::<UploadKind>()?);
            }
            Some("folder") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid folder field: {e}")))?;
                folder = Some(text.trim().to_string()).filter(|f| !f.is_empty());
            }
            _ => {}
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;
    let kind = kind.ok_or_else(|| AppError::BadRequest("Missing 'type' field".into()))?;

    let uploaded = proxy
        .upload(
            &auth.caller(),
            UploadRequest {
                kind,
                file_name,
                content_type,
                bytes,
                folder,
            },
        )
        .await?;
    Ok(Json(DataResponse { data: uploaded }))
}

/// POST /api/v1/uploads/delete
pub async fn delete_file(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<DeleteUpload>,
) -> AppResult<impl IntoResponse> {
    let deleted = proxy(&state)?.delete(&auth.caller(), &input.url).await?;
    Ok(Json(DataResponse {
        data: DeleteUploadResponse { deleted },
    }))
}

fn proxy(state: &AppState) -> AppResult<&UploadProxy> {
    state
        .uploads
        .as_deref()
        .ok_or_else(|| AppError::Unavailable("File uploads are not configured".into()))
}
