//! HTTP client for the file upload proxy.
//!
//! Files are validated locally (size cap and MIME allow-list per kind) and
//! then forwarded as multipart to `POST {base}/upload`. Deletes go to
//! `POST {base}/delete`. When an API key is configured it is sent as
//! `X-API-Key`.

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use beatstore_core::roles::Role;
use beatstore_core::session::Caller;
use beatstore_core::uploads::{validate_folder, validate_upload, UploadKind};

use crate::error::{invalid, ServiceResult};

const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, thiserror::Error)]
pub enum UploadProxyError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The proxy answered with a non-2xx status.
    #[error("Upload proxy error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// A file to forward.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub kind: UploadKind,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub folder: Option<String>,
}

/// Where the proxy stored the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub url: String,
    pub filename: String,
    pub size: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    #[serde(default)]
    success: bool,
}

pub struct UploadProxy {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl UploadProxy {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Validate and forward a file. Admins and artists may upload.
    pub async fn upload(&self, caller: &Caller, request: UploadRequest) -> ServiceResult<UploadedFile> {
        caller.require_role(&[Role::Admin, Role::Artist], "upload files")?;
        validate_upload(request.kind, request.bytes.len() as u64, &request.content_type).map_err(invalid)?;
        if let Some(folder) = &request.folder {
            validate_folder(folder).map_err(invalid)?;
        }

        let size = request.bytes.len();
        let part = Part::bytes(request.bytes)
            .file_name(request.file_name.clone())
            .mime_str(&request.content_type)
            .map_err(UploadProxyError::from)?;
        let mut form = Form::new()
            .part("file", part)
            .text("type", request.kind.as_str());
        if let Some(folder) = request.folder {
            form = form.text("folder", folder);
        }

        let response = self
            .authorized(self.client.post(format!("{}/upload", self.base_url)))
            .multipart(form)
            .send()
            .await
            .map_err(UploadProxyError::from)?;
        let response = Self::ensure_success(response).await?;
        let uploaded: UploadedFile = response.json().await.map_err(UploadProxyError::from)?;

        tracing::info!(
            user_id = %caller.user_id,
            kind = %request.kind,
            file_name = %request.file_name,
            size,
            url = %uploaded.url,
            "File uploaded"
        );
        Ok(uploaded)
    }

    /// Ask the proxy to delete a previously uploaded file.
    pub async fn delete(&self, caller: &Caller, url: &str) -> ServiceResult<bool> {
        caller.require_admin("delete files")?;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(invalid(format!("Invalid file URL '{url}'")));
        }
        let response = self
            .authorized(self.client.post(format!("{}/delete", self.base_url)))
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .map_err(UploadProxyError::from)?;
        let response = Self::ensure_success(response).await?;
        let body: DeleteResponse = response.json().await.map_err(UploadProxyError::from)?;

        tracing::info!(user_id = %caller.user_id, url, deleted = body.success, "File delete requested");
        Ok(body.success)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key),
            None => builder,
        }
    }

    /// Map a non-2xx answer to [`UploadProxyError::Api`], preferring the
    /// proxy's own `error` message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, UploadProxyError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("Upload failed with status {}", status.as_u16()));
        Err(UploadProxyError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use beatstore_core::error::CoreError;

    use super::*;
    use crate::error::ServiceError;

    // Nothing listens here; every test below must fail before connecting.
    fn proxy() -> UploadProxy {
        UploadProxy::new("http://127.0.0.1:9/", Some(String::new()))
    }

    fn request(kind: UploadKind, content_type: &str, size: usize) -> UploadRequest {
        UploadRequest {
            kind,
            file_name: "file.bin".into(),
            content_type: content_type.into(),
            bytes: vec![0; size],
            folder: None,
        }
    }

    #[test]
    fn base_url_and_empty_key_are_normalized() {
        let proxy = proxy();
        assert_eq!(proxy.base_url, "http://127.0.0.1:9");
        assert!(proxy.api_key.is_none());
    }

    #[tokio::test]
    async fn customers_cannot_upload() {
        let caller = Caller::new("u1", "u1@example.com", Role::User);
        let err = proxy()
            .upload(&caller, request(UploadKind::Image, "image/png", 10))
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::Core(CoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn wrong_mime_type_is_rejected_locally() {
        let caller = Caller::new("a1", "a1@example.com", Role::Admin);
        let err = proxy()
            .upload(&caller, request(UploadKind::Audio, "image/png", 10))
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::Core(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn bad_folder_is_rejected_locally() {
        let caller = Caller::new("a1", "a1@example.com", Role::Artist);
        let mut req = request(UploadKind::Image, "image/png", 10);
        req.folder = Some("../etc".into());
        let err = proxy().upload(&caller, req).await.unwrap_err();
        assert_matches!(err, ServiceError::Core(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_requires_admin_and_url() {
        let artist = Caller::new("a1", "a1@example.com", Role::Artist);
        assert_matches!(
            proxy().delete(&artist, "https://cdn/x.mp3").await,
            Err(ServiceError::Core(CoreError::Forbidden(_)))
        );
        let admin = Caller::new("ad", "ad@example.com", Role::Admin);
        assert_matches!(
            proxy().delete(&admin, "not a url").await,
            Err(ServiceError::Core(CoreError::Validation(_)))
        );
    }
}
