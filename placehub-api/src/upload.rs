/// Image storage for multipart uploads
///
/// Place creation and signup carry an `image` part. The bytes are written
/// under the configured upload directory with a `{uuid}.{ext}` name; only
/// PNG and JPEG content types are accepted. The stored relative path is
/// what ends up in the `image_url` column.
///
/// Removal after a place deletion is best-effort and runs outside the
/// database transaction: a failure is logged, never propagated.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ApiError;

/// Maximum accepted image size in bytes (2 MB)
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Error type for image storage operations
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Content type outside the accepted image types
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    /// Filesystem failure while storing the image
    #[error("Failed to store image: {0}")]
    Io(#[from] std::io::Error),
}

/// Maps an accepted image content type to its file extension
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpeg"),
        "image/jpg" => Some("jpg"),
        _ => None,
    }
}

/// Writes image bytes to the upload directory
///
/// Returns the stored path (directory + `{uuid}.{ext}`) as a string,
/// which callers persist as the entity's `image_url`.
///
/// # Errors
///
/// Returns `UploadError::UnsupportedType` for content types outside the
/// accepted set, `UploadError::Io` if the directory cannot be created or
/// the file cannot be written.
pub async fn save_image(
    dir: &Path,
    content_type: Option<&str>,
    data: &[u8],
) -> Result<String, UploadError> {
    let content_type = content_type.unwrap_or("");
    let ext = extension_for(content_type)
        .ok_or_else(|| UploadError::UnsupportedType(content_type.to_string()))?;

    tokio::fs::create_dir_all(dir).await?;

    let filename = format!("{}.{}", Uuid::new_v4(), ext);
    let path = dir.join(&filename);
    tokio::fs::write(&path, data).await?;

    debug!(path = %path.display(), bytes = data.len(), "Stored uploaded image");

    Ok(path.to_string_lossy().into_owned())
}

/// Text fields and the stored image collected from a multipart request
#[derive(Debug)]
pub struct ParsedUpload {
    /// Text parts by field name
    pub fields: HashMap<String, String>,

    /// Stored path of the `image` part, if one was present and accepted
    pub image_url: Option<String>,
}

impl ParsedUpload {
    /// Returns the named text field, or an empty string if absent
    ///
    /// Missing and empty fields are treated alike; the request validators
    /// reject both.
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }
}

/// Drains a multipart request into text fields plus a stored image
///
/// The `image` part is written to `dir` as it is encountered; every other
/// part is read as text. If a later part fails to parse, the already
/// stored image is removed before the error is returned so a rejected
/// request leaves nothing behind.
///
/// # Errors
///
/// Returns an error if a part cannot be read, or the image part has an
/// unsupported content type or cannot be written.
pub async fn collect_multipart(
    mut multipart: Multipart,
    dir: &Path,
) -> Result<ParsedUpload, ApiError> {
    let mut fields = HashMap::new();
    let mut image_url: Option<String> = None;

    let result = async {
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await?;
                image_url = Some(save_image(dir, content_type.as_deref(), &data).await?);
            } else {
                fields.insert(name, field.text().await?);
            }
        }

        Ok::<(), ApiError>(())
    }
    .await;

    if let Err(err) = result {
        if let Some(path) = image_url {
            remove_stored_image(path);
        }
        return Err(err);
    }

    Ok(ParsedUpload { fields, image_url })
}

/// Deletes a stored image in the background
///
/// Fire-and-forget: the owning entity is already gone by the time this
/// runs, so a leftover file only costs disk space and gets a warning in
/// the log.
pub fn remove_stored_image(path: String) {
    tokio::spawn(async move {
        if let Err(err) = tokio::fs::remove_file(&path).await {
            warn!(path = %path, error = %err, "Failed to delete stored image");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_accepted_types() {
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/jpeg"), Some("jpeg"));
        assert_eq!(extension_for("image/jpg"), Some("jpg"));
    }

    #[test]
    fn test_extension_for_rejected_types() {
        assert_eq!(extension_for("image/gif"), None);
        assert_eq!(extension_for("text/plain"), None);
        assert_eq!(extension_for("application/octet-stream"), None);
        assert_eq!(extension_for(""), None);
    }

    #[tokio::test]
    async fn test_save_image_writes_file_with_extension() {
        let dir = std::env::temp_dir().join(format!("placehub-upload-test-{}", Uuid::new_v4()));

        let stored = save_image(&dir, Some("image/png"), b"not really a png")
            .await
            .unwrap();

        assert!(stored.ends_with(".png"));
        let contents = tokio::fs::read(&stored).await.unwrap();
        assert_eq!(contents, b"not really a png");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_image_rejects_unsupported_type() {
        let dir = std::env::temp_dir().join("placehub-upload-test-rejected");

        let result = save_image(&dir, Some("text/plain"), b"hello").await;
        assert!(matches!(result, Err(UploadError::UnsupportedType(_))));

        let result = save_image(&dir, None, b"hello").await;
        assert!(matches!(result, Err(UploadError::UnsupportedType(_))));
    }
}
