//! Image handles backed by temporary files.

use std::fs;
use std::path::PathBuf;

use lapor_client::{ClientError, ImageHandleFactory};
use tracing::debug;
use uuid::Uuid;

/// Writes fetched photos into a scratch directory; releasing a handle
/// deletes its file.
pub(crate) struct TempFileImages {
    dir: PathBuf,
}

impl TempFileImages {
    pub(crate) const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl ImageHandleFactory for TempFileImages {
    fn create(&self, bytes: &[u8], content_type: Option<&str>) -> Result<String, ClientError> {
        let path = self.dir.join(format!(
            "lapor-foto-{}.{}",
            Uuid::new_v4(),
            extension_for(content_type)
        ));
        fs::write(&path, bytes).map_err(|err| ClientError::Image {
            message: format!("{}: {err}", path.display()),
        })?;
        Ok(path.display().to_string())
    }

    fn release(&self, handle: &str) {
        if let Err(err) = fs::remove_file(handle) {
            debug!(handle, error = %err, "temporary image already gone");
        }
    }
}

/// File extension for an image MIME type.
pub(crate) fn extension_for(content_type: Option<&str>) -> &'static str {
    let mime = content_type
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase());
    match mime.as_deref() {
        Some("image/png") => "png",
        Some("image/jpeg" | "image/jpg") => "jpg",
        Some("image/gif") => "gif",
        Some("image/webp") => "webp",
        _ => "bin",
    }
}

/// MIME type guessed from a file extension, for uploads.
pub(crate) fn content_type_for(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
