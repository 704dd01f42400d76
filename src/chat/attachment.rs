//! Image attachments.
//!
//! Only images the backend can read are accepted; the check is by file
//! extension, the same way the browser file picker filtered them.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

/// Why a file could not be attached.
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("cannot read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{0}` is not a supported image (png, jpg, gif, webp, bmp)")]
    NotAnImage(String),

    #[error("`{0}` is empty")]
    Empty(String),
}

/// An image picked by the user, held in memory until it is sent.
///
/// Cloning is cheap: the bytes are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Arc<[u8]>,
}

impl Attachment {
    /// Build an attachment from bytes already in memory.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AttachmentError> {
        let file_name = file_name.into();
        let mime = image_mime(&file_name).ok_or_else(|| AttachmentError::NotAnImage(file_name.clone()))?;
        if bytes.is_empty() {
            return Err(AttachmentError::Empty(file_name));
        }
        Ok(Self {
            file_name,
            mime,
            bytes: Arc::from(bytes),
        })
    }

    /// Read an image file from disk.
    pub fn load(path: &Path) -> Result<Self, AttachmentError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        // Reject by extension before reading a possibly large file.
        if image_mime(&file_name).is_none() {
            return Err(AttachmentError::NotAnImage(file_name));
        }

        let bytes = std::fs::read(path).map_err(|source| AttachmentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(file_name, bytes)
    }

    /// Human-readable size, e.g. `"12.3 KB"`.
    pub fn size_label(&self) -> String {
        let len = self.bytes.len() as f64;
        if len < 1024.0 {
            format!("{} B", self.bytes.len())
        } else if len < 1024.0 * 1024.0 {
            format!("{:.1} KB", len / 1024.0)
        } else {
            format!("{:.1} MB", len / (1024.0 * 1024.0))
        }
    }
}

fn image_mime(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}
