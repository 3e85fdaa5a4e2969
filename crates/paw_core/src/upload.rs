//! File selection: validation of picked/dropped files and preview decoding.

use crate::error::UploadError;
use image::{ImageFormat, imageops::FilterType};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Largest accepted upload (10 MiB), matching the server-side limit.
pub const MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// Longest side of the decoded preview, in pixels.
pub const PREVIEW_SIZE: u32 = 480;

/// Where a file came from. Only used for logging; both paths validate alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource {
    Picker,
    Drop,
}

/// A validated file waiting for (or under) classification.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl SelectedFile {
    /// Reads a file from disk. The size is checked from metadata before the
    /// contents are loaded, so oversized files are never read into memory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let size = fs::metadata(path)?.len();
        let media_type = declared_media_type(path);
        validate(size, media_type.as_deref())?;
        let bytes = fs::read(path)?;
        Ok(Self {
            name: file_name(path),
            media_type: media_type.unwrap_or_default(),
            bytes: bytes.into(),
        })
    }

    /// Wraps bytes that are already in memory (e.g. a drop carrying its data).
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: Option<String>,
        bytes: Arc<[u8]>,
    ) -> Result<Self, UploadError> {
        validate(bytes.len() as u64, media_type.as_deref())?;
        Ok(Self {
            name: name.into(),
            media_type: media_type.unwrap_or_default(),
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Checks the declared media type first, then the size limit.
pub fn validate(size: u64, media_type: Option<&str>) -> Result<(), UploadError> {
    match media_type {
        Some(mt) if is_image_media_type(mt) => {}
        other => {
            return Err(UploadError::NotAnImage {
                media_type: other.map(str::to_string),
            });
        }
    }
    if size > MAX_UPLOAD_SIZE {
        return Err(UploadError::TooLarge { size });
    }
    Ok(())
}

pub fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .trim()
        .to_ascii_lowercase()
        .strip_prefix("image/")
        .is_some_and(|sub| !sub.is_empty())
}

/// Media type implied by the file extension, the way a file chooser reports it.
pub fn declared_media_type(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if let Some(format) = ImageFormat::from_extension(&ext) {
        return Some(format.to_mime_type().to_string());
    }
    let mt = match ext.as_str() {
        "heic" | "heif" => "image/heic",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "json" => "application/json",
        _ => "application/octet-stream",
    };
    Some(mt.to_string())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

/// Decoded RGBA preview, ready to hand to a texture upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decodes `bytes` and shrinks the result to fit `max_side` (aspect kept).
pub fn decode_preview(bytes: &[u8], max_side: u32) -> Result<PreviewImage, image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    let img = if img.width() > max_side || img.height() > max_side {
        img.resize(max_side, max_side, FilterType::Triangle)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PreviewImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}
