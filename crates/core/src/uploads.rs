//! Upload validation: kind, size limits and MIME allow-lists.

use crate::status::define_status_enum;

define_status_enum! {
    /// Category of uploaded file. Each kind has its own size cap and MIME list.
    UploadKind {
        Audio = "audio",
        Image = "image",
        Document = "document",
        Video = "video",
    }
}

const MB: u64 = 1024 * 1024;

pub const MAX_AUDIO_BYTES: u64 = 50 * MB;
pub const MAX_IMAGE_BYTES: u64 = 10 * MB;
pub const MAX_DOCUMENT_BYTES: u64 = 20 * MB;
pub const MAX_VIDEO_BYTES: u64 = 100 * MB;

pub const AUDIO_MIME_TYPES: &[&str] = &["audio/mpeg", "audio/wav", "audio/mp3", "audio/x-wav"];
pub const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
pub const DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];
pub const VIDEO_MIME_TYPES: &[&str] = &["video/mp4", "video/quicktime", "video/x-msvideo"];

/// Longest accepted folder name.
pub const MAX_FOLDER_LENGTH: usize = 100;

impl UploadKind {
    pub fn max_bytes(self) -> u64 {
        match self {
            UploadKind::Audio => MAX_AUDIO_BYTES,
            UploadKind::Image => MAX_IMAGE_BYTES,
            UploadKind::Document => MAX_DOCUMENT_BYTES,
            UploadKind::Video => MAX_VIDEO_BYTES,
        }
    }

    pub fn allowed_mime_types(self) -> &'static [&'static str] {
        match self {
            UploadKind::Audio => AUDIO_MIME_TYPES,
            UploadKind::Image => IMAGE_MIME_TYPES,
            UploadKind::Document => DOCUMENT_MIME_TYPES,
            UploadKind::Video => VIDEO_MIME_TYPES,
        }
    }
}

/// Check size and content type before a file is sent anywhere.
pub fn validate_upload(kind: UploadKind, size: u64, content_type: &str) -> Result<(), String> {
    if size == 0 {
        return Err("File is empty".to_string());
    }
    if size > kind.max_bytes() {
        return Err(format!(
            "File is too large ({}). Maximum for {kind} is {}",
            format_file_size(size),
            format_file_size(kind.max_bytes())
        ));
    }
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !kind.allowed_mime_types().contains(&mime.as_str()) {
        return Err(format!(
            "Unsupported {kind} type '{content_type}'. Allowed: {}",
            kind.allowed_mime_types().join(", ")
        ));
    }
    Ok(())
}

/// Folder names become path segments on the upload host.
pub fn validate_folder(folder: &str) -> Result<(), String> {
    if folder.is_empty() || folder.len() > MAX_FOLDER_LENGTH {
        return Err(format!(
            "Folder must be between 1 and {MAX_FOLDER_LENGTH} characters"
        ));
    }
    let ok = folder
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/'));
    if !ok || folder.starts_with('/') || folder.contains("//") {
        return Err(format!("Invalid folder '{folder}'"));
    }
    Ok(())
}

/// Human-readable size: `0 Bytes`, `1.5 KB`, `12.34 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

/// Lowercased extension of a file name, without the dot.
pub fn file_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
