//! MIME type classification.

use aula_core::AssetCategory;

/// Non-image, non-video MIME types accepted as documents.
pub const DOCUMENT_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "text/plain",
    "text/csv",
    "application/rtf",
    "text/rtf",
    "application/zip",
    "application/x-zip-compressed",
    "application/vnd.rar",
    "application/x-rar-compressed",
];

/// Essence of a MIME type: lower-cased, without parameters or surrounding whitespace.
pub fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Classify a declared MIME type. Total: anything unrecognized is `Unsupported`.
pub fn classify(content_type: &str) -> AssetCategory {
    let essence = mime_essence(content_type);

    let Some((kind, subtype)) = essence.split_once('/') else {
        return AssetCategory::Unsupported;
    };
    if subtype.is_empty() || subtype.contains(char::is_whitespace) {
        return AssetCategory::Unsupported;
    }

    match kind {
        "image" => AssetCategory::Image,
        "video" => AssetCategory::Video,
        _ if DOCUMENT_CONTENT_TYPES.contains(&essence.as_str()) => AssetCategory::Document,
        _ => AssetCategory::Unsupported,
    }
}
