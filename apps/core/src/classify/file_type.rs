//! File type classification from the file name.

use crate::models::FileType;

const IMAGE_SUFFIXES: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp"];

/// Fallback MIME table used when content sniffing finds no signature.
const EXTENSION_MIME_TYPES: &[(&str, &str)] = &[
    ("csv", "text/csv"),
    ("pdf", "application/pdf"),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("txt", "text/plain"),
    ("json", "application/json"),
];

const OCTET_STREAM: &str = "application/octet-stream";

/// Classifies a file by its name suffix (case-insensitive). Never fails.
pub fn classify_file_type(file_name: &str) -> FileType {
    let name = file_name.to_lowercase();

    if name.ends_with(".csv") {
        FileType::Csv
    } else if name.ends_with(".xlsx") || name.ends_with(".xls") {
        FileType::Excel
    } else if name.ends_with(".pdf") {
        FileType::Pdf
    } else if IMAGE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
        FileType::Image
    } else {
        FileType::Other
    }
}

/// Human-readable size: bytes below 1 KB, then KB and MB with one decimal.
pub fn format_file_size(size_in_bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if size_in_bytes < KB {
        format!("{} B", size_in_bytes)
    } else if size_in_bytes < MB {
        format!("{:.1} KB", size_in_bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", size_in_bytes as f64 / MB as f64)
    }
}

/// Best-effort MIME type: magic-number sniffing first, then the extension table.
pub fn guess_mime_type(file_name: &str, bytes: &[u8]) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }

    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    EXTENSION_MIME_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| mime.to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}
