// utils/file_utils.rs
use crate::{models::propertymodel::UploadFile, service::error::ServiceError};

const ALLOWED_CONTENT_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "application/pdf",
];

/// Resolve the content type, falling back to the file extension when the
/// picker gave us nothing useful.
pub fn resolve_content_type(file: &UploadFile) -> Option<&'static str> {
    let declared = file.content_type.trim().to_lowercase();
    if let Some(known) = ALLOWED_CONTENT_TYPES.iter().copied().find(|t| *t == declared) {
        return Some(known);
    }
    if !declared.is_empty() && declared != "application/octet-stream" {
        return None;
    }

    let extension = file.file_name.rsplit_once('.')?.1.to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

/// Receipts and LOI documents: one image or PDF, at most `max_size_mb`.
pub fn validate_upload(file: &UploadFile, max_size_mb: usize) -> Result<&'static str, ServiceError> {
    if file.bytes.is_empty() {
        return Err(ServiceError::Validation("The selected file is empty".to_string()));
    }

    let content_type = resolve_content_type(file).ok_or_else(|| {
        ServiceError::Validation("Only images (JPG, PNG, WEBP) or PDF files are allowed".to_string())
    })?;

    let max_size_bytes = max_size_mb * 1024 * 1024;
    if file.size() > max_size_bytes {
        return Err(ServiceError::Validation(format!(
            "File size must be less than {}MB",
            max_size_mb
        )));
    }

    Ok(content_type)
}
