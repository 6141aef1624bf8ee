use anyhow::{Result, anyhow};
use axum::{body::Bytes, extract::multipart::Field};
use tracing::debug;

/// A file part read fully into memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Reads a file part, accepting content types under `accepted` (e.g.
/// `"video/"`). Parts sent without a specific type are tagged `fallback`.
pub async fn read_file(field: Field<'_>, accepted: &str, fallback: &str) -> Result<UploadedFile> {
    let name = field.name().unwrap_or("").to_string();
    let content_type = match field.content_type() {
        None => fallback.to_string(),
        Some(ct) if ct == mime::APPLICATION_OCTET_STREAM.essence_str() => fallback.to_string(),
        Some(ct) if ct.starts_with(accepted) => ct.to_string(),
        Some(ct) => {
            return Err(anyhow!(
                "Invalid content type for {}: expected {}*, got {}",
                name,
                accepted,
                ct
            ));
        }
    };

    let bytes = field
        .bytes()
        .await
        .map_err(|e| anyhow!("Failed to read {}: {}", name, e))?;

    debug!("Read {} bytes from field {} ({})", bytes.len(), name, content_type);
    Ok(UploadedFile {
        bytes,
        content_type,
    })
}

pub async fn read_text(field: Field<'_>) -> Result<String> {
    let name = field.name().unwrap_or("").to_string();
    field
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read {}: {}", name, e))
}
