use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use tokio::fs;
use tokio_util::io::ReaderStream;

use crate::{dto::ApiResponse, error::Error, error::Result, AppState};

/// Contracts and leave justifications are PDF only. Extension, declared
/// content type and the `%PDF` magic bytes must all agree before the file
/// is trusted.
fn check_pdf(filename: &str, content_type: Option<&str>, data: &[u8]) -> Result<()> {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if ext != "pdf" {
        return Err(Error::BadRequest("Only PDF files are accepted".to_string()));
    }
    if let Some(ct) = content_type {
        if ct != "application/pdf" {
            return Err(Error::BadRequest("Only PDF files are accepted".to_string()));
        }
    }
    if !data.starts_with(b"%PDF") {
        return Err(Error::BadRequest("Invalid PDF file content".to_string()));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/documentos",
    responses(
        (status = 201, description = "Document stored"),
        (status = 400, description = "Not a PDF")
    )
)]
#[axum::debug_handler]
pub async fn upload_document(
    State(_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("document.bin").to_string();
        let content_type = field.content_type().map(|ct| ct.to_string());
        let data = field.bytes().await?;

        if data.is_empty() {
            return Err(Error::BadRequest("Uploaded file is empty".to_string()));
        }
        check_pdf(&filename, content_type.as_deref(), &data)?;

        let uploads_dir = crate::config::get_config().uploads_dir.clone();
        fs::create_dir_all(&uploads_dir).await?;

        let stored_name = format!("{}.pdf", uuid::Uuid::new_v4());
        let path = std::path::Path::new(&uploads_dir).join(&stored_name);
        fs::write(&path, &data).await?;

        tracing::info!(filename = %stored_name, size = data.len(), "document stored");
        return Ok((
            StatusCode::CREATED,
            Json(ApiResponse::ok(
                "Document stored",
                serde_json::json!({ "filename": stored_name }),
            )),
        ));
    }

    Err(Error::BadRequest("Missing file field".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/documentos/{filename}",
    params(("filename" = String, Path, description = "Stored document filename")),
    responses(
        (status = 200, description = "Document stream"),
        (status = 404, description = "Document not found")
    )
)]
#[axum::debug_handler]
pub async fn download_document(
    State(_state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse> {
    // Only the basename is honored; client-supplied paths never reach the
    // filesystem.
    let safe_name = std::path::Path::new(&filename)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::BadRequest("Invalid filename".to_string()))?
        .to_string();

    let uploads_dir = crate::config::get_config().uploads_dir.clone();
    let path = std::path::Path::new(&uploads_dir).join(&safe_name);

    let file = fs::File::open(&path)
        .await
        .map_err(|_| Error::NotFound("Document not found".to_string()))?;

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", safe_name),
        ),
    ];
    Ok((headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_real_pdf() {
        assert!(check_pdf("contract.pdf", Some("application/pdf"), b"%PDF-1.7 rest").is_ok());
        assert!(check_pdf("contract.PDF", None, b"%PDF-1.4").is_ok());
    }

    #[test]
    fn rejects_renamed_non_pdf() {
        assert!(check_pdf("malware.pdf", Some("application/pdf"), b"MZ\x90\x00").is_err());
    }

    #[test]
    fn rejects_wrong_extension_or_type() {
        assert!(check_pdf("contract.docx", Some("application/pdf"), b"%PDF-1.7").is_err());
        assert!(check_pdf("contract.pdf", Some("text/html"), b"%PDF-1.7").is_err());
    }
}
