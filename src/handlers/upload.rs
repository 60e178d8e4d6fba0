use axum::{
    extract::{Multipart, State},
    response::Json,
};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::UploadResponse;

#[utoipa::path(
    post,
    path = "/api/upload",
    responses(
        (status = 200, description = "Image persisted, reference returned", body = UploadResponse),
        (status = 400, description = "Missing file, wrong type or too large", body = crate::models::ErrorResponse),
        (status = 500, description = "Blob storage failure", body = crate::models::ErrorResponse)
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {}", e)))?;
        file = Some((filename, content_type, data.to_vec()));
        break;
    }

    let Some((filename, content_type, data)) = file else {
        return Err(ApiError::Validation("No file provided".to_string()));
    };

    validate_upload(&content_type, data.len(), state.config.max_upload_bytes)?;

    let image_url = state
        .image_store
        .persist(&filename, &content_type, &data)
        .await
        .map_err(|e| {
            tracing::error!("Upload error: {:#}", e);
            ApiError::Upstream("Failed to upload image".to_string())
        })?;

    tracing::info!(
        "Stored {} byte upload via {} mode",
        data.len(),
        state.image_store.mode()
    );
    Ok(Json(UploadResponse { image_url }))
}

fn validate_upload(content_type: &str, size: usize, max_bytes: usize) -> Result<(), ApiError> {
    if !content_type.starts_with("image/") {
        return Err(ApiError::Validation("File must be an image".to_string()));
    }
    if size > max_bytes {
        return Err(ApiError::Validation(format!(
            "File size must be less than {}MB",
            max_bytes / (1024 * 1024)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN_MB: usize = 10 * 1024 * 1024;

    #[test]
    fn test_rejects_non_image_content_type() {
        let err = validate_upload("application/pdf", 100, TEN_MB).unwrap_err();
        assert_eq!(err.to_string(), "File must be an image");
    }

    #[test]
    fn test_rejects_oversized_file_with_size_message() {
        let err = validate_upload("image/jpeg", TEN_MB + 1, TEN_MB).unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 10MB");
    }

    #[test]
    fn test_accepts_image_at_exact_limit() {
        assert!(validate_upload("image/png", TEN_MB, TEN_MB).is_ok());
    }

    #[test]
    fn test_type_check_runs_before_size_check() {
        let err = validate_upload("text/plain", TEN_MB + 1, TEN_MB).unwrap_err();
        assert_eq!(err.to_string(), "File must be an image");
    }
}
