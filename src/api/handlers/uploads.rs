//! Media upload handlers.

use axum::{Json, extract::Multipart, extract::State};
use serde_json::json;
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::CurrentUser;

/// Allowed image file extensions.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Maximum accepted upload size.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Accept an image upload and return its access URL.
///
/// POST /api/uploads/image (multipart, field name "image")
#[instrument(skip(state, user, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let filename = field
            .file_name()
            .ok_or_else(|| ApiError::bad_request("No filename provided."))?
            .to_string();

        let extension = std::path::Path::new(&filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ApiError::bad_request(
                "Invalid image file type. Only JPG, JPEG, PNG, GIF are allowed.",
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(ApiError::bad_request("No image file provided."));
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::bad_request("Image exceeds the 10 MB limit."));
        }

        // Opaque name: never trust the client-supplied filename on disk.
        let stored_name = format!("{}.{}", uuid::Uuid::new_v4(), extension);
        state
            .storage
            .write(&stored_name, &data)
            .await
            .map_err(|e| ApiError::internal(format!("Image upload failed: {e}")))?;

        let content_type = mime_guess::from_path(&stored_name)
            .first_or_octet_stream()
            .to_string();
        info!(
            user_id = %user.id(),
            file = %stored_name,
            size = data.len(),
            content_type = %content_type,
            "Stored uploaded image"
        );

        return Ok(Json(json!({ "image_url": format!("/media/{stored_name}") })));
    }

    Err(ApiError::bad_request("No image file provided."))
}
