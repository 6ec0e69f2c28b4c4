use std::path::Path;

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;

use getaway_core::paths;

use crate::error::ApiError;
use crate::state::AppState;

/// Uploads larger than this are rejected.
pub const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;
pub const TOO_LARGE: &str = "File too large. Maximum size is 5MB.";

const IMAGE_TYPES: [&str; 5] = ["jpeg", "jpg", "png", "gif", "svg"];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoStatus {
    pub has_logo: bool,
    pub logo_path: Option<String>,
}

#[derive(Serialize)]
pub struct UploadedLogo {
    pub message: &'static str,
    pub filename: String,
    pub path: String,
}

pub async fn check_logo(State(state): State<AppState>) -> Json<LogoStatus> {
    let logo_path = state.logo.resolve();
    Json(LogoStatus {
        has_logo: logo_path.is_some(),
        logo_path,
    })
}

/// Accept a logo image in the `logo` multipart field and store it under a
/// unique name in the upload directory.
pub async fn upload_logo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadedLogo>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("logo") {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_image(&original, &content_type) {
            return Err(ApiError::BadRequest("Only image files are allowed".to_string()));
        }

        let bytes = field.bytes().await?;
        if bytes.len() > MAX_LOGO_BYTES {
            return Err(ApiError::BadRequest(TOO_LARGE.to_string()));
        }

        let filename = stored_name(&original, jiff::Timestamp::now().as_millisecond());
        tokio::fs::create_dir_all(&state.config.upload_dir).await?;
        let dest = paths::uploaded_logo(&state.config.upload_dir, &filename);
        tokio::fs::write(&dest, &bytes).await?;
        tracing::info!(filename = %filename, size = bytes.len(), "logo uploaded");

        return Ok(Json(UploadedLogo {
            message: "Logo uploaded successfully",
            path: paths::uploaded_logo_url_path(&filename),
            filename,
        }));
    }

    Err(ApiError::BadRequest("No file uploaded".to_string()))
}

/// Both the extension and the MIME subtype must name an image format.
fn is_image(file_name: &str, content_type: &str) -> bool {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let extension_ok = extension.is_some_and(|e| IMAGE_TYPES.contains(&e.as_str()));
    let mime_ok = content_type
        .to_ascii_lowercase()
        .strip_prefix("image/")
        .is_some_and(|subtype| IMAGE_TYPES.iter().any(|t| subtype.contains(t)));
    extension_ok && mime_ok
}

fn stored_name(original: &str, unix_millis: i64) -> String {
    let extension = Path::new(original)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    format!("logo-{unix_millis}-{}{extension}", uuid::Uuid::new_v4())
}
