//! Asset path conventions.
//!
//! Pure path functions, no filesystem access. These define where the
//! service expects its template, supplementary pages and uploads.

use std::path::{Path, PathBuf};

/// Supplementary PDFs appended after the itinerary, in append order.
pub const SUPPLEMENTARY_PAGES: [&str; 3] = ["payments.pdf", "cancellation-policy.pdf", "faq.pdf"];

pub const DEFAULT_TEMPLATE: &str = "templates/itinerary-template.html";

pub const DEFAULT_PAGES_DIR: &str = "public/uploads/pages";

pub const DEFAULT_PUBLIC_DIR: &str = "public";

pub const DEFAULT_UPLOAD_DIR: &str = "public/uploads";

pub const DEFAULT_LOGO: &str = "public/assets/default/getawayvibelogo.png";

/// URL prefix under which the public directory is served.
pub const PUBLIC_PREFIX: &str = "/public";

pub fn supplementary_page(pages_dir: &Path, name: &str) -> PathBuf {
    pages_dir.join(name)
}

pub fn uploaded_logo(upload_dir: &Path, filename: &str) -> PathBuf {
    upload_dir.join(filename)
}

/// Public path of an uploaded file, relative to the server root.
pub fn uploaded_logo_url_path(filename: &str) -> String {
    format!("{PUBLIC_PREFIX}/uploads/{filename}")
}

/// Public URL path for a file inside the public directory, if it is one.
pub fn public_url_path(public_dir: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(public_dir).ok()?;
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if segments.is_empty() {
        return None;
    }
    Some(format!("{PUBLIC_PREFIX}/{}", segments.join("/")))
}
