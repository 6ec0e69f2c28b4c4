use std::path::PathBuf;

use thiserror::Error;

use getaway_core::error::CoreError;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    InvalidInput(#[from] CoreError),

    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    #[error("template file not found at: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("PDF compositing failed: {0}")]
    Compose(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tera::Error> for ExportError {
    fn from(e: tera::Error) -> Self {
        ExportError::TemplateRender(e.to_string())
    }
}

impl From<lopdf::Error> for ExportError {
    fn from(e: lopdf::Error) -> Self {
        ExportError::Compose(e.to_string())
    }
}
