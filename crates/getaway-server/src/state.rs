use std::sync::Arc;
use std::time::Instant;

use getaway_export::error::ExportError;
use getaway_export::generate::{AssetPaths, Generator};
use getaway_export::pdf::HtmlToPdf;

use crate::config::ServerConfig;
use crate::logo::LogoLocator;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub logo: Arc<LogoLocator>,
    pub generator: Arc<Generator>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, html_to_pdf: Arc<dyn HtmlToPdf>) -> Result<Self, ExportError> {
        let logo = Arc::new(LogoLocator::from_config(&config));
        let assets = AssetPaths {
            template: config.template_path.clone(),
            pages_dir: config.pages_dir.clone(),
        };
        let generator = Generator::new(assets, html_to_pdf, logo.clone())?;

        Ok(Self {
            config: Arc::new(config),
            logo,
            generator: Arc::new(generator),
            started_at: Instant::now(),
        })
    }
}
