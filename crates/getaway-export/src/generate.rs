//! Itinerary generation pipeline: validate → resolve logo → load template →
//! render HTML → rasterize → composite.

use std::path::PathBuf;
use std::sync::Arc;

use getaway_core::models::trip::TripRecord;

use crate::compose::{self, Composed};
use crate::error::ExportError;
use crate::page::PageSetup;
use crate::pdf::HtmlToPdf;
use crate::render::ItineraryRenderer;

/// Resolves the public logo URL for the current request, if a logo exists.
pub trait LogoSource: Send + Sync {
    fn logo_url(&self) -> Option<String>;
}

/// A fixed logo, or none.
impl LogoSource for Option<String> {
    fn logo_url(&self) -> Option<String> {
        self.clone()
    }
}

/// Files the pipeline reads on every run.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub template: PathBuf,
    pub pages_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GeneratedPdf {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Compositor statistics; `None` when compositing failed and the bytes
    /// are the bare rendered itinerary.
    pub composed: Option<CompositionStats>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionStats {
    pub primary_pages: usize,
    pub appended_pages: usize,
    pub skipped: Vec<String>,
}

impl GeneratedPdf {
    pub fn merged(&self) -> bool {
        self.composed.is_some()
    }
}

pub struct Generator {
    assets: AssetPaths,
    setup: PageSetup,
    renderer: ItineraryRenderer,
    html_to_pdf: Arc<dyn HtmlToPdf>,
    logo: Arc<dyn LogoSource>,
}

impl Generator {
    pub fn new(
        assets: AssetPaths,
        html_to_pdf: Arc<dyn HtmlToPdf>,
        logo: Arc<dyn LogoSource>,
    ) -> Result<Self, ExportError> {
        Ok(Self {
            assets,
            setup: PageSetup::default(),
            renderer: ItineraryRenderer::new()?,
            html_to_pdf,
            logo,
        })
    }

    /// Build the itinerary PDF for `trip`.
    ///
    /// Validation and template failures stop the run before the renderer is
    /// invoked. A compositing failure does not fail the run: the rendered
    /// itinerary is returned without the supplementary pages.
    pub fn generate(&self, trip: &TripRecord, unix_millis: i64) -> Result<GeneratedPdf, ExportError> {
        trip.validate()?;
        tracing::info!(
            customer = trip.customer_name(),
            destination = trip.destination(),
            days = trip.daily_itinerary.len(),
            "generating itinerary"
        );

        let logo = self.logo.logo_url();
        match &logo {
            Some(url) => tracing::debug!(logo = %url, "using logo"),
            None => tracing::debug!("no logo found, using company name fallback"),
        }

        let template = self.load_template()?;
        let html = self.renderer.render(&template, trip, logo.as_deref())?;
        let rendered = self.html_to_pdf.render_pdf(&html, &self.setup)?;

        let supplements = compose::load_supplements(&self.assets.pages_dir);
        let (bytes, composed) = match compose::merge(&rendered, &supplements) {
            Ok(Composed {
                bytes,
                primary_pages,
                appended_pages,
                skipped,
            }) => (
                bytes,
                Some(CompositionStats {
                    primary_pages,
                    appended_pages,
                    skipped,
                }),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "PDF merge failed, using original PDF");
                (rendered, None)
            }
        };

        Ok(GeneratedPdf {
            filename: trip.download_filename(unix_millis),
            bytes,
            composed,
        })
    }

    fn load_template(&self) -> Result<String, ExportError> {
        let path = &self.assets.template;
        match std::fs::read_to_string(path) {
            Ok(template) => {
                tracing::debug!(path = %path.display(), length = template.len(), "template loaded");
                Ok(template)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExportError::TemplateNotFound(path.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
