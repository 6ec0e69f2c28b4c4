use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;

use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use url::Url;

use crate::error::ExportError;
use crate::page::PageSetup;

/// Rasterizes an HTML document into PDF bytes.
pub trait HtmlToPdf: Send + Sync {
    fn render_pdf(&self, html: &str, setup: &PageSetup) -> Result<Vec<u8>, ExportError>;
}

/// Chrome flags for running inside a container without a GPU or a
/// writable /dev/shm.
const CHROME_ARGS: [&str; 7] = [
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--no-first-run",
    "--no-zygote",
    "--single-process",
    "--disable-gpu",
];

/// Renders through a headless Chrome instance launched per call.
#[derive(Debug, Clone, Default)]
pub struct ChromeRenderer {
    /// Chrome binary; auto-detected when `None`.
    pub chrome_path: Option<PathBuf>,
}

impl ChromeRenderer {
    pub fn new(chrome_path: Option<PathBuf>) -> Self {
        Self { chrome_path }
    }

    fn launch(&self) -> Result<Browser, ExportError> {
        let args: Vec<&OsStr> = CHROME_ARGS.iter().map(OsStr::new).collect();
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .path(self.chrome_path.clone())
            .args(args)
            .build()
            .map_err(|e| ExportError::Pdf(format!("invalid browser options: {e}")))?;
        Browser::new(options).map_err(|e| ExportError::Pdf(format!("failed to launch browser: {e}")))
    }
}

impl HtmlToPdf for ChromeRenderer {
    fn render_pdf(&self, html: &str, setup: &PageSetup) -> Result<Vec<u8>, ExportError> {
        // Chrome loads the document from disk so large itineraries are not
        // limited by data: URL length.
        let mut file = tempfile::Builder::new()
            .prefix("itinerary-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(html.as_bytes())?;
        file.flush()?;
        let file_url = Url::from_file_path(file.path())
            .map_err(|_| ExportError::Pdf("failed to convert file path to URL".to_string()))?;

        tracing::info!("launching headless browser");
        let browser = self.launch()?;
        let tab = browser
            .new_tab()
            .map_err(|e| ExportError::Pdf(format!("failed to open tab: {e}")))?;
        tab.navigate_to(file_url.as_str())
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| ExportError::Pdf(format!("failed to load itinerary HTML: {e}")))?;

        let (margin_top, margin_right, margin_bottom, margin_left) = setup.margins_inches();
        let options = PrintToPdfOptions {
            print_background: Some(setup.print_background),
            prefer_css_page_size: Some(setup.prefer_css_page_size),
            display_header_footer: Some(false),
            paper_width: Some(setup.width_inches()),
            paper_height: Some(setup.height_inches()),
            margin_top: Some(margin_top),
            margin_right: Some(margin_right),
            margin_bottom: Some(margin_bottom),
            margin_left: Some(margin_left),
            ..Default::default()
        };

        tracing::info!("generating PDF");
        let pdf = tab
            .print_to_pdf(Some(options))
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        tracing::info!(size = pdf.len(), "base PDF generated");
        Ok(pdf)
    }
}
