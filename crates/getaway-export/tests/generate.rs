mod common;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lopdf::Document;

use getaway_core::error::CoreError;
use getaway_core::models::trip::{DayEntry, TripRecord};
use getaway_export::error::ExportError;
use getaway_export::generate::{AssetPaths, Generator};
use getaway_export::page::PageSetup;
use getaway_export::pdf::HtmlToPdf;

use common::{a4_pdf, pdf_with_pages};

const TEMPLATE: &str = "<h1>{{customerName}}</h1><p>{{destination}}</p>\
    {{#each dailyItinerary}}{{/each}}";

/// Stands in for the browser: records the HTML and returns fixed bytes.
struct FakeRenderer {
    output: Vec<u8>,
    calls: AtomicUsize,
    html: Mutex<Option<String>>,
    setup: Mutex<Option<PageSetup>>,
}

impl FakeRenderer {
    fn returning(output: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            output,
            calls: AtomicUsize::new(0),
            html: Mutex::new(None),
            setup: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HtmlToPdf for FakeRenderer {
    fn render_pdf(&self, html: &str, setup: &PageSetup) -> Result<Vec<u8>, ExportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.html.lock().unwrap() = Some(html.to_string());
        *self.setup.lock().unwrap() = Some(setup.clone());
        Ok(self.output.clone())
    }
}

struct FailingRenderer;

impl HtmlToPdf for FailingRenderer {
    fn render_pdf(&self, _html: &str, _setup: &PageSetup) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::Pdf("browser crashed".to_string()))
    }
}

fn assets(root: &Path) -> AssetPaths {
    let template = root.join("itinerary-template.html");
    std::fs::write(&template, TEMPLATE).unwrap();
    let pages_dir = root.join("pages");
    std::fs::create_dir_all(&pages_dir).unwrap();
    AssetPaths {
        template,
        pages_dir,
    }
}

fn generator(assets: AssetPaths, renderer: Arc<dyn HtmlToPdf>) -> Generator {
    Generator::new(
        assets,
        renderer,
        Arc::new(Some("http://localhost:5000/public/logo.png".to_string())),
    )
    .unwrap()
}

fn jane_to_bali() -> TripRecord {
    TripRecord {
        customer_name: Some("Jane Doe".to_string()),
        destination: Some("Bali".to_string()),
        daily_itinerary: vec![DayEntry {
            day_number: 1,
            title: Some("Arrival".to_string()),
            description: Some("Beach".to_string()),
        }],
        ..Default::default()
    }
}

#[test]
fn end_to_end_produces_a_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = FakeRenderer::returning(a4_pdf(1));
    let generator = generator(assets(dir.path()), renderer.clone());

    let pdf = generator.generate(&jane_to_bali(), 1_700_000_000_000).unwrap();

    assert!(pdf.bytes.starts_with(b"%PDF-"));
    let doc = Document::load_mem(&pdf.bytes).unwrap();
    assert!(!doc.get_pages().is_empty());
    assert_eq!(pdf.filename, "itinerary-Jane-Doe-1700000000000.pdf");
    assert!(pdf.merged());
    assert_eq!(renderer.calls(), 1);

    let html = renderer.html.lock().unwrap().clone().unwrap();
    assert!(html.contains("<h1>Jane Doe</h1>"));
    assert!(html.contains("Arrival"));
}

#[test]
fn renderer_receives_a4_print_setup() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = FakeRenderer::returning(a4_pdf(1));
    let generator = generator(assets(dir.path()), renderer.clone());
    generator.generate(&jane_to_bali(), 0).unwrap();

    let setup = renderer.setup.lock().unwrap().clone().unwrap();
    assert!((setup.width_inches() - 8.268).abs() < 0.001);
    assert!((setup.height_inches() - 11.693).abs() < 0.001);
    assert_eq!(
        (setup.margin_top_px, setup.margin_right_px, setup.margin_bottom_px, setup.margin_left_px),
        (20.0, 15.0, 40.0, 15.0)
    );
    assert!(setup.print_background);
    assert!(setup.prefer_css_page_size);
}

#[test]
fn supplementary_pages_are_appended() {
    let dir = tempfile::tempdir().unwrap();
    let assets = assets(dir.path());
    std::fs::write(assets.pages_dir.join("payments.pdf"), pdf_with_pages(&[(612.0, 792.0)])).unwrap();
    std::fs::write(assets.pages_dir.join("faq.pdf"), a4_pdf(2)).unwrap();

    let generator = generator(assets, FakeRenderer::returning(a4_pdf(2)));
    let pdf = generator.generate(&jane_to_bali(), 0).unwrap();

    let stats = pdf.composed.clone().unwrap();
    assert_eq!(stats.primary_pages, 2);
    assert_eq!(stats.appended_pages, 3);
    assert_eq!(stats.skipped, vec!["cancellation-policy.pdf"]);
    assert_eq!(Document::load_mem(&pdf.bytes).unwrap().get_pages().len(), 5);
}

#[test]
fn missing_destination_is_rejected_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = FakeRenderer::returning(a4_pdf(1));
    let generator = generator(assets(dir.path()), renderer.clone());

    let mut trip = jane_to_bali();
    trip.destination = None;

    match generator.generate(&trip, 0) {
        Err(ExportError::InvalidInput(CoreError::MissingFields { fields })) => {
            assert_eq!(fields, vec!["destination"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(renderer.calls(), 0);
}

#[test]
fn compositing_failure_falls_back_to_rendered_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let rendered = b"%PDF-1.7 but not really".to_vec();
    let generator = generator(assets(dir.path()), FakeRenderer::returning(rendered.clone()));

    let pdf = generator.generate(&jane_to_bali(), 0).unwrap();
    assert_eq!(pdf.bytes, rendered);
    assert!(!pdf.merged());
}

#[test]
fn missing_template_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = FakeRenderer::returning(a4_pdf(1));
    let assets = AssetPaths {
        template: dir.path().join("missing.html"),
        pages_dir: dir.path().to_path_buf(),
    };
    let generator = generator(assets, renderer.clone());

    let err = generator.generate(&jane_to_bali(), 0).unwrap_err();
    assert!(matches!(err, ExportError::TemplateNotFound(_)));
    assert!(err.to_string().contains("missing.html"));
    assert_eq!(renderer.calls(), 0);
}

#[test]
fn renderer_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(assets(dir.path()), Arc::new(FailingRenderer));

    let err = generator.generate(&jane_to_bali(), 0).unwrap_err();
    assert!(err.to_string().contains("browser crashed"));
}
