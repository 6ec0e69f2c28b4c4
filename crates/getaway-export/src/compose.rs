//! Page compositing.
//!
//! Appends the supplementary PDFs (payments, cancellation policy, FAQ) to a
//! freshly rendered itinerary. Itinerary pages are moved over untouched;
//! every supplementary page is wrapped in a form XObject and drawn onto a
//! new canonical A4 page, scaled to fit and centered.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use thiserror::Error;

use getaway_core::paths::{self, SUPPLEMENTARY_PAGES};

use crate::error::ExportError;
use crate::page::{CANONICAL_HEIGHT, CANONICAL_WIDTH};

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `/Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 32;

const FORM_NAME: &[u8] = b"Src";

/// A supplementary PDF as read from disk. `bytes` is `None` when the file
/// was missing or unreadable.
#[derive(Debug, Clone)]
pub struct Supplement {
    pub name: String,
    pub bytes: Option<Vec<u8>>,
}

/// Output of [`merge`].
#[derive(Debug, Clone)]
pub struct Composed {
    pub bytes: Vec<u8>,
    pub primary_pages: usize,
    pub appended_pages: usize,
    /// Supplements that contributed no pages.
    pub skipped: Vec<String>,
}

/// Where a supplementary page lands on the canonical page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f32,
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Error)]
enum Skip {
    #[error("file not found or unreadable")]
    Missing,

    #[error("file is empty")]
    Empty,

    #[error("document is encrypted")]
    Encrypted,

    #[error("no pages found")]
    NoPages,

    #[error("invalid PDF: {0}")]
    Invalid(#[from] lopdf::Error),
}

/// Largest scale that fits a `width` × `height` page inside the canonical
/// page without cropping, and the offsets that center it.
///
/// Returns `None` for non-positive or non-finite dimensions.
pub fn fit_to_canonical(width: f32, height: f32) -> Option<Placement> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return None;
    }
    let scale = (CANONICAL_WIDTH / width).min(CANONICAL_HEIGHT / height);
    let scaled_width = width * scale;
    let scaled_height = height * scale;
    Some(Placement {
        scale,
        width: scaled_width,
        height: scaled_height,
        x: (CANONICAL_WIDTH - scaled_width) / 2.0,
        y: (CANONICAL_HEIGHT - scaled_height) / 2.0,
    })
}

/// Read the fixed supplementary PDFs from `pages_dir`, in append order.
///
/// Files are read fresh on every call. A missing or unreadable file is
/// logged and yields a supplement without bytes.
pub fn load_supplements(pages_dir: &Path) -> Vec<Supplement> {
    tracing::debug!(dir = %pages_dir.display(), "looking for supplementary pages");

    SUPPLEMENTARY_PAGES
        .iter()
        .map(|name| {
            let path = paths::supplementary_page(pages_dir, name);
            let bytes = match std::fs::read(&path) {
                Ok(bytes) => {
                    tracing::debug!(resource = name, size = bytes.len(), "read supplementary page");
                    Some(bytes)
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!(path = %path.display(), "supplementary page not found");
                    None
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to read supplementary page");
                    None
                }
            };
            Supplement {
                name: name.to_string(),
                bytes,
            }
        })
        .collect()
}

/// Merge `primary` with `supplements`.
///
/// Fails only when the primary document cannot be loaded or the output
/// cannot be written. A bad supplement, or a bad page within one, is
/// logged and skipped.
pub fn merge(primary: &[u8], supplements: &[Supplement]) -> Result<Composed, ExportError> {
    tracing::info!("starting PDF merge");

    let primary_doc = Document::load_mem(primary)?;
    if primary_doc.is_encrypted() {
        return Err(ExportError::Compose("itinerary PDF is encrypted".to_string()));
    }

    let mut out = Document::with_version("1.7");
    let pages_id = out.new_object_id();

    let primary_ids = import_document(&mut out, primary_doc);
    let mut kids: Vec<Object> = Vec::with_capacity(primary_ids.len());
    for &page_id in &primary_ids {
        materialize_inherited(&mut out, page_id)?;
        out.get_object_mut(page_id)
            .and_then(Object::as_dict_mut)?
            .set("Parent", pages_id);
        kids.push(Object::Reference(page_id));
    }
    tracing::info!(pages = primary_ids.len(), "added itinerary pages");

    let mut appended_pages = 0;
    let mut skipped = Vec::new();
    for supplement in supplements {
        match append_supplement(&mut out, pages_id, supplement) {
            Ok(page_ids) if !page_ids.is_empty() => {
                tracing::info!(resource = %supplement.name, pages = page_ids.len(), "appended supplementary pages");
                appended_pages += page_ids.len();
                kids.extend(page_ids.into_iter().map(Object::Reference));
            }
            Ok(_) => {
                tracing::warn!(resource = %supplement.name, "no usable pages, skipping");
                skipped.push(supplement.name.clone());
            }
            Err(reason) => {
                tracing::warn!(resource = %supplement.name, %reason, "skipping supplementary page");
                skipped.push(supplement.name.clone());
            }
        }
    }

    let page_count = kids.len() as i64;
    out.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );
    let catalog_id = out.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    out.trailer.set("Root", catalog_id);

    out.prune_objects();
    out.renumber_objects();
    out.compress();

    let mut bytes = Vec::new();
    out.save_to(&mut bytes)
        .map_err(|e| ExportError::Compose(format!("failed to write merged PDF: {e}")))?;
    tracing::info!(size = bytes.len(), "merged PDF created");

    Ok(Composed {
        bytes,
        primary_pages: primary_ids.len(),
        appended_pages,
        skipped,
    })
}

/// Move every object of `src` into `dst` and return `src`'s page ids,
/// renumbered, in page order.
fn import_document(dst: &mut Document, mut src: Document) -> Vec<ObjectId> {
    src.renumber_objects_with(dst.max_id + 1);
    let page_ids: Vec<ObjectId> = src.get_pages().values().copied().collect();
    dst.max_id = dst.max_id.max(src.max_id);
    dst.objects.extend(src.objects);
    page_ids
}

fn append_supplement(
    out: &mut Document,
    pages_id: ObjectId,
    supplement: &Supplement,
) -> Result<Vec<ObjectId>, Skip> {
    let bytes = supplement.bytes.as_deref().ok_or(Skip::Missing)?;
    if bytes.is_empty() {
        return Err(Skip::Empty);
    }

    let doc = Document::load_mem(bytes)?;
    if doc.is_encrypted() {
        return Err(Skip::Encrypted);
    }
    let source_ids = import_document(out, doc);
    if source_ids.is_empty() {
        return Err(Skip::NoPages);
    }
    tracing::debug!(resource = %supplement.name, pages = source_ids.len(), "loaded supplementary PDF");

    let mut appended = Vec::with_capacity(source_ids.len());
    for (index, &source_id) in source_ids.iter().enumerate() {
        let page_number = index + 1;
        match append_scaled_page(out, pages_id, source_id) {
            Ok(Some(page_id)) => appended.push(page_id),
            Ok(None) => {
                tracing::warn!(resource = %supplement.name, page = page_number, "invalid page dimensions, skipping page");
            }
            Err(e) => {
                tracing::warn!(resource = %supplement.name, page = page_number, error = %e, "failed to process page");
            }
        }
    }
    Ok(appended)
}

/// Draw `source_id` onto a new canonical page. `Ok(None)` when the source
/// page has no usable size.
fn append_scaled_page(
    out: &mut Document,
    pages_id: ObjectId,
    source_id: ObjectId,
) -> Result<Option<ObjectId>, ExportError> {
    let Some([llx, lly, urx, ury]) = media_box(out, source_id) else {
        return Ok(None);
    };
    let (width, height) = (urx - llx, ury - lly);
    let Some(placement) = fit_to_canonical(width, height) else {
        return Ok(None);
    };
    tracing::debug!(
        width,
        height,
        scale = placement.scale,
        scaled_width = placement.width,
        scaled_height = placement.height,
        "scaling supplementary page"
    );

    let content = page_content(out, source_id);
    let resources = inherited(out, source_id, b"Resources")
        .unwrap_or_else(|| Object::Dictionary(Dictionary::new()));
    let bbox: Vec<Object> = [llx, lly, urx, ury].into_iter().map(Object::Real).collect();
    let form_id = out.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "FormType" => 1,
            "BBox" => bbox,
            "Resources" => resources,
        },
        content,
    ));

    // The form is drawn in its own coordinate space, so shift by the
    // scaled lower-left corner of the source box.
    let s = placement.scale;
    let draw = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(s),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(s),
                    Object::Real(placement.x - llx * s),
                    Object::Real(placement.y - lly * s),
                ],
            ),
            Operation::new("Do", vec![Object::Name(FORM_NAME.to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let contents_id = out.add_object(Stream::new(dictionary! {}, draw.encode()?));

    let mut xobjects = Dictionary::new();
    xobjects.set(FORM_NAME, form_id);
    let page_id = out.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => canonical_box(),
        "Contents" => contents_id,
        "Resources" => dictionary! {
            "XObject" => xobjects,
        },
    });
    Ok(Some(page_id))
}

fn canonical_box() -> Vec<Object> {
    vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(CANONICAL_WIDTH),
        Object::Real(CANONICAL_HEIGHT),
    ]
}

/// Copy inherited page-tree attributes onto the page itself so the page
/// keeps them once it is re-parented.
fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> Result<(), ExportError> {
    let missing: Vec<(&[u8], Object)> = {
        let page = doc.get_dictionary(page_id)?;
        INHERITABLE
            .iter()
            .filter(|key| !page.has(key))
            .filter_map(|key| inherited(doc, page_id, key).map(|value| (*key, value)))
            .collect()
    };
    let page = doc.get_object_mut(page_id).and_then(Object::as_dict_mut)?;
    for (key, value) in missing {
        page.set(key, value);
    }
    Ok(())
}

/// Look up `key` on the page or the nearest ancestor that defines it.
fn inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Decoded content of every stream in the page's `/Contents`, joined with
/// newlines so a token at the end of one stream cannot fuse with the next.
fn page_content(doc: &Document, page_id: ObjectId) -> Vec<u8> {
    let mut content = Vec::new();
    for stream_id in doc.get_page_contents(page_id) {
        let Ok(stream) = doc.get_object(stream_id).and_then(Object::as_stream) else {
            continue;
        };
        if !content.is_empty() {
            content.push(b'\n');
        }
        match stream.decompressed_content() {
            Ok(data) => content.extend_from_slice(&data),
            Err(_) => content.extend_from_slice(&stream.content),
        }
    }
    content
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// The page's MediaBox as `[llx, lly, urx, ury]`.
fn media_box(doc: &Document, page_id: ObjectId) -> Option<[f32; 4]> {
    let object = inherited(doc, page_id, b"MediaBox")?;
    let array = resolve(doc, &object)?.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let mut values = [0.0f32; 4];
    for (slot, value) in values.iter_mut().zip(array) {
        *slot = resolve(doc, value)?.as_float().ok()?;
    }
    Some(values)
}
